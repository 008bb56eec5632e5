use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Parser;
use json_ingest::elements::{extract_elements, write_mapping};

/// Extracts the requirement and conformance class URIs of a specification
/// into a CSV mapping.
#[derive(Parser)]
#[clap(name = "spec-elements", author, version, about, long_about = None)]
struct Args {
	/// Document identifier, such as `12-132r4`.
	identifier: String,

	/// URL of the published specification.
	spec_url: String,

	/// Plain text of the specification.
	///
	/// Defaults to `../specifications/<identifier>.txt`.
	#[clap(short, long)]
	input: Option<PathBuf>,

	/// Output CSV file.
	///
	/// Defaults to `../mappings/<identifier>.csv`.
	#[clap(short, long)]
	output: Option<PathBuf>,

	/// Sets the level of verbosity.
	#[clap(short, long = "verbose", parse(from_occurrences))]
	verbosity: usize,
}

fn main() {
	let args = Args::parse();

	if let Err(e) = stderrlog::new().verbosity(2 + args.verbosity).init() {
		eprintln!("error: unable to initialize logger: {e}");
	}

	let input = args
		.input
		.unwrap_or_else(|| PathBuf::from(format!("../specifications/{}.txt", args.identifier)));
	let output = args
		.output
		.unwrap_or_else(|| PathBuf::from(format!("../mappings/{}.csv", args.identifier)));

	let text = match std::fs::read_to_string(&input) {
		Ok(text) => text,
		Err(e) => {
			eprintln!("error: unable to read `{}`: {e}", input.display());
			std::process::exit(1);
		}
	};

	let elements = extract_elements(&text);
	log::info!("found {} specification element(s)", elements.len());

	let result = File::create(&output)
		.and_then(|file| write_mapping(&args.spec_url, &elements, BufWriter::new(file)));

	match result {
		Ok(count) => log::info!("wrote {count} mapping(s) to {}", output.display()),
		Err(e) => {
			eprintln!("error: unable to write `{}`: {e}", output.display());
			std::process::exit(1);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn positional_arguments() {
		let args = Args::try_parse_from([
			"spec-elements",
			"12-132r4",
			"http://docs.opengeospatial.org/is/12-132r4/12-132r4.html",
			"-o",
			"out.csv",
		])
		.unwrap();

		assert_eq!(args.identifier, "12-132r4");
		assert_eq!(
			args.spec_url,
			"http://docs.opengeospatial.org/is/12-132r4/12-132r4.html"
		);
		assert_eq!(args.input, None);
		assert_eq!(args.output, Some(PathBuf::from("out.csv")));
	}
}
