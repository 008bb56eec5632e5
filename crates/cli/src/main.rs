use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use iref::IriBuf;
use json_ingest::{
	parse_base, BatchOptions, ContextRegistry, Destination, GraphBuilder, ProcessOptions,
	Processor,
};

#[derive(Parser)]
#[clap(name = "json-ingest", author, version, about, long_about = None)]
struct Args {
	/// Source file, or comma-separated list of files in batch mode.
	input: String,

	/// Generate a JSON-LD output file.
	#[clap(short, long)]
	json_ld: bool,

	/// JSON-LD output file name (`-` for the standard output).
	///
	/// Only used together with `--json-ld`.
	#[clap(long)]
	json_ld_file: Option<String>,

	/// Generate a Turtle output file.
	#[clap(short, long)]
	ttl: bool,

	/// Turtle output file name (`-` for the standard output).
	///
	/// Only used together with `--ttl`.
	#[clap(long)]
	ttl_file: Option<String>,

	/// YAML context descriptor (instead of autodetection).
	#[clap(short, long)]
	context: Option<PathBuf>,

	/// Base URI for JSON-LD.
	#[clap(short, long)]
	base_uri: Option<String>,

	/// Skip files for which a context descriptor cannot be found (instead of
	/// failing).
	#[clap(short, long)]
	skip_on_missing_context: bool,

	/// Batch processing: the input is one or more files separated by commas,
	/// context descriptors are autodiscovered and output file names are
	/// always generated.
	#[clap(long)]
	batch: bool,

	/// Separator used to print the list of output files (no list by default).
	#[clap(long)]
	fs: Option<String>,

	/// JSON context registry file, an object of `jsonFile: yamlContextFile`
	/// pairs.
	#[clap(short = 'r', long)]
	context_registry: Option<PathBuf>,

	/// Remote context fetch timeout, in seconds.
	#[clap(long, default_value = "5")]
	timeout: u64,

	/// Sets the level of verbosity.
	#[clap(short, long = "verbose", parse(from_occurrences))]
	verbosity: usize,
}

#[tokio::main]
async fn main() {
	// Parse options.
	let args = Args::parse();

	// Init logger.
	if let Err(e) = stderrlog::new().verbosity(2 + args.verbosity).init() {
		eprintln!("error: unable to initialize logger: {e}");
	}

	match run(args).await {
		Ok(()) => (),
		Err(e) => {
			eprintln!("error: {e}");
			std::process::exit(1);
		}
	}
}

async fn run(args: Args) -> Result<(), json_ingest::Error> {
	let registry = match &args.context_registry {
		Some(path) => ContextRegistry::load(path)?,
		None => ContextRegistry::new(),
	};

	let base = base_iri(&args)?;

	let processor = Processor::new(
		GraphBuilder::new(Duration::from_secs(args.timeout)),
		registry,
	);

	let written = if args.batch {
		log::info!("input files: {}", args.input);
		let options = BatchOptions {
			turtle: args.ttl,
			json_ld: args.json_ld,
			base,
		};

		processor.run_batch(&args.input, &options).await
	} else {
		let options = ProcessOptions {
			turtle: args
				.ttl
				.then(|| Destination::from_arg(args.ttl_file.as_deref())),
			json_ld: args
				.json_ld
				.then(|| Destination::from_arg(args.json_ld_file.as_deref())),
			context: args.context.clone(),
			base,
			skip_on_missing_context: args.skip_on_missing_context,
		};

		processor.process(Path::new(&args.input), &options).await?
	};

	if let Some(separator) = &args.fs {
		let list: Vec<_> = written.iter().map(|path| path.display().to_string()).collect();
		println!("{}", list.join(separator))
	}

	Ok(())
}

/// Parses `--base-uri`.
///
/// An invalid base IRI fails a single file conversion, but is only reported
/// in batch mode.
fn base_iri(args: &Args) -> Result<Option<IriBuf>, json_ingest::Error> {
	match args.base_uri.as_deref().map(parse_base).transpose() {
		Err(e) if args.batch => {
			log::warn!("{e}, ignored");
			Ok(None)
		}
		result => result,
	}
}
