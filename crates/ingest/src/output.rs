//! Conversion outputs.
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{paths, Conversion, GraphError};

/// Output writing error.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
	#[error("unable to write `{}`: {1}", .0.display())]
	Io(PathBuf, std::io::Error),

	#[error("unable to write to standard output: {0}")]
	Stdout(std::io::Error),

	#[error(transparent)]
	Graph(#[from] GraphError),
}

/// Where an output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
	/// File named after the input document.
	Auto,

	/// Given file.
	File(PathBuf),

	/// Standard output.
	Stdout,
}

impl Destination {
	/// Interprets an optional `--*-file` argument.
	///
	/// `-` means the standard output, no argument means an automatically
	/// named file.
	pub fn from_arg(arg: Option<&str>) -> Self {
		match arg {
			None => Self::Auto,
			Some("-") => Self::Stdout,
			Some(path) => Self::File(PathBuf::from(path)),
		}
	}

	/// Resolves the destination file for the given input and output
	/// extension, or `None` for the standard output.
	pub fn path_for(&self, input: &Path, extension: &str) -> Option<PathBuf> {
		match self {
			Self::Auto => Some(auto_name(input, extension)),
			Self::File(path) => Some(path.clone()),
			Self::Stdout => None,
		}
	}
}

/// Returns the automatic output file name for `input`.
///
/// The input extension is replaced by `extension`, unless the input already
/// has this extension, in which case `extension` is appended so the input is
/// never overwritten.
pub fn auto_name(input: &Path, extension: &str) -> PathBuf {
	if paths::dotted_extension(input).as_deref() == Some(extension) {
		paths::append(input, extension)
	} else {
		paths::append(&paths::strip_extension(input), extension)
	}
}

/// Writes the requested outputs of a conversion.
///
/// Turtle is written first, then JSON-LD. Returns the written files, standard
/// output excluded.
pub fn write_outputs(
	input: &Path,
	conversion: &Conversion,
	turtle: Option<&Destination>,
	json_ld: Option<&Destination>,
) -> Result<Vec<PathBuf>, OutputError> {
	let mut written = Vec::new();

	if let Some(destination) = turtle {
		let content = conversion.graph.to_turtle()?;
		if let Some(path) = write(destination, input, ".ttl", &content)? {
			written.push(path)
		}
	}

	if let Some(destination) = json_ld {
		if let Some(path) = write(destination, input, ".jsonld", &conversion.json_ld)? {
			written.push(path)
		}
	}

	Ok(written)
}

fn write(
	destination: &Destination,
	input: &Path,
	extension: &str,
	content: &str,
) -> Result<Option<PathBuf>, OutputError> {
	match destination.path_for(input, extension) {
		Some(path) => {
			std::fs::write(&path, content).map_err(|e| OutputError::Io(path.clone(), e))?;
			log::info!("wrote {}", path.display());
			Ok(Some(path))
		}
		None => {
			let mut stdout = std::io::stdout().lock();
			stdout
				.write_all(content.as_bytes())
				.and_then(|()| stdout.flush())
				.map_err(OutputError::Stdout)?;
			Ok(None)
		}
	}
}
