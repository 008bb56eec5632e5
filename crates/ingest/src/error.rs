use std::path::PathBuf;

use crate::{ApplyError, BuildError, DescriptorError, OutputError, RegistryError};

/// Processing error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("input is not a file ({})", .0.display())]
	InputNotAFile(PathBuf),

	#[error(
		"no context file provided for `{}` and one could not be discovered automatically",
		.0.display()
	)]
	MissingContext(PathBuf),

	#[error("unable to read `{}`: {1}", .0.display())]
	Read(PathBuf, std::io::Error),

	#[error("invalid base IRI `{0}`")]
	InvalidBaseIri(String),

	#[error("invalid JSON document `{}`: {1}", .0.display())]
	InvalidJson(PathBuf, serde_json::Error),

	#[error(transparent)]
	Descriptor(#[from] DescriptorError),

	#[error(transparent)]
	Registry(#[from] RegistryError),

	#[error(transparent)]
	Apply(#[from] ApplyError),

	#[error(transparent)]
	Build(#[from] BuildError),

	#[error(transparent)]
	Output(#[from] OutputError),
}
