//! YAML context descriptors.
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Context descriptor loading error.
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
	#[error("unable to read context descriptor `{}`: {1}", .0.display())]
	Io(PathBuf, std::io::Error),

	#[error("invalid context descriptor `{}`: {1}", .0.display())]
	Yaml(PathBuf, serde_yaml::Error),
}

/// Location where a context is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector<'a> {
	/// The whole document is wrapped into a `@graph` with the context.
	Global,

	/// JSON-Path expression selecting the objects receiving the context.
	Path(&'a str),
}

impl<'a> Selector<'a> {
	pub fn new(s: &'a str) -> Self {
		match s {
			"" | "." | "$" => Self::Global,
			path => Self::Path(path),
		}
	}

	pub fn is_global(&self) -> bool {
		matches!(self, Self::Global)
	}
}

/// Context descriptor.
///
/// Describes how a plain JSON document is turned into JSON-LD.
/// Only the `transform` and `context` keys are recognized, anything else is
/// ignored. Context values are kept as they are, in the order of the file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContextDescriptor {
	/// jq filter applied to the document before any context is attached.
	#[serde(default)]
	pub transform: Option<String>,

	/// Contexts to attach, by location.
	#[serde(default)]
	pub context: Option<IndexMap<String, Value>>,
}

impl ContextDescriptor {
	/// Loads the descriptor stored in the given YAML file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, DescriptorError> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path)
			.map_err(|e| DescriptorError::Io(path.to_owned(), e))?;
		Self::from_yaml_str(&content).map_err(|e| DescriptorError::Yaml(path.to_owned(), e))
	}

	pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
		serde_yaml::from_str(content)
	}

	/// Returns the transform expression, if any.
	///
	/// An empty expression counts as no transform.
	pub fn transform(&self) -> Option<&str> {
		self.transform
			.as_deref()
			.map(str::trim)
			.filter(|t| !t.is_empty())
	}

	/// Iterates over the contexts to attach, in declaration order.
	pub fn contexts(&self) -> impl Iterator<Item = (Selector<'_>, &Value)> {
		self.context
			.iter()
			.flatten()
			.map(|(location, value)| (Selector::new(location), value))
	}
}
