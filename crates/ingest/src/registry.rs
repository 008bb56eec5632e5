//! Context registry.
//!
//! A registry explicitly pairs JSON documents with their context descriptor.
//! It is read from a JSON object whose keys are document paths and values
//! context descriptor paths, both relative to the registry file itself:
//!
//! ```json
//! {
//!   "data/catalog.json": "contexts/catalog.yml",
//!   "data/other.json": "contexts/catalog.yml"
//! }
//! ```
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

use crate::paths;

/// Registry loading error.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
	#[error("unable to read context registry `{}`: {1}", .0.display())]
	Io(PathBuf, std::io::Error),

	#[error("invalid context registry `{}`: {1}", .0.display())]
	Json(PathBuf, serde_json::Error),
}

/// Document to context descriptor mapping.
///
/// All paths are stored absolute and normalized. Entries are indexed by the
/// file identity of their document, computed once when inserted, so that
/// lookups only resolve the queried path.
#[derive(Debug, Clone, Default)]
pub struct ContextRegistry {
	entries: IndexMap<PathBuf, Entry>,
}

#[derive(Debug, Clone)]
struct Entry {
	document: PathBuf,
	context: PathBuf,

	/// File identity of `context`.
	context_id: PathBuf,
}

impl ContextRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Loads the registry stored in the given file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
		let path = path.as_ref();
		let content =
			std::fs::read_to_string(path).map_err(|e| RegistryError::Io(path.to_owned(), e))?;
		let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
		Self::from_json_str(&content, base_dir).map_err(|e| RegistryError::Json(path.to_owned(), e))
	}

	/// Parses a registry, resolving its paths against `base_dir`.
	pub fn from_json_str(content: &str, base_dir: &Path) -> Result<Self, serde_json::Error> {
		let raw: IndexMap<String, String> = serde_json::from_str(content)?;
		let mut registry = Self::new();
		for (document, context) in raw {
			registry.insert(base_dir.join(document), base_dir.join(context));
		}

		log::debug!("loaded {} context registry entries", registry.len());
		Ok(registry)
	}

	/// Registers `context` as the context descriptor of `document`.
	///
	/// Replaces any previous entry for the same document file.
	pub fn insert(&mut self, document: impl AsRef<Path>, context: impl AsRef<Path>) {
		let document = paths::absolute(document.as_ref());
		let context = paths::absolute(context.as_ref());
		let entry = Entry {
			context_id: paths::identity(&context),
			document,
			context,
		};

		self.entries.insert(paths::identity(&entry.document), entry);
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&Path, &Path)> {
		self.entries
			.values()
			.map(|entry| (entry.document.as_path(), entry.context.as_path()))
	}

	/// Finds the context descriptor registered for the given document.
	pub fn context_for(&self, document: &Path) -> Option<&Path> {
		self.entries
			.get(&paths::identity(document))
			.map(|entry| entry.context.as_path())
	}

	/// Lists the documents registered with the given context descriptor.
	pub fn documents_for(&self, context: &Path) -> Vec<PathBuf> {
		let context = paths::identity(context);
		self.entries
			.values()
			.filter(|entry| entry.context_id == context)
			.map(|entry| entry.document.clone())
			.collect()
	}

	/// Checks if the given document has an entry in the registry.
	pub fn contains_document(&self, document: &Path) -> bool {
		self.entries.contains_key(&paths::identity(document))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn paths_are_resolved_against_the_registry_directory() {
		let registry = ContextRegistry::from_json_str(
			r#"{ "data/a.json": "ctx/../ctx/a.yml", "b.json": "b.yml" }"#,
			Path::new("/srv/registry"),
		)
		.unwrap();

		let entries: Vec<_> = registry.iter().collect();
		assert_eq!(
			entries,
			[
				(
					Path::new("/srv/registry/data/a.json"),
					Path::new("/srv/registry/ctx/a.yml")
				),
				(
					Path::new("/srv/registry/b.json"),
					Path::new("/srv/registry/b.yml")
				)
			]
		);
	}

	#[test]
	fn lookups() {
		let mut registry = ContextRegistry::new();
		registry.insert("/srv/a.json", "/srv/ctx.yml");
		registry.insert("/srv/b.json", "/srv/ctx.yml");
		registry.insert("/srv/c.json", "/srv/c.yml");

		assert_eq!(
			registry.context_for(Path::new("/srv/./a.json")),
			Some(Path::new("/srv/ctx.yml"))
		);
		assert_eq!(registry.context_for(Path::new("/srv/d.json")), None);
		assert_eq!(
			registry.documents_for(Path::new("/srv/ctx.yml")),
			[PathBuf::from("/srv/a.json"), PathBuf::from("/srv/b.json")]
		);
		assert!(registry.contains_document(Path::new("/srv/c.json")));
		assert!(!registry.contains_document(Path::new("/srv/c.yml")));
	}

	#[cfg(unix)]
	#[test]
	fn entries_match_through_links() {
		let dir = tempfile::tempdir().unwrap();
		let real = dir.path().join("real");
		let link = dir.path().join("link");
		std::fs::create_dir(&real).unwrap();
		std::fs::write(real.join("a.json"), "{}").unwrap();
		std::fs::write(real.join("a.yml"), "context: {}").unwrap();
		std::os::unix::fs::symlink(&real, &link).unwrap();

		let registry =
			ContextRegistry::from_json_str(r#"{ "link/a.json": "link/a.yml" }"#, dir.path()).unwrap();

		assert_eq!(
			registry.context_for(&real.join("a.json")),
			Some(link.join("a.yml").as_path())
		);
		assert!(registry.contains_document(&real.join("./a.json")));
		assert_eq!(
			registry.documents_for(&real.join("a.yml")),
			[link.join("a.json")]
		);
	}

	#[test]
	fn inserting_a_document_again_replaces_its_entry() {
		let mut registry = ContextRegistry::new();
		registry.insert("/srv/a.json", "/srv/old.yml");
		registry.insert("/srv/./a.json", "/srv/new.yml");

		assert_eq!(registry.len(), 1);
		assert_eq!(
			registry.context_for(Path::new("/srv/a.json")),
			Some(Path::new("/srv/new.yml"))
		);
		assert!(registry.documents_for(Path::new("/srv/old.yml")).is_empty());
	}

	#[test]
	fn non_object_registry() {
		assert!(ContextRegistry::from_json_str("[]", Path::new("/")).is_err());
	}
}
