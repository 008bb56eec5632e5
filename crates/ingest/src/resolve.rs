//! Context descriptor discovery.
use std::path::{Path, PathBuf};

use crate::paths::{self, DIRECTORY_CONTEXT_NAMES, JSON_EXTENSIONS};
use crate::ContextRegistry;

/// Finds the context descriptor governing the given JSON document.
///
/// Candidates, by priority:
///   1. the registry entry of the document;
///   2. a sibling descriptor named after the document: `<input>.yml`,
///      `<input>.yaml`, `<input-without-ext>.yaml` or `<input-without-ext>.yml`;
///   3. a `_json-context.yml` or `_json-context.yaml` file in the document
///      directory.
///
/// Returns `None` if no candidate exists.
pub fn find_context(input: &Path, registry: &ContextRegistry) -> Option<PathBuf> {
	if let Some(context) = registry.context_for(input) {
		return Some(context.to_path_buf());
	}

	let base = paths::strip_extension(input);
	let dir = input.parent().unwrap_or_else(|| Path::new(""));

	let candidates = [
		paths::append(input, ".yml"),
		paths::append(input, ".yaml"),
		paths::append(&base, ".yaml"),
		paths::append(&base, ".yml"),
	]
	.into_iter()
	.chain(DIRECTORY_CONTEXT_NAMES.iter().map(|name| dir.join(name)));

	for candidate in candidates {
		if candidate.is_file() {
			log::info!(
				"autodetected context {} for file {}",
				candidate.display(),
				input.display()
			);
			return Some(candidate);
		}
	}

	None
}

/// Finds the JSON documents governed by the given context descriptor.
///
/// This is the reverse of [`find_context`]:
///   1. documents registered with this descriptor in the registry;
///   2. otherwise, the document named after the descriptor, if it exists and
///      is not in the registry: `a.json.yml` governs `a.json`, `a.yml`
///      governs the first of `a.json`, `a.jsonld` or `a.json-ld`;
///   3. otherwise, if the descriptor is a directory default
///      (`_json-context.yml`), every `*.json` file of the directory that is
///      not in the registry. JSON-LD files are left out since they may have
///      been produced by this very tool.
pub fn files_for_context(context: &Path, registry: &ContextRegistry) -> Vec<PathBuf> {
	let registered = registry.documents_for(context);
	if !registered.is_empty() {
		return registered;
	}

	let unregistered_file = |path: &Path| path.is_file() && !registry.contains_document(path);

	let base = paths::strip_extension(context);
	if paths::is_json_filename(&base) {
		return if unregistered_file(&base) {
			vec![base]
		} else {
			Vec::new()
		};
	}

	if let Some(document) = JSON_EXTENSIONS
		.iter()
		.map(|ext| paths::append(&base, ext))
		.find(|candidate| unregistered_file(candidate))
	{
		return vec![document];
	}

	if paths::is_directory_context(context) {
		let dir = match context.parent() {
			Some(dir) if !dir.as_os_str().is_empty() => dir,
			_ => Path::new("."),
		};

		return match directory_documents(dir) {
			Ok(documents) => documents
				.into_iter()
				.filter(|document| !registry.contains_document(document))
				.collect(),
			Err(e) => {
				log::warn!("unable to list directory {}: {e}", dir.display());
				Vec::new()
			}
		};
	}

	Vec::new()
}

/// Lists the `*.json` files of the given directory, sorted by path.
fn directory_documents(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
	let mut documents = Vec::new();
	for entry in std::fs::read_dir(dir)? {
		let entry = entry?;
		let path = entry.path();
		if entry.file_type()?.is_file() && path.to_string_lossy().ends_with(".json") {
			documents.push(path)
		}
	}

	documents.sort();
	Ok(documents)
}
