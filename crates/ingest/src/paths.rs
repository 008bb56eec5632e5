//! File naming conventions and path comparison.
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Extensions recognized as JSON or JSON-LD documents.
pub const JSON_EXTENSIONS: [&str; 3] = [".json", ".jsonld", ".json-ld"];

/// Extensions recognized as YAML context descriptors.
pub const YAML_EXTENSIONS: [&str; 2] = [".yml", ".yaml"];

/// Names of the directory-level default context descriptors, by priority.
pub const DIRECTORY_CONTEXT_NAMES: [&str; 2] = ["_json-context.yml", "_json-context.yaml"];

fn ends_with_any(path: &Path, extensions: &[&str]) -> bool {
	let name = path.to_string_lossy();
	extensions.iter().any(|ext| name.ends_with(ext))
}

/// Checks if the given path names a JSON or JSON-LD document.
pub fn is_json_filename(path: impl AsRef<Path>) -> bool {
	ends_with_any(path.as_ref(), &JSON_EXTENSIONS)
}

/// Checks if the given path names a YAML file.
pub fn is_yaml_filename(path: impl AsRef<Path>) -> bool {
	ends_with_any(path.as_ref(), &YAML_EXTENSIONS)
}

/// Checks if the given path names a directory-level default context
/// descriptor.
pub fn is_directory_context(path: impl AsRef<Path>) -> bool {
	path.as_ref()
		.file_name()
		.and_then(|name| name.to_str())
		.map(|name| DIRECTORY_CONTEXT_NAMES.contains(&name))
		.unwrap_or(false)
}

/// Returns the path with its last extension removed.
///
/// `dir/a.json` gives `dir/a`, `dir/a` is returned unchanged.
pub fn strip_extension(path: &Path) -> PathBuf {
	match path.extension() {
		Some(_) => path.with_extension(""),
		None => path.to_path_buf(),
	}
}

/// Returns the extension of the path, including the leading dot.
pub fn dotted_extension(path: &Path) -> Option<String> {
	path.extension()
		.map(|ext| format!(".{}", ext.to_string_lossy()))
}

/// Appends `suffix` to the path, without replacing any existing extension.
///
/// `a.json` with `.yml` gives `a.json.yml`.
pub fn append(path: &Path, suffix: &str) -> PathBuf {
	let mut s: OsString = path.as_os_str().to_owned();
	s.push(suffix);
	PathBuf::from(s)
}

/// Lexically normalizes the path, resolving `.` and `..` components without
/// touching the file system.
pub fn normalize(path: &Path) -> PathBuf {
	let mut result = PathBuf::new();

	for component in path.components() {
		match component {
			Component::CurDir => (),
			Component::ParentDir => {
				if !result.pop() {
					result.push("..")
				}
			}
			other => result.push(other.as_os_str()),
		}
	}

	result
}

/// Returns the absolute, lexically normalized version of the path.
pub fn absolute(path: &Path) -> PathBuf {
	if path.is_absolute() {
		normalize(path)
	} else {
		match std::env::current_dir() {
			Ok(cwd) => normalize(&cwd.join(path)),
			Err(_) => normalize(path),
		}
	}
}

/// Key identifying the file behind a path.
///
/// The canonical path when the file exists, the absolute normalized path
/// otherwise.
pub fn identity(path: &Path) -> PathBuf {
	std::fs::canonicalize(path).unwrap_or_else(|_| absolute(path))
}
