//! Context application.
//!
//! Turns a plain JSON document into a JSON-LD document by attaching the
//! contexts listed in a [`ContextDescriptor`].
use indexmap::IndexSet;
use serde_json::{Map, Value};
use serde_json_path::JsonPath;
use std::borrow::Cow;
use std::path::Path;

use crate::{ContextDescriptor, DescriptorError, Selector, Transform, TransformError};

/// Context application error.
#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
	#[error(transparent)]
	Descriptor(#[from] DescriptorError),

	#[error(transparent)]
	Transform(#[from] TransformError),

	#[error("invalid JSON-Path `{0}`: {1}")]
	InvalidPath(String, serde_json_path::ParseError),

	#[error("`{selector}` selects a non-object value at `{pointer}`")]
	NotAnObject { selector: String, pointer: String },
}

/// Applies the context descriptor stored in `descriptor_path` to the given
/// document.
pub fn apply_context_file(
	document: Value,
	descriptor_path: impl AsRef<Path>,
) -> Result<Value, ApplyError> {
	let descriptor = ContextDescriptor::load(descriptor_path)?;
	apply_context(document, &descriptor)
}

/// Applies the context descriptor to the given document.
///
/// The transform, if any, runs first. Then every context with a JSON-Path
/// selector is attached, as an `@context` entry, to each object the path
/// selects; a path selecting nothing is not an error. The global context, if
/// any and not empty, is applied last by wrapping the whole document:
///
/// ```json
/// { "@context": <global context>, "@graph": <document> }
/// ```
pub fn apply_context(document: Value, descriptor: &ContextDescriptor) -> Result<Value, ApplyError> {
	let mut document = match descriptor.transform() {
		Some(expression) => Transform::compile(expression)?.apply(document)?,
		None => document,
	};

	let mut global_context = None;
	for (selector, context) in descriptor.contexts() {
		match selector {
			Selector::Global => global_context = Some(context),
			Selector::Path(path) => {
				let count = attach(&mut document, path, context)?;
				log::debug!("attached context to {count} node(s) selected by `{path}`")
			}
		}
	}

	Ok(match global_context {
		Some(context) if !is_empty(context) => {
			let mut wrapped = Map::new();
			wrapped.insert("@context".to_owned(), context.clone());
			wrapped.insert("@graph".to_owned(), document);
			Value::Object(wrapped)
		}
		_ => document,
	})
}

/// Checks if a global context is empty, in which case it is not applied.
///
/// `null`, `false`, `0`, `""`, `[]` and `{}` are empty.
fn is_empty(context: &Value) -> bool {
	match context {
		Value::Null => true,
		Value::Bool(b) => !b,
		Value::Number(n) => n.as_f64() == Some(0.0),
		Value::String(s) => s.is_empty(),
		Value::Array(items) => items.is_empty(),
		Value::Object(entries) => entries.is_empty(),
	}
}

/// Completes a selector into an absolute JSON-Path.
///
/// Selectors may omit the root identifier: `a.b` stands for `$.a.b` and
/// `[0]` for `$[0]`.
fn absolute_path(selector: &str) -> Cow<str> {
	if selector.starts_with('$') {
		Cow::Borrowed(selector)
	} else if selector.starts_with('.') || selector.starts_with('[') {
		Cow::Owned(format!("${selector}"))
	} else {
		Cow::Owned(format!("$.{selector}"))
	}
}

/// Attaches `context` to every object selected by `selector`.
///
/// Returns the number of objects the context has been attached to.
fn attach(document: &mut Value, selector: &str, context: &Value) -> Result<usize, ApplyError> {
	let pointers = select(document, selector)?;

	for pointer in &pointers {
		match document.pointer_mut(pointer) {
			Some(Value::Object(node)) => {
				node.insert("@context".to_owned(), context.clone());
			}
			Some(_) => {
				return Err(ApplyError::NotAnObject {
					selector: selector.to_owned(),
					pointer: pointer.clone(),
				})
			}
			None => (),
		}
	}

	Ok(pointers.len())
}

/// Evaluates a selector, returning the JSON pointers of the selected values.
///
/// Selectors follow RFC 9535 with two relaxations:
///   - dotted member names may contain any character but `.` and `[`
///     (`$.feature-type`);
///   - a `[*]` segment applied to a value that is not an array selects the
///     value itself, as if it was a one-item array.
fn select(document: &Value, selector: &str) -> Result<IndexSet<String>, ApplyError> {
	let path = absolute_path(selector);
	let mut pointers: IndexSet<String> = IndexSet::from([String::new()]);

	for (i, segment) in segments(&path[1..]).iter().enumerate() {
		if i > 0 {
			pointers = pointers
				.into_iter()
				.flat_map(|pointer| wildcard(document, pointer))
				.collect();
		}

		let query = JsonPath::parse(&format!("${segment}"))
			.map_err(|e| ApplyError::InvalidPath(selector.to_owned(), e))?;

		let mut selected = IndexSet::new();
		for pointer in &pointers {
			if let Some(node) = document.pointer(pointer) {
				selected.extend(
					query
						.query_located(node)
						.locations()
						.map(|location| format!("{pointer}{}", location.to_json_pointer())),
				);
			}
		}

		pointers = selected;
	}

	Ok(pointers)
}

/// Applies a `[*]` segment to the value at `pointer`.
fn wildcard(document: &Value, pointer: String) -> Vec<String> {
	match document.pointer(&pointer) {
		Some(Value::Array(items)) => (0..items.len()).map(|i| format!("{pointer}/{i}")).collect(),
		Some(_) => vec![pointer],
		None => Vec::new(),
	}
}

/// Splits a path (without its root identifier) around its top-level `[*]`
/// segments, rewriting dotted member names that are not valid RFC 9535
/// shorthands into bracket notation.
fn segments(path: &str) -> Vec<String> {
	let chars: Vec<char> = path.chars().collect();
	let mut segments = Vec::new();
	let mut current = String::new();
	let mut depth = 0usize;
	let mut quote: Option<char> = None;
	let mut i = 0;

	while i < chars.len() {
		let c = chars[i];

		if let Some(q) = quote {
			current.push(c);
			if c == '\\' {
				if let Some(&escaped) = chars.get(i + 1) {
					current.push(escaped);
					i += 1
				}
			} else if c == q {
				quote = None
			}

			i += 1;
			continue;
		}

		match c {
			'\'' | '"' if depth > 0 => {
				quote = Some(c);
				current.push(c)
			}
			'[' if depth == 0 && chars[i + 1..].starts_with(&['*', ']']) && !current.ends_with("..") => {
				segments.push(std::mem::take(&mut current));
				i += 3;
				continue;
			}
			'[' => {
				depth += 1;
				current.push(c)
			}
			']' => {
				depth = depth.saturating_sub(1);
				current.push(c)
			}
			'.' if depth == 0 => {
				current.push('.');
				if chars.get(i + 1) == Some(&'.') {
					current.push('.');
					i += 1
				}

				let start = i + 1;
				let mut end = start;
				while end < chars.len() && !matches!(chars[end], '.' | '[') {
					end += 1
				}

				let name: String = chars[start..end].iter().collect();
				if name.is_empty() || name == "*" || is_shorthand(&name) {
					current.push_str(&name)
				} else {
					if !current.ends_with("..") {
						current.pop();
					}

					let escaped = name.replace('\\', "\\\\").replace('\'', "\\'");
					current.push_str(&format!("['{escaped}']"))
				}

				i = end;
				continue;
			}
			_ => current.push(c),
		}

		i += 1
	}

	segments.push(current);
	segments
}

/// Checks if `name` can be written as an RFC 9535 member name shorthand.
fn is_shorthand(name: &str) -> bool {
	let mut chars = name.chars();
	let first = chars
		.next()
		.map_or(false, |c| c == '_' || c.is_ascii_alphabetic() || !c.is_ascii());
	first && chars.all(|c| c == '_' || c.is_ascii_alphanumeric() || !c.is_ascii())
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn descriptor(yaml: &str) -> ContextDescriptor {
		ContextDescriptor::from_yaml_str(yaml).unwrap()
	}

	#[test]
	fn global_context_wraps_document() {
		let document = json!([{ "name": "a" }, { "name": "b" }]);
		let output = apply_context(
			document.clone(),
			&descriptor("context:\n  .:\n    name: http://example.org/name\n"),
		)
		.unwrap();

		assert_eq!(
			output,
			json!({
				"@context": { "name": "http://example.org/name" },
				"@graph": document
			})
		);
	}

	#[test]
	fn dollar_is_global() {
		let output = apply_context(
			json!({ "a": 1 }),
			&descriptor("context:\n  $: http://example.org/context.jsonld\n"),
		)
		.unwrap();

		assert_eq!(
			output,
			json!({ "@context": "http://example.org/context.jsonld", "@graph": { "a": 1 } })
		);
	}

	#[test]
	fn path_context_is_attached_to_every_match() {
		let output = apply_context(
			json!({ "items": [{ "id": 1 }, { "id": 2 }], "meta": {} }),
			&descriptor("context:\n  $.items[*]:\n    id: '@id'\n"),
		)
		.unwrap();

		assert_eq!(
			output,
			json!({
				"items": [
					{ "id": 1, "@context": { "id": "@id" } },
					{ "id": 2, "@context": { "id": "@id" } }
				],
				"meta": {}
			})
		);
	}

	#[test]
	fn empty_global_context_does_not_wrap() {
		for context in ["~", "{}", "''", "[]", "false"] {
			let document = json!({ "a": 1 });
			let output = apply_context(
				document.clone(),
				&descriptor(&format!("context:\n  .: {context}\n")),
			)
			.unwrap();
			assert_eq!(output, document, "global context `{context}`");
		}
	}

	#[test]
	fn dashed_member_names() {
		let output = apply_context(
			json!({ "feature-type": { "a": 1 }, "other": {} }),
			&descriptor("context:\n  $.feature-type:\n    a: http://example.org/a\n"),
		)
		.unwrap();

		assert_eq!(
			output,
			json!({
				"feature-type": { "a": 1, "@context": { "a": "http://example.org/a" } },
				"other": {}
			})
		);
	}

	#[test]
	fn wildcard_on_object_selects_the_object() {
		let output = apply_context(
			json!({ "items": { "id": "http://example.org/1", "name": "one" } }),
			&descriptor("context:\n  $.items[*]:\n    id: '@id'\n"),
		)
		.unwrap();

		assert_eq!(
			output,
			json!({
				"items": {
					"id": "http://example.org/1",
					"name": "one",
					"@context": { "id": "@id" }
				}
			})
		);
	}

	#[test]
	fn wildcard_inside_path() {
		let output = apply_context(
			json!({
				"groups": [
					{ "owner": { "name": "a" } },
					{ "owner": { "name": "b" } }
				],
				"single": { "owner": { "name": "c" } }
			}),
			&descriptor(
				"context:\n  $.groups[*].owner:\n    name: http://example.org/name\n  $.single[*].owner:\n    name: http://example.org/name\n",
			),
		)
		.unwrap();

		let context = json!({ "name": "http://example.org/name" });
		assert_eq!(output["groups"][0]["owner"]["@context"], context);
		assert_eq!(output["groups"][1]["owner"]["@context"], context);
		assert_eq!(output["single"]["owner"]["@context"], context);
		assert!(output["groups"][0].get("@context").is_none());
	}

	#[test]
	fn selector_segments() {
		assert_eq!(segments(".a.b"), [".a.b"]);
		assert_eq!(segments(".feature-type.x"), ["['feature-type'].x"]);
		assert_eq!(segments("..it's"), ["..['it\\'s']"]);
		assert_eq!(segments(".items[*].owner"), [".items", ".owner"]);
		assert_eq!(segments("[*]"), ["", ""]);
		assert_eq!(segments("..[*]"), ["..[*]"]);
		assert_eq!(segments("[?@.k == 'a.b-c']"), ["[?@.k == 'a.b-c']"]);
	}

	#[test]
	fn relative_selector() {
		let output = apply_context(
			json!({ "meta": { "a": 1 } }),
			&descriptor("context:\n  meta:\n    '@vocab': http://example.org/\n"),
		)
		.unwrap();

		assert_eq!(
			output,
			json!({ "meta": { "a": 1, "@context": { "@vocab": "http://example.org/" } } })
		);
	}

	#[test]
	fn unmatched_selector_is_a_no_op() {
		let document = json!({ "a": { "b": 1 } });
		let output = apply_context(
			document.clone(),
			&descriptor("context:\n  $.missing[*]:\n    x: http://example.org/x\n"),
		)
		.unwrap();
		assert_eq!(output, document);
	}

	#[test]
	fn local_contexts_are_applied_before_wrapping() {
		let output = apply_context(
			json!({ "a": {} }),
			&descriptor(
				"context:\n  .:\n    '@vocab': http://example.org/\n  $.a:\n    b: http://example.org/b\n",
			),
		)
		.unwrap();

		assert_eq!(
			output,
			json!({
				"@context": { "@vocab": "http://example.org/" },
				"@graph": { "a": { "@context": { "b": "http://example.org/b" } } }
			})
		);
	}

	#[test]
	fn transform_runs_first() {
		let output = apply_context(
			json!({ "results": [{ "k": 1 }] }),
			&descriptor(
				"transform: '.results'\ncontext:\n  $[0]:\n    k: http://example.org/k\n",
			),
		)
		.unwrap();

		assert_eq!(output, json!([{ "k": 1, "@context": { "k": "http://example.org/k" } }]));
	}

	#[test]
	fn non_object_match() {
		let result = apply_context(
			json!({ "a": [1, 2] }),
			&descriptor("context:\n  $.a[0]:\n    x: http://example.org/x\n"),
		);
		assert!(matches!(result, Err(ApplyError::NotAnObject { .. })));
	}

	#[test]
	fn invalid_selector() {
		let result = apply_context(
			json!({}),
			&descriptor("context:\n  '$.a[':\n    x: http://example.org/x\n"),
		);
		assert!(matches!(result, Err(ApplyError::InvalidPath(_, _))));
	}
}
