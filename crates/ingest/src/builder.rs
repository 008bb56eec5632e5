//! JSON to RDF graph conversion.
use contextual::WithContext;
use iref::{Iri, IriBuf};
use json_ld::syntax::Parse;
use json_ld::{
	ExpandError, ExpandedDocument, JsonLdProcessor, Loader, Print, RdfQuads, RemoteDocument,
};
use rdf_types::BlankIdBuf;
use std::path::Path;
use std::time::Duration;

use crate::{apply_context, ContextDescriptor, Error, RdfGraph, RemoteLoader};

/// Graph building error.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
	#[error("invalid JSON-LD document: {0}")]
	Syntax(String),

	#[error("JSON-LD expansion failed: {0}")]
	Expansion(#[from] ExpandError),
}

/// Result of a JSON document conversion.
pub struct Conversion {
	/// RDF graph of the document.
	pub graph: RdfGraph,

	/// Expanded JSON-LD document, pretty-printed.
	pub json_ld: String,
}

/// Builds RDF graphs out of plain JSON documents.
///
/// Remote contexts referenced by the context descriptors are fetched with
/// the loader `L`.
pub struct GraphBuilder<L = RemoteLoader> {
	loader: L,
}

impl GraphBuilder {
	/// Creates a builder fetching remote contexts over HTTP, giving up on
	/// each context after `timeout`.
	pub fn new(timeout: Duration) -> Self {
		Self::with_loader(RemoteLoader::remote(timeout))
	}
}

impl Default for GraphBuilder {
	fn default() -> Self {
		Self::with_loader(RemoteLoader::default())
	}
}

impl<L: Loader> GraphBuilder<L> {
	pub fn with_loader(loader: L) -> Self {
		Self { loader }
	}

	pub fn loader(&self) -> &L {
		&self.loader
	}

	/// Converts the JSON document stored in `input`, using the context
	/// descriptor stored in `context`.
	///
	/// Relative IRIs of the document are resolved against `base`, if any.
	pub async fn build(
		&self,
		input: &Path,
		context: &Path,
		base: Option<&Iri>,
	) -> Result<Conversion, Error> {
		let content =
			std::fs::read_to_string(input).map_err(|e| Error::Read(input.to_owned(), e))?;
		let document: serde_json::Value =
			serde_json::from_str(&content).map_err(|e| Error::InvalidJson(input.to_owned(), e))?;

		let descriptor = ContextDescriptor::load(context)?;
		self.build_document(document, &descriptor, base).await
	}

	/// Converts an in-memory JSON document.
	pub async fn build_document(
		&self,
		document: serde_json::Value,
		descriptor: &ContextDescriptor,
		base: Option<&Iri>,
	) -> Result<Conversion, Error> {
		let document = apply_context(document, descriptor)?;
		Ok(self.convert(&document, base).await?)
	}

	/// Converts a JSON-LD document.
	pub async fn convert(
		&self,
		document: &serde_json::Value,
		base: Option<&Iri>,
	) -> Result<Conversion, BuildError> {
		let mut expanded = self.expand(document, base).await?;

		let mut generator = rdf_types::generator::Blank::new_with_prefix("b".to_string());
		expanded.relabel_and_canonicalize(&mut generator);

		let json_ld = expanded.with(&()).pretty_print().to_string();

		let mut graph = RdfGraph::with_default_prefixes();
		let mut skipped = 0usize;
		for quad in expanded.rdf_quads(&mut generator, None).cloned() {
			if !graph.insert_quad(quad) {
				skipped += 1
			}
		}

		if skipped > 0 {
			log::debug!("{skipped} duplicate or generalized triple(s) left out of the graph");
		}

		log::debug!("graph built with {} triple(s)", graph.len());
		Ok(Conversion { graph, json_ld })
	}

	async fn expand(
		&self,
		document: &serde_json::Value,
		base: Option<&Iri>,
	) -> Result<ExpandedDocument<IriBuf, BlankIdBuf>, BuildError> {
		let (json, _) = json_ld::syntax::Value::parse_str(&document.to_string())
			.map_err(|e| BuildError::Syntax(e.to_string()))?;

		let base = base.map(Iri::to_owned);
		let remote = RemoteDocument::new(base.clone(), None, json);

		let options = json_ld::Options {
			base,
			..Default::default()
		};

		Ok(remote.expand_using(&self.loader, options).await?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use json_ld::NoLoader;
	use serde_json::json;
	use static_iref::iri;

	fn builder() -> GraphBuilder<NoLoader> {
		GraphBuilder::with_loader(NoLoader)
	}

	#[tokio::test]
	async fn inline_context() {
		let conversion = builder()
			.convert(
				&json!({
					"@context": { "@vocab": "http://example.org/", "id": "@id" },
					"id": "http://example.org/a",
					"name": "A"
				}),
				None,
			)
			.await
			.unwrap();

		assert_eq!(conversion.graph.len(), 1);
		assert!(conversion.json_ld.contains("http://example.org/name"));
		let turtle = conversion.graph.to_turtle().unwrap();
		assert!(turtle.contains("<http://example.org/a>"));
	}

	#[tokio::test]
	async fn relative_ids_use_base() {
		let conversion = builder()
			.convert(
				&json!({
					"@context": { "@vocab": "http://example.org/", "id": "@id" },
					"id": "items/1",
					"name": "one"
				}),
				Some(iri!("http://data.example.org/")),
			)
			.await
			.unwrap();

		let turtle = conversion.graph.to_turtle().unwrap();
		assert!(turtle.contains("<http://data.example.org/items/1>"));
	}

	#[tokio::test]
	async fn blank_nodes_are_relabeled() {
		let conversion = builder()
			.convert(
				&json!({
					"@context": { "@vocab": "http://example.org/" },
					"name": "anonymous"
				}),
				None,
			)
			.await
			.unwrap();

		assert!(conversion.json_ld.contains("_:b0"));
		assert!(conversion.graph.to_turtle().unwrap().contains("_:b0"));
	}

	#[tokio::test]
	async fn remote_context_failure() {
		let result = builder()
			.convert(
				&json!({ "@context": "http://example.org/context.jsonld", "a": 1 }),
				None,
			)
			.await;

		assert!(matches!(result, Err(BuildError::Expansion(_))))
	}

	#[tokio::test]
	async fn large_numbers_keep_their_digits() {
		let dir = tempfile::tempdir().unwrap();
		let input = dir.path().join("measures.json");
		let context = dir.path().join("measures.yml");
		std::fs::write(
			&input,
			r#"{ "id": "http://example.org/m", "count": 123456789012345678901234567890 }"#,
		)
		.unwrap();
		std::fs::write(
			&context,
			"context:\n  .:\n    '@vocab': http://example.org/\n    id: '@id'\n",
		)
		.unwrap();

		let conversion = builder().build(&input, &context, None).await.unwrap();
		assert!(conversion
			.json_ld
			.contains("123456789012345678901234567890"));
	}

	#[tokio::test]
	async fn descriptor_is_applied() {
		let descriptor = ContextDescriptor::from_yaml_str(
			"context:\n  .:\n    '@vocab': http://example.org/\n  $.items[*]:\n    id: '@id'\n",
		)
		.unwrap();

		let conversion = builder()
			.build_document(
				json!({ "items": [{ "id": "http://example.org/1", "a": 1 }] }),
				&descriptor,
				None,
			)
			.await
			.unwrap();

		assert_eq!(conversion.graph.len(), 2);
		assert!(conversion
			.graph
			.to_turtle()
			.unwrap()
			.contains("<http://example.org/1>"));
	}
}
