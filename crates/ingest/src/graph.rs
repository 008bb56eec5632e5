//! RDF graph with namespace prefixes.
use iref::{Iri, IriBuf};
use oxrdf::{BlankNode, Graph, Literal as OxLiteral, NamedNode, Subject, Term, Triple};
use oxrdfio::{RdfFormat, RdfSerializer};
use rdf_types::{BlankIdBuf, Id, Literal, LiteralType, Quad};
use static_iref::iri;
use std::io::Write;

pub const DC: &Iri = iri!("http://purl.org/dc/elements/1.1/");
pub const XSD: &Iri = iri!("http://www.w3.org/2001/XMLSchema#");
pub const DCTERMS: &Iri = iri!("http://purl.org/dc/terms/");
pub const SKOS: &Iri = iri!("http://www.w3.org/2004/02/skos/core#");
pub const OWL: &Iri = iri!("http://www.w3.org/2002/07/owl#");
pub const RDF: &Iri = iri!("http://www.w3.org/1999/02/22-rdf-syntax-ns#");
pub const RDFS: &Iri = iri!("http://www.w3.org/2000/01/rdf-schema#");
pub const DCAT: &Iri = iri!("http://www.w3.org/ns/dcat#");
pub const ISO: &Iri = iri!("http://iso.org/tc211/");
pub const MODSPEC: &Iri = iri!("http://www.opengis.net/def/ont/modspec/");
pub const SPECREL: &Iri = iri!("http://www.opengis.net/def/ont/specrel/");
pub const OGC_NA: &Iri = iri!("http://www.opengis.net/def/metamodel/ogc-na/");
pub const PROV: &Iri = iri!("http://www.w3.org/ns/prov#");

/// Prefixes bound by [`RdfGraph::with_default_prefixes`].
pub const DEFAULT_PREFIXES: [(&str, &Iri); 13] = [
	("dc", DC),
	("xsd", XSD),
	("dct", DCTERMS),
	("skos", SKOS),
	("owl", OWL),
	("rdf", RDF),
	("rdfs", RDFS),
	("dcat", DCAT),
	("iso", ISO),
	("spec", MODSPEC),
	("specrel", SPECREL),
	("na", OGC_NA),
	("prov", PROV),
];

/// RDF quad, as produced by the JSON-LD to RDF algorithm.
pub type JsonLdQuad = Quad<Id, Id, rdf_types::Term<Id, Literal>, Id>;

/// Graph serialization error.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
	#[error("invalid IRI `{1}` for prefix `{0}`: {2}")]
	InvalidPrefix(String, String, String),

	#[error("Turtle serialization failed: {0}")]
	Io(#[from] std::io::Error),
}

/// RDF graph.
///
/// Triples are stored in an [`oxrdf::Graph`], along with the namespace
/// prefixes used when writing the graph as Turtle.
#[derive(Debug, Default, Clone)]
pub struct RdfGraph {
	prefixes: Vec<(String, IriBuf)>,
	triples: Graph,
}

impl RdfGraph {
	/// Creates an empty graph without any prefix.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an empty graph with the [`DEFAULT_PREFIXES`] bound.
	pub fn with_default_prefixes() -> Self {
		let mut graph = Self::new();
		for (prefix, iri) in DEFAULT_PREFIXES {
			graph.bind(prefix, iri.to_owned());
		}

		graph
	}

	/// Binds `prefix` to the given namespace IRI.
	///
	/// A previous binding of the same prefix is replaced.
	pub fn bind(&mut self, prefix: impl Into<String>, namespace: IriBuf) {
		let prefix = prefix.into();
		match self.prefixes.iter_mut().find(|(p, _)| *p == prefix) {
			Some(binding) => binding.1 = namespace,
			None => self.prefixes.push((prefix, namespace)),
		}
	}

	pub fn prefixes(&self) -> impl Iterator<Item = (&str, &Iri)> {
		self.prefixes
			.iter()
			.map(|(prefix, iri)| (prefix.as_str(), iri.as_iri()))
	}

	pub fn triples(&self) -> &Graph {
		&self.triples
	}

	pub fn len(&self) -> usize {
		self.triples.len()
	}

	pub fn is_empty(&self) -> bool {
		self.triples.is_empty()
	}

	/// Inserts a triple, returning `false` if it was already present.
	pub fn insert(&mut self, triple: &Triple) -> bool {
		self.triples.insert(triple)
	}

	/// Inserts the triple of a JSON-LD quad, ignoring its graph label.
	///
	/// Quads with a blank node predicate (generalized RDF) cannot be
	/// represented and are dropped.
	pub fn insert_quad(&mut self, Quad(subject, predicate, object, _): JsonLdQuad) -> bool {
		let predicate = match predicate {
			Id::Iri(iri) => NamedNode::new_unchecked(iri.as_str()),
			Id::Blank(_) => return false,
		};

		let object: Term = match object {
			rdf_types::Term::Id(id) => subject_of(id).into(),
			rdf_types::Term::Literal(literal) => literal_of(literal).into(),
		};

		self.insert(&Triple::new(subject_of(subject), predicate, object))
	}

	/// Writes the graph as Turtle.
	pub fn write_turtle<W: Write>(&self, output: W) -> Result<W, GraphError> {
		let mut serializer = RdfSerializer::from_format(RdfFormat::Turtle);
		for (prefix, iri) in self.prefixes() {
			serializer = serializer.with_prefix(prefix, iri.as_str()).map_err(|e| {
				GraphError::InvalidPrefix(prefix.to_owned(), iri.as_str().to_owned(), e.to_string())
			})?;
		}

		let mut writer = serializer.for_writer(output);
		for triple in self.triples.iter() {
			writer.serialize_triple(triple)?;
		}

		Ok(writer.finish()?)
	}

	/// Returns the Turtle serialization of the graph.
	pub fn to_turtle(&self) -> Result<String, GraphError> {
		let bytes = self.write_turtle(Vec::new())?;
		Ok(String::from_utf8_lossy(&bytes).into_owned())
	}
}

fn blank_node(id: &BlankIdBuf) -> BlankNode {
	BlankNode::new_unchecked(id.suffix())
}

fn subject_of(id: Id) -> Subject {
	match id {
		Id::Iri(iri) => NamedNode::new_unchecked(iri.as_str()).into(),
		Id::Blank(blank) => blank_node(&blank).into(),
	}
}

fn literal_of(literal: Literal) -> OxLiteral {
	match literal.type_ {
		LiteralType::Any(ty) => {
			OxLiteral::new_typed_literal(literal.value, NamedNode::new_unchecked(ty.as_str()))
		}
		LiteralType::LangString(tag) => {
			OxLiteral::new_language_tagged_literal_unchecked(literal.value, tag.as_str())
		}
	}
}
