//! Turn plain JSON documents into RDF graphs.
//!
//! A JSON document is paired with a YAML *context descriptor* that says how
//! to give it a JSON-LD meaning:
//!
//! ```yaml
//! # optional jq filter applied first
//! transform: '{ items: .results }'
//! context:
//!   # `.` or `$` wraps the whole document in `{"@context": ..., "@graph": ...}`
//!   .:
//!     "@vocab": "http://example.org/"
//!   # any other key is a JSON-Path, every matched object gets an `@context`
//!   $.items[*]:
//!     id: "@id"
//! ```
//!
//! The annotated document is then expanded with the [`json-ld`] crate and
//! turned into an RDF graph that can be written as Turtle, along with the
//! expanded JSON-LD text.
//!
//! [`json-ld`]: https://crates.io/crates/json-ld
pub mod apply;
pub mod batch;
pub mod builder;
pub mod descriptor;
pub mod elements;
mod error;
pub mod graph;
pub mod loader;
pub mod output;
pub mod paths;
pub mod registry;
pub mod resolve;
pub mod transform;

pub use apply::{apply_context, apply_context_file, ApplyError};
pub use batch::{parse_base, BatchOptions, ProcessOptions, Processor};
pub use builder::{BuildError, Conversion, GraphBuilder};
pub use descriptor::{ContextDescriptor, DescriptorError, Selector};
pub use error::*;
pub use graph::{GraphError, RdfGraph};
pub use loader::{RemoteLoader, TimeoutLoader};
pub use output::{write_outputs, Destination, OutputError};
pub use registry::{ContextRegistry, RegistryError};
pub use resolve::{files_for_context, find_context};
pub use transform::{Transform, TransformError};
