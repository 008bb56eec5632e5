//! Single file and batch processing.
use iref::IriBuf;
use json_ld::Loader;
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use crate::{
	files_for_context, find_context, paths, write_outputs, ContextRegistry, Destination, Error,
	GraphBuilder, RemoteLoader,
};

/// Options of a single file conversion.
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
	/// Turtle output, if requested.
	pub turtle: Option<Destination>,

	/// JSON-LD output, if requested.
	pub json_ld: Option<Destination>,

	/// Context descriptor to use instead of discovering one.
	pub context: Option<PathBuf>,

	/// Base IRI of the document.
	pub base: Option<IriBuf>,

	/// Returns no output instead of failing when no context descriptor can be
	/// found.
	pub skip_on_missing_context: bool,
}

/// Options of a batch conversion.
///
/// Outputs are always named after their input.
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
	pub turtle: bool,
	pub json_ld: bool,
	pub base: Option<IriBuf>,
}

impl BatchOptions {
	fn process_options(&self) -> ProcessOptions {
		ProcessOptions {
			turtle: self.turtle.then_some(Destination::Auto),
			json_ld: self.json_ld.then_some(Destination::Auto),
			context: None,
			base: self.base.clone(),
			skip_on_missing_context: true,
		}
	}
}

/// Parses the base IRI given for a conversion.
pub fn parse_base(base: &str) -> Result<IriBuf, Error> {
	IriBuf::new(base.to_owned()).map_err(|_| Error::InvalidBaseIri(base.to_owned()))
}

/// JSON documents processor.
pub struct Processor<L = RemoteLoader> {
	builder: GraphBuilder<L>,
	registry: ContextRegistry,
}

impl<L: Loader> Processor<L> {
	pub fn new(builder: GraphBuilder<L>, registry: ContextRegistry) -> Self {
		Self { builder, registry }
	}

	pub fn registry(&self) -> &ContextRegistry {
		&self.registry
	}

	pub fn builder(&self) -> &GraphBuilder<L> {
		&self.builder
	}

	/// Converts a single JSON document.
	///
	/// Returns the list of written files.
	pub async fn process(
		&self,
		input: &Path,
		options: &ProcessOptions,
	) -> Result<Vec<PathBuf>, Error> {
		if !input.is_file() {
			return Err(Error::InputNotAFile(input.to_owned()));
		}

		let context = match &options.context {
			Some(context) => context.clone(),
			None => match find_context(input, &self.registry) {
				Some(context) => context,
				None if options.skip_on_missing_context => {
					log::warn!(
						"no context found for {}, skipping",
						input.display()
					);
					return Ok(Vec::new());
				}
				None => return Err(Error::MissingContext(input.to_owned())),
			},
		};

		log::info!(
			"processing {} with context {}",
			input.display(),
			context.display()
		);

		let conversion = self
			.builder
			.build(input, &context, options.base.as_deref())
			.await?;

		Ok(write_outputs(
			input,
			&conversion,
			options.turtle.as_ref(),
			options.json_ld.as_ref(),
		)?)
	}

	/// Processes a comma-separated list of files.
	///
	/// Context descriptors (`.yml`/`.yaml`) in the list stand for the
	/// documents they govern. Errors are logged and do not stop the batch.
	/// Returns the list of written files.
	pub async fn run_batch(&self, list: &str, options: &BatchOptions) -> Vec<PathBuf> {
		let process_options = options.process_options();
		let mut queue: VecDeque<PathBuf> = list
			.split(',')
			.map(str::trim)
			.filter(|entry| !entry.is_empty())
			.map(PathBuf::from)
			.collect();

		let mut processed = HashSet::new();
		let mut written = Vec::new();

		while let Some(entry) = queue.pop_front() {
			if paths::is_yaml_filename(&entry) {
				let documents = files_for_context(&entry, &self.registry);
				log::debug!(
					"context {} governs {} document(s)",
					entry.display(),
					documents.len()
				);
				queue.extend(documents);
				continue;
			}

			if !paths::is_json_filename(&entry) {
				log::debug!("{} is not a JSON document, skipping", entry.display());
				continue;
			}

			if !processed.insert(paths::identity(&entry)) {
				log::debug!("{} already processed", entry.display());
				continue;
			}

			match self.process(&entry, &process_options).await {
				Ok(files) => written.extend(files),
				Err(e) => log::warn!("error processing JSON/JSON-LD file, skipping: {e}"),
			}
		}

		written
	}
}
