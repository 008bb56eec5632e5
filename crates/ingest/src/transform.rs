//! jq pre-transforms.
use jaq_interpret::{Ctx, Filter, FilterT, ParseCtx, RcIter, Val};
use serde_json::Value;

/// Transform error.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
	#[error("invalid jq expression `{0}`: {1}")]
	Parse(String, String),

	#[error("jq expression `{0}` failed to compile ({1} error(s))")]
	Compile(String, usize),

	#[error("jq evaluation failed: {0}")]
	Eval(String),

	#[error("jq expression produced no output")]
	NoOutput,

	#[error("jq expression produced more than one output")]
	MultipleOutputs,
}

/// Compiled jq filter, with the jq standard library available.
pub struct Transform {
	filter: Filter,
}

impl Transform {
	pub fn compile(expression: &str) -> Result<Self, TransformError> {
		let mut defs = ParseCtx::new(Vec::new());
		defs.insert_natives(jaq_core::core());
		defs.insert_defs(jaq_std::std());

		let (main, errs) = jaq_parse::parse(expression, jaq_parse::main());
		if let Some(e) = errs.first() {
			return Err(TransformError::Parse(expression.to_owned(), e.to_string()));
		}

		let main = main.ok_or_else(|| {
			TransformError::Parse(expression.to_owned(), "empty filter".to_owned())
		})?;

		let filter = defs.compile(main);
		if !defs.errs.is_empty() {
			return Err(TransformError::Compile(
				expression.to_owned(),
				defs.errs.len(),
			));
		}

		Ok(Self { filter })
	}

	/// Runs the filter on the given document.
	///
	/// The filter must produce exactly one value.
	pub fn apply(&self, input: Value) -> Result<Value, TransformError> {
		let inputs = RcIter::new(core::iter::empty());
		let mut outputs = self.filter.run((Ctx::new([], &inputs), Val::from(input)));

		let output = match outputs.next() {
			Some(Ok(value)) => value,
			Some(Err(e)) => return Err(TransformError::Eval(e.to_string())),
			None => return Err(TransformError::NoOutput),
		};

		if outputs.next().is_some() {
			return Err(TransformError::MultipleOutputs);
		}

		Ok(output.into())
	}
}
