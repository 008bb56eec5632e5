//! Specification element extraction.
//!
//! Collects the requirement (`/req/`) and conformance class (`/conf/`) URIs
//! cited in the plain text of a specification document, and writes them as
//! a `specification,element` CSV mapping.
use indexmap::IndexSet;
use std::io::{self, Write};

/// Extracts requirement and conformance URIs from a text, in order of first
/// appearance.
pub fn extract_elements(text: &str) -> Vec<String> {
	let mut elements = IndexSet::new();

	for token in text.split_whitespace() {
		let token = match token.strip_suffix(',') {
			Some(_) => token.replace(',', ""),
			None => token.to_owned(),
		};

		let token = token.strip_suffix('.').unwrap_or(&token);

		if token.contains("/req/") || token.contains("/conf/") {
			elements.insert(token.to_owned());
		}
	}

	elements.into_iter().collect()
}

/// Writes one `spec_url,element` line per absolute element URI.
///
/// Returns the number of written lines.
pub fn write_mapping<W: Write>(
	spec_url: &str,
	elements: &[String],
	mut output: W,
) -> io::Result<usize> {
	let mut count = 0;
	for element in elements.iter().filter(|e| e.starts_with("http")) {
		writeln!(output, "{spec_url},{element}")?;
		count += 1
	}

	output.flush()?;
	Ok(count)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn extraction() {
		let text = "See http://www.opengis.net/spec/arml/2.0/req/core/parse, and\n\
			http://www.opengis.net/spec/arml/2.0/conf/core.\n\
			Again http://www.opengis.net/spec/arml/2.0/req/core/parse\n\
			/req/relative/element and unrelated words.";

		assert_eq!(
			extract_elements(text),
			[
				"http://www.opengis.net/spec/arml/2.0/req/core/parse",
				"http://www.opengis.net/spec/arml/2.0/conf/core",
				"/req/relative/element"
			]
		);
	}

	#[test]
	fn inner_commas_are_dropped_with_the_trailing_one() {
		assert_eq!(
			extract_elements("http://a.org/req/x,y,"),
			["http://a.org/req/xy"]
		);
		assert_eq!(
			extract_elements("http://a.org/req/x,y"),
			["http://a.org/req/x,y"]
		);
	}

	#[test]
	fn only_one_trailing_dot_is_removed() {
		assert_eq!(extract_elements("http://a.org/conf/x.."), ["http://a.org/conf/x."]);
	}

	#[test]
	fn mapping_keeps_absolute_uris() {
		let elements = extract_elements("http://a.org/req/1 /req/2 https://a.org/conf/3");
		let mut output = Vec::new();
		let count = write_mapping("http://docs.example.org/spec.html", &elements, &mut output).unwrap();

		assert_eq!(count, 2);
		assert_eq!(
			String::from_utf8(output).unwrap(),
			"http://docs.example.org/spec.html,http://a.org/req/1\n\
			 http://docs.example.org/spec.html,https://a.org/conf/3\n"
		);
	}
}
