//! Whitespace normalization applied before parsing.

use regex::Regex;
use std::sync::LazyLock;

static BETWEEN_TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r">\s+<").unwrap());

/// Collapses insignificant whitespace in a template.
///
/// Line breaks become spaces, whitespace runs between a closing `>` and the next
/// `<` are removed, and the result is trimmed. Whitespace inside text is kept.
pub fn normalize(template: &str) -> String {
	let flattened = template.replace("\r\n", " ").replace(['\n', '\r'], " ");
	BETWEEN_TAGS
		.replace_all(&flattened, "><")
		.trim()
		.to_string()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("<div>\n  <p>hi</p>\n</div>", "<div><p>hi</p></div>")]
	#[case("  <p>a  b</p>  ", "<p>a  b</p>")]
	#[case("<p>one\r\ntwo</p>", "<p>one two</p>")]
	#[case("", "")]
	fn test_normalize(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(normalize(input), expected);
	}
}
