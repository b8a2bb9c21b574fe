//! Route path patterns.
//!
//! A pattern is either the catch-all `*` or a `/`-separated path whose
//! segments are literals or `:name` parameters, e.g. `/two/:userId/page/:pageId`.
//! Patterns compile to anchored regular expressions once, at router
//! construction.

use crate::error::RouterError;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// The catch-all pattern.
pub const CATCH_ALL: &str = "*";

static PARAM_NAME: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
	source: String,
	regex: Regex,
	param_names: Vec<String>,
}

impl PathPattern {
	/// Compiles `pattern`.
	///
	/// # Errors
	///
	/// Returns [`RouterError::InvalidPattern`] when the pattern does not start
	/// with `/`, uses `*` anywhere but as the whole pattern, or declares an
	/// empty, malformed or duplicate parameter name.
	pub fn new(pattern: &str) -> Result<Self, RouterError> {
		let invalid = |reason: &str| RouterError::InvalidPattern {
			pattern: pattern.to_string(),
			reason: reason.to_string(),
		};

		if pattern == CATCH_ALL {
			return Ok(Self {
				source: pattern.to_string(),
				regex: Regex::new(r"^.*$").map_err(|e| invalid(&e.to_string()))?,
				param_names: Vec::new(),
			});
		}

		if !pattern.starts_with('/') {
			return Err(invalid("pattern must start with '/'"));
		}
		if pattern.contains('*') {
			return Err(invalid("'*' is only allowed as the whole pattern"));
		}

		let mut param_names: Vec<String> = Vec::new();
		let mut regex_src = String::from("^");

		for segment in pattern.split('/').skip(1) {
			regex_src.push('/');
			match segment.strip_prefix(':') {
				Some(name) => {
					if name.is_empty() {
						return Err(invalid("empty parameter name"));
					}
					if !PARAM_NAME.is_match(name) {
						return Err(invalid(&format!("invalid parameter name '{name}'")));
					}
					if param_names.iter().any(|n| n == name) {
						return Err(invalid(&format!("duplicate parameter '{name}'")));
					}
					param_names.push(name.to_string());
					regex_src.push_str("([^/]+)");
				}
				None => regex_src.push_str(&regex::escape(segment)),
			}
		}

		// "/a/" and "/a" are the same route
		if regex_src.len() > 2 && regex_src.ends_with('/') {
			regex_src.pop();
		}
		if regex_src != "^/" {
			regex_src.push_str("/?");
		}
		regex_src.push('$');

		let regex = Regex::new(&regex_src).map_err(|e| invalid(&e.to_string()))?;

		Ok(Self {
			source: pattern.to_string(),
			regex,
			param_names,
		})
	}

	/// The pattern as written.
	pub fn as_str(&self) -> &str {
		&self.source
	}

	/// Parameter names in declaration order.
	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Matches `path` (query string ignored) and extracts decoded parameters.
	pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
		let path = strip_query(path);
		let captures = self.regex.captures(path)?;

		Some(
			self.param_names
				.iter()
				.enumerate()
				.filter_map(|(i, name)| {
					captures
						.get(i + 1)
						.map(|m| (name.clone(), decode(m.as_str())))
				})
				.collect(),
		)
	}
}

fn strip_query(path: &str) -> &str {
	path.split_once('?').map_or(path, |(p, _)| p)
}

/// Parses the query string of `path` into key/value pairs.
///
/// `+` decodes to a space. When a key repeats, the first value wins. Keys
/// without `=` map to an empty string.
pub fn parse_query(path: &str) -> HashMap<String, String> {
	let Some((_, query)) = path.split_once('?') else {
		return HashMap::new();
	};

	let mut out = HashMap::new();
	for pair in query.split('&').filter(|p| !p.is_empty()) {
		let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
		let key = decode(&key.replace('+', " "));
		if key.is_empty() {
			continue;
		}
		out.entry(key)
			.or_insert_with(|| decode(&value.replace('+', " ")));
	}
	out
}

fn decode(raw: &str) -> String {
	urlencoding::decode(raw)
		.map(|s| s.into_owned())
		.unwrap_or_else(|_| raw.to_string())
}
