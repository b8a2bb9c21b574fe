//! Tag name normalization.

use crate::expr::quote_js;

/// What an element's tag refers to in the emitted program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagRef {
	/// A DOM element, emitted as a lowercase string literal.
	Html(String),
	/// A component, emitted as a bare identifier in scope of the render function.
	Component(String),
}

impl TagRef {
	/// Returns the tag as it appears in the `h(...)` call.
	pub fn to_js(&self) -> String {
		match self {
			Self::Html(name) => quote_js(name),
			Self::Component(name) => name.clone(),
		}
	}

	/// Returns the plain tag name.
	pub fn name(&self) -> &str {
		match self {
			Self::Html(name) | Self::Component(name) => name,
		}
	}
}

/// Normalizes a raw tag name.
///
/// PascalCase names stay component identifiers, kebab-case names with a `-` become
/// PascalCase component identifiers, everything else is a lowercase DOM tag.
pub fn normalize(raw: &str) -> TagRef {
	if raw.starts_with(|c: char| c.is_ascii_uppercase()) {
		return TagRef::Component(raw.to_string());
	}
	if raw.contains('-') {
		return TagRef::Component(pascal_case(raw));
	}
	TagRef::Html(raw.to_ascii_lowercase())
}

fn pascal_case(raw: &str) -> String {
	raw.split('-')
		.filter(|part| !part.is_empty())
		.map(|part| {
			let mut chars = part.chars();
			match chars.next() {
				Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
				None => String::new(),
			}
		})
		.collect()
}
