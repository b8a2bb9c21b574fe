//! Attribute classification and directive grammar.
//!
//! | Form | Bucket |
//! |------|--------|
//! | `name="text"`, `disabled` | plain attribute |
//! | `:name="expr"` | value binding |
//! | `@event="expr"` | event handler |
//! | `for="..."`, `show="..."` | directive |

use crate::error::CompileError;
use crate::parser::Attr;
use regex::Regex;
use std::sync::LazyLock;

static FOR_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"^\s*(?:\(\s*([A-Za-z_$][\w$]*)\s*(?:,\s*([A-Za-z_$][\w$]*)\s*)?\)|([A-Za-z_$][\w$]*)\s*(?:,\s*([A-Za-z_$][\w$]*))?)\s+in\s+(\S.*?)\s*$",
	)
	.unwrap()
});

/// A parsed `for` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForDirective {
	pub item: String,
	pub index: Option<String>,
	/// The iterable expression, kept verbatim.
	pub iterable: String,
}

impl ForDirective {
	/// Parses `item in expr`, `item, index in expr` or `(item, index) in expr`.
	pub fn parse(value: &str) -> Option<Self> {
		let captures = FOR_DIRECTIVE.captures(value)?;
		let item = captures.get(1).or_else(|| captures.get(3))?;
		let index = captures.get(2).or_else(|| captures.get(4));
		Some(Self {
			item: item.as_str().to_string(),
			index: index.map(|m| m.as_str().to_string()),
			iterable: captures.get(5)?.as_str().to_string(),
		})
	}

	/// Names the loop brings into scope.
	pub fn bindings(&self) -> impl Iterator<Item = &str> {
		std::iter::once(self.item.as_str()).chain(self.index.as_deref())
	}
}

/// Control-flow directives found on one element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
	pub for_each: Option<ForDirective>,
	pub show: Option<String>,
}

/// Everything that ends up in the props object of an `h(...)` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Props {
	/// Literal attributes; `None` marks a bare boolean attribute.
	pub attrs: Vec<(String, Option<String>)>,
	/// `:name` bindings with their source expressions.
	pub bindings: Vec<(String, String)>,
	/// `@event` handlers with their source expressions.
	pub events: Vec<(String, String)>,
}

impl Props {
	pub fn is_empty(&self) -> bool {
		self.attrs.is_empty() && self.bindings.is_empty() && self.events.is_empty()
	}
}

/// The four attribute buckets of one element, with props already combined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitAttrs {
	pub props: Props,
	pub directives: Directives,
}

fn directive_value<'a>(
	tag: &str,
	directive: &str,
	value: Option<&'a str>,
) -> Result<&'a str, CompileError> {
	match value.map(str::trim) {
		Some(v) if !v.is_empty() => Ok(v),
		_ => Err(CompileError::EmptyDirective {
			tag: tag.to_string(),
			directive: directive.to_string(),
		}),
	}
}

/// Splits an element's attributes into props and directives.
pub fn split(tag: &str, attrs: &[Attr]) -> Result<SplitAttrs, CompileError> {
	let mut split = SplitAttrs::default();

	for attr in attrs {
		let value = attr.value.as_deref();
		match attr.name.as_str() {
			"for" => {
				let raw = directive_value(tag, "for", value)?;
				if split.directives.for_each.is_some() {
					tracing::warn!(tag, "ignoring repeated `for` directive");
					continue;
				}
				let parsed =
					ForDirective::parse(raw).ok_or_else(|| CompileError::InvalidForDirective {
						tag: tag.to_string(),
						value: raw.to_string(),
					})?;
				split.directives.for_each = Some(parsed);
			}
			"show" => {
				let raw = directive_value(tag, "show", value)?;
				if split.directives.show.is_some() {
					tracing::warn!(tag, "ignoring repeated `show` directive");
					continue;
				}
				split.directives.show = Some(raw.to_string());
			}
			name => {
				if let Some(binding) = name.strip_prefix(':') {
					split.props.bindings.push((
						binding.to_string(),
						value.unwrap_or("true").trim().to_string(),
					));
				} else if let Some(event) = name.strip_prefix('@') {
					split.props.events.push((
						event.to_string(),
						value.unwrap_or_default().trim().to_string(),
					));
				} else {
					split
						.props
						.attrs
						.push((name.to_string(), value.map(str::to_string)));
				}
			}
		}
	}

	Ok(split)
}
