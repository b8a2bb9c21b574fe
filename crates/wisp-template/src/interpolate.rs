//! `{{ expr }}` text interpolation.

use crate::expr::{escape_template_text, qualify};

/// A piece of interpolated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
	Literal(String),
	Expr(String),
}

/// Splits text into literal and expression segments.
///
/// An opening `{{` without a closing `}}` is kept as literal text. Empty
/// expressions (`{{ }}`) are dropped.
pub fn split(text: &str) -> Vec<Segment> {
	let mut segments = Vec::new();
	let mut literal = String::new();
	let mut remaining = text;

	while let Some(open) = remaining.find("{{") {
		let after_open = &remaining[open + 2..];
		let Some(close) = after_open.find("}}") else {
			break;
		};
		literal.push_str(&remaining[..open]);
		let expr = after_open[..close].trim();
		if !expr.is_empty() {
			if !literal.is_empty() {
				segments.push(Segment::Literal(std::mem::take(&mut literal)));
			}
			segments.push(Segment::Expr(expr.to_string()));
		}
		remaining = &after_open[close + 2..];
	}

	literal.push_str(remaining);
	if !literal.is_empty() {
		segments.push(Segment::Literal(literal));
	}
	segments
}

/// Renders segments as a JavaScript template literal.
pub fn template_literal(segments: &[Segment], locals: &[String], binding: &str) -> String {
	let mut out = String::from("`");
	for segment in segments {
		match segment {
			Segment::Literal(text) => out.push_str(&escape_template_text(text)),
			Segment::Expr(expr) => {
				out.push_str("${");
				out.push_str(&qualify(expr, locals, binding));
				out.push('}');
			}
		}
	}
	out.push('`');
	out
}
