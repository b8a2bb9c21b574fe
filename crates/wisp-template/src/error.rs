//! Error types for template compilation and program interpretation.

/// Errors raised while compiling a template.
///
/// Only directive grammar the compiler has to take apart itself is validated.
/// Expression bodies are emitted as written and fail when the program runs.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
	#[error(
		"Invalid `for` directive on <{tag}>: '{value}' (expected `item in items`, `item, index in items` or `(item, index) in items`)"
	)]
	InvalidForDirective { tag: String, value: String },

	#[error("Directive `{directive}` on <{tag}> has an empty value")]
	EmptyDirective { tag: String, directive: String },
}

/// Errors raised while interpreting a compiled program against a state object.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
	#[error("Unsupported expression: '{0}'")]
	Unsupported(String),

	#[error("Expression '{0}' does not evaluate to an array")]
	NotIterable(String),
}
