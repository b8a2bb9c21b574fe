//! Wisp Template - template-to-render-function compiler
//!
//! Compiles an HTML-like template string into the body of a JavaScript render
//! function. The emitted program builds a virtual-node tree through three
//! primitives that the caller binds in scope:
//!
//! - `h(tag, props, children)` - element
//! - `hFragment(children)` - fragment
//! - `hString(text)` - text
//!
//! ## Template Syntax
//!
//! ```text
//! <ul class="todos">
//!     <li for="todo, i in todos" show="!todo.hidden" :title="todo.note" @click="select">
//!         {{ i }}: {{ todo.label }}
//!     </li>
//! </ul>
//! ```
//!
//! - `for="item in expr"` / `for="item, index in expr"` repeats an element
//! - `show="expr"` renders an element only when `expr` holds, `null` otherwise
//! - `:name="expr"` binds a prop to an expression
//! - `@event="expr"` attaches an event handler
//! - `{{ expr }}` interpolates an expression into text
//!
//! Bare identifiers in `show`, bindings, handlers and interpolations resolve
//! against the component (`this`) unless a surrounding `for` binds them. The
//! `for` iterable is emitted exactly as written.
//!
//! ## Example
//!
//! ```
//! use wisp_template::{Primitive, compile};
//!
//! let compiled = compile("<p show=\"open\">Hi {{ name }}</p>").unwrap();
//! assert_eq!(
//!     compiled.code,
//!     "return (this.open) ? h('p', {}, [ hString(`Hi ${this.name}`) ]) : null;"
//! );
//! assert!(compiled.imports.contains(&Primitive::Text));
//! ```

mod attrs;
mod emit;
pub mod error;
mod expr;
mod interpolate;
mod normalize;
pub mod parser;
mod program;
mod render;
mod tag;

use std::collections::BTreeSet;

pub use attrs::{ForDirective, Props};
pub use error::{CompileError, RenderError};
pub use interpolate::Segment;
pub use program::{ElementNode, Primitive, Program, ProgramNode};
pub use render::VNode;
pub use tag::TagRef;

/// Options controlling code generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
	/// Name that bare identifiers are qualified with.
	pub this_binding: String,
}

impl Default for CompileOptions {
	fn default() -> Self {
		Self {
			this_binding: "this".to_string(),
		}
	}
}

/// The output of [`compile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate {
	/// Primitives referenced by `code`.
	pub imports: BTreeSet<Primitive>,
	/// A function body returning a virtual-node tree.
	pub code: String,
	program: Program,
}

impl CompiledTemplate {
	/// Returns the typed program `code` was serialized from.
	pub fn program(&self) -> &Program {
		&self.program
	}

	/// Returns the import names in a stable order.
	pub fn import_names(&self) -> Vec<&'static str> {
		self.imports.iter().map(|p| p.name()).collect()
	}
}

/// Compiles a template with default options.
///
/// # Errors
///
/// Returns [`CompileError`] when a `for` or `show` directive cannot be decomposed.
pub fn compile(template: &str) -> Result<CompiledTemplate, CompileError> {
	compile_with(template, &CompileOptions::default())
}

/// Compiles a template.
///
/// # Errors
///
/// Returns [`CompileError`] when a `for` or `show` directive cannot be decomposed.
#[tracing::instrument(level = "debug", skip_all, fields(len = template.len()))]
pub fn compile_with(
	template: &str,
	options: &CompileOptions,
) -> Result<CompiledTemplate, CompileError> {
	let normalized = normalize::normalize(template);
	let nodes = parser::parse(&normalized);
	let (program, imports) = program::ProgramBuilder::default().build(&nodes)?;
	let code = emit::Serializer::new(&options.this_binding).function_body(&program);

	tracing::debug!(imports = imports.len(), code_len = code.len(), "template compiled");

	Ok(CompiledTemplate {
		imports,
		code,
		program,
	})
}
