//! Serialization of a [`Program`] into a JavaScript function body.

use crate::attrs::Props;
use crate::expr::{qualify, quote_js};
use crate::interpolate::template_literal;
use crate::program::{Program, ProgramNode};

/// Program text under construction.
///
/// Every construct opened with [`Emitter::open`] pushes its closer at the same
/// time, so the closer stack always holds one entry per open construct.
#[derive(Debug, Default)]
pub(crate) struct Emitter {
	lines: Vec<String>,
	closers: Vec<&'static str>,
}

impl Emitter {
	/// Appends a line, dropping a trailing `,` from the previous line when the new
	/// line starts with a closing token.
	pub(crate) fn line(&mut self, line: impl Into<String>) {
		let line = line.into();
		if line.starts_with([')', ']', ':']) {
			if let Some(previous) = self.lines.last_mut() {
				if previous.ends_with(',') {
					previous.pop();
				}
			}
		}
		self.lines.push(line);
	}

	pub(crate) fn open(&mut self, line: impl Into<String>, closer: &'static str) {
		self.line(line);
		self.closers.push(closer);
	}

	pub(crate) fn close(&mut self) {
		if let Some(closer) = self.closers.pop() {
			self.line(closer);
		}
	}

	pub(crate) fn separator(&mut self) {
		if let Some(previous) = self.lines.last_mut() {
			previous.push(',');
		}
	}

	pub(crate) fn depth(&self) -> usize {
		self.closers.len()
	}

	pub(crate) fn finish(mut self) -> String {
		while !self.closers.is_empty() {
			self.close();
		}
		self.lines.join(" ")
	}
}

/// Walks a program and writes it through an [`Emitter`].
pub(crate) struct Serializer<'a> {
	out: Emitter,
	locals: Vec<String>,
	binding: &'a str,
}

impl<'a> Serializer<'a> {
	pub(crate) fn new(binding: &'a str) -> Self {
		Self {
			out: Emitter::default(),
			locals: Vec::new(),
			binding,
		}
	}

	/// Produces the complete function body.
	pub(crate) fn function_body(mut self, program: &Program) -> String {
		match program.root() {
			Some(root) => {
				self.node(root);
				debug_assert_eq!(self.out.depth(), 0, "unbalanced program constructs");
				format!("return {};", self.out.finish())
			}
			None => "return null;".to_string(),
		}
	}

	fn children(&mut self, children: &[ProgramNode]) {
		for child in children {
			self.node(child);
			self.out.separator();
		}
	}

	fn node(&mut self, node: &ProgramNode) {
		match node {
			ProgramNode::Element(element) => {
				let props = self.props(&element.props);
				self.out
					.open(format!("h({}, {}, [", element.tag.to_js(), props), "])");
				self.children(&element.children);
				self.out.close();
			}
			ProgramNode::Fragment(children) => {
				self.out.open("hFragment([", "])");
				self.children(children);
				self.out.close();
			}
			ProgramNode::Conditional { condition, then } => {
				let condition = qualify(condition, &self.locals, self.binding);
				self.out.open(format!("({condition}) ?"), ": null");
				self.node(then);
				self.out.close();
			}
			ProgramNode::Loop { directive, body } => {
				let params = match &directive.index {
					Some(index) => format!("{}, {}", directive.item, index),
					None => directive.item.clone(),
				};
				self.out.open(
					format!("...{}.map(({params}) =>", directive.iterable),
					")",
				);
				let scope = self.locals.len();
				self.locals
					.extend(directive.bindings().map(str::to_string));
				self.node(body);
				self.locals.truncate(scope);
				self.out.close();
			}
			ProgramNode::Text(segments) => {
				let literal = template_literal(segments, &self.locals, self.binding);
				self.out.line(format!("hString({literal})"));
			}
		}
	}

	fn props(&self, props: &Props) -> String {
		if props.is_empty() {
			return "{}".to_string();
		}

		let mut entries: Vec<String> = Vec::new();
		for (name, value) in &props.attrs {
			let value = match value {
				Some(v) => quote_js(v),
				None => "true".to_string(),
			};
			entries.push(format!("{}: {}", quote_js(name), value));
		}
		for (name, expr) in &props.bindings {
			entries.push(format!(
				"{}: {}",
				quote_js(name),
				qualify(expr, &self.locals, self.binding)
			));
		}
		if !props.events.is_empty() {
			let handlers: Vec<String> = props
				.events
				.iter()
				.map(|(event, expr)| {
					format!(
						"{}: {}",
						quote_js(event),
						qualify(expr, &self.locals, self.binding)
					)
				})
				.collect();
			entries.push(format!("on: {{ {} }}", handlers.join(", ")));
		}

		format!("{{ {} }}", entries.join(", "))
	}
}
