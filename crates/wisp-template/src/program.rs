//! Typed render program.
//!
//! The parse forest is lowered bottom-up into a tree of [`ProgramNode`]s. Directive
//! nesting is fixed here: a `for` loop wraps the `show` conditional, which wraps the
//! element itself.

use crate::attrs::{self, ForDirective, Props};
use crate::error::CompileError;
use crate::interpolate::{self, Segment};
use crate::parser::{Element, Node};
use crate::tag::{self, TagRef};
use std::collections::BTreeSet;
use std::fmt;

/// A virtual-node construction primitive referenced by compiled code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Primitive {
	/// `h(tag, props, children)`
	Element,
	/// `hFragment(children)`
	Fragment,
	/// `hString(text)`
	Text,
}

impl Primitive {
	/// Returns the JavaScript name the primitive is bound to.
	pub fn name(self) -> &'static str {
		match self {
			Self::Element => "h",
			Self::Fragment => "hFragment",
			Self::Text => "hString",
		}
	}
}

impl fmt::Display for Primitive {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// An element construction call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
	pub tag: TagRef,
	pub props: Props,
	pub children: Vec<ProgramNode>,
}

/// A node of the render program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramNode {
	Element(ElementNode),
	Fragment(Vec<ProgramNode>),
	/// Renders `then` when `condition` holds, `null` otherwise.
	Conditional {
		condition: String,
		then: Box<ProgramNode>,
	},
	/// Renders `body` once per item of the iterable.
	Loop {
		directive: ForDirective,
		body: Box<ProgramNode>,
	},
	Text(Vec<Segment>),
}

/// A compiled render program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
	pub(crate) root: Option<ProgramNode>,
}

impl Program {
	/// Returns the root node, `None` for an empty template.
	pub fn root(&self) -> Option<&ProgramNode> {
		self.root.as_ref()
	}
}

/// Lowers a parse forest into a program, recording every primitive it uses.
#[derive(Debug, Default)]
pub(crate) struct ProgramBuilder {
	imports: BTreeSet<Primitive>,
}

impl ProgramBuilder {
	pub(crate) fn build(
		mut self,
		nodes: &[Node],
	) -> Result<(Program, BTreeSet<Primitive>), CompileError> {
		let mut roots = self.nodes(nodes)?;

		let root = match roots.len() {
			0 => None,
			1 if !matches!(roots[0], ProgramNode::Loop { .. }) => roots.pop(),
			_ => {
				self.imports.insert(Primitive::Fragment);
				Some(ProgramNode::Fragment(roots))
			}
		};

		Ok((Program { root }, self.imports))
	}

	fn nodes(&mut self, nodes: &[Node]) -> Result<Vec<ProgramNode>, CompileError> {
		let mut out = Vec::with_capacity(nodes.len());
		for node in nodes {
			if let Some(lowered) = self.node(node)? {
				out.push(lowered);
			}
		}
		Ok(out)
	}

	fn node(&mut self, node: &Node) -> Result<Option<ProgramNode>, CompileError> {
		match node {
			Node::Element(element) => self.element(element).map(Some),
			Node::Text(text) => Ok(self.text(text)),
			Node::Comment(_) => Ok(None),
		}
	}

	fn element(&mut self, element: &Element) -> Result<ProgramNode, CompileError> {
		let tag = tag::normalize(&element.tag);
		tracing::trace!(tag = tag.name(), "lowering element");

		let split = attrs::split(tag.name(), &element.attrs)?;
		let children = self.nodes(&element.children)?;
		self.imports.insert(Primitive::Element);

		let mut node = ProgramNode::Element(ElementNode {
			tag,
			props: split.props,
			children,
		});
		if let Some(condition) = split.directives.show {
			node = ProgramNode::Conditional {
				condition,
				then: Box::new(node),
			};
		}
		if let Some(directive) = split.directives.for_each {
			node = ProgramNode::Loop {
				directive,
				body: Box::new(node),
			};
		}
		Ok(node)
	}

	fn text(&mut self, text: &str) -> Option<ProgramNode> {
		let trimmed = text.trim();
		if trimmed.is_empty() {
			return None;
		}
		self.imports.insert(Primitive::Text);
		Some(ProgramNode::Text(interpolate::split(trimmed)))
	}
}
