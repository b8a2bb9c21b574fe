//! Interpreter for compiled programs.
//!
//! Runs a [`Program`] against a JSON state object standing in for the component
//! binding. Only a small expression language is understood:
//!
//! | Form | Example |
//! |------|---------|
//! | literals | `1`, `'a'`, `"a"`, `true`, `null` |
//! | paths | `user.name`, `rows[0]`, `this.items` |
//! | negation | `!done` |
//! | equality | `a == b`, `a !== b` |
//! | logic | `a && b`, `a \|\| b` |
//! | grouping | `(a \|\| b) && c` |
//!
//! Loose and strict equality both compare JSON values structurally.

use crate::attrs::Props;
use crate::error::RenderError;
use crate::interpolate::Segment;
use crate::program::{Program, ProgramNode};
use nom::{
	IResult, Parser,
	branch::alt,
	bytes::complete::{tag, take_while, take_while1},
	character::complete::{char, digit1, multispace0, satisfy},
	combinator::{all_consuming, map, opt, recognize, value},
	multi::many0,
	sequence::{delimited, pair, preceded},
};
use serde_json::{Map, Value};

/// A rendered virtual node.
#[derive(Debug, Clone, PartialEq)]
pub enum VNode {
	Element {
		tag: String,
		attrs: Map<String, Value>,
		/// Event name and handler source text.
		events: Vec<(String, String)>,
		children: Vec<VNode>,
	},
	Fragment(Vec<VNode>),
	Text(String),
	/// The `null` branch of a conditional.
	Null,
}

impl VNode {
	/// Returns the children of an element or fragment.
	pub fn children(&self) -> &[VNode] {
		match self {
			Self::Element { children, .. } | Self::Fragment(children) => children,
			_ => &[],
		}
	}

	/// Returns the text of a text node.
	pub fn text(&self) -> Option<&str> {
		match self {
			Self::Text(text) => Some(text),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
enum PathSeg {
	Key(String),
	Index(usize),
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
	Literal(Value),
	Path { this: bool, segments: Vec<PathSeg> },
	Not(Box<Expr>),
	Eq(Box<Expr>, Box<Expr>, bool),
	And(Box<Expr>, Box<Expr>),
	Or(Box<Expr>, Box<Expr>),
}

fn ws<'a, O, F>(inner: F) -> impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>
where
	F: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
	delimited(multispace0, inner, multispace0)
}

fn identifier(input: &str) -> IResult<&str, &str> {
	recognize(pair(
		satisfy(|c: char| c.is_ascii_alphabetic() || c == '_' || c == '$'),
		take_while(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '$'),
	))
	.parse(input)
}

fn number_text(input: &str) -> IResult<&str, &str> {
	recognize(pair(
		pair(opt(char('-')), digit1),
		opt(pair(char('.'), digit1)),
	))
	.parse(input)
}

fn number(input: &str) -> IResult<&str, Value> {
	let (input, raw) = number_text(input)?;
	let parsed = match raw.parse::<i64>() {
		Ok(int) => Value::from(int),
		Err(_) => raw.parse::<f64>().map(Value::from).unwrap_or(Value::Null),
	};
	Ok((input, parsed))
}

fn string(input: &str) -> IResult<&str, Value> {
	map(
		alt((
			delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
			delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
		)),
		|s: &str| Value::String(s.to_string()),
	)
	.parse(input)
}

fn path(input: &str) -> IResult<&str, Expr> {
	let (input, head) = identifier(input)?;
	let (input, tail) = many0(alt((
		map(preceded(char('.'), identifier), |k: &str| {
			PathSeg::Key(k.to_string())
		}),
		map(
			delimited(char('['), digit1, char(']')),
			|d: &str| PathSeg::Index(d.parse().unwrap_or(usize::MAX)),
		),
		map(
			delimited(
				char('['),
				alt((
					delimited(char('\''), take_while1(|c: char| c != '\''), char('\'')),
					delimited(char('"'), take_while1(|c: char| c != '"'), char('"')),
				)),
				char(']'),
			),
			|k: &str| PathSeg::Key(k.to_string()),
		),
	)))
	.parse(input)?;

	let expr = match head {
		"true" if tail.is_empty() => Expr::Literal(Value::Bool(true)),
		"false" if tail.is_empty() => Expr::Literal(Value::Bool(false)),
		"null" | "undefined" if tail.is_empty() => Expr::Literal(Value::Null),
		"this" => Expr::Path {
			this: true,
			segments: tail,
		},
		_ => {
			let mut segments = vec![PathSeg::Key(head.to_string())];
			segments.extend(tail);
			Expr::Path {
				this: false,
				segments,
			}
		}
	};
	Ok((input, expr))
}

fn primary(input: &str) -> IResult<&str, Expr> {
	ws(alt((
		delimited(char('('), or_expr, char(')')),
		map(number, Expr::Literal),
		map(string, Expr::Literal),
		path,
	)))
	.parse(input)
}

fn unary(input: &str) -> IResult<&str, Expr> {
	alt((
		map(preceded(ws(char('!')), unary), |e| Expr::Not(Box::new(e))),
		primary,
	))
	.parse(input)
}

fn equality(input: &str) -> IResult<&str, Expr> {
	let (input, lhs) = unary(input)?;
	let (input, rhs) = opt(pair(
		ws(alt((
			value(true, tag("===")),
			value(false, tag("!==")),
			value(true, tag("==")),
			value(false, tag("!=")),
		))),
		unary,
	))
	.parse(input)?;
	Ok(match rhs {
		Some((equal, rhs)) => (input, Expr::Eq(Box::new(lhs), Box::new(rhs), equal)),
		None => (input, lhs),
	})
}

fn and_expr(input: &str) -> IResult<&str, Expr> {
	let (mut input, mut lhs) = equality(input)?;
	while let Ok((remaining, rhs)) = preceded(ws(tag("&&")), equality).parse(input) {
		lhs = Expr::And(Box::new(lhs), Box::new(rhs));
		input = remaining;
	}
	Ok((input, lhs))
}

fn or_expr(input: &str) -> IResult<&str, Expr> {
	let (mut input, mut lhs) = and_expr(input)?;
	while let Ok((remaining, rhs)) = preceded(ws(tag("||")), and_expr).parse(input) {
		lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
		input = remaining;
	}
	Ok((input, lhs))
}

fn parse_expr(source: &str) -> Result<Expr, RenderError> {
	all_consuming(ws(or_expr))
		.parse(source)
		.map(|(_, expr)| expr)
		.map_err(|_| RenderError::Unsupported(source.to_string()))
}

/// Equality where `3` and `3.0` are the same number.
fn same_value(lhs: &Value, rhs: &Value) -> bool {
	match (lhs, rhs) {
		(Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
		_ => lhs == rhs,
	}
}

fn truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(b) => *b,
		Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
		Value::String(s) => !s.is_empty(),
		Value::Array(_) | Value::Object(_) => true,
	}
}

/// Formats a value the way a template literal would.
fn stringify(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		Value::Number(n) => match n.as_f64() {
			Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
			_ => n.to_string(),
		},
		other => other.to_string(),
	}
}

struct Scope<'a> {
	state: &'a Value,
	locals: Vec<(String, Value)>,
}

impl Scope<'_> {
	fn lookup(&self, expr: &Expr) -> Value {
		let Expr::Path { this, segments } = expr else {
			return Value::Null;
		};
		let mut segments = segments.iter();
		let mut current = if *this {
			self.state.clone()
		} else {
			let Some(PathSeg::Key(head)) = segments.next() else {
				return Value::Null;
			};
			match self.locals.iter().rev().find(|(name, _)| name == head) {
				Some((_, local)) => local.clone(),
				None => self.state.get(head).cloned().unwrap_or(Value::Null),
			}
		};
		for segment in segments {
			current = match (segment, &current) {
				(PathSeg::Key(key), Value::Array(items)) if key == "length" => {
					Value::from(items.len())
				}
				(PathSeg::Key(key), Value::String(s)) if key == "length" => {
					Value::from(s.chars().count())
				}
				(PathSeg::Key(key), _) => current.get(key).cloned().unwrap_or(Value::Null),
				(PathSeg::Index(index), _) => {
					current.get(*index).cloned().unwrap_or(Value::Null)
				}
			};
		}
		current
	}

	fn eval(&self, expr: &Expr) -> Value {
		match expr {
			Expr::Literal(value) => value.clone(),
			Expr::Path { .. } => self.lookup(expr),
			Expr::Not(inner) => Value::Bool(!truthy(&self.eval(inner))),
			Expr::Eq(lhs, rhs, equal) => {
				Value::Bool(same_value(&self.eval(lhs), &self.eval(rhs)) == *equal)
			}
			Expr::And(lhs, rhs) => {
				let left = self.eval(lhs);
				if truthy(&left) { self.eval(rhs) } else { left }
			}
			Expr::Or(lhs, rhs) => {
				let left = self.eval(lhs);
				if truthy(&left) { left } else { self.eval(rhs) }
			}
		}
	}

	fn eval_source(&self, source: &str) -> Result<Value, RenderError> {
		Ok(self.eval(&parse_expr(source)?))
	}

	/// Renders a node, pushing one or more results into `out`.
	fn render(&mut self, node: &ProgramNode, out: &mut Vec<VNode>) -> Result<(), RenderError> {
		match node {
			ProgramNode::Element(element) => {
				let (attrs, events) = self.props(&element.props)?;
				let mut children = Vec::new();
				for child in &element.children {
					self.render(child, &mut children)?;
				}
				out.push(VNode::Element {
					tag: element.tag.name().to_string(),
					attrs,
					events,
					children,
				});
			}
			ProgramNode::Fragment(nodes) => {
				let mut children = Vec::new();
				for child in nodes {
					self.render(child, &mut children)?;
				}
				out.push(VNode::Fragment(children));
			}
			ProgramNode::Conditional { condition, then } => {
				if truthy(&self.eval_source(condition)?) {
					self.render(then, out)?;
				} else {
					out.push(VNode::Null);
				}
			}
			ProgramNode::Loop { directive, body } => {
				let Value::Array(items) = self.eval_source(&directive.iterable)? else {
					return Err(RenderError::NotIterable(directive.iterable.clone()));
				};
				for (index, item) in items.into_iter().enumerate() {
					let scope = self.locals.len();
					self.locals.push((directive.item.clone(), item));
					if let Some(name) = &directive.index {
						self.locals.push((name.clone(), Value::from(index)));
					}
					let rendered = self.render(body, out);
					self.locals.truncate(scope);
					rendered?;
				}
			}
			ProgramNode::Text(segments) => {
				let mut text = String::new();
				for segment in segments {
					match segment {
						Segment::Literal(literal) => text.push_str(literal),
						Segment::Expr(source) => text.push_str(&stringify(&self.eval_source(source)?)),
					}
				}
				out.push(VNode::Text(text));
			}
		}
		Ok(())
	}

	fn props(
		&self,
		props: &Props,
	) -> Result<(Map<String, Value>, Vec<(String, String)>), RenderError> {
		let mut attrs = Map::new();
		for (name, value) in &props.attrs {
			let value = match value {
				Some(v) => Value::String(v.clone()),
				None => Value::Bool(true),
			};
			attrs.insert(name.clone(), value);
		}
		for (name, source) in &props.bindings {
			attrs.insert(name.clone(), self.eval_source(source)?);
		}
		Ok((attrs, props.events.clone()))
	}
}

impl Program {
	/// Interprets the program against `state`.
	///
	/// Returns `Ok(None)` for an empty template.
	///
	/// # Errors
	///
	/// Returns [`RenderError::Unsupported`] for expressions outside the supported
	/// subset and [`RenderError::NotIterable`] when a loop source is not an array.
	pub fn render(&self, state: &Value) -> Result<Option<VNode>, RenderError> {
		let Some(root) = self.root() else {
			return Ok(None);
		};
		let mut scope = Scope {
			state,
			locals: Vec::new(),
		};
		let mut out = Vec::with_capacity(1);
		scope.render(root, &mut out)?;
		Ok(out.pop())
	}
}
