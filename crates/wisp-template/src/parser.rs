//! Lenient HTML-subset parser.
//!
//! Markup is tokenized with nom combinators and then folded into a node forest
//! with a stack of open elements. Recovery rules:
//!
//! - elements left open at end of input are closed there
//! - a closing tag with no matching open element is dropped
//! - a closing tag closes every element opened after its match
//! - a `<` that does not start a tag is kept as text

use nom::{
	IResult, Parser,
	branch::alt,
	bytes::complete::{tag, take_till1, take_until, take_while, take_while1},
	character::complete::{char, multispace0, multispace1, satisfy},
	combinator::{map, opt, recognize, rest, value},
	multi::many0,
	sequence::{delimited, pair, preceded, terminated},
};

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
	"wbr",
];

/// An attribute as written in the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
	pub name: String,
	/// `None` for bare attributes such as `disabled`.
	pub value: Option<String>,
}

impl Attr {
	pub fn new(name: impl Into<String>, value: Option<&str>) -> Self {
		Self {
			name: name.into(),
			value: value.map(str::to_string),
		}
	}
}

/// An element node. The tag name keeps its original case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
	pub tag: String,
	pub attrs: Vec<Attr>,
	pub children: Vec<Node>,
}

/// A node of the parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
	Element(Element),
	Text(String),
	Comment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
	Open {
		name: &'a str,
		attrs: Vec<Attr>,
		self_closing: bool,
	},
	Close(&'a str),
	Text(&'a str),
	Comment(&'a str),
}

fn is_void(tag: &str) -> bool {
	VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

fn tag_name(input: &str) -> IResult<&str, &str> {
	recognize(pair(
		satisfy(|c: char| c.is_ascii_alphabetic()),
		take_while(|c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.')),
	))
	.parse(input)
}

fn attr_name(input: &str) -> IResult<&str, &str> {
	take_while1(|c: char| {
		!c.is_whitespace() && !matches!(c, '=' | '>' | '/' | '"' | '\'' | '<')
	})
	.parse(input)
}

fn attr_value(input: &str) -> IResult<&str, &str> {
	alt((
		delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
		delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
		take_while1(|c: char| !c.is_whitespace() && c != '>'),
	))
	.parse(input)
}

fn attribute(input: &str) -> IResult<&str, Attr> {
	let (input, name) = preceded(multispace1, attr_name).parse(input)?;
	let (input, value) =
		opt(preceded((multispace0, char('='), multispace0), attr_value)).parse(input)?;
	Ok((input, Attr::new(name, value)))
}

/// Parses the end of an opening tag, reporting whether it was self-closing.
fn tag_end(input: &str) -> IResult<&str, bool> {
	preceded(
		multispace0,
		alt((value(true, tag("/>")), value(false, tag(">")))),
	)
	.parse(input)
}

fn open_tag(input: &str) -> IResult<&str, Token<'_>> {
	let (input, name) = preceded(char('<'), tag_name).parse(input)?;
	let (input, attrs) = many0(attribute).parse(input)?;
	let (input, self_closing) = tag_end(input)?;
	Ok((
		input,
		Token::Open {
			name,
			attrs,
			self_closing,
		},
	))
}

fn close_tag(input: &str) -> IResult<&str, Token<'_>> {
	let (input, name) =
		delimited(tag("</"), tag_name, pair(multispace0, char('>'))).parse(input)?;
	Ok((input, Token::Close(name)))
}

fn comment(input: &str) -> IResult<&str, Token<'_>> {
	map(
		preceded(
			tag("<!--"),
			alt((terminated(take_until("-->"), tag("-->")), rest)),
		),
		Token::Comment,
	)
	.parse(input)
}

/// `<!DOCTYPE ...>` and other declarations are kept as comments.
fn declaration(input: &str) -> IResult<&str, Token<'_>> {
	map(
		delimited(tag("<!"), take_until(">"), char('>')),
		Token::Comment,
	)
	.parse(input)
}

fn text(input: &str) -> IResult<&str, Token<'_>> {
	map(take_till1(|c: char| c == '<'), Token::Text).parse(input)
}

fn token(input: &str) -> IResult<&str, Token<'_>> {
	alt((comment, declaration, close_tag, open_tag, text)).parse(input)
}

fn tokenize(mut input: &str) -> Vec<Token<'_>> {
	let mut tokens = Vec::new();
	while !input.is_empty() {
		match token(input) {
			Ok((remaining, tok)) => {
				tokens.push(tok);
				input = remaining;
			}
			Err(_) => {
				// Stray '<' that does not open a tag.
				let (lt, remaining) = input.split_at(1);
				tokens.push(Token::Text(lt));
				input = remaining;
			}
		}
	}
	tokens
}

#[derive(Default)]
struct TreeBuilder {
	roots: Vec<Node>,
	open: Vec<Element>,
}

impl TreeBuilder {
	fn siblings(&mut self) -> &mut Vec<Node> {
		match self.open.last_mut() {
			Some(parent) => &mut parent.children,
			None => &mut self.roots,
		}
	}

	fn push_text(&mut self, text: &str) {
		let siblings = self.siblings();
		if let Some(Node::Text(previous)) = siblings.last_mut() {
			previous.push_str(text);
		} else {
			siblings.push(Node::Text(text.to_string()));
		}
	}

	fn close_top(&mut self) {
		if let Some(element) = self.open.pop() {
			self.siblings().push(Node::Element(element));
		}
	}

	fn close(&mut self, name: &str) {
		let Some(position) = self
			.open
			.iter()
			.rposition(|e| e.tag.eq_ignore_ascii_case(name))
		else {
			tracing::trace!(tag = name, "dropping unmatched closing tag");
			return;
		};
		while self.open.len() > position {
			self.close_top();
		}
	}

	fn finish(mut self) -> Vec<Node> {
		while !self.open.is_empty() {
			self.close_top();
		}
		self.roots
	}
}

/// Parses a template into a forest of top-level nodes. Never fails.
pub fn parse(input: &str) -> Vec<Node> {
	let mut builder = TreeBuilder::default();
	for tok in tokenize(input) {
		match tok {
			Token::Open {
				name,
				attrs,
				self_closing,
			} => {
				let element = Element {
					tag: name.to_string(),
					attrs,
					children: Vec::new(),
				};
				if self_closing || is_void(name) {
					builder.siblings().push(Node::Element(element));
				} else {
					builder.open.push(element);
				}
			}
			Token::Close(name) => builder.close(name),
			Token::Text(body) => builder.push_text(body),
			Token::Comment(body) => builder.siblings().push(Node::Comment(body.to_string())),
		}
	}
	builder.finish()
}
