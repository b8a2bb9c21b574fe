//! Helpers for writing JavaScript source text.

/// Names that are never qualified with the component binding.
const RESERVED: &[&str] = &[
	"true",
	"false",
	"null",
	"undefined",
	"this",
	"typeof",
	"instanceof",
	"in",
	"of",
	"new",
	"void",
	"delete",
	"NaN",
	"Infinity",
	"Math",
	"JSON",
	"Number",
	"String",
	"Boolean",
	"Array",
	"Object",
	"Date",
	"console",
	"window",
];

/// Quotes a string as a single-quoted JavaScript literal.
pub fn quote_js(value: &str) -> String {
	let mut out = String::with_capacity(value.len() + 2);
	out.push('\'');
	for c in value.chars() {
		match c {
			'\\' => out.push_str("\\\\"),
			'\'' => out.push_str("\\'"),
			'\n' => out.push_str("\\n"),
			'\r' => out.push_str("\\r"),
			c => out.push(c),
		}
	}
	out.push('\'');
	out
}

/// Escapes literal text for use inside a template literal.
pub fn escape_template_text(value: &str) -> String {
	value
		.replace('\\', "\\\\")
		.replace('`', "\\`")
		.replace("${", "\\${")
}

fn is_ident_start(c: char) -> bool {
	c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

fn skip_string(chars: &[char], start: usize) -> usize {
	let quote = chars[start];
	let mut i = start + 1;
	while i < chars.len() && chars[i] != quote {
		if chars[i] == '\\' {
			i += 1;
		}
		i += 1;
	}
	(i + 1).min(chars.len())
}

fn next_non_ws(chars: &[char], from: usize) -> Option<usize> {
	chars[from..]
		.iter()
		.position(|c| !c.is_whitespace())
		.map(|p| from + p)
}

fn is_arrow(chars: &[char], at: Option<usize>) -> bool {
	at.is_some_and(|n| chars[n] == '=' && chars.get(n + 1) == Some(&'>'))
}

/// Spans of parenthesized parameter lists that are followed by `=>`.
fn arrow_param_groups(chars: &[char]) -> Vec<(usize, usize)> {
	let mut groups = Vec::new();
	let mut open: Vec<usize> = Vec::new();
	let mut i = 0;

	while i < chars.len() {
		match chars[i] {
			'\'' | '"' | '`' => {
				i = skip_string(chars, i);
				continue;
			}
			'(' => open.push(i),
			')' => {
				if let Some(start) = open.pop()
					&& is_arrow(chars, next_non_ws(chars, i + 1))
				{
					groups.push((start, i));
				}
			}
			_ => {}
		}
		i += 1;
	}
	groups
}

/// Qualifies bare identifiers in an expression with `binding`.
///
/// Identifiers are left alone when they are accessed as members, name a loop
/// variable in `locals`, are keywords or well-known globals, are object literal
/// keys, or are arrow function parameters (bare or parenthesized). Shorthand
/// object properties expand to `key: binding.key`. String literals are copied
/// verbatim.
pub fn qualify(expr: &str, locals: &[String], binding: &str) -> String {
	let chars: Vec<char> = expr.chars().collect();
	let param_groups = arrow_param_groups(&chars);
	let mut out = String::with_capacity(expr.len() + 8);
	let mut arrow_params: Vec<String> = Vec::new();
	let mut brackets: Vec<char> = Vec::new();
	let mut i = 0;

	while i < chars.len() {
		let c = chars[i];

		if matches!(c, '\'' | '"' | '`') {
			let start = i;
			i = skip_string(&chars, i);
			out.extend(&chars[start..i]);
			continue;
		}

		if c.is_ascii_digit() {
			let start = i;
			while i < chars.len() && (is_ident_char(chars[i]) || chars[i] == '.') {
				i += 1;
			}
			out.extend(&chars[start..i]);
			continue;
		}

		if is_ident_start(c) {
			let start = i;
			while i < chars.len() && is_ident_char(chars[i]) {
				i += 1;
			}
			let ident: String = chars[start..i].iter().collect();
			let previous = chars[..start].iter().rposition(|c| !c.is_whitespace());
			let previous_char = previous.map(|p| chars[p]);
			let next = next_non_ws(&chars, i);
			let next_char = next.map(|n| chars[n]);

			// `a.b` is member access, `...b` is a spread
			let member_access = previous.is_some_and(|p| {
				chars[p] == '.' && !(p >= 2 && chars[p - 1] == '.' && chars[p - 2] == '.')
			});
			let in_object = brackets.last() == Some(&'{');
			let after_separator = matches!(previous_char, Some('{' | ','));
			let object_key = after_separator && next_char == Some(':');
			let shorthand = in_object && after_separator && matches!(next_char, Some('}' | ','));
			let arrow_param = is_arrow(&chars, next)
				|| param_groups.iter().any(|&(open, close)| start > open && start < close);

			if arrow_param {
				arrow_params.push(ident.clone());
			}
			let keep = member_access
				|| object_key
				|| arrow_param
				|| RESERVED.contains(&ident.as_str())
				|| locals.iter().chain(&arrow_params).any(|l| *l == ident);

			if keep {
				out.push_str(&ident);
			} else {
				if shorthand {
					out.push_str(&ident);
					out.push_str(": ");
				}
				out.push_str(binding);
				out.push('.');
				out.push_str(&ident);
			}
			continue;
		}

		match c {
			'(' | '[' | '{' => brackets.push(c),
			')' | ']' | '}' => {
				brackets.pop();
			}
			_ => {}
		}
		out.push(c);
		i += 1;
	}

	out
}
