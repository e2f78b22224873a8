use crate::rules::template::{Segment, Template};

/// Kind of wildcard at a given capture position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wildcard {
	Single,
	Multi,
}

fn wildcards(glob: &str) -> Vec<Wildcard> {
	let mut kinds = Vec::new();
	let mut chars = glob.chars().peekable();
	while let Some(c) = chars.next() {
		if c != '*' {
			continue;
		}
		if chars.peek() == Some(&'*') {
			chars.next();
			kinds.push(Wildcard::Multi);
		} else {
			kinds.push(Wildcard::Single);
		}
	}
	kinds
}

/// Turn a glob into a template by numbering its wildcards `$1`, `$2`, ...
fn template_from_glob(glob: &str) -> String {
	let mut out = String::with_capacity(glob.len());
	let mut index = 1;
	let mut chars = glob.chars().peekable();
	while let Some(c) = chars.next() {
		if c != '*' {
			out.push(c);
			continue;
		}
		if chars.peek() == Some(&'*') {
			chars.next();
		}
		out.push('$');
		out.push_str(&index.to_string());
		index += 1;
	}
	out
}

/// Turn a template into a glob, choosing `**` for references whose
/// wildcard in the old glob was `**` and `*` otherwise.
fn glob_from_template(template: &str, kinds: &[Wildcard]) -> String {
	let mut out = String::with_capacity(template.len());
	for segment in Template::parse(template).segments() {
		match segment {
			Segment::Literal(text) => out.push_str(text),
			Segment::Group(index) => {
				let kind = index.checked_sub(1).and_then(|i| kinds.get(i));
				match kind {
					Some(Wildcard::Multi) => out.push_str("**"),
					_ => out.push('*'),
				}
			}
		}
	}
	out
}

/// Swap a rule's direction, returning `(new_glob, new_template)`.
///
/// ```
/// use relate_cli::rules::flip_glob_and_template;
///
/// let (glob, template) = flip_glob_and_template("src/**/*.cs", "xml/$1/$2.xml");
/// assert_eq!(glob, "xml/**/*.xml");
/// assert_eq!(template, "src/$1/$2.cs");
/// ```
pub fn flip_glob_and_template(glob: &str, template: &str) -> (String, String) {
	let kinds = wildcards(glob);
	(glob_from_template(template, &kinds), template_from_glob(glob))
}
