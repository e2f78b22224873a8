use crate::rules::path::normalize;

/// Prefix marking a capture reference in a template, as in `$1`.
pub const REFERENCE_MARKER: char = '$';

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
	/// Text copied verbatim.
	Literal(String),

	/// 1-based capture group reference.
	Group(usize),
}

/// A target template parsed into segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
	segments: Vec<Segment>,
}

impl Template {
	/// Parse a template string. Never fails: a `$` not followed by a digit
	/// is literal text.
	pub fn parse(input: &str) -> Self {
		let mut segments = Vec::new();
		let mut literal = String::new();
		let mut chars = input.chars().peekable();

		while let Some(c) = chars.next() {
			let starts_reference =
				c == REFERENCE_MARKER && chars.peek().is_some_and(char::is_ascii_digit);
			if !starts_reference {
				literal.push(c);
				continue;
			}

			if !literal.is_empty() {
				segments.push(Segment::Literal(std::mem::take(&mut literal)));
			}

			let mut index: usize = 0;
			while let Some(digit) = chars.peek().and_then(|d| d.to_digit(10)) {
				index = index.saturating_mul(10).saturating_add(digit as usize);
				chars.next();
			}
			segments.push(Segment::Group(index));
		}

		if !literal.is_empty() {
			segments.push(Segment::Literal(literal));
		}

		Template { segments }
	}

	pub fn segments(&self) -> &[Segment] {
		&self.segments
	}

	/// Expand against captured values and normalize the result.
	///
	/// References outside `1..=captures.len()` contribute nothing.
	pub fn expand(&self, captures: &[String]) -> String {
		let mut out = String::new();
		for segment in &self.segments {
			match segment {
				Segment::Literal(text) => out.push_str(text),
				Segment::Group(index) => {
					if let Some(value) = index.checked_sub(1).and_then(|i| captures.get(i)) {
						out.push_str(value);
					}
				}
			}
		}
		normalize(&out)
	}
}
