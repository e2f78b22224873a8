//! Path normalization and literal escaping shared by the glob compiler,
//! the template expander and the resolver.

/// Characters that carry meaning in regex syntax and must match literally.
const REGEX_SPECIAL: &[char] = &[
	'.', '(', ')', '+', '?', '^', '$', '{', '}', '[', ']', '|', '\\',
];

/// Normalize a path to forward slashes with no leading slash.
///
/// Every pattern and every input path goes through here before matching,
/// so all matching is slash-based and root-relative.
pub fn normalize(path: &str) -> String {
	path.replace('\\', "/").trim_start_matches('/').to_string()
}

/// Append `c` to `out`, escaped if it is special in regex syntax.
pub fn push_literal(out: &mut String, c: char) {
	if REGEX_SPECIAL.contains(&c) {
		out.push('\\');
	}
	out.push(c);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_normalize_backslashes() {
		assert_eq!(normalize(r"src\main\Page.cs"), "src/main/Page.cs");
	}

	#[test]
	fn test_normalize_strips_leading_slashes() {
		assert_eq!(normalize("///src/main"), "src/main");
		assert_eq!(normalize(r"\src\main"), "src/main");
	}

	#[test]
	fn test_normalize_is_idempotent() {
		let once = normalize(r"\a\b/c.txt");
		assert_eq!(once, "a/b/c.txt");
		assert_eq!(normalize(&once), once);
	}

	#[test]
	fn test_normalize_backslash_matches_forward_slash_form() {
		assert_eq!(normalize(r"a\b\c"), normalize("a/b/c"));
	}

	#[test]
	fn test_normalize_keeps_trailing_and_inner_slashes() {
		assert_eq!(normalize("a//b/"), "a//b/");
		assert_eq!(normalize(""), "");
	}

	#[test]
	fn test_push_literal_escapes_specials() {
		let mut out = String::new();
		for c in "a.(b)|{c}".chars() {
			push_literal(&mut out, c);
		}
		assert_eq!(out, r"a\.\(b\)\|\{c\}");
	}

	#[test]
	fn test_push_literal_passes_plain_chars() {
		let mut out = String::new();
		for c in "src/x-y_z".chars() {
			push_literal(&mut out, c);
		}
		assert_eq!(out, "src/x-y_z");
	}
}
