use crate::rules::path::{normalize, push_literal};
use regex::Regex;

/// Regex fragment for `**`: any run of characters, separators included.
const MULTI_SEGMENT: &str = "(.*)";

/// Regex fragment for `*`: one or more characters within a single segment.
const SINGLE_SEGMENT: &str = "([^/]+)";

/// A glob pattern compiled into an anchored matcher.
#[derive(Debug, Clone)]
pub struct GlobMatcher {
	/// Anchored full-string regex. `None` when the regex engine refused the
	/// generated pattern, in which case nothing matches.
	regex: Option<Regex>,

	/// Number of wildcards in the pattern, left to right.
	group_count: usize,
}

impl GlobMatcher {
	/// Number of capture groups a template may reference.
	pub fn group_count(&self) -> usize {
		self.group_count
	}

	/// Match a normalized path against the whole pattern and return the
	/// captured wildcard values in order (capture `n` is at index `n - 1`).
	pub fn captures(&self, path: &str) -> Option<Vec<String>> {
		let caps = self.regex.as_ref()?.captures(path)?;
		Some(
			caps.iter()
				.skip(1)
				.map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
				.collect(),
		)
	}
}

/// Compile a glob-like pattern.
///
/// `**` captures any sequence including `/`, `*` captures one or more
/// non-`/` characters, and everything else is literal. There is no
/// alternation: `(js|ts)` and `{js,ts}` match themselves.
pub fn compile_glob(pattern: &str) -> GlobMatcher {
	let source = glob_to_regex(&normalize(pattern));

	let regex = match Regex::new(&source.pattern) {
		Ok(regex) => Some(regex),
		Err(err) => {
			tracing::warn!(%pattern, error = %err, "glob produced an unusable regex, rule is inert");
			None
		}
	};

	GlobMatcher {
		regex,
		group_count: source.group_count,
	}
}

/// Regex source generated from a normalized glob.
struct RegexSource {
	pattern: String,
	group_count: usize,
}

fn glob_to_regex(glob: &str) -> RegexSource {
	let mut pattern = String::with_capacity(glob.len() * 2 + 2);
	let mut group_count = 0;
	let mut chars = glob.chars().peekable();

	pattern.push('^');
	while let Some(c) = chars.next() {
		if c == '*' {
			if chars.peek() == Some(&'*') {
				chars.next();
				pattern.push_str(MULTI_SEGMENT);
			} else {
				pattern.push_str(SINGLE_SEGMENT);
			}
			group_count += 1;
		} else {
			push_literal(&mut pattern, c);
		}
	}
	pattern.push('$');

	RegexSource {
		pattern,
		group_count,
	}
}
