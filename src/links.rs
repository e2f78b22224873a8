//! Presentation data for front ends.
//!
//! Front ends get plain `(label, path)` pairs and bind them to a generic
//! "open path" handler. Nothing here holds callbacks or touches the disk.

use crate::rules::MatchResult;
use std::path::{Component, Path, PathBuf};

/// Banner text when more than one related file is shown.
pub const MULTIPLE_MESSAGE: &str = "Related files found";

/// One related file a front end can offer to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedLink {
	/// Id of the rule that produced the link.
	pub rule_id: String,

	/// Link or button text.
	pub label: String,

	/// Banner message for this rule.
	pub message: String,

	/// Root-relative, forward-slash related path.
	pub related_path: String,
}

impl From<&MatchResult<'_>> for RelatedLink {
	fn from(result: &MatchResult<'_>) -> Self {
		RelatedLink {
			rule_id: result.rule.id.clone(),
			label: result.rule.label().to_string(),
			message: result.rule.message_or_default().to_string(),
			related_path: result.related_path.clone(),
		}
	}
}

/// Build links from resolver output, keeping order.
pub fn links(results: &[MatchResult<'_>]) -> Vec<RelatedLink> {
	results.iter().map(RelatedLink::from).collect()
}

/// Banner text for a set of links, or `None` when there is nothing to show.
pub fn banner_text(links: &[RelatedLink]) -> Option<&str> {
	match links {
		[] => None,
		[single] => Some(single.message.as_str()),
		_ => Some(MULTIPLE_MESSAGE),
	}
}

/// Label of the extra "open everything" link shown for several links.
pub fn open_all_label(count: usize) -> String {
	format!("Open all related files ({count})")
}

/// Text of the single action shown in icon mode: the rule's own label for
/// one link, a counted label for several.
pub fn action_label(links: &[RelatedLink]) -> Option<String> {
	match links {
		[] => None,
		[single] => Some(single.label.clone()),
		_ => Some(format!("Open related files ({})", links.len())),
	}
}

/// Join a project root and a normalized related path into an OS path.
pub fn absolute_path(base: &Path, related_path: &str) -> PathBuf {
	related_path
		.split('/')
		.filter(|part| !part.is_empty())
		.fold(base.to_path_buf(), |path, part| path.join(part))
}

/// Express `path` relative to `base` with forward slashes, when it lies
/// inside `base`. A relative `path` is taken as relative to `base`. Both are
/// cleaned lexically first, so `.` and `..` never defeat the prefix check.
pub fn relative_to(base: &Path, path: &Path) -> Option<String> {
	let base = clean(base);
	let path = clean(&base.join(path));
	let relative = path.strip_prefix(&base).ok()?;
	let parts: Vec<_> = relative
		.components()
		.map(|c| c.as_os_str().to_string_lossy().into_owned())
		.collect();
	Some(parts.join("/"))
}

/// Drop `.` components and fold `..` into its parent without touching the disk.
fn clean(path: &Path) -> PathBuf {
	let mut out = PathBuf::new();
	for component in path.components() {
		match component {
			Component::CurDir => {}
			Component::ParentDir => {
				if !out.pop() {
					out.push(component);
				}
			}
			other => out.push(other),
		}
	}
	out
}
