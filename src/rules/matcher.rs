use crate::config::types::Rule;
use crate::rules::glob::{GlobMatcher, compile_glob};
use crate::rules::path::normalize;
use crate::rules::template::Template;
use std::collections::HashSet;

/// A rule compiled and ready for matching.
#[derive(Debug, Clone)]
pub struct CompiledRule {
	/// The original rule.
	pub rule: Rule,

	/// Anchored matcher for the source pattern.
	pub glob: GlobMatcher,

	/// Parsed target template.
	pub template: Template,

	/// Set when the source pattern or target template is blank.
	inert: bool,
}

impl CompiledRule {
	/// Compile a rule. Never fails; a rule with a blank source pattern or
	/// target template compiles but never matches.
	pub fn compile(rule: &Rule) -> Self {
		let inert = !rule.is_usable();
		if inert {
			tracing::warn!(id = %rule.id, name = %rule.name, "rule has an empty pattern or template and will never match");
		}

		CompiledRule {
			rule: rule.clone(),
			glob: compile_glob(&rule.source_pattern),
			template: Template::parse(&rule.target_template),
			inert,
		}
	}

	pub fn is_inert(&self) -> bool {
		self.inert
	}

	/// Map a normalized path through this rule.
	pub fn apply(&self, path: &str) -> Option<String> {
		if self.inert {
			return None;
		}
		let captures = self.glob.captures(path)?;
		Some(self.template.expand(&captures))
	}
}

/// One related path produced for a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult<'a> {
	/// The rule that produced this path first.
	pub rule: &'a Rule,

	/// Root-relative, forward-slash related path.
	pub related_path: String,
}

/// Compile a single rule.
pub fn compile_rule(rule: &Rule) -> CompiledRule {
	CompiledRule::compile(rule)
}

/// Compile all rules, preserving order.
pub fn compile_rules(rules: &[Rule]) -> Vec<CompiledRule> {
	let compiled: Vec<CompiledRule> = rules.iter().map(CompiledRule::compile).collect();
	tracing::debug!(count = compiled.len(), "compiled rules");
	compiled
}

/// Resolve every related path for `path`.
///
/// Rules are tried in order. When several rules produce the same related
/// path, only the first one is kept, and output order is first-seen order.
pub fn resolve_all<'a>(path: &str, rules: &'a [CompiledRule]) -> Vec<MatchResult<'a>> {
	let path = normalize(path);
	let mut seen = HashSet::new();
	let mut results = Vec::new();

	for compiled in rules {
		let Some(related_path) = compiled.apply(&path) else {
			continue;
		};

		if !seen.insert(related_path.clone()) {
			tracing::debug!(id = %compiled.rule.id, %related_path, "dropping duplicate related path");
			continue;
		}

		tracing::debug!(id = %compiled.rule.id, %path, %related_path, "rule matched");
		results.push(MatchResult {
			rule: &compiled.rule,
			related_path,
		});
	}

	results
}

/// Resolve the highest-priority related path for `path`.
pub fn resolve_first<'a>(path: &str, rules: &'a [CompiledRule]) -> Option<MatchResult<'a>> {
	resolve_all(path, rules).into_iter().next()
}

/// Compile `rules` and resolve `path` against them, returning owned
/// `(rule, related_path)` pairs.
pub fn map_all(path: &str, rules: &[Rule]) -> Vec<(Rule, String)> {
	let compiled = compile_rules(rules);
	resolve_all(path, &compiled)
		.into_iter()
		.map(|result| (result.rule.clone(), result.related_path))
		.collect()
}

/// First entry of [`map_all`].
pub fn map_first(path: &str, rules: &[Rule]) -> Option<(Rule, String)> {
	map_all(path, rules).into_iter().next()
}
