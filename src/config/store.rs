//! Ownership of the rule list and its compiled form.
//!
//! The compiled rules are a cache of the rule list. Any mutation drops the
//! whole cache and the next lookup recompiles every rule, so capture indices
//! can never go stale after an edit.

use crate::config::types::{MergedConfig, Rule};
use crate::error::{RelateError, Result};
use crate::rules::{CompiledRule, MatchResult, compile_rules, resolve_all, resolve_first};
use std::collections::HashSet;
use std::sync::OnceLock;

const ID_PREFIX: &str = "rule-";
const DEFAULT_NAME_PREFIX: &str = "Rule ";

/// Rule list plus lazily built compiled rules.
#[derive(Debug, Default)]
pub struct RuleStore {
	rules: Vec<Rule>,
	compiled: OnceLock<Vec<CompiledRule>>,
	next_id: u64,
}

impl RuleStore {
	/// Build a store, assigning ids to rules that have none.
	pub fn new(rules: Vec<Rule>) -> Self {
		let mut store = RuleStore::default();
		store.reload(rules);
		store
	}

	/// Build a store from the merged cascade.
	pub fn from_merged(config: &MergedConfig) -> Self {
		Self::new(config.rules())
	}

	pub fn rules(&self) -> &[Rule] {
		&self.rules
	}

	/// Compiled rules, built on first use after any change.
	pub fn compiled(&self) -> &[CompiledRule] {
		self.compiled.get_or_init(|| compile_rules(&self.rules))
	}

	/// Replace the rule list with freshly loaded rules.
	pub fn reload(&mut self, rules: Vec<Rule>) {
		self.rules = rules;
		let mut taken: HashSet<String> = HashSet::new();
		for i in 0..self.rules.len() {
			if self.rules[i].id.is_empty() || !taken.insert(self.rules[i].id.clone()) {
				let id = self.fresh_id();
				taken.insert(id.clone());
				self.rules[i].id = id;
			}
		}
		self.invalidate();
	}

	/// Replace the rule list as an edit. Unlike [`RuleStore::reload`], every
	/// rule must have a pattern and a template.
	pub fn set_rules(&mut self, rules: Vec<Rule>) -> Result<()> {
		for (i, rule) in rules.iter().enumerate() {
			rule.validate(i + 1)?;
		}
		self.reload(rules);
		Ok(())
	}

	/// Append a rule, assigning an id when it has none. Returns the id.
	pub fn add_rule(&mut self, mut rule: Rule) -> Result<String> {
		rule.validate(self.rules.len() + 1)?;
		if rule.id.is_empty() {
			rule.id = self.fresh_id();
		} else if self.position(&rule.id).is_some() {
			return Err(RelateError::DuplicateRuleId { id: rule.id });
		}
		let id = rule.id.clone();
		self.rules.push(rule);
		self.invalidate();
		Ok(id)
	}

	/// Replace the rule with `id`, keeping its id.
	pub fn update_rule(&mut self, id: &str, mut rule: Rule) -> Result<()> {
		let index = self.require(id)?;
		rule.validate(index + 1)?;
		rule.id = id.to_string();
		self.rules[index] = rule;
		self.invalidate();
		Ok(())
	}

	/// Remove the rule with `id` and return it.
	pub fn remove_rule(&mut self, id: &str) -> Result<Rule> {
		let index = self.require(id)?;
		let rule = self.rules.remove(index);
		self.invalidate();
		Ok(rule)
	}

	/// Move the rule with `id` to position `new_index`.
	pub fn move_rule(&mut self, id: &str, new_index: usize) -> Result<()> {
		let index = self.require(id)?;
		if new_index >= self.rules.len() {
			return Err(RelateError::InvalidPosition {
				index: new_index,
				len: self.rules.len(),
			});
		}
		let rule = self.rules.remove(index);
		self.rules.insert(new_index, rule);
		self.invalidate();
		Ok(())
	}

	/// Insert a copy of the rule with `id` right after it. Returns the new id.
	pub fn duplicate_rule(&mut self, id: &str) -> Result<String> {
		let index = self.require(id)?;
		let mut copy = self.rules[index].clone();
		copy.id = self.fresh_id();
		if !copy.name.trim().is_empty() {
			copy.name.push_str(" (copy)");
		}
		let new_id = copy.id.clone();
		self.rules.insert(index + 1, copy);
		self.invalidate();
		Ok(new_id)
	}

	/// Name for a new rule: `Rule <n>` one past the highest existing number.
	pub fn next_default_name(&self) -> String {
		let max = self
			.rules
			.iter()
			.filter_map(|rule| default_name_number(&rule.name))
			.max()
			.unwrap_or(0);
		format!("{DEFAULT_NAME_PREFIX}{}", max.saturating_add(1))
	}

	pub fn resolve_all(&self, path: &str) -> Vec<MatchResult<'_>> {
		resolve_all(path, self.compiled())
	}

	pub fn resolve_first(&self, path: &str) -> Option<MatchResult<'_>> {
		resolve_first(path, self.compiled())
	}

	fn position(&self, id: &str) -> Option<usize> {
		self.rules.iter().position(|rule| rule.id == id)
	}

	fn require(&self, id: &str) -> Result<usize> {
		self.position(id).ok_or_else(|| RelateError::RuleNotFound { id: id.to_string() })
	}

	/// Next `rule-<n>` id not present in the list. Never hands out a value twice.
	fn fresh_id(&mut self) -> String {
		loop {
			self.next_id += 1;
			let id = format!("{ID_PREFIX}{}", self.next_id);
			if self.position(&id).is_none() {
				return id;
			}
		}
	}

	fn invalidate(&mut self) {
		self.compiled = OnceLock::new();
		tracing::debug!(rules = self.rules.len(), "compiled rule cache invalidated");
	}
}

/// Parse `n` out of a name like `Rule 7`, case-insensitively.
fn default_name_number(name: &str) -> Option<u64> {
	let name = name.trim();
	let prefix = name.get(..DEFAULT_NAME_PREFIX.len())?;
	if !prefix.eq_ignore_ascii_case(DEFAULT_NAME_PREFIX) {
		return None;
	}
	let digits = &name[DEFAULT_NAME_PREFIX.len()..];
	if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}
	digits.parse().ok()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn make_rule(name: &str, source_pattern: &str, target_template: &str) -> Rule {
		Rule {
			name: name.to_string(),
			source_pattern: source_pattern.to_string(),
			target_template: target_template.to_string(),
			..Default::default()
		}
	}

	fn paths(store: &RuleStore, path: &str) -> Vec<String> {
		store
			.resolve_all(path)
			.into_iter()
			.map(|r| r.related_path)
			.collect()
	}

	#[test]
	fn test_new_assigns_missing_ids() {
		let mut explicit = make_rule("a", "src/*.rs", "tests/$1.rs");
		explicit.id = "rule-1".to_string();
		let store = RuleStore::new(vec![
			make_rule("b", "src/*.rs", "docs/$1.md"),
			explicit,
			make_rule("c", "src/*.rs", "bench/$1.rs"),
		]);

		let ids: Vec<_> = store.rules().iter().map(|r| r.id.as_str()).collect();
		assert_eq!(ids, vec!["rule-2", "rule-1", "rule-3"]);
	}

	#[test]
	fn test_duplicate_ids_on_reload_are_replaced() {
		let mut first = make_rule("a", "a", "b");
		first.id = "x".to_string();
		let mut second = make_rule("b", "c", "d");
		second.id = "x".to_string();

		let store = RuleStore::new(vec![first, second]);
		assert_eq!(store.rules()[0].id, "x");
		assert_ne!(store.rules()[1].id, "x");
	}

	#[test]
	fn test_compiled_is_cached_until_mutation() {
		let mut store = RuleStore::new(vec![make_rule("a", "src/*.rs", "tests/$1.rs")]);
		let first = store.compiled().as_ptr();
		assert_eq!(store.compiled().as_ptr(), first);

		store
			.add_rule(make_rule("b", "src/*.rs", "docs/$1.md"))
			.unwrap();
		assert_eq!(store.compiled().len(), 2);
	}

	#[test]
	fn test_edit_recompiles_capture_indices() {
		let mut store = RuleStore::new(vec![make_rule("a", "src/**/*.rs", "out/$2")]);
		let id = store.rules()[0].id.clone();
		assert_eq!(paths(&store, "src/x/lib.rs"), vec!["out/lib"]);

		store
			.update_rule(&id, make_rule("a", "src/*.rs", "out/$2"))
			.unwrap();
		assert_eq!(store.rules()[0].id, id);
		assert!(paths(&store, "src/x/lib.rs").is_empty());
		assert_eq!(paths(&store, "src/lib.rs"), vec!["out/"]);
	}

	#[test]
	fn test_reorder_changes_priority() {
		let mut store = RuleStore::new(vec![
			make_rule("tests", "src/*.rs", "tests/$1.rs"),
			make_rule("docs", "src/*.rs", "docs/$1.md"),
		]);
		assert_eq!(
			store.resolve_first("src/lib.rs").unwrap().related_path,
			"tests/lib.rs"
		);

		let docs = store.rules()[1].id.clone();
		store.move_rule(&docs, 0).unwrap();
		assert_eq!(
			store.resolve_first("src/lib.rs").unwrap().related_path,
			"docs/lib.md"
		);
	}

	#[test]
	fn test_remove_rule() {
		let mut store = RuleStore::new(vec![make_rule("a", "src/*.rs", "tests/$1.rs")]);
		let id = store.rules()[0].id.clone();
		assert_eq!(paths(&store, "src/lib.rs").len(), 1);

		let removed = store.remove_rule(&id).unwrap();
		assert_eq!(removed.name, "a");
		assert!(paths(&store, "src/lib.rs").is_empty());
		assert!(matches!(
			store.remove_rule(&id),
			Err(RelateError::RuleNotFound { .. })
		));
	}

	#[test]
	fn test_ids_are_never_reused() {
		let mut store = RuleStore::default();
		let first = store.add_rule(make_rule("a", "a", "b")).unwrap();
		store.remove_rule(&first).unwrap();
		let second = store.add_rule(make_rule("b", "a", "b")).unwrap();
		assert_ne!(first, second);
	}

	#[test]
	fn test_add_rule_rejects_duplicate_id() {
		let mut store = RuleStore::default();
		let id = store.add_rule(make_rule("a", "a", "b")).unwrap();
		let mut clash = make_rule("b", "c", "d");
		clash.id = id;
		assert!(matches!(
			store.add_rule(clash),
			Err(RelateError::DuplicateRuleId { .. })
		));
	}

	#[test]
	fn test_add_rule_rejects_empty_fields() {
		let mut store = RuleStore::new(vec![make_rule("a", "src/*.rs", "tests/$1.rs")]);
		match store.add_rule(make_rule("b", " ", "docs/$1.md")).unwrap_err() {
			RelateError::EmptyField { index, field } => {
				assert_eq!(index, 2);
				assert_eq!(field, "source_pattern");
			}
			other => panic!("Expected EmptyField error, got {other:?}"),
		}
		assert_eq!(store.rules().len(), 1);
	}

	#[test]
	fn test_update_rule_rejects_empty_template() {
		let mut store = RuleStore::new(vec![make_rule("a", "src/*.rs", "tests/$1.rs")]);
		let id = store.rules()[0].id.clone();
		assert!(matches!(
			store.update_rule(&id, make_rule("a", "src/*.rs", "")),
			Err(RelateError::EmptyField {
				index: 1,
				field: "target_template"
			})
		));
		assert_eq!(paths(&store, "src/lib.rs"), vec!["tests/lib.rs"]);
	}

	#[test]
	fn test_set_rules_validates_but_reload_does_not() {
		let mut store = RuleStore::default();
		let rules = vec![
			make_rule("a", "src/*.rs", "tests/$1.rs"),
			make_rule("b", "", "docs/$1.md"),
		];
		assert!(matches!(
			store.set_rules(rules.clone()),
			Err(RelateError::EmptyField { index: 2, .. })
		));
		assert!(store.rules().is_empty());

		store.reload(rules);
		assert_eq!(store.rules().len(), 2);
		assert_eq!(paths(&store, "src/lib.rs"), vec!["tests/lib.rs"]);
	}

	#[test]
	fn test_move_rule_out_of_range() {
		let mut store = RuleStore::new(vec![make_rule("a", "a", "b")]);
		let id = store.rules()[0].id.clone();
		assert!(matches!(
			store.move_rule(&id, 3),
			Err(RelateError::InvalidPosition { index: 3, len: 1 })
		));
	}

	#[test]
	fn test_duplicate_rule() {
		let mut store = RuleStore::new(vec![
			make_rule("Docs", "src/*.rs", "docs/$1.md"),
			make_rule("", "src/*.rs", "tests/$1.rs"),
		]);
		let docs = store.rules()[0].id.clone();
		let unnamed = store.rules()[1].id.clone();

		let copy = store.duplicate_rule(&docs).unwrap();
		assert_eq!(store.rules()[1].id, copy);
		assert_eq!(store.rules()[1].name, "Docs (copy)");

		store.duplicate_rule(&unnamed).unwrap();
		assert_eq!(store.rules()[3].name, "");
		assert_eq!(store.rules().len(), 4);
	}

	#[test]
	fn test_next_default_name() {
		let store = RuleStore::new(vec![
			make_rule("Rule 2", "a", "b"),
			make_rule("rule 7", "a", "b"),
			make_rule("Rule x", "a", "b"),
			make_rule("My Rule 40", "a", "b"),
		]);
		assert_eq!(store.next_default_name(), "Rule 8");
		assert_eq!(RuleStore::default().next_default_name(), "Rule 1");
	}

	#[test]
	fn test_default_name_number() {
		assert_eq!(default_name_number("Rule 3"), Some(3));
		assert_eq!(default_name_number(" RULE 12 "), Some(12));
		assert_eq!(default_name_number("Rule"), None);
		assert_eq!(default_name_number("Rule -1"), None);
		assert_eq!(default_name_number("Règle 1"), None);
	}

	#[test]
	fn test_compiled_shared_across_threads() {
		let store = RuleStore::new(vec![make_rule("a", "src/**/*.rs", "tests/$1/$2.rs")]);
		std::thread::scope(|scope| {
			for _ in 0..4 {
				scope.spawn(|| {
					let result = store.resolve_first("src/a/b.rs").unwrap();
					assert_eq!(result.related_path, "tests/a/b.rs");
				});
			}
		});
	}
}
