//! Rule compilation and resolution for relate.
//!
//! This module handles:
//! - Compiling glob-like source patterns into anchored matchers
//! - Parsing and expanding target templates with `$n` references
//! - Resolving a path against an ordered rule list with de-duplication

pub mod flip;
pub mod glob;
pub mod matcher;
pub mod path;
pub mod template;

pub use flip::flip_glob_and_template;
pub use glob::{GlobMatcher, compile_glob};
pub use matcher::{
	CompiledRule, MatchResult, compile_rule, compile_rules, map_all, map_first, resolve_all,
	resolve_first,
};
pub use path::normalize;
pub use template::{Segment, Template};
