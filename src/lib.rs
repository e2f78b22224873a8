//! Relate - map a source file to its related files with glob to template rules.
//!
//! This library provides the core functionality for relate, including:
//! - Compiling glob-like patterns (`*`, `**`) into anchored matchers
//! - Expanding `$n` templates into related paths
//! - Resolving a path against ordered rules with first-rule-wins de-duplication
//! - Configuration file parsing, cascade discovery and the rule store
//!
//! # Example
//!
//! ```
//! use relate_cli::config::{Rule, RuleStore};
//!
//! let store = RuleStore::new(vec![Rule {
//!     source_pattern: "src/**/*.cs".to_string(),
//!     target_template: "xml/$1/$2.xml".to_string(),
//!     ..Default::default()
//! }]);
//!
//! let result = store.resolve_first("src/Area/Page.cs").unwrap();
//! assert_eq!(result.related_path, "xml/Area/Page.xml");
//! ```

pub mod config;
pub mod error;
pub mod links;
pub mod rules;

pub use error::{RelateError, Result};
