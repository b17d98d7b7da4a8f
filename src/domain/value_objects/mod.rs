//! Domain Value Objects
//!
//! Immutable value types for lint configuration concepts.

mod rule_entry;
mod severity;

pub use rule_entry::{InvalidRuleEntry, RuleEntry};
pub use severity::Severity;
