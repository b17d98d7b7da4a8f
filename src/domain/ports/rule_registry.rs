//! RuleRegistry port
//!
//! Backs two consumers: plugin default rules folded in (lowest priority)
//! when a layer's effective value is computed, and the reserved
//! `eslint:recommended` / `eslint:all` extends targets, which a config
//! source builds by filtering the core rule metadata.

use std::collections::BTreeMap;

use crate::domain::value_objects::RuleEntry;

#[derive(Debug, Clone, PartialEq)]
pub struct RuleMeta {
    pub recommended: bool,
    pub deprecated: bool,
    pub default_entry: RuleEntry,
}

pub trait RuleRegistry {
    /// Core rule ids with their metadata.
    fn rule_metas(&self) -> Vec<(String, RuleMeta)>;

    /// Default rule configuration shipped by a plugin, keyed by namespaced
    /// rule id (`plugin/rule`). Unknown plugins yield an empty map.
    fn plugin_default_rules(&self, plugin: &str) -> BTreeMap<String, RuleEntry>;
}
