//! Static rule registry
//!
//! In-memory `RuleRegistry` for hosts that register their rule metadata up
//! front. The reserved `eslint:recommended` / `eslint:all` presets are
//! derived from it by the config source.

use std::collections::BTreeMap;

use crate::domain::ports::{RuleMeta, RuleRegistry};
use crate::domain::value_objects::RuleEntry;

#[derive(Debug, Default)]
pub struct StaticRuleRegistry {
    metas: BTreeMap<String, RuleMeta>,
    plugin_rules: BTreeMap<String, BTreeMap<String, RuleEntry>>,
}

impl StaticRuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rule(mut self, rule_id: &str, meta: RuleMeta) -> Self {
        self.metas.insert(rule_id.to_string(), meta);
        self
    }

    pub fn with_plugin_rules(
        mut self,
        plugin: &str,
        rules: BTreeMap<String, RuleEntry>,
    ) -> Self {
        self.plugin_rules.insert(plugin.to_string(), rules);
        self
    }
}

impl RuleRegistry for StaticRuleRegistry {
    fn rule_metas(&self) -> Vec<(String, RuleMeta)> {
        self.metas
            .iter()
            .map(|(id, meta)| (id.clone(), meta.clone()))
            .collect()
    }

    fn plugin_default_rules(&self, plugin: &str) -> BTreeMap<String, RuleEntry> {
        self.plugin_rules.get(plugin).cloned().unwrap_or_default()
    }
}
