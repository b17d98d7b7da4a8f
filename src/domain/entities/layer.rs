//! Configuration layer entity
//!
//! The unit of cascading. A layer's raw data is built once from its
//! inherited layers (directory parent, then each extends target in listed
//! order) with the layer's own declared settings on top, and is frozen from
//! then on. `ecmaFeatures` and `globals` are pushed into value chains
//! instead of being resolved immediately; they are only snapshotted against
//! the fully merged `env` when the effective value is computed.
//!
//! Precedence, lowest to highest: directory parent, earlier extends
//! entries, later extends entries, the layer's own settings, the user
//! `--config` override, the command-line override.

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::domain::entities::chain::FieldChains;
use crate::domain::ports::ExtendsError;
use crate::domain::services::resolver::ResolveContext;
use crate::domain::value_objects::RuleEntry;

pub const DEFAULT_PARSER: &str = "espree";

/// The declared fields of one configuration source, before any cascading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayerConfig {
    /// Where this config came from, for error context and for resolving
    /// relative extends references. Set by the loader, never serialized.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,

    /// One or many references; config files may write a single string.
    #[serde(deserialize_with = "one_or_many")]
    pub extends: Vec<String>,

    pub parser: Option<String>,
    pub plugins: Vec<String>,
    pub env: BTreeMap<String, bool>,
    pub rules: BTreeMap<String, RuleEntry>,
    pub ecma_features: BTreeMap<String, bool>,
    pub globals: BTreeMap<String, bool>,
}

impl LayerConfig {
    pub fn with_source_path(mut self, path: PathBuf) -> Self {
        self.source_path = Some(path);
        self
    }
}

fn one_or_many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(reference) => vec![reference],
        OneOrMany::Many(references) => references,
    })
}

/// A layer's merged raw record. Frozen once the layer finishes construction.
/// `parser` stays `None` until some layer in the cascade declares one, so an
/// undeclaring layer never shadows a declared parser below it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawLayerData {
    pub parser: Option<String>,
    /// Listed order, duplicates allowed.
    pub plugins: Vec<String>,
    pub env: BTreeMap<String, bool>,
    pub rules: BTreeMap<String, RuleEntry>,
    pub ecma_features: FieldChains,
    pub globals: FieldChains,
}

/// The fully merged configuration: plugin default rules folded in and every
/// value chain resolved against the final `env` map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveConfig {
    pub parser: String,
    pub plugins: Vec<String>,
    pub env: BTreeMap<String, bool>,
    pub rules: BTreeMap<String, RuleEntry>,
    pub ecma_features: BTreeMap<String, bool>,
    pub globals: BTreeMap<String, bool>,
}

#[derive(Debug)]
pub struct ConfigLayer {
    raw: RawLayerData,
    is_empty: bool,
    user_override: Option<LayerConfig>,
    cli_override: Option<LayerConfig>,
    effective: OnceCell<Rc<EffectiveConfig>>,
}

impl ConfigLayer {
    /// Build a layer from its own declared config plus everything it
    /// inherits. `parent` is the directory-hierarchy parent, treated as an
    /// implicit lowest-priority extends entry.
    pub fn new(
        ctx: &mut ResolveContext<'_>,
        parent: Option<&ConfigLayer>,
        config: &LayerConfig,
        user_override: Option<LayerConfig>,
        cli_override: Option<LayerConfig>,
    ) -> Result<Self, ExtendsError> {
        let mut raw = RawLayerData::default();

        // Resolve extends targets in listed order. A failure is re-raised
        // with this config's path attached so the chain stays traceable.
        let mut uppers: Vec<Rc<ConfigLayer>> = Vec::with_capacity(config.extends.len());
        for reference in &config.extends {
            let from = config.source_path.as_deref();
            let upper = ctx.load(reference, from).map_err(|err| match from {
                Some(path) => err.referenced_from(path),
                None => err,
            })?;
            uppers.push(upper);
        }

        if let Some(parent) = parent {
            inherit(&mut raw, &parent.raw);
        }
        for upper in &uppers {
            inherit(&mut raw, &upper.raw);
        }

        // Overlay this layer's own declared fields.
        let mut is_empty = true;
        if let Some(parser) = &config.parser {
            raw.parser = Some(parser.clone());
            is_empty = false;
        }
        if !config.plugins.is_empty() {
            raw.plugins.extend(config.plugins.iter().cloned());
            is_empty = false;
        }
        if !config.env.is_empty() {
            raw.env.extend(config.env.clone());
            is_empty = false;

            // Each declared environment (enabled or not) asserts its
            // contributed values conditioned on that environment being
            // active once the env map is final. Unknown names contribute
            // nothing.
            for name in config.env.keys() {
                let Some(def) = ctx.environments.lookup(name) else {
                    continue;
                };
                if !def.ecma_features.is_empty() {
                    raw.ecma_features.assert_values(
                        def.ecma_features.iter().map(|(k, v)| (k.as_str(), *v)),
                        Some(name),
                    );
                }
                if !def.globals.is_empty() {
                    raw.globals.assert_values(
                        def.globals.iter().map(|(k, v)| (k.as_str(), *v)),
                        Some(name),
                    );
                }
            }
        }
        if !config.rules.is_empty() {
            merge_rules(&mut raw.rules, &config.rules);
            is_empty = false;
        }
        // Own assertions go in after the env-contributed ones, placing them
        // at the chain heads: own settings outrank anything inherited.
        if !config.ecma_features.is_empty() {
            raw.ecma_features.assert_values(
                config.ecma_features.iter().map(|(k, v)| (k.as_str(), *v)),
                None,
            );
            is_empty = false;
        }
        if !config.globals.is_empty() {
            raw.globals
                .assert_values(config.globals.iter().map(|(k, v)| (k.as_str(), *v)), None);
            is_empty = false;
        }

        debug!(
            source = ?config.source_path,
            extends = config.extends.len(),
            is_empty,
            "constructed configuration layer"
        );

        Ok(Self {
            raw,
            is_empty,
            user_override,
            cli_override,
            effective: OnceCell::new(),
        })
    }

    pub fn raw(&self) -> &RawLayerData {
        &self.raw
    }

    /// `true` only if this layer itself declared nothing; inherited values
    /// do not count.
    pub fn is_empty(&self) -> bool {
        self.is_empty
    }

    /// The effective configuration, computed on first read and memoized.
    /// Repeated reads return the same shared value.
    pub fn effective(&self, ctx: &mut ResolveContext<'_>) -> Result<Rc<EffectiveConfig>, ExtendsError> {
        if let Some(cached) = self.effective.get() {
            return Ok(Rc::clone(cached));
        }
        let computed = self.compute_effective(ctx)?;
        Ok(Rc::clone(self.effective.get_or_init(|| computed)))
    }

    fn compute_effective(
        &self,
        ctx: &mut ResolveContext<'_>,
    ) -> Result<Rc<EffectiveConfig>, ExtendsError> {
        // Overrides re-run the same construction recursively with this
        // layer as the parent: user `--config` first, command-line flags on
        // top of that.
        if let Some(user) = &self.user_override {
            let transient =
                ConfigLayer::new(ctx, Some(self), user, None, self.cli_override.clone())?;
            return transient.effective(ctx);
        }
        if let Some(cli) = &self.cli_override {
            let transient = ConfigLayer::new(ctx, Some(self), cli, None, None)?;
            return transient.effective(ctx);
        }

        // Plugin default rules sit below everything this layer merged.
        let mut rules: BTreeMap<String, RuleEntry> = BTreeMap::new();
        for plugin in &self.raw.plugins {
            merge_rules(&mut rules, &ctx.rules.plugin_default_rules(plugin));
        }
        merge_rules(&mut rules, &self.raw.rules);

        Ok(Rc::new(EffectiveConfig {
            parser: self
                .raw
                .parser
                .clone()
                .unwrap_or_else(|| DEFAULT_PARSER.to_string()),
            plugins: self.raw.plugins.clone(),
            env: self.raw.env.clone(),
            rules,
            ecma_features: self.raw.ecma_features.snapshot(&self.raw.env),
            globals: self.raw.globals.snapshot(&self.raw.env),
        }))
    }
}

fn inherit(raw: &mut RawLayerData, upper: &RawLayerData) {
    if upper.parser.is_some() {
        raw.parser = upper.parser.clone();
    }
    if !upper.plugins.is_empty() {
        raw.plugins.extend(upper.plugins.iter().cloned());
    }
    if !upper.env.is_empty() {
        raw.env.extend(upper.env.clone());
    }
    if !upper.rules.is_empty() {
        merge_rules(&mut raw.rules, &upper.rules);
    }
    if !upper.ecma_features.is_empty() {
        raw.ecma_features.merge_from(&upper.ecma_features);
    }
    if !upper.globals.is_empty() {
        raw.globals.merge_from(&upper.globals);
    }
}

fn merge_rules(target: &mut BTreeMap<String, RuleEntry>, source: &BTreeMap<String, RuleEntry>) {
    for (rule_id, entry) in source {
        let merged = match target.get(rule_id) {
            Some(existing) => existing.merge(entry),
            None => entry.clone(),
        };
        target.insert(rule_id.clone(), merged);
    }
}

#[cfg(test)]
mod tests;
