use std::collections::BTreeMap;

use serde_json::json;

use super::*;
use crate::domain::ports::{
    ConfigSource, EnvironmentDef, EnvironmentRegistry, RuleMeta, RuleRegistry,
};
use crate::domain::services::resolver::{LayerCache, ResolveContext};
use crate::domain::value_objects::Severity;

struct StubSource {
    configs: BTreeMap<String, LayerConfig>,
}

impl StubSource {
    fn new(configs: Vec<(&str, serde_json::Value)>) -> Self {
        Self {
            configs: configs
                .into_iter()
                .map(|(name, value)| {
                    let config: LayerConfig = serde_json::from_value(value).unwrap();
                    (name.to_string(), config.with_source_path(name.into()))
                })
                .collect(),
        }
    }
}

impl ConfigSource for StubSource {
    fn locate(&self, reference: &str, _from: Option<&std::path::Path>) -> Result<String, ExtendsError> {
        if self.configs.contains_key(reference) {
            Ok(reference.to_string())
        } else {
            Err(ExtendsError::NotFound {
                reference: reference.to_string(),
            })
        }
    }

    fn read(&self, key: &str) -> Result<LayerConfig, ExtendsError> {
        Ok(self.configs[key].clone())
    }
}

#[derive(Default)]
struct StubEnvironments {
    defs: BTreeMap<String, EnvironmentDef>,
}

impl StubEnvironments {
    fn with_node() -> Self {
        let mut defs = BTreeMap::new();
        defs.insert(
            "node".to_string(),
            EnvironmentDef::default()
                .with_ecma_features([("globalReturn", true)])
                .with_globals([("process", true), ("require", true)]),
        );
        Self { defs }
    }
}

impl EnvironmentRegistry for StubEnvironments {
    fn lookup(&self, name: &str) -> Option<&EnvironmentDef> {
        self.defs.get(name)
    }
}

#[derive(Default)]
struct StubRules {
    plugin_rules: BTreeMap<String, BTreeMap<String, RuleEntry>>,
}

impl RuleRegistry for StubRules {
    fn rule_metas(&self) -> Vec<(String, RuleMeta)> {
        Vec::new()
    }

    fn plugin_default_rules(&self, plugin: &str) -> BTreeMap<String, RuleEntry> {
        self.plugin_rules.get(plugin).cloned().unwrap_or_default()
    }
}

fn config(value: serde_json::Value) -> LayerConfig {
    serde_json::from_value(value).unwrap()
}

fn severity_of(effective: &EffectiveConfig, rule_id: &str) -> Severity {
    effective.rules[rule_id].severity()
}

#[test]
fn own_settings_outrank_extends_and_later_extends_outrank_earlier() {
    let source = StubSource::new(vec![
        (
            "preset-a",
            json!({"rules": {"shared": 1, "ab": 1, "a-only": 1}}),
        ),
        ("preset-b", json!({"rules": {"shared": 1, "ab": 2}})),
    ]);
    let environments = StubEnvironments::default();
    let rules = StubRules::default();
    let mut cache = LayerCache::new();
    let mut ctx = ResolveContext::new(&source, &environments, &rules, &mut cache);

    let layer = ConfigLayer::new(
        &mut ctx,
        None,
        &config(json!({"extends": ["preset-a", "preset-b"], "rules": {"shared": 2}})),
        None,
        None,
    )
    .unwrap();

    let effective = layer.effective(&mut ctx).unwrap();

    assert_eq!(severity_of(&effective, "shared"), Severity::Error); // own
    assert_eq!(severity_of(&effective, "ab"), Severity::Error); // preset-b
    assert_eq!(severity_of(&effective, "a-only"), Severity::Warn); // preset-a
}

#[test]
fn parent_layer_is_the_lowest_priority_entry() {
    let source = StubSource::new(vec![("preset", json!({"rules": {"x": 2}}))]);
    let environments = StubEnvironments::default();
    let rules = StubRules::default();
    let mut cache = LayerCache::new();
    let mut ctx = ResolveContext::new(&source, &environments, &rules, &mut cache);

    let parent = ConfigLayer::new(
        &mut ctx,
        None,
        &config(json!({"rules": {"x": 1, "parent-only": 1}, "parser": "parent-parser"})),
        None,
        None,
    )
    .unwrap();

    let child = ConfigLayer::new(
        &mut ctx,
        Some(&parent),
        &config(json!({"extends": "preset"})),
        None,
        None,
    )
    .unwrap();

    let effective = child.effective(&mut ctx).unwrap();

    assert_eq!(severity_of(&effective, "x"), Severity::Error); // preset over parent
    assert_eq!(severity_of(&effective, "parent-only"), Severity::Warn);
    assert_eq!(effective.parser, "parent-parser");
}

#[test]
fn undeclared_parser_falls_back_to_the_default() {
    let source = StubSource::new(vec![("preset", json!({"rules": {"x": 1}}))]);
    let environments = StubEnvironments::default();
    let rules = StubRules::default();
    let mut cache = LayerCache::new();
    let mut ctx = ResolveContext::new(&source, &environments, &rules, &mut cache);

    let layer = ConfigLayer::new(
        &mut ctx,
        None,
        &config(json!({"extends": "preset"})),
        None,
        None,
    )
    .unwrap();

    let effective = layer.effective(&mut ctx).unwrap();

    assert_eq!(effective.parser, DEFAULT_PARSER);
}

#[test]
fn environment_contributed_values_track_the_final_env_map() {
    let source = StubSource::new(vec![("base", json!({"env": {"node": true}}))]);
    let environments = StubEnvironments::with_node();
    let rules = StubRules::default();
    let mut cache = LayerCache::new();
    let mut ctx = ResolveContext::new(&source, &environments, &rules, &mut cache);

    // The base layer enables node; this layer disables it again. The
    // contributed values must vanish even though the chain link predates the
    // disable.
    let layer = ConfigLayer::new(
        &mut ctx,
        None,
        &config(json!({"extends": "base", "env": {"node": false}})),
        None,
        None,
    )
    .unwrap();

    let effective = layer.effective(&mut ctx).unwrap();

    assert_eq!(effective.env.get("node"), Some(&false));
    assert!(!effective.ecma_features.contains_key("globalReturn"));
    assert!(!effective.globals.contains_key("process"));
}

#[test]
fn re_enabling_an_environment_revives_its_contributed_values() {
    let source = StubSource::new(vec![]);
    let environments = StubEnvironments::with_node();
    let rules = StubRules::default();
    let mut cache = LayerCache::new();
    let mut ctx = ResolveContext::new(&source, &environments, &rules, &mut cache);

    // Declaring node:false still records the conditioned chain links; the
    // CLI override flips the env map and the values come back.
    let layer = ConfigLayer::new(
        &mut ctx,
        None,
        &config(json!({"env": {"node": false}})),
        None,
        Some(config(json!({"env": {"node": true}}))),
    )
    .unwrap();

    let effective = layer.effective(&mut ctx).unwrap();

    assert_eq!(effective.env.get("node"), Some(&true));
    assert_eq!(effective.ecma_features.get("globalReturn"), Some(&true));
    assert_eq!(effective.globals.get("process"), Some(&true));
}

#[test]
fn own_unconditional_global_outranks_environment_contribution() {
    let source = StubSource::new(vec![]);
    let environments = StubEnvironments::with_node();
    let rules = StubRules::default();
    let mut cache = LayerCache::new();
    let mut ctx = ResolveContext::new(&source, &environments, &rules, &mut cache);

    let layer = ConfigLayer::new(
        &mut ctx,
        None,
        &config(json!({"env": {"node": true}, "globals": {"process": false}})),
        None,
        None,
    )
    .unwrap();

    let effective = layer.effective(&mut ctx).unwrap();

    assert_eq!(effective.globals.get("process"), Some(&false));
    assert_eq!(effective.globals.get("require"), Some(&true));
}

#[test]
fn unknown_environment_names_are_silently_ignored() {
    let source = StubSource::new(vec![]);
    let environments = StubEnvironments::default();
    let rules = StubRules::default();
    let mut cache = LayerCache::new();
    let mut ctx = ResolveContext::new(&source, &environments, &rules, &mut cache);

    let layer = ConfigLayer::new(
        &mut ctx,
        None,
        &config(json!({"env": {"made-up": true}})),
        None,
        None,
    )
    .unwrap();

    let effective = layer.effective(&mut ctx).unwrap();

    assert_eq!(effective.env.get("made-up"), Some(&true));
    assert!(effective.globals.is_empty());
}

#[test]
fn effective_value_is_memoized() {
    let source = StubSource::new(vec![]);
    let environments = StubEnvironments::default();
    let rules = StubRules::default();
    let mut cache = LayerCache::new();
    let mut ctx = ResolveContext::new(&source, &environments, &rules, &mut cache);

    let layer = ConfigLayer::new(&mut ctx, None, &config(json!({"rules": {"x": 1}})), None, None)
        .unwrap();

    let first = layer.effective(&mut ctx).unwrap();
    let second = layer.effective(&mut ctx).unwrap();

    assert!(Rc::ptr_eq(&first, &second));
}

#[test]
fn override_precedence_is_own_then_user_then_cli() {
    let source = StubSource::new(vec![]);
    let environments = StubEnvironments::default();
    let rules = StubRules::default();

    // user override only
    let mut cache = LayerCache::new();
    let mut ctx = ResolveContext::new(&source, &environments, &rules, &mut cache);
    let layer = ConfigLayer::new(
        &mut ctx,
        None,
        &config(json!({"rules": {"x": 2}, "parser": "own-parser"})),
        Some(config(json!({"rules": {"x": 1}, "parser": "user-parser"}))),
        None,
    )
    .unwrap();
    let effective = layer.effective(&mut ctx).unwrap();
    assert_eq!(severity_of(&effective, "x"), Severity::Warn);
    assert_eq!(effective.parser, "user-parser");

    // user and CLI overrides together
    let mut cache = LayerCache::new();
    let mut ctx = ResolveContext::new(&source, &environments, &rules, &mut cache);
    let layer = ConfigLayer::new(
        &mut ctx,
        None,
        &config(json!({"rules": {"x": 2}})),
        Some(config(json!({"rules": {"x": 1}}))),
        Some(config(json!({"rules": {"x": 0}, "parser": "cli-parser"}))),
    )
    .unwrap();
    let effective = layer.effective(&mut ctx).unwrap();
    assert_eq!(severity_of(&effective, "x"), Severity::Off);
    assert_eq!(effective.parser, "cli-parser");
}

#[test]
fn extends_failure_carries_the_referencing_path() {
    let source = StubSource::new(vec![]);
    let environments = StubEnvironments::default();
    let rules = StubRules::default();
    let mut cache = LayerCache::new();
    let mut ctx = ResolveContext::new(&source, &environments, &rules, &mut cache);

    let declared = config(json!({"extends": "missing"}))
        .with_source_path("/project/.lintrc.json".into());

    let err = ConfigLayer::new(&mut ctx, None, &declared, None, None).unwrap_err();

    let message = err.to_string();
    assert!(message.contains("extends target not found: missing"));
    assert!(message.contains("Referenced from: /project/.lintrc.json"));
}

#[test]
fn plugin_default_rules_sit_below_own_rules() {
    let source = StubSource::new(vec![]);
    let environments = StubEnvironments::default();
    let mut plugin_rules = BTreeMap::new();
    plugin_rules.insert(
        "demo".to_string(),
        BTreeMap::from([
            ("demo/overridden".to_string(), RuleEntry::Severity(Severity::Warn)),
            ("demo/default".to_string(), RuleEntry::Severity(Severity::Error)),
        ]),
    );
    let rules = StubRules { plugin_rules };
    let mut cache = LayerCache::new();
    let mut ctx = ResolveContext::new(&source, &environments, &rules, &mut cache);

    let layer = ConfigLayer::new(
        &mut ctx,
        None,
        &config(json!({"plugins": ["demo"], "rules": {"demo/overridden": 0}})),
        None,
        None,
    )
    .unwrap();

    let effective = layer.effective(&mut ctx).unwrap();

    assert_eq!(severity_of(&effective, "demo/overridden"), Severity::Off);
    assert_eq!(severity_of(&effective, "demo/default"), Severity::Error);
}

#[test]
fn plugins_append_in_order_and_keep_duplicates() {
    let source = StubSource::new(vec![("preset", json!({"plugins": ["one", "two"]}))]);
    let environments = StubEnvironments::default();
    let rules = StubRules::default();
    let mut cache = LayerCache::new();
    let mut ctx = ResolveContext::new(&source, &environments, &rules, &mut cache);

    let layer = ConfigLayer::new(
        &mut ctx,
        None,
        &config(json!({"extends": "preset", "plugins": ["two", "three"]})),
        None,
        None,
    )
    .unwrap();

    assert_eq!(layer.raw().plugins, vec!["one", "two", "two", "three"]);
}

#[test]
fn layer_declaring_nothing_of_its_own_is_empty() {
    let source = StubSource::new(vec![("preset", json!({"rules": {"x": 1}}))]);
    let environments = StubEnvironments::default();
    let rules = StubRules::default();
    let mut cache = LayerCache::new();
    let mut ctx = ResolveContext::new(&source, &environments, &rules, &mut cache);

    let inherited_only =
        ConfigLayer::new(&mut ctx, None, &config(json!({"extends": "preset"})), None, None)
            .unwrap();
    let declaring =
        ConfigLayer::new(&mut ctx, None, &config(json!({"rules": {"x": 1}})), None, None)
            .unwrap();

    assert!(inherited_only.is_empty());
    assert!(!declaring.is_empty());
}

#[test]
fn shared_extends_target_is_constructed_once() {
    let source = StubSource::new(vec![
        ("shared", json!({"rules": {"x": 1}})),
        ("a", json!({"extends": "shared"})),
        ("b", json!({"extends": "shared"})),
    ]);
    let environments = StubEnvironments::default();
    let rules = StubRules::default();
    let mut cache = LayerCache::new();
    let mut ctx = ResolveContext::new(&source, &environments, &rules, &mut cache);

    ConfigLayer::new(&mut ctx, None, &config(json!({"extends": ["a", "b"]})), None, None)
        .unwrap();

    assert_eq!(ctx.cache.len(), 3);
}
