//! lintrc - cascading lint configuration resolution
//!
//! Resolves the effective lint configuration for a file by cascading every
//! config record that applies to it: directory-hierarchy configs, `extends`
//! targets, reserved presets, environment-contributed values, and the user
//! and command-line overrides.
//!
//! The crate is organised in three layers:
//!
//! - `domain`: the cascade model itself. Configuration layers, persistent
//!   value chains for environment-conditioned values, the rule-entry merge
//!   law, and the declarative merge schema for flat config records.
//! - `infrastructure`: filesystem config loading (JSON and TOML), the
//!   builtin environment table, glob path matching, and the rule registry.
//! - `presentation`: the command-line interface.

pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use domain::entities::{
    ConfigLayer, EffectiveConfig, FieldChains, LayerConfig, RawLayerData, DEFAULT_PARSER,
};
pub use domain::ports::{
    ConfigSource, EnvironmentDef, EnvironmentRegistry, ExtendsError, PathMatcher, PatternError,
    RuleMeta, RuleRegistry,
};
pub use domain::services::merge_schema::{self, ConfigRecord, SchemaError};
pub use domain::services::resolver::{LayerCache, ResolveContext};
pub use domain::value_objects::{RuleEntry, Severity};
pub use infrastructure::{
    effective_config_for, load_config_file, BuiltinEnvironments, FsConfigSource, GlobMatcher,
    StaticRuleRegistry,
};
