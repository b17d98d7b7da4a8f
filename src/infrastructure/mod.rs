//! Infrastructure Layer
//!
//! Concrete implementations of the domain ports: filesystem config loading,
//! the builtin environment table, glob path matching, and an in-memory rule
//! registry.

pub mod environments;
pub mod loader;
pub mod match_paths;
pub mod rules;

pub use environments::BuiltinEnvironments;
pub use loader::{
    effective_config_for, load_config_file, FsConfigSource, ALL_PRESET, CONFIG_FILE_NAMES,
    RECOMMENDED_PRESET,
};
pub use match_paths::GlobMatcher;
pub use rules::StaticRuleRegistry;
