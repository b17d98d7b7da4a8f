//! Domain Ports (Interfaces)
//!
//! Trait seams for the external collaborators of the cascade core.
//! Infrastructure provides the concrete implementations.

pub mod config_source;
pub mod environment_registry;
pub mod path_matcher;
pub mod rule_registry;

pub use config_source::{ConfigSource, ExtendsError};
pub use environment_registry::{EnvironmentDef, EnvironmentRegistry};
pub use path_matcher::{PathMatcher, PatternError};
pub use rule_registry::{RuleMeta, RuleRegistry};
