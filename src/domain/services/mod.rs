//! Domain Services
//!
//! Pure merge logic plus the resolution context that drives layer
//! construction through the ports.

pub mod deep_merge;
pub mod merge_schema;
pub mod resolver;

pub use deep_merge::{deep_merge, merge_rule_values};
pub use merge_schema::{ConfigRecord, SchemaError};
pub use resolver::{LayerCache, ResolveContext};
