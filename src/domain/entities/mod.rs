//! Domain Entities
//!
//! - `chain` - environment-conditioned value chains
//! - `layer` - the cascading configuration layer and its effective value

pub mod chain;
pub mod layer;

pub use chain::{Chain, ChainLink, FieldChains};
pub use layer::{ConfigLayer, EffectiveConfig, LayerConfig, RawLayerData, DEFAULT_PARSER};
