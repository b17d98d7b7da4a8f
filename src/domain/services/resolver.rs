//! Layer resolution context
//!
//! Bundles the collaborators a cascade resolution needs (config source,
//! environment registry, rule registry) with an explicit per-resolution
//! layer cache. The cache is created by the caller for one top-level
//! resolution request and discarded afterwards; there is no ambient state.

use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;

use tracing::debug;

use crate::domain::entities::{ConfigLayer, LayerConfig};
use crate::domain::ports::{ConfigSource, EnvironmentRegistry, ExtendsError, RuleRegistry};

/// Constructed layers keyed by the source's cache key, so one shared config
/// referenced from several places is built exactly once.
#[derive(Default)]
pub struct LayerCache {
    layers: BTreeMap<String, Rc<ConfigLayer>>,
}

impl LayerCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

pub struct ResolveContext<'a> {
    pub source: &'a dyn ConfigSource,
    pub environments: &'a dyn EnvironmentRegistry,
    pub rules: &'a dyn RuleRegistry,
    pub cache: &'a mut LayerCache,
}

impl<'a> ResolveContext<'a> {
    pub fn new(
        source: &'a dyn ConfigSource,
        environments: &'a dyn EnvironmentRegistry,
        rules: &'a dyn RuleRegistry,
        cache: &'a mut LayerCache,
    ) -> Self {
        Self {
            source,
            environments,
            rules,
            cache,
        }
    }

    /// Load the layer behind an extends reference, constructing and caching
    /// it on first use. The loaded config runs through the same layer
    /// construction recursively, so its own extends chain resolves too.
    pub fn load(
        &mut self,
        reference: &str,
        from: Option<&Path>,
    ) -> Result<Rc<ConfigLayer>, ExtendsError> {
        let key = self.source.locate(reference, from)?;

        if let Some(layer) = self.cache.layers.get(&key) {
            debug!(reference, key = %key, "extends cache hit");
            return Ok(Rc::clone(layer));
        }

        debug!(reference, key = %key, "loading extends target");
        let config = self.source.read(&key)?;
        let layer = Rc::new(ConfigLayer::new(self, None, &config, None, None)?);
        self.cache.layers.insert(key, Rc::clone(&layer));
        Ok(layer)
    }

    /// Construct a layer directly from an already-loaded config.
    pub fn build(
        &mut self,
        parent: Option<&ConfigLayer>,
        config: &LayerConfig,
        user_override: Option<LayerConfig>,
        cli_override: Option<LayerConfig>,
    ) -> Result<ConfigLayer, ExtendsError> {
        ConfigLayer::new(self, parent, config, user_override, cli_override)
    }
}
