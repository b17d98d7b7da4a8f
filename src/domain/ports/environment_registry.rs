//! EnvironmentRegistry port
//!
//! Supplies the `ecmaFeatures`/`globals` an enabled environment contributes.
//! Names the registry does not know contribute nothing; that is not an error.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentDef {
    pub ecma_features: BTreeMap<String, bool>,
    pub globals: BTreeMap<String, bool>,
}

impl EnvironmentDef {
    pub fn with_ecma_features<'a, I>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        self.ecma_features
            .extend(features.into_iter().map(|(k, v)| (k.to_string(), v)));
        self
    }

    pub fn with_globals<'a, I>(mut self, globals: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        self.globals
            .extend(globals.into_iter().map(|(k, v)| (k.to_string(), v)));
        self
    }
}

pub trait EnvironmentRegistry {
    fn lookup(&self, name: &str) -> Option<&EnvironmentDef>;
}
