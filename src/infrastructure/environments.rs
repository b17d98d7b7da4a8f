//! Builtin environment registry
//!
//! The stock environments and the `ecmaFeatures`/`globals` each one
//! contributes while enabled. The tables are intentionally small; host
//! applications can supply their own `EnvironmentRegistry` instead.

use std::collections::BTreeMap;

use crate::domain::ports::{EnvironmentDef, EnvironmentRegistry};

#[derive(Debug, Clone)]
pub struct BuiltinEnvironments {
    defs: BTreeMap<String, EnvironmentDef>,
}

impl Default for BuiltinEnvironments {
    fn default() -> Self {
        Self::new()
    }
}

impl BuiltinEnvironments {
    pub fn new() -> Self {
        let mut defs = BTreeMap::new();

        defs.insert(
            "browser".to_string(),
            EnvironmentDef::default().with_globals(enabled(&[
                "window",
                "document",
                "navigator",
                "location",
                "history",
                "console",
                "alert",
                "setTimeout",
                "setInterval",
                "clearTimeout",
                "clearInterval",
                "localStorage",
                "sessionStorage",
                "XMLHttpRequest",
                "fetch",
            ])),
        );

        defs.insert(
            "node".to_string(),
            EnvironmentDef::default()
                .with_ecma_features([("globalReturn", true)])
                .with_globals(enabled(&[
                    "process",
                    "require",
                    "module",
                    "exports",
                    "__dirname",
                    "__filename",
                    "Buffer",
                    "global",
                    "console",
                ])),
        );

        defs.insert(
            "commonjs".to_string(),
            EnvironmentDef::default()
                .with_ecma_features([("globalReturn", true)])
                .with_globals(enabled(&["require", "module", "exports"])),
        );

        defs.insert(
            "worker".to_string(),
            EnvironmentDef::default().with_globals(enabled(&[
                "self",
                "postMessage",
                "importScripts",
            ])),
        );

        defs.insert(
            "amd".to_string(),
            EnvironmentDef::default().with_globals(enabled(&["define", "require"])),
        );

        defs.insert(
            "mocha".to_string(),
            EnvironmentDef::default().with_globals(enabled(&[
                "describe",
                "it",
                "before",
                "after",
                "beforeEach",
                "afterEach",
            ])),
        );

        defs.insert(
            "jasmine".to_string(),
            EnvironmentDef::default().with_globals(enabled(&[
                "describe",
                "it",
                "expect",
                "beforeEach",
                "afterEach",
                "spyOn",
            ])),
        );

        defs.insert(
            "shelljs".to_string(),
            EnvironmentDef::default().with_globals(enabled(&[
                "cat", "cd", "chmod", "cp", "dirs", "echo", "exec", "exit", "find", "grep",
                "ls", "ln", "mkdir", "mv", "popd", "pushd", "pwd", "rm", "sed", "target",
                "tempdir", "test", "which",
            ])),
        );

        defs.insert(
            "es6".to_string(),
            EnvironmentDef::default().with_ecma_features([
                ("arrowFunctions", true),
                ("blockBindings", true),
                ("classes", true),
                ("destructuring", true),
                ("generators", true),
                ("templateStrings", true),
                ("forOf", true),
            ]),
        );

        Self { defs }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.defs.keys().map(String::as_str)
    }
}

impl EnvironmentRegistry for BuiltinEnvironments {
    fn lookup(&self, name: &str) -> Option<&EnvironmentDef> {
        self.defs.get(name)
    }
}

fn enabled<'a>(names: &'a [&'a str]) -> impl Iterator<Item = (&'a str, bool)> {
    names.iter().map(|name| (*name, true))
}
