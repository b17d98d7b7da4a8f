//! Glob path matcher
//!
//! `PathMatcher` implementation over `globset`, used to decide which config
//! records apply to a file before schema reduction.

use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::domain::ports::{PathMatcher, PatternError};

#[derive(Debug, Clone, Copy, Default)]
pub struct GlobMatcher;

impl GlobMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl PathMatcher for GlobMatcher {
    fn matches(
        &self,
        path: &Path,
        files: &[String],
        ignores: &[String],
    ) -> Result<bool, PatternError> {
        if !ignores.is_empty() && build_set(ignores)?.is_match(path) {
            return Ok(false);
        }
        if files.is_empty() {
            return Ok(true);
        }
        Ok(build_set(files)?.is_match(path))
    }
}

fn build_set(patterns: &[String]) -> Result<GlobSet, PatternError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|err| PatternError {
            pattern: pattern.clone(),
            message: err.to_string(),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|err| PatternError {
        pattern: patterns.join(", "),
        message: err.to_string(),
    })
}
