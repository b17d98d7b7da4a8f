//! PathMatcher port
//!
//! Decides whether a config record's `files`/`ignores` patterns apply to a
//! file path. The caller uses it to pre-filter records before handing them
//! to `merge_schema::reduce`.

use std::path::Path;

pub trait PathMatcher {
    /// `true` when `path` matches at least one `files` pattern and no
    /// `ignores` pattern. An empty `files` list matches every path.
    fn matches(
        &self,
        path: &Path,
        files: &[String],
        ignores: &[String],
    ) -> Result<bool, PatternError>;
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid glob pattern '{pattern}': {message}")]
pub struct PatternError {
    pub pattern: String,
    pub message: String,
}
