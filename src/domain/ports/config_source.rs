//! ConfigSource port
//!
//! Resolves an "extends" reference (a file path or a reserved preset name)
//! to a loadable config. The cascade core never touches the filesystem
//! itself; it asks this port and caches the constructed layers per
//! resolution request (see `services::resolver`).

use std::path::{Path, PathBuf};

use crate::domain::entities::LayerConfig;

pub trait ConfigSource {
    /// Resolve a reference to a stable cache key (for file-backed sources,
    /// the canonical path). `from` is the config file doing the referencing;
    /// relative paths resolve against its directory.
    fn locate(&self, reference: &str, from: Option<&Path>) -> Result<String, ExtendsError>;

    /// Load the declared config behind a previously located key.
    fn read(&self, key: &str) -> Result<LayerConfig, ExtendsError>;
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExtendsError {
    #[error("extends target not found: {reference}")]
    NotFound { reference: String },

    #[error("failed to read {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    #[error("invalid config in {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("unsupported config format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("{inner}\nReferenced from: {}", referenced_from.display())]
    Referenced {
        inner: Box<ExtendsError>,
        referenced_from: PathBuf,
    },
}

impl ExtendsError {
    /// Attach the referencing config's path so a failure deep in an extends
    /// chain stays traceable to the file that requested it.
    pub fn referenced_from(self, path: &Path) -> Self {
        ExtendsError::Referenced {
            inner: Box::new(self),
            referenced_from: path.to_path_buf(),
        }
    }
}
