//! Filesystem config source
//!
//! Loads `.lintrc.json` / `.lintrc.toml` files, resolves relative extends
//! references against the referencing file's directory, and serves the
//! reserved `eslint:recommended` / `eslint:all` presets by filtering the
//! rule registry. Also provides the directory-hierarchy walk that cascades
//! every config between the filesystem root and a target file.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::debug;

use crate::domain::entities::{EffectiveConfig, LayerConfig};
use crate::domain::ports::{ConfigSource, ExtendsError, RuleRegistry};
use crate::domain::services::resolver::ResolveContext;

pub const RECOMMENDED_PRESET: &str = "eslint:recommended";
pub const ALL_PRESET: &str = "eslint:all";

/// Config file names probed per directory, in preference order.
pub const CONFIG_FILE_NAMES: &[&str] = &[".lintrc.json", ".lintrc.toml"];

pub struct FsConfigSource<'r> {
    rules: &'r dyn RuleRegistry,
}

impl<'r> FsConfigSource<'r> {
    pub fn new(rules: &'r dyn RuleRegistry) -> Self {
        Self { rules }
    }

    fn reserved_config(&self, name: &str) -> Option<LayerConfig> {
        let keep_deprecated = match name {
            RECOMMENDED_PRESET => false,
            ALL_PRESET => true,
            _ => return None,
        };

        let mut config = LayerConfig::default();
        for (rule_id, meta) in self.rules.rule_metas() {
            let selected = if keep_deprecated {
                !meta.deprecated
            } else {
                meta.recommended
            };
            if selected {
                config.rules.insert(rule_id, meta.default_entry);
            }
        }
        Some(config)
    }
}

impl ConfigSource for FsConfigSource<'_> {
    fn locate(&self, reference: &str, from: Option<&Path>) -> Result<String, ExtendsError> {
        if reference == RECOMMENDED_PRESET || reference == ALL_PRESET {
            return Ok(reference.to_string());
        }

        let path = Path::new(reference);
        let resolved = if path.is_absolute() {
            path.to_path_buf()
        } else {
            match from.and_then(Path::parent) {
                Some(dir) => dir.join(path),
                None => path.to_path_buf(),
            }
        };

        let canonical = resolved
            .canonicalize()
            .map_err(|_| ExtendsError::NotFound {
                reference: reference.to_string(),
            })?;
        Ok(canonical.to_string_lossy().into_owned())
    }

    fn read(&self, key: &str) -> Result<LayerConfig, ExtendsError> {
        if let Some(config) = self.reserved_config(key) {
            debug!(preset = key, rules = config.rules.len(), "built preset config");
            return Ok(config);
        }
        load_config_file(Path::new(key))
    }
}

/// Parse one config file by extension.
pub fn load_config_file(path: &Path) -> Result<LayerConfig, ExtendsError> {
    let content = fs::read_to_string(path).map_err(|err| ExtendsError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;

    let extension = path.extension().and_then(|ext| ext.to_str());
    let config: LayerConfig = match extension {
        Some("json") => serde_json::from_str(&content).map_err(|err| ExtendsError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?,
        Some("toml") => toml::from_str(&content).map_err(|err| ExtendsError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?,
        _ => {
            return Err(ExtendsError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    debug!(path = %path.display(), "loaded config file");
    Ok(config.with_source_path(path.to_path_buf()))
}

fn directory_config(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Resolve the effective configuration for a target path, cascading every
/// config file found between the filesystem root and the target's
/// directory (outermost first, nearest last), then applying the overrides.
pub fn effective_config_for(
    ctx: &mut ResolveContext<'_>,
    target: &Path,
    user_override: Option<LayerConfig>,
    cli_override: Option<LayerConfig>,
) -> Result<Rc<EffectiveConfig>, ExtendsError> {
    let start = if target.is_dir() {
        target
    } else {
        target.parent().unwrap_or(Path::new("."))
    };

    let mut directories: Vec<&Path> = start.ancestors().collect();
    directories.reverse();

    let mut parent = None;
    for dir in directories {
        let Some(config_path) = directory_config(dir) else {
            continue;
        };
        let config = load_config_file(&config_path)?;
        let layer = ctx.build(parent.as_ref(), &config, None, None)?;
        parent = Some(layer);
    }

    let top = ctx.build(parent.as_ref(), &LayerConfig::default(), user_override, cli_override)?;
    top.effective(ctx)
}
