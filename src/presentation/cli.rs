//! CLI Argument Parsing
//!
//! Flags mirror the override tiers of the cascade: `--config` supplies the
//! user override record, and `--env`/`--rule`/`--global`/`--parser`/
//! `--plugin` together form the command-line override record that outranks
//! everything else.

use std::path::PathBuf;

use clap::Parser;

use crate::domain::entities::LayerConfig;
use crate::domain::value_objects::RuleEntry;

/// lintrc - cascading lint configuration resolver
#[derive(Parser, Debug)]
#[command(name = "lintrc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// File whose effective configuration to resolve
    pub file: PathBuf,

    /// Extra config file layered over the discovered configs
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Environments to enable (comma-separated or repeated)
    #[arg(long = "env", value_delimiter = ',')]
    pub envs: Vec<String>,

    /// Rule overrides as id=entry, e.g. semi=2 or quotes='[2,"double"]'
    #[arg(long = "rule")]
    pub rules: Vec<String>,

    /// Globals to declare, as name or name:false
    #[arg(long = "global", value_delimiter = ',')]
    pub globals: Vec<String>,

    /// Parser override
    #[arg(long)]
    pub parser: Option<String>,

    /// Plugins to enable (comma-separated or repeated)
    #[arg(long = "plugin", value_delimiter = ',')]
    pub plugins: Vec<String>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TranslateError {
    #[error("invalid --rule '{flag}': expected id=severity-or-entry ({message})")]
    InvalidRule { flag: String, message: String },
}

impl Cli {
    /// Translate the override flags into the command-line override record.
    /// Returns `None` when no override flag was given, so the cascade is
    /// not wrapped needlessly.
    pub fn cli_override(&self) -> Result<Option<LayerConfig>, TranslateError> {
        let mut config = LayerConfig::default();
        let mut any = false;

        if let Some(parser) = &self.parser {
            config.parser = Some(parser.clone());
            any = true;
        }
        if !self.plugins.is_empty() {
            config.plugins = self.plugins.clone();
            any = true;
        }
        for name in &self.envs {
            config.env.insert(name.clone(), true);
            any = true;
        }
        for flag in &self.globals {
            let (name, enabled) = match flag.split_once(':') {
                Some((name, value)) => (name, value != "false"),
                None => (flag.as_str(), true),
            };
            config.globals.insert(name.to_string(), enabled);
            any = true;
        }
        for flag in &self.rules {
            let (rule_id, entry) = parse_rule_flag(flag)?;
            config.rules.insert(rule_id, entry);
            any = true;
        }

        Ok(any.then_some(config))
    }
}

fn parse_rule_flag(flag: &str) -> Result<(String, RuleEntry), TranslateError> {
    let (rule_id, raw) = flag.split_once('=').ok_or_else(|| TranslateError::InvalidRule {
        flag: flag.to_string(),
        message: "missing '='".to_string(),
    })?;

    // The value is JSON; a bare severity name may come unquoted.
    let value: serde_json::Value = serde_json::from_str(raw)
        .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));

    let entry = RuleEntry::try_from(&value).map_err(|err| TranslateError::InvalidRule {
        flag: flag.to_string(),
        message: err.to_string(),
    })?;

    Ok((rule_id.to_string(), entry))
}
