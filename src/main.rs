//! lintrc CLI entry point
//!
//! Resolves and prints the effective lint configuration for one file.

use anyhow::{Context, Result};
use clap::Parser;

use lintrc::infrastructure::{
    effective_config_for, load_config_file, BuiltinEnvironments, FsConfigSource,
    StaticRuleRegistry,
};
use lintrc::presentation::cli::Cli;
use lintrc::{LayerCache, ResolveContext};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let user_override = match &cli.config {
        Some(path) => Some(
            load_config_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
        ),
        None => None,
    };
    let cli_override = cli.cli_override()?;

    let registry = StaticRuleRegistry::new();
    let environments = BuiltinEnvironments::new();
    let source = FsConfigSource::new(&registry);
    let mut cache = LayerCache::new();
    let mut ctx = ResolveContext::new(&source, &environments, &registry, &mut cache);

    let effective = effective_config_for(&mut ctx, &cli.file, user_override, cli_override)
        .with_context(|| format!("failed to resolve configuration for {}", cli.file.display()))?;

    println!("{}", serde_json::to_string_pretty(effective.as_ref())?);
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
