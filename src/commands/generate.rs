use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{self, ConfigOverrides, DtsConfig};
use crate::env::RealEnv;
use crate::generate::{generate_declarations, GenerationReport};

pub struct GenerateConfig {
    pub config_path: Option<PathBuf>,
    pub overrides: ConfigOverrides,
}

/// Resolve the configuration for one invocation: explicit file or nearest
/// `.dtsgen.toml`, then command-line overrides, then validation.
pub fn resolve_config(config_path: Option<&PathBuf>, overrides: ConfigOverrides) -> Result<DtsConfig> {
    let base = match config_path {
        Some(path) => config::load_config_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => config::load_config(),
    };
    config::validate_config_result(base.with_overrides(overrides))
}

pub fn handle_generate(command: GenerateConfig) -> Result<()> {
    let config = resolve_config(command.config_path.as_ref(), command.overrides)?;
    let env = RealEnv::new(config);

    let report = generate_declarations(&env)?;
    print_summary(&report);

    if !report.is_success() {
        anyhow::bail!(
            "{} file(s) failed to generate",
            report.failed.len()
        );
    }
    Ok(())
}

fn print_summary(report: &GenerationReport) {
    let written = format!("{} written", report.written.len());
    let skipped = format!("{} skipped", report.skipped.len());
    let failed = format!("{} failed", report.failed.len());

    let failed = if report.failed.is_empty() {
        failed.normal()
    } else {
        failed.red().bold()
    };
    eprintln!(
        "{} {}, {}, {}",
        "Declarations:".bold(),
        written.green(),
        skipped.yellow(),
        failed
    );

    for (source, err) in &report.failed {
        eprintln!("  {} {}: {}", "✗".red(), source.display(), err);
    }
}
