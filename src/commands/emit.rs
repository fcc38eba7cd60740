use anyhow::Result;
use std::path::PathBuf;

use crate::config::ConfigOverrides;
use crate::generate::extract_declarations;
use crate::io::RealFileSystem;

use super::generate::resolve_config;

pub struct EmitConfig {
    pub file: PathBuf,
    pub config_path: Option<PathBuf>,
    pub overrides: ConfigOverrides,
}

/// Print one file's declarations. No precondition check, nothing written.
pub fn handle_emit(command: EmitConfig) -> Result<()> {
    let config = resolve_config(command.config_path.as_ref(), command.overrides)?;
    let dts = extract_declarations(&RealFileSystem::new(), &command.file, &config.extract_options())?;
    if dts.is_empty() {
        tracing::warn!("No declarations extracted for {}", command.file.display());
    }
    print!("{}", dts);
    Ok(())
}
