//! Host-project precondition: `compilerOptions.isolatedDeclarations`.
//!
//! Declarations are only sound to emit without a type-checker when the
//! project compiles with isolated declarations, which forces explicit types
//! on everything exported. `tsconfig.json` is JSON with comments and trailing
//! commas, which `json5` accepts. The option may be inherited through an
//! `extends` chain, and the extending config overrides its base.

use crate::errors::GenerationError;
use crate::io::paths::normalize_path;
use crate::io::traits::FileSystem;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTsConfig {
    #[serde(default)]
    extends: Option<String>,
    #[serde(default)]
    compiler_options: RawCompilerOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCompilerOptions {
    #[serde(default)]
    isolated_declarations: Option<bool>,
}

/// Succeeds when the tsconfig at `path` enables isolated declarations.
///
/// A missing or unparsable file, or a broken `extends` chain, fails the
/// check like a disabled option does.
pub fn check_isolated_declarations(fs: &dyn FileSystem, path: &Path) -> Result<(), GenerationError> {
    match isolated_declarations_enabled(fs, path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(GenerationError::precondition(
            path,
            "compilerOptions.isolatedDeclarations is not set to true",
        )),
        Err(reason) => Err(GenerationError::precondition(path, reason)),
    }
}

/// Effective value of the option after following `extends`. `Err` carries a
/// read, parse or resolution failure.
pub fn isolated_declarations_enabled(fs: &dyn FileSystem, path: &Path) -> Result<bool, String> {
    let mut visited = HashSet::new();
    let config = load_raw_config(fs, path, &mut visited)?;
    Ok(config.compiler_options.isolated_declarations.unwrap_or(false))
}

fn parse_tsconfig(text: &str) -> Result<RawTsConfig, String> {
    json5::from_str(text).map_err(|e| format!("failed to parse tsconfig: {}", e))
}

fn load_raw_config(
    fs: &dyn FileSystem,
    path: &Path,
    visited: &mut HashSet<PathBuf>,
) -> Result<RawTsConfig, String> {
    let key = normalize_path(path);
    if !visited.insert(key) {
        return Err(format!(
            "cycle detected while resolving tsconfig extends: {}",
            path.display()
        ));
    }

    let text = fs.read_to_string(path).map_err(|e| e.to_string())?;
    let mut current = parse_tsconfig(&text)
        .map_err(|reason| format!("{} ({})", reason, path.display()))?;

    let Some(extends) = current.extends.take() else {
        return Ok(current);
    };

    let config_dir = path.parent().unwrap_or_else(|| Path::new(""));
    let base_path = resolve_extends_path(fs, config_dir, &extends)?;
    let base = load_raw_config(fs, &base_path, visited)?;
    Ok(merge_raw_configs(base, current))
}

/// Relative and absolute specifiers resolve against the extending config's
/// directory; bare package names are looked up in `node_modules` of each
/// ancestor.
fn resolve_extends_path(fs: &dyn FileSystem, config_dir: &Path, extends: &str) -> Result<PathBuf, String> {
    if extends.starts_with('.') || Path::new(extends).is_absolute() {
        return resolve_extends_file(fs, &normalize_path(&config_dir.join(extends))).ok_or_else(|| {
            format!("extended tsconfig '{}' does not exist", extends)
        });
    }

    config_dir
        .ancestors()
        .find_map(|ancestor| {
            resolve_extends_file(fs, &normalize_path(&ancestor.join("node_modules").join(extends)))
        })
        .ok_or_else(|| {
            format!(
                "failed to resolve tsconfig extends '{}' from '{}'",
                extends,
                config_dir.display()
            )
        })
}

fn resolve_extends_file(fs: &dyn FileSystem, candidate: &Path) -> Option<PathBuf> {
    let mut attempts = vec![candidate.to_path_buf()];
    if candidate.extension().and_then(|ext| ext.to_str()) != Some("json") {
        let mut with_json = candidate.as_os_str().to_owned();
        with_json.push(".json");
        attempts.push(PathBuf::from(with_json));
    }
    attempts.push(candidate.join("tsconfig.json"));

    attempts
        .into_iter()
        .find(|attempt| fs.read_to_string(attempt).is_ok())
}

fn merge_raw_configs(base: RawTsConfig, overlay: RawTsConfig) -> RawTsConfig {
    RawTsConfig {
        extends: None,
        compiler_options: RawCompilerOptions {
            isolated_declarations: overlay
                .compiler_options
                .isolated_declarations
                .or(base.compiler_options.isolated_declarations),
        },
    }
}
