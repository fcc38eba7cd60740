use std::fs;
use std::path::{Path, PathBuf};

use super::core::DtsConfig;
use crate::errors::GenerationError;

pub const CONFIG_FILE_NAME: &str = ".dtsgen.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Pure function to parse config from a TOML string
pub fn parse_config(contents: &str) -> Result<DtsConfig, String> {
    toml::from_str::<DtsConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))
}

/// Load an explicitly requested config file. Unlike the directory search,
/// a missing or invalid file is an error.
pub fn load_config_from(path: &Path) -> Result<DtsConfig, GenerationError> {
    let contents = fs::read_to_string(path).map_err(|e| {
        GenerationError::io_with_path(format!("Failed to read config file: {}", e), path)
    })?;
    let config = parse_config(&contents).map_err(GenerationError::config)?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

fn try_load_config_from_path(config_path: &Path) -> Option<DtsConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            // Only log actual errors, not "file not found"
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    "Failed to read config file {}: {}",
                    config_path.display(),
                    e
                );
            }
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            tracing::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            tracing::warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for `.dtsgen.toml`.
pub fn load_config_near(start: PathBuf) -> DtsConfig {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            tracing::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            DtsConfig::default()
        })
}

pub fn load_config() -> DtsConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_near(dir),
        Err(e) => {
            tracing::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            DtsConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_directory_ancestors_stops_at_depth() {
        let dirs: Vec<PathBuf> = directory_ancestors(PathBuf::from("/a/b/c/d"), 2).collect();
        assert_eq!(dirs, vec![PathBuf::from("/a/b/c/d"), PathBuf::from("/a/b/c")]);
    }

    #[test]
    fn test_config_found_in_ancestor() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "outdir = \"types\"\n").unwrap();
        let nested = temp.path().join("packages/web");
        fs::create_dir_all(&nested).unwrap();

        let config = load_config_near(nested);

        assert_eq!(config.outdir, PathBuf::from("types"));
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "clean = \"yes\"\n").unwrap();

        let config = load_config_near(temp.path().to_path_buf());

        assert_eq!(config, DtsConfig::default());
    }

    #[test]
    fn test_explicit_config_errors_are_reported() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.toml");
        assert!(matches!(
            load_config_from(&missing),
            Err(GenerationError::Io { .. })
        ));

        let invalid = temp.path().join("invalid.toml");
        fs::write(&invalid, "entrypoints = 3\n").unwrap();
        assert!(matches!(
            load_config_from(&invalid),
            Err(GenerationError::Config(_))
        ));
    }
}
