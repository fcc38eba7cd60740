//! Validation with error accumulation for configuration.
//!
//! Every check runs, and all problems are reported together through
//! stillwater's `Validation`, so a user fixes their config in one pass.
//!
//! # Example
//!
//! ```rust
//! use dtsgen::config::validation::validate_config;
//! use dtsgen::config::DtsConfig;
//!
//! let validation = validate_config(DtsConfig::default());
//! assert!(validation.is_success());
//! ```

use std::fmt;

use stillwater::{NonEmptyVec, Validation};

use super::DtsConfig;
use crate::io::absolute_path;

/// One problem with a configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub field: &'static str,
    pub message: String,
}

impl ConfigIssue {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub type ConfigValidation = Validation<DtsConfig, NonEmptyVec<ConfigIssue>>;

/// Validate entire config, accumulating ALL issues.
pub fn validate_config(config: DtsConfig) -> ConfigValidation {
    let issues: Vec<ConfigIssue> = [
        check_paths(&config),
        check_clean_target(&config),
        check_entrypoints(&config),
    ]
    .into_iter()
    .flatten()
    .collect();

    match NonEmptyVec::from_vec(issues) {
        Some(issues) => Validation::Failure(issues),
        None => Validation::Success(config),
    }
}

/// Validate config with a fail-fast `anyhow::Result` API for the commands.
pub fn validate_config_result(config: DtsConfig) -> anyhow::Result<DtsConfig> {
    match validate_config(config) {
        Validation::Success(config) => Ok(config),
        Validation::Failure(issues) => {
            let count = issues.len();
            let messages: Vec<String> = issues.into_iter().map(|i| format!("  - {}", i)).collect();
            anyhow::bail!(
                "Configuration has {} problem(s):\n{}",
                count,
                messages.join("\n")
            )
        }
    }
}

fn check_paths(config: &DtsConfig) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();
    if config.root.as_os_str().is_empty() {
        issues.push(ConfigIssue::new("root", "must not be empty"));
    }
    if config.outdir.as_os_str().is_empty() {
        issues.push(ConfigIssue::new("outdir", "must not be empty"));
    }
    if config.tsconfig_path.as_os_str().is_empty() {
        issues.push(ConfigIssue::new("tsconfig", "must not be empty"));
    }
    issues
}

/// Cleaning an outdir that contains the sources would delete them. Both
/// paths are compared after anchoring at the working directory, so `src`,
/// `./src` and `src/.` name the same directory.
fn check_clean_target(config: &DtsConfig) -> Vec<ConfigIssue> {
    if !config.clean || config.outdir.as_os_str().is_empty() {
        return vec![];
    }
    let outdir = absolute_path(&config.outdir);
    let root = absolute_path(&config.root);
    if root.starts_with(&outdir) {
        vec![ConfigIssue::new(
            "outdir",
            format!(
                "cleaning '{}' would remove the sources under '{}'",
                config.outdir.display(),
                config.root.display()
            ),
        )]
    } else {
        vec![]
    }
}

fn check_entrypoints(config: &DtsConfig) -> Vec<ConfigIssue> {
    if config.entrypoints.is_empty() {
        return vec![ConfigIssue::new("entrypoints", "at least one glob is required")];
    }
    config
        .entrypoints
        .iter()
        .filter_map(|pattern| {
            glob::Pattern::new(pattern)
                .err()
                .map(|e| ConfigIssue::new("entrypoints", format!("invalid glob '{}': {}", pattern, e)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn issues(config: DtsConfig) -> Vec<ConfigIssue> {
        match validate_config(config) {
            Validation::Success(_) => vec![],
            Validation::Failure(issues) => issues.into_iter().collect(),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(DtsConfig::default()).is_success());
    }

    #[test]
    fn test_all_issues_are_accumulated() {
        let config = DtsConfig {
            root: PathBuf::new(),
            outdir: PathBuf::new(),
            entrypoints: vec![],
            ..Default::default()
        };
        let fields: Vec<&str> = issues(config).iter().map(|i| i.field).collect();
        assert_eq!(fields, vec!["root", "outdir", "entrypoints"]);
    }

    #[test]
    fn test_cleaning_source_ancestor_is_rejected() {
        let config = DtsConfig {
            root: PathBuf::from("./src"),
            outdir: PathBuf::from("./"),
            ..Default::default()
        };
        assert_eq!(issues(config.clone()).len(), 1);

        let config = DtsConfig {
            clean: false,
            ..config
        };
        assert!(issues(config).is_empty());
    }

    #[test]
    fn test_clean_target_ignores_current_dir_spelling() {
        let rejected = [("src", "./src"), ("src", "."), ("./src", "src"), ("src/lib", "./src/")];
        for (root, outdir) in rejected {
            let config = DtsConfig {
                root: PathBuf::from(root),
                outdir: PathBuf::from(outdir),
                ..Default::default()
            };
            assert_eq!(issues(config).len(), 1, "root {} outdir {}", root, outdir);
        }
    }

    #[test]
    fn test_clean_target_allows_sibling_outdir() {
        let config = DtsConfig {
            root: PathBuf::from("./src"),
            outdir: PathBuf::from("./src-types"),
            ..Default::default()
        };
        assert!(issues(config).is_empty());

        let config = DtsConfig {
            root: PathBuf::from("src"),
            outdir: PathBuf::from("src/../dist"),
            ..Default::default()
        };
        assert!(issues(config).is_empty());
    }

    #[test]
    fn test_invalid_glob_is_reported() {
        let config = DtsConfig {
            entrypoints: vec!["**/*.ts".to_string(), "[".to_string()],
            ..Default::default()
        };
        let found = issues(config);
        assert_eq!(found.len(), 1);
        assert!(found[0].message.contains("invalid glob '['"));
    }

    #[test]
    fn test_result_api_lists_every_problem() {
        let config = DtsConfig {
            root: PathBuf::new(),
            entrypoints: vec![],
            ..Default::default()
        };
        let err = validate_config_result(config).unwrap_err().to_string();
        assert!(err.contains("2 problem(s)"));
        assert!(err.contains("root: must not be empty"));
        assert!(err.contains("entrypoints: at least one glob is required"));
    }
}
