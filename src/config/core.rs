use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::extraction::{ExtractOptions, FallbackType};

/// Generation settings, read from `.dtsgen.toml`.
///
/// Every field has a default so a partial file (or none at all) is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DtsConfig {
    /// Directory scanned for sources; output paths mirror it.
    pub root: PathBuf,

    /// Directory that receives the declaration files.
    pub outdir: PathBuf,

    /// Remove `outdir` before generating.
    pub clean: bool,

    /// Globs, relative to `root`, selecting the sources to process.
    pub entrypoints: Vec<String>,

    /// Host project config checked for `isolatedDeclarations`.
    #[serde(rename = "tsconfig")]
    pub tsconfig_path: PathBuf,

    /// Carry doc comments onto the declarations.
    pub keep_comments: bool,

    /// Type used when a value cannot be inferred.
    pub fallback_type: FallbackType,

    /// Process files on the rayon pool.
    pub parallel: bool,
}

impl Default for DtsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./src"),
            outdir: PathBuf::from("./dist/types"),
            clean: true,
            entrypoints: vec!["**/*.ts".to_string()],
            tsconfig_path: PathBuf::from("tsconfig.json"),
            keep_comments: true,
            fallback_type: FallbackType::Any,
            parallel: false,
        }
    }
}

impl DtsConfig {
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions::new(self.fallback_type, self.keep_comments)
    }

    /// Applies command-line values on top of the file configuration.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(root) = overrides.root {
            self.root = root;
        }
        if let Some(outdir) = overrides.outdir {
            self.outdir = outdir;
        }
        if let Some(clean) = overrides.clean {
            self.clean = clean;
        }
        if let Some(entrypoints) = overrides.entrypoints {
            self.entrypoints = entrypoints;
        }
        if let Some(tsconfig) = overrides.tsconfig_path {
            self.tsconfig_path = tsconfig;
        }
        if let Some(keep) = overrides.keep_comments {
            self.keep_comments = keep;
        }
        if let Some(fallback) = overrides.fallback_type {
            self.fallback_type = fallback;
        }
        if let Some(parallel) = overrides.parallel {
            self.parallel = parallel;
        }
        self
    }
}

/// Values given explicitly on the command line. `None` keeps the file value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub root: Option<PathBuf>,
    pub outdir: Option<PathBuf>,
    pub clean: Option<bool>,
    pub entrypoints: Option<Vec<String>>,
    pub tsconfig_path: Option<PathBuf>,
    pub keep_comments: Option<bool>,
    pub fallback_type: Option<FallbackType>,
    pub parallel: Option<bool>,
}
