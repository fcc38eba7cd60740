//! Error types for declaration generation.
//!
//! Errors are categorized so the orchestrator can decide their blast radius:
//!
//! - `Io`: read or write failure on one file. Recorded, the run continues.
//! - `Precondition`: the host project does not emit isolated declarations.
//!   Aborts the run before anything is written.
//! - `Walk`: the input root could not be enumerated.
//! - `Config`: invalid configuration value.
//!
//! Unrecognized declaration shapes are not errors at all; the classifier
//! drops them.
//!
//! # Example
//!
//! ```rust
//! use dtsgen::errors::GenerationError;
//!
//! let err = GenerationError::io_with_path("Failed to read file: denied", "src/index.ts");
//! assert!(err.is_per_file());
//! assert!(err.to_string().contains("src/index.ts"));
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// File system I/O errors (read, write, remove)
    #[error("{message} ({})", .path.display())]
    Io { message: String, path: PathBuf },

    /// Isolated declaration emission is not enabled for the host project
    #[error("isolatedDeclarations must be enabled in {}: {reason}", .tsconfig.display())]
    Precondition { tsconfig: PathBuf, reason: String },

    /// Input directory enumeration failed
    #[error("Failed to walk directory '{}': {message}", .root.display())]
    Walk { root: PathBuf, message: String },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl GenerationError {
    /// Create an I/O error with a message and path context.
    pub fn io_with_path(message: impl Into<String>, path: impl AsRef<Path>) -> Self {
        Self::Io {
            message: message.into(),
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn precondition(tsconfig: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::Precondition {
            tsconfig: tsconfig.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn walk(root: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Walk {
            root: root.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether the error only affects the file it happened on.
    pub fn is_per_file(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Path the error refers to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Precondition { tsconfig, .. } => Some(tsconfig),
            Self::Walk { root, .. } => Some(root),
            Self::Config(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display_includes_path() {
        let err = GenerationError::io_with_path("Failed to write file: disk full", "out/a.d.ts");
        assert_eq!(err.to_string(), "Failed to write file: disk full (out/a.d.ts)");
        assert_eq!(err.path(), Some(Path::new("out/a.d.ts")));
    }

    #[test]
    fn test_precondition_is_run_level() {
        let err = GenerationError::precondition("tsconfig.json", "option is false");
        assert!(!err.is_per_file());
        assert_eq!(
            err.to_string(),
            "isolatedDeclarations must be enabled in tsconfig.json: option is false"
        );
    }

    #[test]
    fn test_config_error_has_no_path() {
        let err = GenerationError::config("outdir is empty");
        assert_eq!(err.path(), None);
        assert_eq!(err.to_string(), "Invalid configuration: outdir is empty");
    }
}
