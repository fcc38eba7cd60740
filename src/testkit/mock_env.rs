//! In-memory environment for generation tests.
//!
//! [`MemoryFileSystem`] stores files in a sorted map behind
//! `Arc<RwLock<_>>`, so clones share state and the environment can be used
//! from the rayon pool. [`DtsTestEnv`] pairs it with a configuration and
//! discovers sources the same way the real walker filters them.

use crate::config::DtsConfig;
use crate::env::GenerationEnv;
use crate::errors::GenerationError;
use crate::io::traits::FileSystem;
use crate::io::walker::{compile_entrypoints, is_source_file, matches_entrypoints};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Sorted in-memory file tree.
///
/// # Example
///
/// ```rust
/// use dtsgen::io::FileSystem;
/// use dtsgen::testkit::MemoryFileSystem;
///
/// let fs = MemoryFileSystem::new().with_file("src/a.ts", "export const a = 1");
/// assert!(fs.exists("src".as_ref()));
/// assert_eq!(fs.read_to_string("src/a.ts".as_ref()).unwrap(), "export const a = 1");
/// ```
#[derive(Clone, Default)]
pub struct MemoryFileSystem {
    files: Arc<RwLock<BTreeMap<PathBuf, String>>>,
    read_only: Arc<RwLock<BTreeSet<PathBuf>>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to the mock file system.
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.write().insert(path.into(), content.into());
        self
    }

    /// Make writes to `path` fail, to exercise per-file error handling.
    pub fn with_read_only(self, path: impl Into<PathBuf>) -> Self {
        self.read_only.write().insert(path.into());
        self
    }

    /// Content of a file, if present.
    pub fn file(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.read().get(path.as_ref()).cloned()
    }

    /// Check if a file exists in the mock file system.
    pub fn has_file(&self, path: impl AsRef<Path>) -> bool {
        self.files.read().contains_key(path.as_ref())
    }

    /// All file paths, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.read().keys().cloned().collect()
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, GenerationError> {
        self.file(path)
            .ok_or_else(|| GenerationError::io_with_path("Failed to read file: not found", path))
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), GenerationError> {
        if self.read_only.read().contains(path) {
            return Err(GenerationError::io_with_path(
                "Failed to write file: permission denied",
                path,
            ));
        }
        self.files
            .write()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> Result<(), GenerationError> {
        self.files.write().retain(|file, _| !file.starts_with(path));
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.read().keys().any(|file| file.starts_with(path))
    }
}

/// In-memory test environment for generation runs.
///
/// ```rust
/// use dtsgen::generate::generate_declarations;
/// use dtsgen::testkit::DtsTestEnv;
///
/// let env = DtsTestEnv::new()
///     .with_isolated_declarations()
///     .with_file("./src/a.ts", "export const a = 1");
/// let report = generate_declarations(&env).unwrap();
/// assert_eq!(report.written.len(), 1);
/// ```
#[derive(Clone)]
pub struct DtsTestEnv {
    fs: MemoryFileSystem,
    config: DtsConfig,
}

impl DtsTestEnv {
    /// Empty file system with the default configuration.
    pub fn new() -> Self {
        Self {
            fs: MemoryFileSystem::new(),
            config: DtsConfig::default(),
        }
    }

    pub fn with_config(mut self, config: DtsConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.fs = self.fs.with_file(path, content);
        self
    }

    pub fn with_read_only(mut self, path: impl Into<PathBuf>) -> Self {
        self.fs = self.fs.with_read_only(path);
        self
    }

    /// Write a tsconfig that enables isolated declarations at the configured
    /// tsconfig path.
    pub fn with_isolated_declarations(self) -> Self {
        let path = self.config.tsconfig_path.clone();
        self.with_file(
            path,
            r#"{ "compilerOptions": { "isolatedDeclarations": true } }"#,
        )
    }

    pub fn fs(&self) -> &MemoryFileSystem {
        &self.fs
    }
}

impl Default for DtsTestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationEnv for DtsTestEnv {
    fn file_system(&self) -> &dyn FileSystem {
        &self.fs
    }

    fn config(&self) -> &DtsConfig {
        &self.config
    }

    fn discover_sources(&self) -> Result<Vec<PathBuf>, GenerationError> {
        let patterns = compile_entrypoints(&self.config.entrypoints)?;
        let root = &self.config.root;
        Ok(self
            .fs
            .paths()
            .into_iter()
            .filter(|path| is_source_file(path))
            .filter(|path| {
                path.strip_prefix(root)
                    .map(|relative| matches_entrypoints(&patterns, relative))
                    .unwrap_or(false)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_dir_all_only_removes_prefix() {
        let fs = MemoryFileSystem::new()
            .with_file("dist/types/a.d.ts", "")
            .with_file("dist/types/nested/b.d.ts", "")
            .with_file("dist/other.js", "");

        fs.remove_dir_all(Path::new("dist/types")).unwrap();

        assert_eq!(fs.paths(), vec![PathBuf::from("dist/other.js")]);
    }

    #[test]
    fn test_read_only_path_rejects_writes() {
        let fs = MemoryFileSystem::new().with_read_only("locked.d.ts");
        let err = fs.write(Path::new("locked.d.ts"), "x").unwrap_err();
        assert!(err.is_per_file());
        assert!(!fs.has_file("locked.d.ts"));
    }

    #[test]
    fn test_discovery_filters_like_the_walker() {
        let env = DtsTestEnv::new()
            .with_file("./src/b.ts", "")
            .with_file("./src/a.ts", "")
            .with_file("./src/a.d.ts", "")
            .with_file("./src/readme.md", "")
            .with_file("./lib/outside.ts", "");

        assert_eq!(
            env.discover_sources().unwrap(),
            vec![PathBuf::from("./src/a.ts"), PathBuf::from("./src/b.ts")]
        );
    }
}
