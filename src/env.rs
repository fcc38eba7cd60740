//! Environment trait and implementations for declaration generation.
//!
//! The orchestrator receives its collaborators through [`GenerationEnv`]:
//! file access, source discovery and the configuration. Production code uses
//! [`RealEnv`]; tests use the in-memory
//! [`DtsTestEnv`](crate::testkit::DtsTestEnv).
//!
//! ```rust,ignore
//! use dtsgen::config::DtsConfig;
//! use dtsgen::env::RealEnv;
//! use dtsgen::generate::generate_declarations;
//!
//! let env = RealEnv::new(DtsConfig::default());
//! let report = generate_declarations(&env)?;
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::DtsConfig;
use crate::errors::GenerationError;
use crate::io::real::RealFileSystem;
use crate::io::traits::FileSystem;
use crate::io::tsconfig;
use crate::io::walker::find_source_files;

/// I/O capabilities needed by a generation run.
///
/// Implementations must be `Send + Sync`; files may be processed on the
/// rayon pool.
pub trait GenerationEnv: Send + Sync {
    /// Access file system operations.
    fn file_system(&self) -> &dyn FileSystem;

    /// Access the generation configuration.
    fn config(&self) -> &DtsConfig;

    /// Source files to process, in output order.
    fn discover_sources(&self) -> Result<Vec<PathBuf>, GenerationError>;

    /// Fails when the host project does not enable isolated declarations.
    fn check_isolated_declarations(&self) -> Result<(), GenerationError> {
        tsconfig::check_isolated_declarations(self.file_system(), &self.config().tsconfig_path)
    }
}

/// Production environment: real disk, `ignore`-based discovery.
#[derive(Clone)]
pub struct RealEnv {
    file_system: Arc<dyn FileSystem>,
    config: DtsConfig,
}

impl RealEnv {
    pub fn new(config: DtsConfig) -> Self {
        Self {
            file_system: Arc::new(RealFileSystem::new()),
            config,
        }
    }

    /// Update the configuration.
    ///
    /// Returns a new environment with the updated config (immutable pattern).
    pub fn with_config(self, config: DtsConfig) -> Self {
        Self { config, ..self }
    }
}

impl GenerationEnv for RealEnv {
    fn file_system(&self) -> &dyn FileSystem {
        &*self.file_system
    }

    fn config(&self) -> &DtsConfig {
        &self.config
    }

    fn discover_sources(&self) -> Result<Vec<PathBuf>, GenerationError> {
        find_source_files(&self.config.root, &self.config.entrypoints)
    }
}

impl Default for RealEnv {
    fn default() -> Self {
        Self::new(DtsConfig::default())
    }
}

impl std::fmt::Debug for RealEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealEnv")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_real_env_discovers_under_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("src");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("index.ts"), "export const a = 1\n").unwrap();
        fs::write(root.join("index.d.ts"), "export declare const a: 1;\n").unwrap();

        let env = RealEnv::new(DtsConfig {
            root: root.clone(),
            ..Default::default()
        });

        assert_eq!(env.discover_sources().unwrap(), vec![root.join("index.ts")]);
    }

    #[test]
    fn test_real_env_precondition_reads_tsconfig() {
        let temp = TempDir::new().unwrap();
        let tsconfig = temp.path().join("tsconfig.json");
        fs::write(&tsconfig, r#"{ "compilerOptions": { "isolatedDeclarations": true } }"#).unwrap();

        let env = RealEnv::default().with_config(DtsConfig {
            tsconfig_path: tsconfig,
            ..Default::default()
        });

        assert!(env.check_isolated_declarations().is_ok());
    }
}
