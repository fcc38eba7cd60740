//! Production implementation of [`FileSystem`].
//!
//! ```rust,ignore
//! use dtsgen::io::real::RealFileSystem;
//! use dtsgen::io::traits::FileSystem;
//!
//! let fs = RealFileSystem::new();
//! let content = fs.read_to_string(Path::new("src/index.ts"))?;
//! ```

use crate::errors::GenerationError;
use crate::io::traits::FileSystem;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// File system backed by `std::fs`.
#[derive(Debug, Default, Clone)]
pub struct RealFileSystem;

impl RealFileSystem {
    /// Create a new real file system instance.
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, GenerationError> {
        fs::read_to_string(path)
            .map_err(|e| GenerationError::io_with_path(format!("Failed to read file: {}", e), path))
    }

    fn write(&self, path: &Path, content: &str) -> Result<(), GenerationError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                GenerationError::io_with_path(format!("Failed to create directory: {}", e), parent)
            })?;
        }
        fs::write(path, content)
            .map_err(|e| GenerationError::io_with_path(format!("Failed to write file: {}", e), path))
    }

    fn remove_dir_all(&self, path: &Path) -> Result<(), GenerationError> {
        match fs::remove_dir_all(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(GenerationError::io_with_path(
                format!("Failed to remove directory: {}", e),
                path,
            )),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
