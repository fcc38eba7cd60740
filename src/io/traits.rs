//! I/O trait definitions for declaration generation.
//!
//! The orchestrator never touches `std::fs` directly. Everything it needs
//! from the disk goes through [`FileSystem`], so the generation loop can run
//! against an in-memory tree in tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use dtsgen::io::traits::FileSystem;
//!
//! fn declare<F: FileSystem>(fs: &F, path: &Path) -> Result<String, GenerationError> {
//!     let source = fs.read_to_string(path)?;
//!     Ok(generate_dts(&source, &ExtractOptions::default()))
//! }
//! ```

use crate::errors::GenerationError;
use std::path::Path;

/// File system operations trait.
///
/// Implementations must be thread-safe (`Send + Sync`): files are processed
/// on the rayon pool when parallel generation is enabled.
pub trait FileSystem: Send + Sync {
    /// Read a file's contents as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Io` if the file is missing, unreadable or
    /// not valid UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String, GenerationError>;

    /// Write content to a file, creating it and any missing parent
    /// directories. Existing content is replaced.
    fn write(&self, path: &Path, content: &str) -> Result<(), GenerationError>;

    /// Recursively remove a directory. A directory that does not exist is
    /// not an error.
    fn remove_dir_all(&self, path: &Path) -> Result<(), GenerationError>;

    /// Check if a path exists (file or directory).
    fn exists(&self, path: &Path) -> bool;
}
