pub mod paths;
pub mod real;
pub mod traits;
pub mod tsconfig;
pub mod walker;

// Re-export I/O traits for convenient access
pub use paths::{absolute_path, normalize_path};
pub use real::RealFileSystem;
pub use traits::FileSystem;
pub use tsconfig::check_isolated_declarations;
pub use walker::{find_source_files, FileWalker};
