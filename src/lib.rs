// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod env;
pub mod errors;
pub mod extraction;
pub mod generate;
pub mod io;
pub mod observability;
pub mod testkit;

// Re-export commonly used types
pub use crate::config::DtsConfig;
pub use crate::env::{GenerationEnv, RealEnv};
pub use crate::errors::GenerationError;
pub use crate::extraction::{generate_dts, ExtractOptions, FallbackType};
pub use crate::generate::{generate_declarations, FileOutcome, GenerationReport};
