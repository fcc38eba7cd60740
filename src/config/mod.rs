mod core;
mod loader;
pub mod validation;

pub use core::{ConfigOverrides, DtsConfig};
pub use loader::{
    directory_ancestors, load_config, load_config_from, load_config_near, parse_config,
    CONFIG_FILE_NAME,
};
pub use validation::{validate_config, validate_config_result, ConfigIssue};
