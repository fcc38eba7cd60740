use crate::config::CONFIG_FILE_NAME;
use crate::io::{FileSystem, RealFileSystem};
use anyhow::Result;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG: &str = r#"# dtsgen configuration

# Directory containing the TypeScript sources
root = "./src"

# Directory receiving the generated declaration files
outdir = "./dist/types"

# Remove outdir before generating
clean = true

# Globs, relative to root, selecting the sources to process
entrypoints = ["**/*.ts"]

# Must enable compilerOptions.isolatedDeclarations
tsconfig = "tsconfig.json"

# Carry doc comments onto declarations
keep_comments = true

# Type emitted for values that cannot be inferred: "any" or "string"
fallback_type = "any"

# Process files in parallel
parallel = false
"#;

pub fn init_config(force: bool) -> Result<()> {
    init_config_in(Path::new("."), force)?;
    println!("Created {} configuration file", CONFIG_FILE_NAME);
    Ok(())
}

pub fn init_config_in(dir: &Path, force: bool) -> Result<PathBuf> {
    let fs = RealFileSystem::new();
    let config_path = dir.join(CONFIG_FILE_NAME);

    if fs.exists(&config_path) && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    fs.write(&config_path, DEFAULT_CONFIG)?;
    Ok(config_path)
}
