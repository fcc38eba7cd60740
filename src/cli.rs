use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::ConfigOverrides;
use crate::extraction::FallbackType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FallbackArg {
    /// Emit `any` for values that cannot be inferred (default)
    Any,
    /// Emit `string` for values that cannot be inferred
    String,
}

impl From<FallbackArg> for FallbackType {
    fn from(arg: FallbackArg) -> Self {
        match arg {
            FallbackArg::Any => FallbackType::Any,
            FallbackArg::String => FallbackType::String,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "dtsgen")]
#[command(about = "TypeScript declaration file generator for isolated declarations", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate declaration files for every entrypoint under the root
    Generate {
        /// Directory containing the sources
        #[arg(long)]
        root: Option<PathBuf>,

        /// Directory receiving the declaration files
        #[arg(short, long)]
        outdir: Option<PathBuf>,

        /// Remove the output directory before generating
        #[arg(long, conflicts_with = "no_clean")]
        clean: bool,

        /// Keep existing files in the output directory
        #[arg(long = "no-clean")]
        no_clean: bool,

        /// Entrypoint globs relative to the root (comma-separated)
        #[arg(long, value_delimiter = ',')]
        entrypoints: Option<Vec<String>>,

        /// tsconfig.json checked for isolatedDeclarations
        #[arg(long)]
        tsconfig: Option<PathBuf>,

        /// Type emitted when a value cannot be inferred
        #[arg(long = "fallback-type", value_enum)]
        fallback_type: Option<FallbackArg>,

        /// Do not carry doc comments onto declarations
        #[arg(long = "no-comments")]
        no_comments: bool,

        /// Process files in parallel
        #[arg(long)]
        parallel: bool,

        /// Configuration file (defaults to the nearest .dtsgen.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Print the declarations of a single file to stdout
    Emit {
        /// Source file
        file: PathBuf,

        /// Type emitted when a value cannot be inferred
        #[arg(long = "fallback-type", value_enum)]
        fallback_type: Option<FallbackArg>,

        /// Do not carry doc comments onto declarations
        #[arg(long = "no-comments")]
        no_comments: bool,

        /// Configuration file (defaults to the nearest .dtsgen.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Initialize a .dtsgen.toml configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

/// Pure function to turn paired on/off flags into an override.
pub fn flag_override(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

#[allow(clippy::too_many_arguments)]
pub fn build_overrides(
    root: Option<PathBuf>,
    outdir: Option<PathBuf>,
    clean: bool,
    no_clean: bool,
    entrypoints: Option<Vec<String>>,
    tsconfig: Option<PathBuf>,
    fallback_type: Option<FallbackArg>,
    no_comments: bool,
    parallel: bool,
) -> ConfigOverrides {
    ConfigOverrides {
        root,
        outdir,
        clean: flag_override(clean, no_clean),
        entrypoints,
        tsconfig_path: tsconfig,
        keep_comments: no_comments.then_some(false),
        fallback_type: fallback_type.map(FallbackType::from),
        parallel: parallel.then_some(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_flags_parse() {
        let cli = Cli::parse_from([
            "dtsgen",
            "generate",
            "--root",
            "lib",
            "--no-clean",
            "--entrypoints",
            "index.ts,api/**/*.ts",
            "--fallback-type",
            "string",
            "-vv",
        ]);
        match cli.command {
            Commands::Generate {
                root,
                no_clean,
                entrypoints,
                fallback_type,
                verbosity,
                ..
            } => {
                assert_eq!(root, Some(PathBuf::from("lib")));
                assert!(no_clean);
                assert_eq!(
                    entrypoints,
                    Some(vec!["index.ts".to_string(), "api/**/*.ts".to_string()])
                );
                assert_eq!(fallback_type, Some(FallbackArg::String));
                assert_eq!(verbosity, 2);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_clean_flags_conflict() {
        assert!(Cli::try_parse_from(["dtsgen", "generate", "--clean", "--no-clean"]).is_err());
    }

    #[test]
    fn test_flag_override() {
        assert_eq!(flag_override(true, false), Some(true));
        assert_eq!(flag_override(false, true), Some(false));
        assert_eq!(flag_override(false, false), None);
    }

    #[test]
    fn test_unset_flags_do_not_override() {
        let overrides = build_overrides(None, None, false, false, None, None, None, false, false);
        assert_eq!(overrides, ConfigOverrides::default());
    }
}
