use anyhow::Result;
use clap::Parser;
use dtsgen::cli::{build_overrides, Cli, Commands};
use dtsgen::commands::emit::{handle_emit, EmitConfig};
use dtsgen::commands::generate::{handle_generate, GenerateConfig};
use dtsgen::config::ConfigOverrides;
use dtsgen::extraction::FallbackType;
use dtsgen::observability::init_logging;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            root,
            outdir,
            clean,
            no_clean,
            entrypoints,
            tsconfig,
            fallback_type,
            no_comments,
            parallel,
            config,
            verbosity,
        } => {
            init_logging(verbosity);
            handle_generate(GenerateConfig {
                config_path: config,
                overrides: build_overrides(
                    root,
                    outdir,
                    clean,
                    no_clean,
                    entrypoints,
                    tsconfig,
                    fallback_type,
                    no_comments,
                    parallel,
                ),
            })
        }
        Commands::Emit {
            file,
            fallback_type,
            no_comments,
            config,
            verbosity,
        } => {
            init_logging(verbosity);
            handle_emit(EmitConfig {
                file,
                config_path: config,
                overrides: ConfigOverrides {
                    keep_comments: no_comments.then_some(false),
                    fallback_type: fallback_type.map(FallbackType::from),
                    ..Default::default()
                },
            })
        }
        Commands::Init { force } => dtsgen::commands::init::init_config(force),
    }
}
