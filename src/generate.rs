//! Generation orchestrator.
//!
//! A run is: precondition check, optional clean of the output directory,
//! source discovery, then one independent unit of work per file
//! (read → [`generate_dts`] → write). Only the precondition, the clean and
//! discovery can abort a run; a file that fails to read or write is recorded
//! in the [`GenerationReport`] and the run moves on.

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::config::DtsConfig;
use crate::env::GenerationEnv;
use crate::errors::GenerationError;
use crate::extraction::{generate_dts, ExtractOptions};
use crate::io::traits::FileSystem;

/// Outcome of a whole run, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    /// Declaration files written.
    pub written: Vec<PathBuf>,
    /// Sources with nothing to declare.
    pub skipped: Vec<PathBuf>,
    /// Sources whose read or write failed.
    pub failed: Vec<(PathBuf, GenerationError)>,
}

impl GenerationReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn processed(&self) -> usize {
        self.written.len() + self.skipped.len() + self.failed.len()
    }

    fn record(&mut self, source: PathBuf, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Written(output) => self.written.push(output),
            FileOutcome::Skipped => self.skipped.push(source),
            FileOutcome::Failed(err) => self.failed.push((source, err)),
        }
    }
}

/// Result of processing one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Written(PathBuf),
    Skipped,
    Failed(GenerationError),
}

/// Run generation for the environment's configuration.
pub fn generate_declarations<E: GenerationEnv>(env: &E) -> Result<GenerationReport, GenerationError> {
    let config = env.config();
    info!(
        "Generating declarations from {} into {}",
        config.root.display(),
        config.outdir.display()
    );

    env.check_isolated_declarations()?;

    if config.clean {
        info!("Cleaning output directory {}", config.outdir.display());
        env.file_system().remove_dir_all(&config.outdir)?;
    }

    let files = env.discover_sources()?;
    info!("Found {} TypeScript files", files.len());

    let outcomes = process_files(env.file_system(), config, &files);

    let mut report = GenerationReport::default();
    for (source, outcome) in files.into_iter().zip(outcomes) {
        report.record(source, outcome);
    }
    Ok(report)
}

fn process_files(fs: &dyn FileSystem, config: &DtsConfig, files: &[PathBuf]) -> Vec<FileOutcome> {
    let options = config.extract_options();
    if config.parallel {
        files
            .par_iter()
            .map(|file| generate_file(fs, config, &options, file))
            .collect()
    } else {
        files
            .iter()
            .map(|file| generate_file(fs, config, &options, file))
            .collect()
    }
}

/// Process one source file: read, extract, write the mirrored declaration.
pub fn generate_file(
    fs: &dyn FileSystem,
    config: &DtsConfig,
    options: &ExtractOptions,
    file: &Path,
) -> FileOutcome {
    debug!("Processing {}", file.display());

    let dts = match extract_declarations(fs, file, options) {
        Ok(dts) => dts,
        Err(e) => {
            error!("{}", e);
            return FileOutcome::Failed(e);
        }
    };

    if dts.is_empty() {
        warn!("No declarations extracted for {}", file.display());
        return FileOutcome::Skipped;
    }

    let output = output_path(&config.root, &config.outdir, file);
    match fs.write(&output, &dts) {
        Ok(()) => {
            info!("Generated {}", output.display());
            FileOutcome::Written(output)
        }
        Err(e) => {
            error!("{}", e);
            FileOutcome::Failed(e)
        }
    }
}

/// Declaration text for one file. Empty means nothing to declare.
pub fn extract_declarations(
    fs: &dyn FileSystem,
    file: &Path,
    options: &ExtractOptions,
) -> Result<String, GenerationError> {
    let source = fs.read_to_string(file)?;
    Ok(generate_dts(&source, options))
}

/// Where the declaration for `file` goes: its position relative to `root`,
/// under `outdir`, with a declaration extension. Files outside `root` land
/// directly in `outdir`.
pub fn output_path(root: &Path, outdir: &Path, file: &Path) -> PathBuf {
    let relative = file
        .strip_prefix(root)
        .map(Path::to_path_buf)
        .ok()
        .or_else(|| pathdiff::diff_paths(file, root))
        .filter(|rel| !rel.starts_with(".."))
        .or_else(|| file.file_name().map(PathBuf::from))
        .unwrap_or_default();

    let mut output = outdir.join(relative);
    let declaration_name = output
        .file_name()
        .map(|name| declaration_file_name(&name.to_string_lossy()));
    if let Some(name) = declaration_name {
        output.set_file_name(name);
    }
    output
}

/// `index.ts` → `index.d.ts`, `esm.mts` → `esm.d.mts`, `cjs.cts` → `cjs.d.cts`.
pub fn declaration_file_name(name: &str) -> String {
    let (stem, extension) = match name.rsplit_once('.') {
        Some((stem, ext)) => (stem, ext),
        None => return format!("{}.d.ts", name),
    };
    let extension = match extension {
        "mts" => "d.mts",
        "cts" => "d.cts",
        _ => "d.ts",
    };
    format!("{}.{}", stem, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::DtsTestEnv;
    use pretty_assertions::assert_eq;

    fn enabled_env() -> DtsTestEnv {
        DtsTestEnv::new().with_isolated_declarations()
    }

    #[test]
    fn test_declaration_file_name() {
        assert_eq!(declaration_file_name("index.ts"), "index.d.ts");
        assert_eq!(declaration_file_name("view.tsx"), "view.d.ts");
        assert_eq!(declaration_file_name("esm.mts"), "esm.d.mts");
        assert_eq!(declaration_file_name("cjs.cts"), "cjs.d.cts");
        assert_eq!(declaration_file_name("a.b.ts"), "a.b.d.ts");
    }

    #[test]
    fn test_output_path_mirrors_root() {
        assert_eq!(
            output_path(Path::new("./src"), Path::new("./dist/types"), Path::new("./src/api/client.ts")),
            PathBuf::from("./dist/types/api/client.d.ts")
        );
    }

    #[test]
    fn test_output_path_outside_root_uses_file_name() {
        assert_eq!(
            output_path(Path::new("/project/src"), Path::new("/out"), Path::new("/elsewhere/lib.ts")),
            PathBuf::from("/out/lib.d.ts")
        );
    }

    #[test]
    fn test_writes_mirrored_declarations() {
        let env = enabled_env()
            .with_file("./src/index.ts", "export const version = '1.0'\n")
            .with_file("./src/util/math.ts", "export function add(a: number, b: number = 1): number {\n  return a + b\n}\n");

        let report = generate_declarations(&env).unwrap();

        assert_eq!(
            report.written,
            vec![
                PathBuf::from("./dist/types/index.d.ts"),
                PathBuf::from("./dist/types/util/math.d.ts"),
            ]
        );
        assert_eq!(
            env.fs().file("./dist/types/util/math.d.ts").as_deref(),
            Some("export declare function add(a: number, b: number): number;\n")
        );
    }

    #[test]
    fn test_file_without_exports_is_skipped() {
        let env = enabled_env().with_file("./src/internal.ts", "const x = 1\n");

        let report = generate_declarations(&env).unwrap();

        assert!(report.written.is_empty());
        assert_eq!(report.skipped, vec![PathBuf::from("./src/internal.ts")]);
        assert!(!env.fs().has_file("./dist/types/internal.d.ts"));
    }

    #[test]
    fn test_precondition_failure_writes_nothing() {
        let env = DtsTestEnv::new()
            .with_file("./dist/types/stale.d.ts", "stale")
            .with_file("./src/index.ts", "export const a = 1\n");

        let err = generate_declarations(&env).unwrap_err();

        assert!(matches!(err, GenerationError::Precondition { .. }));
        assert!(env.fs().has_file("./dist/types/stale.d.ts"));
        assert!(!env.fs().has_file("./dist/types/index.d.ts"));
    }

    #[test]
    fn test_clean_removes_stale_output() {
        let env = enabled_env()
            .with_file("./dist/types/stale.d.ts", "stale")
            .with_file("./src/index.ts", "export const a = 1\n");

        generate_declarations(&env).unwrap();

        assert!(!env.fs().has_file("./dist/types/stale.d.ts"));
        assert!(env.fs().has_file("./dist/types/index.d.ts"));
    }

    #[test]
    fn test_without_clean_stale_output_survives() {
        let env = DtsTestEnv::new()
            .with_config(DtsConfig {
                clean: false,
                ..Default::default()
            })
            .with_isolated_declarations()
            .with_file("./dist/types/stale.d.ts", "stale")
            .with_file("./src/index.ts", "export const a = 1\n");

        generate_declarations(&env).unwrap();

        assert!(env.fs().has_file("./dist/types/stale.d.ts"));
    }

    #[test]
    fn test_write_failure_is_recorded_and_run_continues() {
        let env = enabled_env()
            .with_file("./src/a.ts", "export const a = 1\n")
            .with_file("./src/b.ts", "export const b = 2\n")
            .with_read_only("./dist/types/a.d.ts");

        let report = generate_declarations(&env).unwrap();

        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, PathBuf::from("./src/a.ts"));
        assert_eq!(report.written, vec![PathBuf::from("./dist/types/b.d.ts")]);
        assert!(!report.is_success());
        assert_eq!(report.processed(), 2);
    }

    #[test]
    fn test_parallel_run_preserves_order() {
        let config = DtsConfig {
            parallel: true,
            ..Default::default()
        };
        let mut env = DtsTestEnv::new().with_config(config).with_isolated_declarations();
        for i in 0..20 {
            env = env.with_file(format!("./src/m{:02}.ts", i), format!("export const v{} = {}\n", i, i));
        }

        let report = generate_declarations(&env).unwrap();

        let expected: Vec<PathBuf> = (0..20)
            .map(|i| PathBuf::from(format!("./dist/types/m{:02}.d.ts", i)))
            .collect();
        assert_eq!(report.written, expected);
    }

    #[test]
    fn test_generation_is_idempotent() {
        let env = enabled_env().with_file(
            "./src/index.ts",
            "import { Item } from './item'\nexport function first(items: Item[]): Item | undefined {\n  return items[0]\n}\n",
        );

        generate_declarations(&env).unwrap();
        let first = env.fs().file("./dist/types/index.d.ts");
        generate_declarations(&env).unwrap();

        assert_eq!(env.fs().file("./dist/types/index.d.ts"), first);
    }
}
