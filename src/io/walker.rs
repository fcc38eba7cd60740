use crate::errors::GenerationError;
use glob::{MatchOptions, Pattern};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

const SOURCE_EXTENSIONS: [&str; 4] = ["ts", "tsx", "mts", "cts"];
const DECLARATION_SUFFIXES: [&str; 3] = [".d.ts", ".d.mts", ".d.cts"];
const SKIPPED_DIRS: [&str; 1] = ["node_modules"];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Discovers the TypeScript sources under a root that match the configured
/// entrypoint globs. Globs are matched against the path relative to the root.
pub struct FileWalker {
    root: PathBuf,
    entrypoints: Vec<Pattern>,
}

impl FileWalker {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            entrypoints: vec![],
        }
    }

    pub fn with_entrypoints(mut self, patterns: &[String]) -> Result<Self, GenerationError> {
        self.entrypoints = compile_entrypoints(patterns)?;
        Ok(self)
    }

    /// Matching files, sorted so output order does not depend on the
    /// directory listing order of the platform.
    pub fn walk(&self) -> Result<Vec<PathBuf>, GenerationError> {
        let mut files = Vec::new();
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .filter_entry(|entry| {
                !SKIPPED_DIRS
                    .iter()
                    .any(|dir| entry.file_name() == std::ffi::OsStr::new(dir))
            })
            .build();

        for entry in walker {
            let entry = entry.map_err(|e| GenerationError::walk(&self.root, e.to_string()))?;
            let path = entry.path();

            if path.is_file() && self.should_process(path) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    fn should_process(&self, path: &Path) -> bool {
        if !is_source_file(path) {
            return false;
        }
        match path.strip_prefix(&self.root) {
            Ok(relative) => matches_entrypoints(&self.entrypoints, relative),
            Err(_) => false,
        }
    }
}

pub fn compile_entrypoints(patterns: &[String]) -> Result<Vec<Pattern>, GenerationError> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| {
                GenerationError::config(format!("invalid entrypoint glob '{}': {}", p, e))
            })
        })
        .collect()
}

/// A TypeScript source that declarations can be generated for. Existing
/// declaration files are not sources.
pub fn is_source_file(path: &Path) -> bool {
    let name = match path.file_name() {
        Some(name) => name.to_string_lossy(),
        None => return false,
    };
    if DECLARATION_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
        return false;
    }
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => SOURCE_EXTENSIONS.contains(&ext),
        None => false,
    }
}

pub fn matches_entrypoints(patterns: &[Pattern], relative: &Path) -> bool {
    let relative = relative.to_string_lossy().replace('\\', "/");
    patterns
        .iter()
        .any(|pattern| pattern.matches_with(&relative, MATCH_OPTIONS))
}

pub fn find_source_files(root: &Path, entrypoints: &[String]) -> Result<Vec<PathBuf>, GenerationError> {
    FileWalker::new(root.to_path_buf())
        .with_entrypoints(entrypoints)?
        .walk()
}
