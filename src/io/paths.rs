use std::path::{Component, Path, PathBuf};

/// Lexically resolves `.` and `..` without touching the disk. A `..` that
/// would climb above a relative start is kept.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(normalized.components().next_back(), Some(Component::Normal(_))) {
                    normalized.pop();
                } else if !normalized.has_root() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// `path` anchored at the working directory, then normalized. When the
/// working directory is unavailable the path is only normalized.
pub fn absolute_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return normalize_path(path);
    }
    match std::env::current_dir() {
        Ok(cwd) => normalize_path(&cwd.join(path)),
        Err(_) => normalize_path(path),
    }
}
