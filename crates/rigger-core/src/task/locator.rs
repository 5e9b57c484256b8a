use std::path::{Path, PathBuf};

use anyhow::Context;

/// Find the script implementing `task_name` inside `unit_dir`.
///
/// Matches any regular file whose name starts with `task_name`. When several
/// files match, the lexicographically smallest name wins so repeated lookups
/// always pick the same script.
pub fn locate(unit_dir: &Path, task_name: &str) -> anyhow::Result<Option<PathBuf>> {
    if task_name.is_empty() {
        return Ok(None);
    }

    let entries = std::fs::read_dir(unit_dir)
        .with_context(|| format!("Failed to read unit directory: {}", unit_dir.display()))?;

    let mut best: Option<(String, PathBuf)> = None;
    for entry in entries {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        if !name.starts_with(task_name) {
            continue;
        }
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if best.as_ref().is_none_or(|(current, _)| name < current.as_str()) {
            best = Some((name.to_string(), path));
        }
    }

    Ok(best.map(|(_, path)| path))
}

/// Whether `task_name` resolves to a script carrying the execute bit.
pub fn can_execute(unit_dir: &Path, task_name: &str) -> anyhow::Result<bool> {
    match locate(unit_dir, task_name)? {
        Some(path) => is_executable(&path),
        None => Ok(false),
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> anyhow::Result<bool> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to read metadata: {}", path.display()))?;
    Ok(metadata.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> anyhow::Result<bool> {
    Ok(path.is_file())
}
