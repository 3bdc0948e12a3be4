//! Input workbook selection.

use crate::error::StockResult;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

/// Candidate files in `dir`: regular files with `extension` (any case) whose
/// name does not start with `lock_prefix`. Sorted oldest first by
/// `(modified time, file name)`. A missing directory has no candidates.
pub fn list_inputs(dir: &Path, extension: &str, lock_prefix: &str) -> StockResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut candidates: Vec<(SystemTime, String, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let metadata = entry.metadata()?;
        if !metadata.is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        let matches_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if !matches_extension || name.starts_with(lock_prefix) {
            debug!(file = %name, "Skipping non-input file");
            continue;
        }

        candidates.push((metadata.modified()?, name, path));
    }

    candidates.sort_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)));
    Ok(candidates.into_iter().map(|(_, _, path)| path).collect())
}

/// Most recently modified candidate, ties broken by the larger file name.
pub fn latest_input(dir: &Path, extension: &str, lock_prefix: &str) -> StockResult<Option<PathBuf>> {
    Ok(list_inputs(dir, extension, lock_prefix)?.pop())
}
