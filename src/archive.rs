//! Moving processed inputs out of the input directory.

use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

/// Archive name: `{stem}__processado_{YYYYmmdd_HHMMSS}{.ext}`.
pub fn archive_name<Tz>(path: &Path, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    format!(
        "{}__processado_{}{}",
        stem,
        now.format("%Y%m%d_%H%M%S"),
        extension
    )
}

/// Move `path` into `archive_dir`, returning the new location.
///
/// Falls back to copy then remove when a rename is not possible, e.g. across
/// filesystems.
pub fn archive_input<Tz>(path: &Path, archive_dir: &Path, now: &DateTime<Tz>) -> Result<PathBuf>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    fs::create_dir_all(archive_dir)
        .with_context(|| format!("Failed to create archive dir {}", archive_dir.display()))?;
    let dest = archive_dir.join(archive_name(path, now));

    if fs::rename(path, &dest).is_err() {
        fs::copy(path, &dest)
            .with_context(|| format!("Failed to copy {} to {}", path.display(), dest.display()))?;
        fs::remove_file(path)
            .with_context(|| format!("Failed to remove {} after copying", path.display()))?;
    }
    Ok(dest)
}
