use crate::error::{StockError, StockResult};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Prefix of in-flight temp files, so stray ones are easy to spot.
pub const TEMP_PREFIX: &str = ".tmp-";

/// Write `path` through a temp file in the same directory, then rename it into place.
///
/// Readers never see a partially written `path`. When `write` fails the temp
/// file is removed and `path` is left untouched.
pub fn write_atomic<F>(path: &Path, write: F) -> StockResult<()>
where
    F: FnOnce(&mut dyn Write) -> StockResult<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(".part")
        .tempfile_in(dir)?;

    {
        let mut out = BufWriter::new(temp.as_file_mut());
        write(&mut out)?;
        out.flush()?;
    }
    temp.as_file().sync_all()?;

    temp.persist(path).map_err(|e| {
        StockError::Io(std::io::Error::new(
            e.error.kind(),
            format!("Failed to move {} into place: {}", path.display(), e.error),
        ))
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_writes_and_replaces() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.csv");

        write_atomic(&path, |w| Ok(w.write_all(b"first")?)).unwrap();
        write_atomic(&path, |w| Ok(w.write_all(b"second")?)).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert_eq!(entries(temp.path()), vec!["out.csv"]);
    }

    #[test]
    fn test_creates_missing_directory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a").join("b").join("out.csv");
        write_atomic(&path, |w| Ok(w.write_all(b"x")?)).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_interrupted_write_never_creates_final_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("report.xlsx");

        let result = write_atomic(&path, |w| {
            w.write_all(b"half a workbook")?;
            Err(StockError::Export("interrupted".to_string()))
        });

        assert!(result.is_err());
        assert!(!path.exists());
        assert!(entries(temp.path()).is_empty());
    }

    #[test]
    fn test_failed_rewrite_keeps_previous_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.csv");
        write_atomic(&path, |w| Ok(w.write_all(b"good")?)).unwrap();

        let _ = write_atomic(&path, |_| Err(StockError::Export("boom".to_string())));
        assert_eq!(fs::read_to_string(&path).unwrap(), "good");
    }

    #[test]
    fn test_temp_file_lives_next_to_target() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.csv");

        write_atomic(&path, |_| {
            let names = entries(temp.path());
            assert_eq!(names.len(), 1);
            assert!(names[0].starts_with(TEMP_PREFIX));
            Ok(())
        })
        .unwrap();
    }
}
