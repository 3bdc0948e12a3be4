//! Flat (CSV) emitters: consolidated file and one file per outlet.

use super::atomic::write_atomic;
use super::outlet::OutletKeys;
use crate::error::{StockError, StockResult};
use crate::types::{OutletRecord, Record};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// UTF-8 byte-order mark, so spreadsheet tools pick the right encoding.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Write records as CSV with a BOM and a header row.
pub fn write_csv<R: OutletRecord>(out: &mut dyn Write, records: &[&R]) -> StockResult<()> {
    out.write_all(UTF8_BOM)?;
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    wtr.write_record(R::HEADERS)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// All active records sorted by `(PDV, SKU)`, written to `path`.
///
/// Zero records is a caller bug: extraction must have failed before this point.
pub fn write_consolidated_csv(records: &[Record], path: &Path) -> StockResult<PathBuf> {
    if records.is_empty() {
        return Err(StockError::EmissionPrecondition(
            "no valid records to write to the consolidated file".to_string(),
        ));
    }

    let mut sorted: Vec<&Record> = records.iter().collect();
    sorted.sort_by(|a, b| {
        (a.pdv.as_str(), a.sku.as_str())
            .cmp(&(b.pdv.as_str(), b.sku.as_str()))
            .then_with(|| a.cmp(b))
    });

    write_atomic(path, |out| write_csv(out, &sorted))?;
    info!(path = %path.display(), rows = sorted.len(), "Consolidated CSV written");
    Ok(path.to_path_buf())
}

/// One CSV per outlet in `dir`, named `{basename}_{date}_PDV_{key}.csv`.
///
/// Returns the written paths keyed by outlet. No records, no files.
pub fn write_csvs_by_outlet<R>(
    records: &[R],
    keys: &OutletKeys,
    dir: &Path,
    basename: &str,
    date: &str,
) -> StockResult<BTreeMap<String, PathBuf>>
where
    R: OutletRecord + Ord,
{
    let mut paths = BTreeMap::new();
    if records.is_empty() {
        return Ok(paths);
    }

    for (key, rows) in keys.group(records) {
        let path = dir.join(outlet_file_name(basename, date, &key, "csv"));
        write_atomic(&path, |out| write_csv(out, &rows))?;
        debug!(outlet = %key, rows = rows.len(), path = %path.display(), "Outlet CSV written");
        paths.insert(key, path);
    }

    info!(files = paths.len(), dir = %dir.display(), "Per-outlet CSVs written");
    Ok(paths)
}

/// `{basename}_{date}_PDV_{key}.{extension}`; depends only on outlet key and run date.
pub fn outlet_file_name(basename: &str, date: &str, key: &str, extension: &str) -> String {
    format!("{}_{}_PDV_{}.{}", basename, date, key, extension)
}
