//! Excel importer implementation - reads brand sheets from an `.xlsx` file

use super::sheet::{Sheet, ValueMode};
use super::workbook::{Workbook, WorkbookSource};
use crate::error::{StockError, StockResult};
use calamine::{open_workbook, Reader, Xlsx};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads worksheets from an `.xlsx` file with calamine.
pub struct ExcelImporter {
    path: PathBuf,
}

impl ExcelImporter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WorkbookSource for ExcelImporter {
    fn open(&self, mode: ValueMode, wanted: &[String]) -> StockResult<Workbook> {
        // The handle lives only inside this call
        let mut workbook: Xlsx<_> = open_workbook(&self.path).map_err(|e| {
            StockError::Open(format!("{}: {}", self.path.display(), e))
        })?;

        let sheet_names = workbook.sheet_names().to_vec();
        let mut sheets = Vec::new();

        for name in wanted {
            if !sheet_names.contains(name) {
                continue;
            }
            let range = workbook.worksheet_range(name).map_err(|e| {
                StockError::Open(format!("Failed to read sheet {}: {}", name, e))
            })?;
            let mut sheet = Sheet::from_range(name.as_str(), &range);

            if mode == ValueMode::Raw {
                match workbook.worksheet_formula(name) {
                    Ok(formulas) => sheet.overlay_formulas(&formulas),
                    Err(e) => debug!(sheet = %name, error = %e, "No formulas read"),
                }
            }

            debug!(sheet = %name, rows = sheet.row_count(), %mode, "Loaded sheet");
            sheets.push(sheet);
        }

        Ok(Workbook::with_names(sheet_names, sheets))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
