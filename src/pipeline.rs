//! Two-pass extraction over one input workbook.
//!
//! Pass 1 reads formula caches. Only when it yields no active records is the
//! workbook opened again with raw values; there is never a third attempt.

use crate::config::Config;
use crate::error::{StockError, StockResult};
use crate::excel::{column_letter, preview_sheet, Extractor, ValueMode, Workbook, WorkbookSource};
use crate::types::{DiscontinuedRecord, Record};
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Records accepted from one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub active: Vec<Record>,
    pub discontinued: Vec<DiscontinuedRecord>,
    /// Pass that produced the records.
    pub mode: ValueMode,
}

pub struct Orchestrator {
    extractor: Extractor,
    expected_sheets: Vec<String>,
    enable_fallback: bool,
    preview_max_rows: usize,
}

impl Orchestrator {
    pub fn new(extractor: Extractor, expected_sheets: Vec<String>) -> Self {
        Self {
            extractor,
            expected_sheets,
            enable_fallback: true,
            preview_max_rows: 0,
        }
    }

    pub fn from_config(config: &Config) -> StockResult<Self> {
        Ok(Self {
            extractor: Extractor::from_config(config)?,
            expected_sheets: config.expected_sheets.clone(),
            enable_fallback: config.enable_fallback,
            preview_max_rows: config.preview_max_rows,
        })
    }

    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.enable_fallback = enabled;
        self
    }

    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_max_rows = rows;
        self
    }

    /// Extract active and discontinued records from `source`.
    ///
    /// An open failure on the first pass is `Open`. When both passes (or the
    /// only pass, with fallback disabled) yield no active records the result
    /// is `ExtractionExhausted`. An empty discontinued set is a valid result.
    pub fn run<S: WorkbookSource + ?Sized>(&self, source: &S) -> StockResult<Extraction> {
        let workbook = source.open(ValueMode::Cached, &self.expected_sheets)?;
        self.log_sheets(&workbook);
        self.log_previews(&workbook);

        let cached = self.extract(&workbook, ValueMode::Cached);
        drop(workbook);
        if !cached.active.is_empty() {
            return Ok(cached);
        }

        if self.enable_fallback {
            warn!(
                source = %source.describe(),
                "No records from cached values, retrying with raw cell values"
            );
            match source.open(ValueMode::Raw, &self.expected_sheets) {
                Ok(workbook) => {
                    let raw = self.extract(&workbook, ValueMode::Raw);
                    if !raw.active.is_empty() {
                        return Ok(raw);
                    }
                }
                Err(e) => error!(error = %e, "Fallback pass failed to open the workbook"),
            }
        }

        error!(
            source = %source.describe(),
            "Still no records. Open the file in Excel, recalculate (Ctrl+Alt+F9) and save it"
        );
        Err(StockError::ExtractionExhausted {
            path: PathBuf::from(source.describe()),
        })
    }

    fn extract(&self, workbook: &Workbook, mode: ValueMode) -> Extraction {
        let active: Vec<Record> = self
            .extractor
            .extract_all(workbook, &self.expected_sheets)
            .collect();
        let discontinued: Vec<DiscontinuedRecord> = self
            .extractor
            .extract_discontinued_all(workbook, &self.expected_sheets)
            .collect();

        for name in &self.expected_sheets {
            let active_count = active.iter().filter(|r| &r.brand == name).count();
            let discontinued_count = discontinued.iter().filter(|r| &r.brand == name).count();
            if workbook.sheet(name).is_some() {
                info!(
                    sheet = %name,
                    active = active_count,
                    discontinued = discontinued_count,
                    "Records extracted"
                );
            }
        }

        Extraction {
            active,
            discontinued,
            mode,
        }
    }

    fn log_sheets(&self, workbook: &Workbook) {
        info!(sheets = ?workbook.sheet_names(), "Workbook sheets");
        for name in &self.expected_sheets {
            if !workbook.sheet_names().contains(name) {
                warn!(sheet = %name, "Expected sheet not found, skipping");
            }
        }
    }

    fn log_previews(&self, workbook: &Workbook) {
        if self.preview_max_rows == 0 {
            return;
        }
        let columns = self.extractor.header_columns();
        let letters: Vec<String> = columns.iter().map(|c| column_letter(*c)).collect();

        for name in &self.expected_sheets {
            let Some(sheet) = workbook.sheet(name) else {
                continue;
            };
            let rows = preview_sheet(sheet, columns, self.preview_max_rows);
            if rows.is_empty() {
                continue;
            }
            info!("Preview {}: {}", name, letters.join(" | "));
            for row in rows {
                info!("{}", row.join(" | "));
            }
        }
    }
}
