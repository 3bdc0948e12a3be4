//! Excel side of the pipeline
//!
//! - Import: brand sheets from the input `.xlsx` (cached or raw values)
//! - Extraction: header detection and record building
//! - Export: formatted per-outlet report workbooks

mod exporter;
mod extractor;
mod header;
mod importer;
mod sheet;
mod workbook;

pub use exporter::{column_width, curve_fill, ReportExporter};
pub use extractor::{preview_sheet, ActiveLayout, DiscontinuedLayout, Extractor, RecordLayout};
pub use header::{locate_header, looks_like_header, HEADER_TOKENS, MIN_HEADER_HITS};
pub use importer::ExcelImporter;
pub use sheet::{column_index, column_letter, normalize_cell, Sheet, ValueMode};
pub use workbook::{Workbook, WorkbookSource};
