//! Record extraction from brand sheets.
//!
//! Both record classes share one pipeline: locate the header with the active
//! columns, stream the rows below it, drop blank rows, then let a
//! [`RecordLayout`] validate and build the record. The layouts differ only in
//! the columns they read and the rows they accept.

use super::header::locate_header;
use super::sheet::{column_index, Sheet};
use super::workbook::Workbook;
use crate::config::{ActiveColumns, Config, DiscontinuedColumns};
use crate::error::StockResult;
use crate::types::{DiscontinuedRecord, Record};

/// Column set plus validity rules for one record class.
pub trait RecordLayout {
    type Record;

    /// 1-based columns read for every row, in the order `build` receives them.
    fn columns(&self) -> &[u32];

    /// Build a record from normalized values, or reject the row.
    fn build(&self, values: Vec<String>, brand: &str) -> Option<Self::Record>;
}

/// Reads SKU, DESCRIÇÃO, CURVA, PDV and ESTOQUE_ATUAL.
#[derive(Debug, Clone)]
pub struct ActiveLayout {
    columns: [u32; 5],
}

impl ActiveLayout {
    pub fn new(columns: &ActiveColumns) -> StockResult<Self> {
        let [sku, description, curve, outlet, stock] = columns.letters();
        Ok(Self {
            columns: [
                column_index(sku)?,
                column_index(description)?,
                column_index(curve)?,
                column_index(outlet)?,
                column_index(stock)?,
            ],
        })
    }
}

impl RecordLayout for ActiveLayout {
    type Record = Record;

    fn columns(&self) -> &[u32] {
        &self.columns
    }

    fn build(&self, values: Vec<String>, brand: &str) -> Option<Record> {
        let [sku, description, curve, pdv, stock]: [String; 5] = values.try_into().ok()?;
        if sku.is_empty() || pdv.is_empty() {
            return None;
        }
        Some(Record {
            pdv,
            sku,
            description,
            brand: brand.to_string(),
            curve,
            stock,
        })
    }
}

/// Reads SKU, SKU_PARA, DESCRIÇÃO, PDV, ESTOQUE ATUAL and FASES DO PRODUTO, and
/// keeps only rows whose phase contains the discontinuation marker.
#[derive(Debug, Clone)]
pub struct DiscontinuedLayout {
    columns: [u32; 6],
    marker: String,
}

impl DiscontinuedLayout {
    pub fn new(columns: &DiscontinuedColumns, marker: &str) -> StockResult<Self> {
        let [sku, replacement_sku, description, outlet, stock, phase] = columns.letters();
        Ok(Self {
            columns: [
                column_index(sku)?,
                column_index(replacement_sku)?,
                column_index(description)?,
                column_index(outlet)?,
                column_index(stock)?,
                column_index(phase)?,
            ],
            marker: normalize_phase(marker),
        })
    }

    pub fn is_discontinued(&self, phase: &str) -> bool {
        normalize_phase(phase).contains(&self.marker)
    }
}

impl RecordLayout for DiscontinuedLayout {
    type Record = DiscontinuedRecord;

    fn columns(&self) -> &[u32] {
        &self.columns
    }

    fn build(&self, values: Vec<String>, brand: &str) -> Option<DiscontinuedRecord> {
        let [sku, replacement_sku, description, pdv, stock, phase]: [String; 6] =
            values.try_into().ok()?;
        if sku.is_empty() || pdv.is_empty() || !self.is_discontinued(&phase) {
            return None;
        }
        Some(DiscontinuedRecord {
            pdv,
            sku,
            replacement_sku,
            description,
            stock,
            phase,
            brand: brand.to_string(),
        })
    }
}

/// Lowercase and collapse whitespace.
fn normalize_phase(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Extracts both record classes from brand sheets.
#[derive(Debug, Clone)]
pub struct Extractor {
    header_columns: Vec<u32>,
    scan_limit: u32,
    active: ActiveLayout,
    discontinued: DiscontinuedLayout,
}

impl Extractor {
    pub fn new(
        active: ActiveLayout,
        discontinued: DiscontinuedLayout,
        scan_limit: u32,
    ) -> Self {
        Self {
            header_columns: active.columns().to_vec(),
            scan_limit,
            active,
            discontinued,
        }
    }

    pub fn from_config(config: &Config) -> StockResult<Self> {
        Ok(Self::new(
            ActiveLayout::new(&config.active_columns)?,
            DiscontinuedLayout::new(&config.discontinued_columns, &config.discontinued_marker)?,
            config.header_scan_limit,
        ))
    }

    /// Columns used for header detection and previews.
    pub fn header_columns(&self) -> &[u32] {
        &self.header_columns
    }

    /// First data row: right below the detected header, or row 1 when none is found.
    pub fn start_row(&self, sheet: &Sheet) -> u32 {
        locate_header(sheet, &self.header_columns, self.scan_limit)
            .map(|header| header + 1)
            .unwrap_or(1)
    }

    pub fn extract_sheet<'a>(
        &'a self,
        sheet: &'a Sheet,
        brand: &'a str,
    ) -> impl Iterator<Item = Record> + 'a {
        self.extract_with(&self.active, sheet, brand)
    }

    pub fn extract_discontinued_sheet<'a>(
        &'a self,
        sheet: &'a Sheet,
        brand: &'a str,
    ) -> impl Iterator<Item = DiscontinuedRecord> + 'a {
        self.extract_with(&self.discontinued, sheet, brand)
    }

    /// Active records of every expected sheet present in `workbook`, in
    /// `expected` order then row order. The sheet label becomes the brand.
    pub fn extract_all<'a>(
        &'a self,
        workbook: &'a Workbook,
        expected: &'a [String],
    ) -> impl Iterator<Item = Record> + 'a {
        expected
            .iter()
            .filter_map(move |name| workbook.sheet(name))
            .flat_map(move |sheet| self.extract_sheet(sheet, sheet.name()))
    }

    pub fn extract_discontinued_all<'a>(
        &'a self,
        workbook: &'a Workbook,
        expected: &'a [String],
    ) -> impl Iterator<Item = DiscontinuedRecord> + 'a {
        expected
            .iter()
            .filter_map(move |name| workbook.sheet(name))
            .flat_map(move |sheet| self.extract_discontinued_sheet(sheet, sheet.name()))
    }

    fn extract_with<'a, L: RecordLayout>(
        &'a self,
        layout: &'a L,
        sheet: &'a Sheet,
        brand: &'a str,
    ) -> impl Iterator<Item = L::Record> + 'a {
        let start = self.start_row(sheet);
        (start..=sheet.row_count()).filter_map(move |row| {
            let values = sheet.row_values(row, layout.columns());
            if values.iter().all(String::is_empty) {
                return None;
            }
            layout.build(values, brand)
        })
    }
}

/// Up to `max_rows` rows from the top of the sheet with at least one non-empty target cell.
pub fn preview_sheet(sheet: &Sheet, columns: &[u32], max_rows: usize) -> Vec<Vec<String>> {
    (1..=sheet.row_count())
        .map(|row| sheet.row_values(row, columns))
        .filter(|values| values.iter().any(|v| !v.is_empty()))
        .take(max_rows)
        .collect()
}
