//! Header row detection for sheets whose header may be missing or shifted.

use super::sheet::Sheet;

/// Labels accepted as column headers, compared after trimming and lowercasing.
pub const HEADER_TOKENS: &[&str] = &[
    "sku",
    "descrição",
    "descricao",
    "curva",
    "classe",
    "pdv",
    "estoque",
    "estoque atual",
    "estoque_atual",
];

/// Minimum number of matching labels for a row to count as the header.
pub const MIN_HEADER_HITS: usize = 2;

pub fn looks_like_header(values: &[String]) -> bool {
    values
        .iter()
        .filter(|value| HEADER_TOKENS.contains(&value.trim().to_lowercase().as_str()))
        .count()
        >= MIN_HEADER_HITS
}

/// Find the first row in `1..=min(row_count, scan_limit)` that looks like a header.
///
/// Only `columns` (1-based) are read. `None` is not an error: extraction then
/// starts at row 1.
pub fn locate_header(sheet: &Sheet, columns: &[u32], scan_limit: u32) -> Option<u32> {
    let last_row = sheet.row_count().min(scan_limit);
    (1..=last_row).find(|&row| looks_like_header(&sheet.row_values(row, columns)))
}
