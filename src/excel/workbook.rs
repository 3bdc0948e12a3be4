use super::sheet::{Sheet, ValueMode};
use crate::error::StockResult;

/// Sheets loaded by one workbook pass.
///
/// `sheet_names` lists every sheet in workbook order, including the ones that
/// were not loaded.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheet_names: Vec<String>,
    sheets: Vec<Sheet>,
}

impl Workbook {
    /// Workbook where every sheet is loaded.
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self {
            sheet_names: sheets.iter().map(|s| s.name().to_string()).collect(),
            sheets,
        }
    }

    pub fn with_names(sheet_names: Vec<String>, sheets: Vec<Sheet>) -> Self {
        Self {
            sheet_names,
            sheets,
        }
    }

    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name() == name)
    }
}

/// Something that can be opened once per extraction pass.
///
/// Implementations must release any file handle before `open` returns, so a
/// fallback pass never overlaps the first one.
pub trait WorkbookSource {
    /// Load the sheets named in `wanted` that exist, reading values per `mode`.
    fn open(&self, mode: ValueMode, wanted: &[String]) -> StockResult<Workbook>;

    /// Human-readable origin, for logs and errors.
    fn describe(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        let workbook = Workbook::with_names(
            vec!["EUD".to_string(), "Resumo".to_string()],
            vec![Sheet::new("EUD")],
        );
        assert_eq!(workbook.sheet_names(), ["EUD", "Resumo"]);
        assert!(workbook.sheet("EUD").is_some());
        assert!(workbook.sheet("Resumo").is_none());
        assert!(workbook.sheet("eud").is_none());
    }
}
