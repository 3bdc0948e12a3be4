use std::path::PathBuf;
use thiserror::Error;

pub type StockResult<T> = Result<T, StockError>;

#[derive(Error, Debug)]
pub enum StockError {
    #[error("No input workbook found in {}", dir.display())]
    NoInput { dir: PathBuf },

    #[error("Failed to open workbook: {0}")]
    Open(String),

    #[error(
        "No records extracted from {} (cached and raw values). \
         Open it in Excel, recalculate everything (Ctrl+Alt+F9) and save it again",
        path.display()
    )]
    ExtractionExhausted { path: PathBuf },

    #[error("Emission precondition violated: {0}")]
    EmissionPrecondition(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl StockError {
    /// Process exit code for this outcome. Success is 0.
    pub fn exit_code(&self) -> u8 {
        match self {
            StockError::NoInput { .. } => 2,
            StockError::Open(_) => 3,
            StockError::ExtractionExhausted { .. } => 4,
            _ => 1,
        }
    }
}
