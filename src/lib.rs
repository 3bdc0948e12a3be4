//! Estoque sem giro - inventory-without-turnover reports from brand workbooks
//!
//! Reads the brand sheets of the latest input workbook, extracts active and
//! discontinued item lines, and writes consolidated and per-outlet reports.
//!
//! # Features
//!
//! - Header detection over a fixed set of target columns
//! - Cached formula values first, raw cell values as a one-time fallback
//! - Consolidated and per-outlet CSVs (UTF-8 with BOM)
//! - Formatted per-outlet workbooks with CURVA color coding
//! - Atomic writes for every artifact
//!
//! # Example
//!
//! ```no_run
//! use estoque_sem_giro::cli::{process_latest, RunOptions};
//! use estoque_sem_giro::config::Config;
//!
//! let config = Config::new("data");
//! let summary = process_latest(&config, &RunOptions::default())?;
//!
//! println!("Records: {}", summary.active_records);
//! println!("Reports: {}", summary.reports.len());
//! # Ok::<(), estoque_sem_giro::error::StockError>(())
//! ```

pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod excel;
pub mod input;
pub mod logging;
pub mod pipeline;
pub mod types;
pub mod writer;

// Re-export commonly used types
pub use config::Config;
pub use error::{StockError, StockResult};
pub use pipeline::{Extraction, Orchestrator};
pub use types::{DiscontinuedRecord, OutletRecord, Record};
