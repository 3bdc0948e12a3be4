//! Run configuration: directories, sheet set, column positions and naming policy.

use crate::error::{StockError, StockResult};
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use std::fs;
use std::path::{Path, PathBuf};

/// Timezone used to derive the "yesterday" date stamp.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Recife;

/// Column letters read by the active extractor. The same letters drive header detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveColumns {
    pub sku: String,
    pub description: String,
    pub curve: String,
    pub outlet: String,
    pub stock: String,
}

impl Default for ActiveColumns {
    fn default() -> Self {
        Self {
            sku: "A".to_string(),
            description: "C".to_string(),
            curve: "E".to_string(),
            outlet: "I".to_string(),
            stock: "J".to_string(),
        }
    }
}

impl ActiveColumns {
    /// Letters in extraction order: SKU, DESCRIÇÃO, CURVA, PDV, ESTOQUE_ATUAL.
    pub fn letters(&self) -> [&str; 5] {
        [
            self.sku.as_str(),
            self.description.as_str(),
            self.curve.as_str(),
            self.outlet.as_str(),
            self.stock.as_str(),
        ]
    }
}

/// Column letters read by the discontinued extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscontinuedColumns {
    pub sku: String,
    pub replacement_sku: String,
    pub description: String,
    pub outlet: String,
    pub stock: String,
    pub phase: String,
}

impl Default for DiscontinuedColumns {
    fn default() -> Self {
        Self {
            sku: "A".to_string(),
            replacement_sku: "B".to_string(),
            description: "C".to_string(),
            outlet: "I".to_string(),
            stock: "J".to_string(),
            phase: "K".to_string(),
        }
    }
}

impl DiscontinuedColumns {
    /// Letters in extraction order: SKU, SKU_PARA, DESCRIÇÃO, PDV, ESTOQUE ATUAL, FASES DO PRODUTO.
    pub fn letters(&self) -> [&str; 6] {
        [
            self.sku.as_str(),
            self.replacement_sku.as_str(),
            self.description.as_str(),
            self.outlet.as_str(),
            self.stock.as_str(),
            self.phase.as_str(),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub archive_dir: PathBuf,
    pub timezone: Tz,
    /// Brand sheets, in the order their records are concatenated.
    pub expected_sheets: Vec<String>,
    pub active_columns: ActiveColumns,
    pub discontinued_columns: DiscontinuedColumns,
    pub input_extension: String,
    pub lock_file_prefix: String,
    pub header_scan_limit: u32,
    pub preview_max_rows: usize,
    pub enable_fallback: bool,
    pub generate_by_outlet: bool,
    /// Matched as a substring of the normalized phase cell.
    pub discontinued_marker: String,
    pub no_outlet_label: String,
    pub output_basename: String,
    pub outlet_folder_prefix: String,
    pub discontinued_folder_prefix: String,
    pub discontinued_basename: String,
    pub report_folder_prefix: String,
    pub report_basename: String,
    pub report_sheet_main: String,
    pub report_sheet_disc: String,
    pub logo_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new("data")
    }
}

impl Config {
    /// Build the default configuration rooted at `data_dir`.
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        Self {
            input_dir: data_dir.join("input"),
            output_dir: data_dir.join("output"),
            archive_dir: data_dir.join("archived"),
            logo_path: Some(data_dir.join("assets").join("logo.png")),
            data_dir,
            timezone: DEFAULT_TIMEZONE,
            expected_sheets: vec!["EUD".to_string(), "BOT".to_string(), "QDB".to_string()],
            active_columns: ActiveColumns::default(),
            discontinued_columns: DiscontinuedColumns::default(),
            input_extension: "xlsx".to_string(),
            lock_file_prefix: "~$".to_string(),
            header_scan_limit: 200,
            preview_max_rows: 3,
            enable_fallback: true,
            generate_by_outlet: true,
            discontinued_marker: "descontinuado".to_string(),
            no_outlet_label: "SEM_PDV".to_string(),
            output_basename: "Estoque_sem_giro".to_string(),
            outlet_folder_prefix: "por_pdv".to_string(),
            discontinued_folder_prefix: "descontinuados".to_string(),
            discontinued_basename: "Descontinuados".to_string(),
            report_folder_prefix: "relatorios_finalizado".to_string(),
            report_basename: "Relatorio".to_string(),
            report_sheet_main: "Estoque sem Giro".to_string(),
            report_sheet_disc: "Descontinuados".to_string(),
        }
    }

    /// Create input, output and archive directories if they are missing.
    pub fn ensure_dirs(&self) -> StockResult<()> {
        for dir in [&self.input_dir, &self.output_dir, &self.archive_dir] {
            fs::create_dir_all(dir).map_err(|e| {
                StockError::Config(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }
        Ok(())
    }

    /// Yesterday's date in the configured timezone, formatted `DD_MM_YYYY`.
    pub fn run_date(&self) -> String {
        self.run_date_at(Utc::now())
    }

    pub fn run_date_at(&self, now: DateTime<Utc>) -> String {
        (now.with_timezone(&self.timezone) - Duration::days(1))
            .format("%d_%m_%Y")
            .to_string()
    }

    pub fn consolidated_path(&self, date: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}.csv", self.output_basename, date))
    }

    pub fn outlet_dir(&self, date: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}", self.outlet_folder_prefix, date))
    }

    pub fn discontinued_dir(&self, date: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}", self.discontinued_folder_prefix, date))
    }

    pub fn report_dir(&self, date: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}", self.report_folder_prefix, date))
    }
}
