use crate::archive::archive_input;
use crate::config::Config;
use crate::error::{StockError, StockResult};
use crate::excel::{
    column_letter, preview_sheet, ExcelImporter, Extractor, ReportExporter, ValueMode,
    WorkbookSource,
};
use crate::input::latest_input;
use crate::pipeline::Orchestrator;
use crate::writer::{write_consolidated_csv, write_csvs_by_outlet, OutletKeys};
use chrono::{NaiveDate, Utc};
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Per-run switches that are not part of the fixed policy in [`Config`].
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Move the input into the archive directory after a successful run.
    pub archive: bool,
    /// Date stamp override (`DD_MM_YYYY`); yesterday in the configured timezone otherwise.
    pub run_date: Option<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            archive: true,
            run_date: None,
        }
    }
}

/// Everything a successful run wrote.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub input: PathBuf,
    pub run_date: String,
    pub mode: ValueMode,
    pub active_records: usize,
    pub discontinued_records: usize,
    pub consolidated: PathBuf,
    pub outlet_csvs: BTreeMap<String, PathBuf>,
    pub discontinued_csvs: BTreeMap<String, PathBuf>,
    pub reports: BTreeMap<String, PathBuf>,
    pub archived: Option<PathBuf>,
}

/// Check a `DD_MM_YYYY` stamp.
pub fn parse_run_date(value: &str) -> StockResult<String> {
    NaiveDate::parse_from_str(value, "%d_%m_%Y")
        .map(|date| date.format("%d_%m_%Y").to_string())
        .map_err(|e| StockError::Config(format!("Invalid run date '{}': {}", value, e)))
}

/// Process the most recent input workbook end to end.
///
/// Nothing is written when no input exists, the workbook cannot be opened, or
/// neither extraction pass finds records. Archival problems are only logged.
pub fn process_latest(config: &Config, options: &RunOptions) -> StockResult<RunSummary> {
    config.ensure_dirs()?;

    let input = latest_input(
        &config.input_dir,
        &config.input_extension,
        &config.lock_file_prefix,
    )?
    .ok_or_else(|| StockError::NoInput {
        dir: config.input_dir.clone(),
    })?;
    info!(file = %input.display(), "Selected most recent input");

    let extraction = Orchestrator::from_config(config)?.run(&ExcelImporter::new(&input))?;

    let run_date = match &options.run_date {
        Some(date) => parse_run_date(date)?,
        None => config.run_date(),
    };

    let consolidated = write_consolidated_csv(
        &extraction.active,
        &config.consolidated_path(&run_date),
    )?;

    let keys = OutletKeys::new(&config.no_outlet_label)?;
    let outlet_csvs = if config.generate_by_outlet {
        write_csvs_by_outlet(
            &extraction.active,
            &keys,
            &config.outlet_dir(&run_date),
            &config.output_basename,
            &run_date,
        )?
    } else {
        BTreeMap::new()
    };

    let reports = ReportExporter::from_config(config, &run_date)?
        .export(&extraction.active, &extraction.discontinued)?;

    let discontinued_csvs = if extraction.discontinued.is_empty() {
        info!("No discontinued records in the expected sheets");
        BTreeMap::new()
    } else {
        write_csvs_by_outlet(
            &extraction.discontinued,
            &keys,
            &config.discontinued_dir(&run_date),
            &config.discontinued_basename,
            &run_date,
        )?
    };

    let archived = if options.archive {
        let now = Utc::now().with_timezone(&config.timezone);
        match archive_input(&input, &config.archive_dir, &now) {
            Ok(dest) => {
                info!(path = %dest.display(), "Input archived");
                Some(dest)
            }
            Err(e) => {
                let reason = format!("{:#}", e);
                warn!(file = %input.display(), error = %reason, "Could not archive input");
                None
            }
        }
    } else {
        None
    };

    Ok(RunSummary {
        input,
        run_date,
        mode: extraction.mode,
        active_records: extraction.active.len(),
        discontinued_records: extraction.discontinued.len(),
        consolidated,
        outlet_csvs,
        discontinued_csvs,
        reports,
        archived,
    })
}

/// Execute the run command and print its summary
pub fn run(config: &Config, options: &RunOptions) -> StockResult<()> {
    println!("{}", "📦 Estoque sem giro - Processing latest input".bold().green());
    println!("   Input dir: {}", config.input_dir.display());
    println!();

    let summary = process_latest(config, options)?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("   File: {}", summary.input.display());
    println!("   Date: {}", summary.run_date.bright_yellow().bold());
    if summary.mode == ValueMode::Raw {
        println!(
            "{}",
            "   ⚠️  Formula cache was empty; raw cell values were used".yellow()
        );
    }
    println!();

    println!(
        "{}",
        format!(
            "✅ {} records ({} discontinued)",
            summary.active_records, summary.discontinued_records
        )
        .bold()
        .green()
    );
    println!("   Consolidated: {}", summary.consolidated.display());
    print_group("Outlet CSVs", &summary.outlet_csvs);
    print_group("Reports", &summary.reports);
    print_group("Discontinued CSVs", &summary.discontinued_csvs);

    match &summary.archived {
        Some(path) => println!("   Archived: {}", path.display()),
        None => println!("   Archived: {}", "no".dimmed()),
    }
}

fn print_group(label: &str, paths: &BTreeMap<String, PathBuf>) {
    let Some(first) = paths.values().next() else {
        println!("   {}: {}", label, "none".dimmed());
        return;
    };
    let dir = first.parent().unwrap_or(Path::new("."));
    println!("   {}: {} in {}", label, paths.len(), dir.display());
}

/// Execute the inspect command: show what each pass would extract, without writing anything
pub fn inspect(config: &Config, file: Option<PathBuf>) -> StockResult<()> {
    let file = match file {
        Some(file) => file,
        None => latest_input(
            &config.input_dir,
            &config.input_extension,
            &config.lock_file_prefix,
        )?
        .ok_or_else(|| StockError::NoInput {
            dir: config.input_dir.clone(),
        })?,
    };

    println!("{}", "🔍 Estoque sem giro - Inspecting workbook".bold().green());
    println!("   File: {}", file.display());
    println!();

    let extractor = Extractor::from_config(config)?;
    let importer = ExcelImporter::new(&file);
    let letters: Vec<String> = extractor
        .header_columns()
        .iter()
        .map(|c| column_letter(*c))
        .collect();

    for mode in [ValueMode::Cached, ValueMode::Raw] {
        let workbook = importer.open(mode, &config.expected_sheets)?;
        println!("{}", format!("📖 {} values", mode).cyan().bold());
        println!("   Sheets: {}", workbook.sheet_names().join(", "));

        for name in &config.expected_sheets {
            let Some(sheet) = workbook.sheet(name) else {
                println!("   {} {}", name.bold(), "missing".red());
                continue;
            };

            let active = extractor.extract_sheet(sheet, name).count();
            let discontinued = extractor.extract_discontinued_sheet(sheet, name).count();
            println!(
                "   {} rows={} data_from_row={} active={} discontinued={}",
                name.bold(),
                sheet.row_count(),
                extractor.start_row(sheet),
                active,
                discontinued
            );

            let preview = preview_sheet(sheet, extractor.header_columns(), config.preview_max_rows);
            if preview.is_empty() {
                println!("      {}", "(no visible content in the target columns)".dimmed());
                continue;
            }
            println!("      {}", letters.join(" | ").dimmed());
            for row in preview {
                println!("      {}", row.join(" | "));
            }
        }
        println!();
    }

    Ok(())
}
