use clap::{Parser, Subcommand};
use colored::Colorize;
use estoque_sem_giro::cli::{self, RunOptions};
use estoque_sem_giro::config::Config;
use estoque_sem_giro::logging;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "estoque-sem-giro")]
#[command(about = "Inventory-without-turnover reports from the latest brand workbook")]
#[command(long_about = "Estoque sem giro - consolidated and per-outlet inventory reports

Picks the most recently modified .xlsx in the input directory, reads the
EUD, BOT and QDB sheets and writes:
  - one consolidated CSV
  - one CSV per outlet (PDV)
  - one formatted workbook per outlet (active + discontinued sheets)
  - one CSV per outlet for discontinued items
then moves the input into the archive directory.

When the workbook has no cached formula values it is read again with raw
cell values. If that also yields nothing, open the file in Excel,
recalculate (Ctrl+Alt+F9) and save it.

EXIT CODES:
  0  success
  1  other failure
  2  no input workbook found
  3  input workbook could not be opened
  4  no records extracted (cached and raw values)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Root data directory (input/, output/, archived/ live under it)
    #[arg(long, env = "ESTOQUE_DATA_DIR", default_value = "data", global = true)]
    data_dir: PathBuf,

    /// Input directory [default: <data-dir>/input]
    #[arg(long, global = true)]
    input_dir: Option<PathBuf>,

    /// Output directory [default: <data-dir>/output]
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Archive directory [default: <data-dir>/archived]
    #[arg(long, global = true)]
    archive_dir: Option<PathBuf>,

    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Process the latest input workbook (default)
    Run {
        /// Date stamp for output names (DD_MM_YYYY) [default: yesterday]
        #[arg(long)]
        run_date: Option<String>,

        /// Logo image for the report workbooks [default: <data-dir>/assets/logo.png]
        #[arg(long, conflicts_with = "no_logo")]
        logo: Option<PathBuf>,

        /// Leave the logo row empty
        #[arg(long)]
        no_logo: bool,

        /// Do not retry with raw cell values when cached values yield nothing
        #[arg(long)]
        no_fallback: bool,

        /// Skip the per-outlet CSVs of active records
        #[arg(long)]
        no_by_outlet: bool,

        /// Keep the input where it is
        #[arg(long)]
        no_archive: bool,
    },

    /// Show sheets, header rows, previews and record counts for both value modes
    Inspect {
        /// Workbook to inspect [default: latest in the input directory]
        file: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = Config::new(&cli.data_dir);
    if let Some(dir) = cli.input_dir {
        config.input_dir = dir;
    }
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }
    if let Some(dir) = cli.archive_dir {
        config.archive_dir = dir;
    }

    let result = match cli.command {
        Some(Commands::Inspect { file }) => cli::inspect(&config, file),
        Some(Commands::Run {
            run_date,
            logo,
            no_logo,
            no_fallback,
            no_by_outlet,
            no_archive,
        }) => {
            if no_logo {
                config.logo_path = None;
            } else if logo.is_some() {
                config.logo_path = logo;
            }
            config.enable_fallback = !no_fallback;
            config.generate_by_outlet = !no_by_outlet;
            let options = RunOptions {
                archive: !no_archive,
                run_date,
            };
            cli::run(&config, &options)
        }
        None => cli::run(&config, &RunOptions::default()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "❌".red(), e.to_string().red());
            ExitCode::from(e.exit_code())
        }
    }
}
