//! CLI command handlers

pub mod commands;

pub use commands::{inspect, parse_run_date, process_latest, run, RunOptions, RunSummary};
