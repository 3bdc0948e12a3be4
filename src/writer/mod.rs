//! Flat file output: atomic writes, outlet grouping and CSV emitters.

pub mod atomic;
pub mod flat;
pub mod outlet;

pub use atomic::write_atomic;
pub use flat::{outlet_file_name, write_consolidated_csv, write_csv, write_csvs_by_outlet};
pub use outlet::OutletKeys;
