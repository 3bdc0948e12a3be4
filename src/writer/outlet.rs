//! Outlet (PDV) grouping shared by the per-outlet CSV and workbook emitters.

use crate::error::{StockError, StockResult};
use crate::types::OutletRecord;
use regex::Regex;
use std::collections::BTreeMap;

/// Turns outlet identifiers into file-name-safe group keys.
#[derive(Debug, Clone)]
pub struct OutletKeys {
    separator_pattern: Regex,
    no_outlet_label: String,
}

impl OutletKeys {
    pub fn new(no_outlet_label: &str) -> StockResult<Self> {
        // Letters and digits survive; every other run collapses to one separator
        let separator_pattern = Regex::new(r"[^\p{L}\p{N}]+")
            .map_err(|e| StockError::Config(format!("Regex error: {}", e)))?;
        Ok(Self {
            separator_pattern,
            no_outlet_label: no_outlet_label.to_string(),
        })
    }

    /// Every run of characters other than letters and digits (spaces, hyphens,
    /// underscores, punctuation) becomes one `_`, so `"Loja 01"` and `"Loja-01"`
    /// share a key. A blank outlet maps to the no-outlet label.
    pub fn sanitize(&self, outlet: &str) -> String {
        let trimmed = outlet.trim();
        if trimmed.is_empty() {
            return self.no_outlet_label.clone();
        }
        self.separator_pattern
            .replace_all(trimmed, "_")
            .into_owned()
    }

    /// Group records by outlet key. Keys iterate in ascending order and each
    /// group is sorted by SKU, with the remaining fields breaking ties.
    pub fn group<'a, R>(&self, records: &'a [R]) -> BTreeMap<String, Vec<&'a R>>
    where
        R: OutletRecord + Ord,
    {
        let mut groups: BTreeMap<String, Vec<&'a R>> = BTreeMap::new();
        for record in records {
            groups
                .entry(self.sanitize(record.outlet()))
                .or_default()
                .push(record);
        }
        for rows in groups.values_mut() {
            rows.sort_by(|a, b| a.sku().cmp(b.sku()).then_with(|| a.cmp(b)));
        }
        groups
    }
}
