use serde::Serialize;

/// Output headers for active records, in file column order.
pub const RECORD_FIELDS: [&str; 6] = ["PDV", "SKU", "DESCRIÇÃO", "MARCA", "CURVA", "ESTOQUE_ATUAL"];

/// Output headers for discontinued records, in file column order.
pub const DISCONTINUED_FIELDS: [&str; 7] = [
    "PDV",
    "SKU",
    "SKU_PARA",
    "DESCRIÇÃO",
    "ESTOQUE ATUAL",
    "FASES DO PRODUTO",
    "MARCA",
];

/// Name of the column whose cells are color-coded in the formatted report.
pub const CURVE_FIELD: &str = "CURVA";

/// An active inventory-without-turnover line.
///
/// `pdv` and `sku` are never empty; the extractor drops rows before building one.
/// Field order matches [`RECORD_FIELDS`], so the derived ordering sorts by
/// `(PDV, SKU)` first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Record {
    #[serde(rename = "PDV")]
    pub pdv: String,
    #[serde(rename = "SKU")]
    pub sku: String,
    #[serde(rename = "DESCRIÇÃO")]
    pub description: String,
    /// Injected from the sheet label, never read from cells.
    #[serde(rename = "MARCA")]
    pub brand: String,
    #[serde(rename = "CURVA")]
    pub curve: String,
    #[serde(rename = "ESTOQUE_ATUAL")]
    pub stock: String,
}

/// A discontinued item line. The phase always contains the discontinuation marker.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct DiscontinuedRecord {
    #[serde(rename = "PDV")]
    pub pdv: String,
    #[serde(rename = "SKU")]
    pub sku: String,
    #[serde(rename = "SKU_PARA")]
    pub replacement_sku: String,
    #[serde(rename = "DESCRIÇÃO")]
    pub description: String,
    #[serde(rename = "ESTOQUE ATUAL")]
    pub stock: String,
    #[serde(rename = "FASES DO PRODUTO")]
    pub phase: String,
    #[serde(rename = "MARCA")]
    pub brand: String,
}

/// Common view over both record classes, used by the per-outlet emitters.
pub trait OutletRecord: Serialize {
    /// Header row for this record class.
    const HEADERS: &'static [&'static str];

    fn outlet(&self) -> &str;

    fn sku(&self) -> &str;

    /// Cell values in [`Self::HEADERS`] order.
    fn cells(&self) -> Vec<&str>;
}

impl OutletRecord for Record {
    const HEADERS: &'static [&'static str] = &RECORD_FIELDS;

    fn outlet(&self) -> &str {
        &self.pdv
    }

    fn sku(&self) -> &str {
        &self.sku
    }

    fn cells(&self) -> Vec<&str> {
        vec![
            self.pdv.as_str(),
            self.sku.as_str(),
            self.description.as_str(),
            self.brand.as_str(),
            self.curve.as_str(),
            self.stock.as_str(),
        ]
    }
}

impl OutletRecord for DiscontinuedRecord {
    const HEADERS: &'static [&'static str] = &DISCONTINUED_FIELDS;

    fn outlet(&self) -> &str {
        &self.pdv
    }

    fn sku(&self) -> &str {
        &self.sku
    }

    fn cells(&self) -> Vec<&str> {
        vec![
            self.pdv.as_str(),
            self.sku.as_str(),
            self.replacement_sku.as_str(),
            self.description.as_str(),
            self.stock.as_str(),
            self.phase.as_str(),
            self.brand.as_str(),
        ]
    }
}
