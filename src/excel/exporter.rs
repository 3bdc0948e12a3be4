//! Formatted per-outlet report workbooks
//!
//! One `.xlsx` per outlet key, with an active sheet and a discontinued sheet.
//! Both sheets share the same band layout:
//! - row 1: merged title `{sheet title} - PDV {key} - {date}`
//! - row 2: logo row
//! - row 3: header, frozen and filtered
//! - row 4 onwards: data

use crate::config::Config;
use crate::error::{StockError, StockResult};
use crate::types::{DiscontinuedRecord, OutletRecord, Record, CURVE_FIELD};
use crate::writer::atomic::write_atomic;
use crate::writer::flat::outlet_file_name;
use crate::writer::outlet::OutletKeys;
use rust_xlsxwriter::{
    Color, Format, FormatAlign, FormatBorder, Image, Workbook, Worksheet, XlsxError,
};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const TITLE_ROW: u32 = 0;
const LOGO_ROW: u32 = 1;
const HEADER_ROW: u32 = 2;
const FIRST_DATA_ROW: u32 = 3;

const LOGO_ROW_HEIGHT: f64 = 60.0;
const DEFAULT_COLUMN_WIDTH: f64 = 15.0;

const GREEN: u32 = 0xC6EFCE;
const YELLOW: u32 = 0xFFEB9C;
const RED: u32 = 0xFFC7CE;

/// Fixed width for a known column name.
pub fn column_width(name: &str) -> f64 {
    match name {
        "PDV" => 18.0,
        "SKU" | "SKU_PARA" => 14.0,
        "DESCRIÇÃO" => 50.0,
        "MARCA" => 10.0,
        "CURVA" => 9.0,
        "ESTOQUE_ATUAL" | "ESTOQUE ATUAL" => 16.0,
        "FASES DO PRODUTO" => 24.0,
        _ => DEFAULT_COLUMN_WIDTH,
    }
}

/// Background for a CURVA cell: A/B green, C yellow, D/E red. Anything else stays unfilled.
pub fn curve_fill(value: &str) -> Option<Color> {
    match value.trim().to_uppercase().as_str() {
        "A" | "B" => Some(Color::RGB(GREEN)),
        "C" => Some(Color::RGB(YELLOW)),
        "D" | "E" => Some(Color::RGB(RED)),
        _ => None,
    }
}

fn export_error(context: &str) -> impl Fn(XlsxError) -> StockError + '_ {
    move |e| StockError::Export(format!("{}: {}", context, e))
}

/// Builds and writes the per-outlet report workbooks.
pub struct ReportExporter {
    dir: PathBuf,
    basename: String,
    date: String,
    main_sheet: String,
    discontinued_sheet: String,
    keys: OutletKeys,
    logo: Option<Image>,
}

impl ReportExporter {
    pub fn from_config(config: &Config, date: &str) -> StockResult<Self> {
        Ok(Self {
            dir: config.report_dir(date),
            basename: config.report_basename.clone(),
            date: date.to_string(),
            main_sheet: config.report_sheet_main.clone(),
            discontinued_sheet: config.report_sheet_disc.clone(),
            keys: OutletKeys::new(&config.no_outlet_label)?,
            logo: load_logo(config.logo_path.as_deref()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write one workbook per outlet key found in either record set.
    ///
    /// File names depend only on the key and the run date, so the directory
    /// contents do not depend on the order outlets are processed in.
    pub fn export(
        &self,
        active: &[Record],
        discontinued: &[DiscontinuedRecord],
    ) -> StockResult<BTreeMap<String, PathBuf>> {
        let active_groups = self.keys.group(active);
        let discontinued_groups = self.keys.group(discontinued);

        let outlets: BTreeSet<&String> = active_groups
            .keys()
            .chain(discontinued_groups.keys())
            .collect();

        let mut paths = BTreeMap::new();
        for key in outlets {
            let active_rows = active_groups.get(key).map(Vec::as_slice).unwrap_or(&[]);
            let discontinued_rows = discontinued_groups
                .get(key)
                .map(Vec::as_slice)
                .unwrap_or(&[]);

            let buffer = self.build_workbook(key, active_rows, discontinued_rows)?;
            let path = self
                .dir
                .join(outlet_file_name(&self.basename, &self.date, key, "xlsx"));
            write_atomic(&path, |out| Ok(out.write_all(&buffer)?))?;

            debug!(
                outlet = %key,
                active = active_rows.len(),
                discontinued = discontinued_rows.len(),
                path = %path.display(),
                "Report workbook written"
            );
            paths.insert(key.clone(), path);
        }

        info!(files = paths.len(), dir = %self.dir.display(), "Report workbooks written");
        Ok(paths)
    }

    /// Serialized two-sheet workbook for one outlet.
    pub fn build_workbook(
        &self,
        key: &str,
        active: &[&Record],
        discontinued: &[&DiscontinuedRecord],
    ) -> StockResult<Vec<u8>> {
        let mut workbook = Workbook::new();

        let worksheet = workbook.add_worksheet();
        self.write_sheet(worksheet, &self.main_sheet, key, active)?;

        let worksheet = workbook.add_worksheet();
        self.write_sheet(worksheet, &self.discontinued_sheet, key, discontinued)?;

        workbook
            .save_to_buffer()
            .map_err(export_error("Failed to build report workbook"))
    }

    fn write_sheet<R: OutletRecord>(
        &self,
        worksheet: &mut Worksheet,
        title: &str,
        key: &str,
        rows: &[&R],
    ) -> StockResult<()> {
        worksheet
            .set_name(title)
            .map_err(export_error("Failed to set worksheet name"))?;

        let headers = R::HEADERS;
        let last_col = (headers.len() - 1) as u16;

        let title_format = Format::new()
            .set_bold()
            .set_font_size(14)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter);
        let header_format = Format::new()
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(0x1F4E78))
            .set_border(FormatBorder::Thin)
            .set_align(FormatAlign::Center);
        let cell_format = Format::new().set_border(FormatBorder::Thin);

        worksheet
            .merge_range(
                TITLE_ROW,
                0,
                TITLE_ROW,
                last_col,
                &format!("{} - PDV {} - {}", title, key, self.date),
                &title_format,
            )
            .map_err(export_error("Failed to write title"))?;

        worksheet
            .set_row_height(LOGO_ROW, LOGO_ROW_HEIGHT)
            .map_err(export_error("Failed to size logo row"))?;
        if let Some(logo) = &self.logo {
            worksheet
                .insert_image_fit_to_cell(LOGO_ROW, 0, logo, true)
                .map_err(export_error("Failed to insert logo"))?;
        }

        for (col, name) in headers.iter().enumerate() {
            let col = col as u16;
            worksheet
                .write_string_with_format(HEADER_ROW, col, *name, &header_format)
                .map_err(export_error("Failed to write header"))?;
            worksheet
                .set_column_width(col, column_width(name))
                .map_err(export_error("Failed to set column width"))?;
        }

        let curve_col = headers.iter().position(|h| *h == CURVE_FIELD);

        for (idx, record) in rows.iter().enumerate() {
            let row = FIRST_DATA_ROW + idx as u32;
            for (col, value) in record.cells().into_iter().enumerate() {
                let fill = if Some(col) == curve_col {
                    curve_fill(value)
                } else {
                    None
                };
                let format = match fill {
                    Some(color) => cell_format.clone().set_background_color(color),
                    None => cell_format.clone(),
                };
                worksheet
                    .write_string_with_format(row, col as u16, value, &format)
                    .map_err(export_error("Failed to write cell"))?;
            }
        }

        worksheet
            .set_freeze_panes(FIRST_DATA_ROW, 0)
            .map_err(export_error("Failed to freeze header"))?;
        let last_row = HEADER_ROW + rows.len() as u32;
        worksheet
            .autofilter(HEADER_ROW, 0, last_row, last_col)
            .map_err(export_error("Failed to add autofilter"))?;

        Ok(())
    }
}

/// Logo image, if configured and readable. A missing logo is not an error.
fn load_logo(path: Option<&Path>) -> Option<Image> {
    let path = path?;
    if !path.is_file() {
        warn!(path = %path.display(), "Logo not found, reports will have an empty logo row");
        return None;
    }
    match Image::new(path) {
        Ok(image) => Some(image),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Logo could not be loaded");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook, Data, Reader, Xlsx};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn rec(pdv: &str, sku: &str, curve: &str) -> Record {
        Record {
            pdv: pdv.to_string(),
            sku: sku.to_string(),
            description: format!("Item {}", sku),
            brand: "EUD".to_string(),
            curve: curve.to_string(),
            stock: "2".to_string(),
        }
    }

    fn disc(pdv: &str, sku: &str) -> DiscontinuedRecord {
        DiscontinuedRecord {
            pdv: pdv.to_string(),
            sku: sku.to_string(),
            replacement_sku: String::new(),
            description: "Antigo".to_string(),
            stock: "1".to_string(),
            phase: "Descontinuado".to_string(),
            brand: "BOT".to_string(),
        }
    }

    fn exporter(temp: &TempDir) -> ReportExporter {
        let mut config = Config::new(temp.path());
        config.logo_path = None;
        ReportExporter::from_config(&config, "09_03_2025").unwrap()
    }

    #[test]
    fn test_curve_fill() {
        assert_eq!(curve_fill("A"), Some(Color::RGB(GREEN)));
        assert_eq!(curve_fill("a"), curve_fill("A"));
        assert_eq!(curve_fill(" b "), Some(Color::RGB(GREEN)));
        assert_eq!(curve_fill("C"), Some(Color::RGB(YELLOW)));
        assert_eq!(curve_fill("d"), Some(Color::RGB(RED)));
        assert_eq!(curve_fill("E"), Some(Color::RGB(RED)));
        assert_eq!(curve_fill("F"), None);
        assert_eq!(curve_fill(""), None);
        assert_eq!(curve_fill("AB"), None);
    }

    #[test]
    fn test_column_widths() {
        assert_eq!(column_width("DESCRIÇÃO"), 50.0);
        assert_eq!(column_width("ESTOQUE_ATUAL"), column_width("ESTOQUE ATUAL"));
        assert_eq!(column_width("OUTRA"), DEFAULT_COLUMN_WIDTH);
    }

    #[test]
    fn test_one_workbook_per_outlet_in_either_set() {
        let temp = TempDir::new().unwrap();
        let exporter = exporter(&temp);

        let active = vec![rec("Loja 01", "2", "A"), rec("Loja-01", "1", "c")];
        let discontinued = vec![disc("Loja 03", "9")];
        let paths = exporter.export(&active, &discontinued).unwrap();

        assert_eq!(paths.keys().collect::<Vec<_>>(), vec!["Loja_01", "Loja_03"]);
        assert_eq!(
            paths["Loja_01"],
            temp.path()
                .join("output")
                .join("relatorios_finalizado_09_03_2025")
                .join("Relatorio_09_03_2025_PDV_Loja_01.xlsx")
        );

        let mut book: Xlsx<_> = open_workbook(&paths["Loja_01"]).unwrap();
        assert_eq!(book.sheet_names(), vec!["Estoque sem Giro", "Descontinuados"]);

        let main = book.worksheet_range("Estoque sem Giro").unwrap();
        assert_eq!(
            main.get_value((0, 0)),
            Some(&Data::String("Estoque sem Giro - PDV Loja_01 - 09_03_2025".into()))
        );
        assert_eq!(main.get_value((2, 1)), Some(&Data::String("SKU".into())));
        assert_eq!(main.get_value((3, 1)), Some(&Data::String("1".into())));
        assert_eq!(main.get_value((4, 1)), Some(&Data::String("2".into())));
        assert_eq!(main.get_value((3, 4)), Some(&Data::String("c".into())));

        // Discontinued sheet keeps its header even without rows
        let disc_sheet = book.worksheet_range("Descontinuados").unwrap();
        assert_eq!(
            disc_sheet.get_value((2, 2)),
            Some(&Data::String("SKU_PARA".into()))
        );
        assert_eq!(disc_sheet.get_value((3, 1)), None);

        // Outlet with only discontinued records still gets a header-only active sheet
        let mut book: Xlsx<_> = open_workbook(&paths["Loja_03"]).unwrap();
        let main = book.worksheet_range("Estoque sem Giro").unwrap();
        assert_eq!(main.get_value((2, 0)), Some(&Data::String("PDV".into())));
        assert_eq!(main.get_value((3, 0)), None);
        let disc_sheet = book.worksheet_range("Descontinuados").unwrap();
        assert_eq!(disc_sheet.get_value((3, 1)), Some(&Data::String("9".into())));
    }

    #[test]
    fn test_no_records_no_workbooks() {
        let temp = TempDir::new().unwrap();
        let exporter = exporter(&temp);
        assert!(exporter.export(&[], &[]).unwrap().is_empty());
        assert!(!exporter.dir().exists());
    }

    #[test]
    fn test_missing_logo_is_not_an_error() {
        let temp = TempDir::new().unwrap();
        let config = Config::new(temp.path());
        let exporter = ReportExporter::from_config(&config, "09_03_2025").unwrap();
        assert!(exporter.logo.is_none());
        let paths = exporter.export(&[rec("Loja 01", "1", "A")], &[]).unwrap();
        assert!(paths["Loja_01"].is_file());
    }
}
