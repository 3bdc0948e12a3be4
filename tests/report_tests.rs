//! End-to-end tests: input workbook in, every report artifact out

use calamine::{open_workbook, Data, Reader, Xlsx};
use estoque_sem_giro::cli::{process_latest, RunOptions};
use estoque_sem_giro::config::Config;
use estoque_sem_giro::excel::ValueMode;
use estoque_sem_giro::StockError;
use pretty_assertions::assert_eq;
use rust_xlsxwriter::Workbook;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const DATE: &str = "09_03_2025";
const BOM: &[u8] = b"\xEF\xBB\xBF";

// ═══════════════════════════════════════════════════════════════════════════
// FIXTURES
// ═══════════════════════════════════════════════════════════════════════════

/// `(sku, replacement, description, curve, pdv, stock, phase)`
type Row<'a> = (&'a str, &'a str, &'a str, &'a str, &'a str, &'a str, &'a str);

fn write_input(path: &Path, sheets: &[(&str, &[Row])]) {
    let mut book = Workbook::new();
    for (name, rows) in sheets {
        let sheet = book.add_worksheet();
        sheet.set_name(*name).unwrap();
        for (col, label) in [
            (0, "SKU"),
            (1, "SKU PARA"),
            (2, "DESCRIÇÃO"),
            (4, "CURVA"),
            (8, "PDV"),
            (9, "ESTOQUE ATUAL"),
            (10, "FASES DO PRODUTO"),
        ] {
            sheet.write_string(0, col, label).unwrap();
        }
        for (idx, row) in rows.iter().enumerate() {
            let r = idx as u32 + 1;
            let (sku, replacement, description, curve, pdv, stock, phase) = *row;
            for (col, value) in [
                (0, sku),
                (1, replacement),
                (2, description),
                (4, curve),
                (8, pdv),
                (9, stock),
                (10, phase),
            ] {
                if !value.is_empty() {
                    sheet.write_string(r, col, value).unwrap();
                }
            }
        }
    }
    book.save(path).unwrap();
}

fn setup() -> (TempDir, Config, PathBuf) {
    let temp = TempDir::new().unwrap();
    let config = Config::new(temp.path().join("data"));
    config.ensure_dirs().unwrap();
    let input = config.input_dir.join("estoque.xlsx");
    write_input(
        &input,
        &[
            (
                "EUD",
                &[
                    ("1002", "", "Base", "B", "Loja 01", "5", "Ativo"),
                    ("1001", "2001", "Batom", "a", "Loja-01", "3", "Descontinuado"),
                    ("1004", "", "Pó", "F", "", "2", ""),
                ],
            ),
            (
                "BOT",
                &[("2001", "", "Perfume, 100ml", "C", "Loja 02", "1", "")],
            ),
            ("QDB", &[("3001", "", "Sabonete", "d", "Loja 02", "7", "")]),
        ],
    );
    (temp, config, input)
}

fn options() -> RunOptions {
    RunOptions {
        archive: true,
        run_date: Some(DATE.to_string()),
    }
}

fn read_csv(path: &Path) -> String {
    let bytes = fs::read(path).unwrap();
    assert!(bytes.starts_with(BOM), "missing BOM in {}", path.display());
    String::from_utf8(bytes[BOM.len()..].to_vec()).unwrap()
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ═══════════════════════════════════════════════════════════════════════════
// FULL RUN
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_full_run_writes_every_artifact() {
    let (_temp, config, input) = setup();

    let summary = process_latest(&config, &options()).unwrap();

    assert_eq!(summary.mode, ValueMode::Cached);
    assert_eq!(summary.active_records, 4);
    assert_eq!(summary.discontinued_records, 1);
    assert_eq!(summary.run_date, DATE);

    assert_eq!(
        file_names(&config.output_dir),
        vec![
            "Estoque_sem_giro_09_03_2025.csv",
            "descontinuados_09_03_2025",
            "por_pdv_09_03_2025",
            "relatorios_finalizado_09_03_2025",
        ]
    );

    assert_eq!(
        read_csv(&summary.consolidated),
        "PDV,SKU,DESCRIÇÃO,MARCA,CURVA,ESTOQUE_ATUAL\n\
         Loja 01,1002,Base,EUD,B,5\n\
         Loja 02,2001,\"Perfume, 100ml\",BOT,C,1\n\
         Loja 02,3001,Sabonete,QDB,d,7\n\
         Loja-01,1001,Batom,EUD,a,3\n"
    );

    assert_eq!(
        file_names(&config.outlet_dir(DATE)),
        vec![
            "Estoque_sem_giro_09_03_2025_PDV_Loja_01.csv",
            "Estoque_sem_giro_09_03_2025_PDV_Loja_02.csv",
        ]
    );
    assert_eq!(
        read_csv(&summary.outlet_csvs["Loja_01"]),
        "PDV,SKU,DESCRIÇÃO,MARCA,CURVA,ESTOQUE_ATUAL\n\
         Loja-01,1001,Batom,EUD,a,3\n\
         Loja 01,1002,Base,EUD,B,5\n"
    );

    assert_eq!(
        file_names(&config.discontinued_dir(DATE)),
        vec!["Descontinuados_09_03_2025_PDV_Loja_01.csv"]
    );
    assert_eq!(
        read_csv(&summary.discontinued_csvs["Loja_01"]),
        "PDV,SKU,SKU_PARA,DESCRIÇÃO,ESTOQUE ATUAL,FASES DO PRODUTO,MARCA\n\
         Loja-01,1001,2001,Batom,3,Descontinuado,EUD\n"
    );

    assert_eq!(
        file_names(&config.report_dir(DATE)),
        vec![
            "Relatorio_09_03_2025_PDV_Loja_01.xlsx",
            "Relatorio_09_03_2025_PDV_Loja_02.xlsx",
        ]
    );

    // Input moved to the archive
    assert!(!input.exists());
    let archived = summary.archived.unwrap();
    assert_eq!(archived.parent().unwrap(), config.archive_dir);
    let name = archived.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("estoque__processado_"), "{}", name);
    assert!(name.ends_with(".xlsx"));
}

#[test]
fn test_report_workbook_contents() {
    let (_temp, config, _input) = setup();
    let summary = process_latest(&config, &options()).unwrap();

    let mut book: Xlsx<_> = open_workbook(&summary.reports["Loja_02"]).unwrap();
    assert_eq!(book.sheet_names(), vec!["Estoque sem Giro", "Descontinuados"]);

    let main = book.worksheet_range("Estoque sem Giro").unwrap();
    assert_eq!(
        main.get_value((0, 0)),
        Some(&Data::String("Estoque sem Giro - PDV Loja_02 - 09_03_2025".into()))
    );
    let header: Vec<String> = (0..6)
        .map(|col| main.get_value((2, col)).unwrap().to_string())
        .collect();
    assert_eq!(
        header,
        vec!["PDV", "SKU", "DESCRIÇÃO", "MARCA", "CURVA", "ESTOQUE_ATUAL"]
    );
    assert_eq!(main.get_value((3, 1)), Some(&Data::String("2001".into())));
    assert_eq!(main.get_value((4, 1)), Some(&Data::String("3001".into())));

    let disc = book.worksheet_range("Descontinuados").unwrap();
    assert_eq!(
        disc.get_value((0, 0)),
        Some(&Data::String("Descontinuados - PDV Loja_02 - 09_03_2025".into()))
    );
    assert_eq!(disc.get_value((2, 5)), Some(&Data::String("FASES DO PRODUTO".into())));
    assert_eq!(disc.get_value((3, 0)), None);
}

#[test]
fn test_rerun_is_byte_identical() {
    let (_temp, config, _input) = setup();
    let keep_input = RunOptions {
        archive: false,
        run_date: Some(DATE.to_string()),
    };

    let first = process_latest(&config, &keep_input).unwrap();
    let consolidated = fs::read(&first.consolidated).unwrap();
    let outlet = fs::read(&first.outlet_csvs["Loja_02"]).unwrap();

    let second = process_latest(&config, &keep_input).unwrap();
    assert_eq!(fs::read(&second.consolidated).unwrap(), consolidated);
    assert_eq!(fs::read(&second.outlet_csvs["Loja_02"]).unwrap(), outlet);
    assert!(second.archived.is_none());
}

#[test]
fn test_no_discontinued_skips_directory() {
    let temp = TempDir::new().unwrap();
    let config = Config::new(temp.path().join("data"));
    config.ensure_dirs().unwrap();
    write_input(
        &config.input_dir.join("estoque.xlsx"),
        &[("EUD", &[("1001", "", "Batom", "A", "Loja 01", "3", "Ativo")])],
    );

    let summary = process_latest(&config, &options()).unwrap();
    assert!(summary.discontinued_csvs.is_empty());
    assert!(!config.discontinued_dir(DATE).exists());
    // The outlet still gets its two-sheet workbook
    assert_eq!(summary.reports.len(), 1);
}

#[test]
fn test_by_outlet_csvs_can_be_disabled() {
    let (_temp, mut config, _input) = setup();
    config.generate_by_outlet = false;

    let summary = process_latest(&config, &options()).unwrap();
    assert!(summary.outlet_csvs.is_empty());
    assert!(!config.outlet_dir(DATE).exists());
    assert_eq!(summary.reports.len(), 2);
}

#[test]
fn test_latest_input_wins() {
    let (_temp, config, input) = setup();
    let older = config.input_dir.join("antigo.xlsx");
    write_input(&older, &[("EUD", &[("9", "", "", "", "Loja 09", "", "")])]);
    let old_time = fs::metadata(&input).unwrap().modified().unwrap()
        - std::time::Duration::from_secs(3600);
    fs::File::options()
        .write(true)
        .open(&older)
        .unwrap()
        .set_modified(old_time)
        .unwrap();

    let summary = process_latest(&config, &options()).unwrap();
    assert_eq!(summary.input, input);
    assert!(older.exists());
}

#[test]
fn test_empty_workbook_is_exhausted_and_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let config = Config::new(temp.path().join("data"));
    config.ensure_dirs().unwrap();
    let input = config.input_dir.join("vazio.xlsx");
    write_input(&input, &[("EUD", &[]), ("BOT", &[])]);

    let result = process_latest(&config, &options());
    assert!(matches!(result, Err(StockError::ExtractionExhausted { .. })));
    assert!(file_names(&config.output_dir).is_empty());
    assert!(input.exists());
    assert!(file_names(&config.archive_dir).is_empty());
}
