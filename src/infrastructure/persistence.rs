//! Reading and writing the record table as spreadsheet files.
//!
//! Workbooks are read with calamine (first sheet only) and written with
//! rust_xlsxwriter; CSV goes through the `csv` crate. Both directions pass
//! through the domain's [`RawSheet`] / [`RecordTable`] so that format details
//! stay out of the core.

use super::errors::{LeadsheetError, Result};
use crate::domain::{Column, Field, LoadReport, RawSheet, RecordTable};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use rust_xlsxwriter::{Format, Workbook};
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// Default name for exported files.
pub const DEFAULT_EXPORT: &str = "data.xlsx";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Any workbook calamine can open: xlsx, xlsm, xlsb, xls, ods.
    Workbook,
    Csv,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(FileFormat::Workbook),
            "csv" => Ok(FileFormat::Csv),
            _ => Err(LeadsheetError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Format used when writing to `path`. Only `.xlsx` and `.csv` can be written.
    pub fn for_export(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
            Some("xlsx") => Ok(FileFormat::Workbook),
            Some("csv") => Ok(FileFormat::Csv),
            _ => Err(LeadsheetError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

pub struct WorkbookRepository;

impl WorkbookRepository {
    /// Loads and normalizes the first sheet of the file at `path`.
    pub fn load_table(path: &Path) -> Result<(RecordTable, LoadReport)> {
        let format = FileFormat::from_path(path)?;
        let bytes = fs::read(path)?;
        let sheet = Self::read_sheet(bytes, format)?;
        let (table, report) = RecordTable::from_sheet(sheet);
        log::info!("loaded {} records from {}", table.len(), path.display());
        Ok((table, report))
    }

    pub fn read_sheet(bytes: Vec<u8>, format: FileFormat) -> Result<RawSheet> {
        match format {
            FileFormat::Workbook => read_workbook(bytes),
            FileFormat::Csv => read_csv(&bytes),
        }
    }

    pub fn export(table: &RecordTable, format: FileFormat) -> Result<Vec<u8>> {
        match format {
            FileFormat::Workbook => export_xlsx(table),
            FileFormat::Csv => export_csv(table),
        }
    }

    /// Writes the table to `path`, choosing the format from its extension.
    pub fn export_to_path(table: &RecordTable, path: &Path) -> Result<usize> {
        let format = FileFormat::for_export(path)?;
        let bytes = Self::export(table, format)?;
        fs::write(path, &bytes)?;
        log::info!("exported {} records to {}", table.len(), path.display());
        Ok(table.len())
    }
}

fn read_workbook(bytes: Vec<u8>) -> Result<RawSheet> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LeadsheetError::NoSheets)??;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .ok_or(LeadsheetError::MissingHeader)?
        .iter()
        .map(|cell| cell_text(cell).unwrap_or_default())
        .collect();
    let rows = rows
        .map(|row| row.iter().map(cell_text).collect())
        .collect();

    Ok(RawSheet { headers, rows })
}

fn read_csv(bytes: &[u8]) -> Result<RawSheet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut records = reader.records();
    let mut headers: Vec<String> = match records.next() {
        Some(header) => header?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
                h.to_string()
            })
            .collect(),
        None => return Err(LeadsheetError::MissingHeader),
    };

    let mut rows = Vec::new();
    for record in records {
        rows.push(
            record?
                .iter()
                .map(|field| (!field.is_empty()).then(|| field.to_string()))
                .collect(),
        );
    }

    // Cells past the header row still need a column.
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    if width > headers.len() {
        log::warn!("{} csv columns have no header", width - headers.len());
        headers.resize(width, String::new());
    }
    Ok(RawSheet { headers, rows })
}

/// Textual form of a cell; `None` for empty cells.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(v) => Some(v.to_string()),
        Data::Float(v) => Some(format_number(*v)),
        Data::Bool(v) => Some(if *v { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(v) => Some(format_number(v.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::Error(e) => Some(e.to_string()),
    }
}

/// Whole numbers print without a fractional part (`912345678.0` -> `912345678`).
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn export_xlsx(table: &RecordTable) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Sheet1")?;

    for (col, header) in table.headers().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
    }

    for (index, record) in table.records().iter().enumerate() {
        let row = (index + 1) as u32;
        for (col, column) in table.columns().iter().enumerate() {
            let col = col as u16;
            match column {
                Column::Field(Field::Id) => {
                    worksheet.write_number(row, col, record.id.0 as f64)?;
                }
                _ => {
                    worksheet.write_string(row, col, table.cell(record, *column))?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn export_csv(table: &RecordTable) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.headers())?;
    for record in table.records() {
        let row: Vec<_> = table.columns().iter().map(|c| table.cell(record, *c)).collect();
        writer.write_record(row.iter().map(|cell| cell.as_bytes()))?;
    }
    writer
        .into_inner()
        .map_err(|e| LeadsheetError::Io(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_detection() {
        assert_eq!(FileFormat::from_path(&PathBuf::from("a.XLSX")).unwrap(), FileFormat::Workbook);
        assert_eq!(FileFormat::from_path(&PathBuf::from("a.ods")).unwrap(), FileFormat::Workbook);
        assert_eq!(FileFormat::from_path(&PathBuf::from("a.csv")).unwrap(), FileFormat::Csv);
        assert!(FileFormat::from_path(&PathBuf::from("a.txt")).is_err());
        assert!(FileFormat::for_export(&PathBuf::from("a.xls")).is_err());
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(912345678.0), "912345678");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(-3.0), "-3");
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Empty), None);
        assert_eq!(cell_text(&Data::Float(912345678.0)).as_deref(), Some("912345678"));
        assert_eq!(cell_text(&Data::Int(42)).as_deref(), Some("42"));
        assert_eq!(cell_text(&Data::String("x".into())).as_deref(), Some("x"));
    }

    #[test]
    fn test_read_csv_marks_empty_cells() {
        let sheet = read_csv(b"\xEF\xBB\xBFcompany,city\nAcme,\n").unwrap();
        assert_eq!(sheet.headers, vec!["company", "city"]);
        assert_eq!(sheet.rows, vec![vec![Some("Acme".to_string()), None]]);
    }

    #[test]
    fn test_read_csv_keeps_cells_past_header() {
        let sheet = read_csv(b"company,city\nAcme,Paris,extra-note\n").unwrap();
        assert_eq!(sheet.headers, vec!["company", "city", ""]);

        let (table, _) = RecordTable::from_sheet(sheet);
        let exported = String::from_utf8(export_csv(&table).unwrap()).unwrap();
        let mut lines = exported.lines();
        assert!(lines.next().unwrap().starts_with("ID,company,city,Unnamed: 2,"));
        assert!(lines.next().unwrap().starts_with("1,Acme,Paris,extra-note,"));
    }

    #[test]
    fn test_read_csv_empty_input() {
        assert!(matches!(read_csv(b""), Err(LeadsheetError::MissingHeader)));
    }

    #[test]
    fn test_csv_export_reload() {
        let sheet = read_csv(b"company,Activity,phone\nAcme,Bakery,912345678\n").unwrap();
        let (table, _) = RecordTable::from_sheet(sheet);
        let bytes = export_csv(&table).unwrap();
        let (reloaded, _) = RecordTable::from_sheet(read_csv(&bytes).unwrap());
        assert_eq!(reloaded.records(), table.records());
        assert_eq!(reloaded.headers().collect::<Vec<_>>(), table.headers().collect::<Vec<_>>());
    }
}
