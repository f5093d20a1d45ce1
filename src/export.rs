//! Download/export of the sheet currently in view. Spreadsheet output goes
//! through rust_xlsxwriter, CSV through the csv crate (which owns quoting and
//! escaping).

use std::path::{Path, PathBuf};
use tracing::info;

use crate::domain::SvError;
use crate::sheet::{Cell, Sheet};

pub const DEFAULT_FILENAME: &str = "downloaded_file";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "xlsx" => Some(ExportFormat::Xlsx),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

/// Write `sheet` to `<dir>/<filename>.<ext>`. A blank filename falls back to
/// the default download name.
pub fn export(
    sheet: &Sheet,
    filename: &str,
    format: ExportFormat,
    dir: &Path,
) -> Result<PathBuf, SvError> {
    let stem = match filename.trim() {
        "" => DEFAULT_FILENAME,
        name => name,
    };
    let path = dir.join(format!("{}.{}", stem, format.extension()));
    match format {
        ExportFormat::Xlsx => write_xlsx(sheet, &path)?,
        ExportFormat::Csv => write_csv(sheet, &path)?,
    }
    info!(
        "Exported {} rows x {} columns to {:?}",
        sheet.nrows(),
        sheet.ncols(),
        path
    );
    Ok(path)
}

fn write_csv(sheet: &Sheet, path: &Path) -> Result<(), SvError> {
    let mut writer = csv::WriterBuilder::new().from_path(path)?;
    writer.write_record(sheet.columns.iter().map(|c| c.name.as_str()))?;
    for row in 0..sheet.nrows() {
        let record: Vec<String> = sheet
            .columns
            .iter()
            .map(|c| c.data[row].export_string())
            .collect();
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_xlsx(sheet: &Sheet, path: &Path) -> Result<(), SvError> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let worksheet = workbook.add_worksheet();
    for (col, column) in sheet.columns.iter().enumerate() {
        worksheet.write_string(0, col as u16, column.name.as_str())?;
        for (row, cell) in column.data.iter().enumerate() {
            match cell {
                Cell::Empty => {}
                Cell::Number(n) => {
                    worksheet.write_number(row as u32 + 1, col as u16, *n)?;
                }
                Cell::Text(s) => {
                    if !s.is_empty() {
                        worksheet.write_string(row as u32 + 1, col as u16, s.as_str())?;
                    }
                }
            }
        }
    }
    workbook.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::Column;

    fn sample_sheet() -> Sheet {
        Sheet::new(
            "sample",
            vec![
                Column::new("A", vec!["1".into(), "2".into()]),
                Column::new("B", vec![Cell::Empty, "x,y".into()]),
                Column::new("C", vec![Cell::Number(2.5), Cell::Number(3.0)]),
            ],
        )
    }

    #[test]
    fn csv_export_quotes_and_leaves_nulls_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = export(&sample_sheet(), "out", ExportFormat::Csv, dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "out.csv");
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "A,B,C");
        assert_eq!(lines[1], "1,,2.5");
        // comma forces quoting, integral floats print without a decimal point
        assert_eq!(lines[2], "2,\"x,y\",3");
    }

    #[test]
    fn blank_filename_uses_the_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = export(&sample_sheet(), "  ", ExportFormat::Csv, dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "downloaded_file.csv");
    }

    #[test]
    fn xlsx_export_writes_a_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = export(&sample_sheet(), "book", ExportFormat::Xlsx, dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), "book.xlsx");
        let size = std::fs::metadata(&path).unwrap().len();
        assert!(size > 0);
    }

    #[test]
    fn format_parsing() {
        assert_eq!(ExportFormat::parse("csv"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::parse(" XLSX "), Some(ExportFormat::Xlsx));
        assert_eq!(ExportFormat::parse(""), Some(ExportFormat::Xlsx));
        assert_eq!(ExportFormat::parse("pdf"), None);
    }
}
