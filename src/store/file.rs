//! File-backed termbase store.
//!
//! The format is chosen from the file extension. Spreadsheets are read with
//! `calamine` (first worksheet); `.xlsx` files are rewritten with
//! `rust_xlsxwriter`. CSV files are read and appended with `csv`.
//!
//! Appends never modify the file in place: the complete new document is written
//! to a temporary sibling file which is then renamed over the original, so the
//! file is either fully old or fully new.

use std::fs;
use std::path::{Path, PathBuf};

use calamine::{Data, ExcelDateTime, Range, Reader, open_workbook_auto};
use chrono::Timelike;
use rust_xlsxwriter::{Format, Formula, Workbook};
use tracing::{debug, info};

use super::TermStore;
use super::rows::{EXPECTED_HEADER, RawRow, records_from_rows};
use crate::error::{BackendError, LoadError, PersistError};
use crate::models::TermRecord;
use crate::utils::{format_path_with_tilde, validate_file_size};

/// Spreadsheet formats understood by [`FileStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Xlsx,
    /// Macro-enabled workbook; rewriting would drop the macros, so read-only
    Xlsm,
    Xls,
    Ods,
    Csv,
}

impl FileFormat {
    /// Determine the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, BackendError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" => Ok(Self::Xlsx),
            "xlsm" => Ok(Self::Xlsm),
            "xls" => Ok(Self::Xls),
            "ods" => Ok(Self::Ods),
            "csv" => Ok(Self::Csv),
            "" => Err(BackendError::UnsupportedFormat(format!(
                "{} has no file extension (expected .xlsx or .csv)",
                path.display()
            ))),
            other => Err(BackendError::UnsupportedFormat(format!(
                ".{} (expected .xlsx, .xlsm, .xls, .ods or .csv)",
                other
            ))),
        }
    }

    /// Whether new rows can be written back in this format.
    pub fn is_writable(self) -> bool {
        matches!(self, Self::Xlsx | Self::Csv)
    }
}

/// Termbase stored in a local spreadsheet file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    format: FileFormat,
}

impl FileStore {
    /// Create a store for `path`. The file itself is not touched until `load`.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, BackendError> {
        let path = path.into();
        let format = FileFormat::from_path(&path)?;
        Ok(Self { path, format })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    fn read_rows(&self) -> Result<Vec<RawRow>, BackendError> {
        validate_file_size(&self.path)?;
        match self.format {
            FileFormat::Csv => read_csv_rows(&self.path),
            _ => read_sheet_rows(&self.path),
        }
    }

    fn write_with_row(&self, record: &TermRecord) -> Result<(), BackendError> {
        if !self.format.is_writable() {
            return Err(BackendError::UnsupportedFormat(format!(
                "{:?} files are read-only; convert {} to .xlsx or .csv to add terms",
                self.format,
                self.path.display()
            )));
        }

        validate_file_size(&self.path)?;
        let temp_path = temp_path_for(&self.path);

        let written = match self.format {
            FileFormat::Csv => write_csv_with_row(&self.path, &temp_path, record),
            _ => write_xlsx_with_row(&self.path, &temp_path, record),
        };

        if let Err(e) = written {
            // Best effort cleanup; the original file is untouched
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            BackendError::io(&self.path, e)
        })
    }
}

impl TermStore for FileStore {
    fn load(&self) -> Result<Vec<TermRecord>, LoadError> {
        debug!(path = %self.path.display(), format = ?self.format, "Loading termbase file");
        let rows = self.read_rows().map_err(|e| LoadError::new(self.describe(), e))?;
        let records = records_from_rows(rows, &self.describe());
        info!(path = %self.path.display(), records = records.len(), "Loaded termbase file");
        Ok(records)
    }

    fn append(&mut self, record: &TermRecord) -> Result<(), PersistError> {
        self.write_with_row(record)
            .map_err(|e| PersistError::new(self.describe(), record.clone(), e))?;
        debug!(path = %self.path.display(), %record, "Appended termbase row");
        Ok(())
    }

    fn describe(&self) -> String {
        format_path_with_tilde(&self.path)
    }

    fn location(&self) -> String {
        std::path::absolute(&self.path).unwrap_or_else(|_| self.path.clone()).display().to_string()
    }
}

/// Temporary sibling path used for atomic rewrites (`.glossary.xlsx.tmp`).
fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", file_name))
}

fn read_csv_rows(path: &Path) -> Result<Vec<RawRow>, BackendError> {
    let mut reader = csv::ReaderBuilder::new().has_headers(false).flexible(true).from_path(path)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => rows.push(Ok(record
                .iter()
                .map(|cell| if cell.is_empty() { None } else { Some(cell.to_string()) })
                .collect())),
            // Invalid UTF-8 is confined to its row; anything else is fatal
            Err(e) if matches!(e.kind(), csv::ErrorKind::Utf8 { .. }) => {
                rows.push(Err(e.to_string()));
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(rows)
}

fn read_sheet_rows(path: &Path) -> Result<Vec<RawRow>, BackendError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| BackendError::SpreadsheetRead(e.to_string()))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| BackendError::SpreadsheetRead(e.to_string()))?,
        None => return Ok(Vec::new()),
    };

    Ok(range.rows().map(|row| row.iter().map(cell_text).collect()).collect())
}

/// Text of one spreadsheet cell; `Err` when the cell holds a formula error.
///
/// Dates are rendered as ISO 8601 (`2024-03-01`, or `2024-03-01 14:30:00` when
/// the cell has a time part) and durations as `h:mm:ss`.
fn cell_text(cell: &Data) -> Result<Option<String>, String> {
    match cell {
        Data::Empty => Ok(None),
        Data::String(s) => Ok(Some(s.clone())),
        Data::Int(i) => Ok(Some(i.to_string())),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Ok(Some((*f as i64).to_string())),
        Data::Float(f) => Ok(Some(f.to_string())),
        Data::Bool(b) => Ok(Some(b.to_string())),
        Data::DateTime(dt) => Ok(Some(excel_datetime_text(dt))),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Ok(Some(s.clone())),
        Data::Error(e) => Err(format!("cell error {:?}", e)),
    }
}

fn excel_datetime_text(dt: &ExcelDateTime) -> String {
    if dt.is_duration() {
        if let Some(duration) = dt.as_duration() {
            let secs = duration.num_seconds();
            return format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60);
        }
    } else if let Some(datetime) = dt.as_datetime() {
        return if datetime.time().num_seconds_from_midnight() == 0 {
            datetime.format("%Y-%m-%d").to_string()
        } else {
            datetime.format("%Y-%m-%d %H:%M:%S").to_string()
        };
    }
    dt.as_f64().to_string()
}

fn write_csv_with_row(path: &Path, temp_path: &Path, record: &TermRecord) -> Result<(), BackendError> {
    let mut content = fs::read(path).map_err(|e| BackendError::io(path, e))?;
    let crlf = content.windows(2).any(|w| w == b"\r\n");

    if !content.is_empty() && !content.ends_with(b"\n") {
        content.extend_from_slice(if crlf { b"\r\n" } else { b"\n" });
    }

    let needs_header = content.iter().all(|b| b.is_ascii_whitespace());
    if needs_header {
        content.clear();
    }

    let terminator = if crlf { csv::Terminator::CRLF } else { csv::Terminator::Any(b'\n') };
    let mut writer = csv::WriterBuilder::new().terminator(terminator).from_writer(content);
    if needs_header {
        writer.write_record(EXPECTED_HEADER)?;
    }
    writer.write_record(record.to_row())?;
    let content = writer.into_inner().map_err(|e| BackendError::io(path, e.into_error()))?;

    fs::write(temp_path, content).map_err(|e| BackendError::io(temp_path, e))
}

fn write_xlsx_with_row(path: &Path, temp_path: &Path, record: &TermRecord) -> Result<(), BackendError> {
    let mut source =
        open_workbook_auto(path).map_err(|e| BackendError::SpreadsheetRead(e.to_string()))?;
    let sheet_names = source.sheet_names().to_vec();

    let mut workbook = Workbook::new();

    if sheet_names.is_empty() {
        let worksheet = workbook.add_worksheet();
        write_row(worksheet, 0, &EXPECTED_HEADER)?;
        write_row(worksheet, 1, &record.to_row())?;
    }

    for (sheet_idx, name) in sheet_names.iter().enumerate() {
        let range = source
            .worksheet_range(name)
            .map_err(|e| BackendError::SpreadsheetRead(e.to_string()))?;
        let formulas = source
            .worksheet_formula(name)
            .map_err(|e| BackendError::SpreadsheetRead(e.to_string()))?;

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(name)?;
        copy_range(worksheet, &range)?;
        copy_formulas(worksheet, &formulas, &range)?;

        // New rows go to the first worksheet, which is the one we read from
        if sheet_idx == 0 {
            let next_row = range
                .end()
                .into_iter()
                .chain(formulas.end())
                .map(|(row, _)| row + 1)
                .max()
                .unwrap_or(0);
            if next_row == 0 {
                write_row(worksheet, 0, &EXPECTED_HEADER)?;
                write_row(worksheet, 1, &record.to_row())?;
            } else {
                write_row(worksheet, next_row, &record.to_row())?;
            }
        }
    }

    workbook.save(temp_path)?;
    Ok(())
}

fn copy_range(worksheet: &mut rust_xlsxwriter::Worksheet, range: &Range<Data>) -> Result<(), BackendError> {
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let datetime_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
    let duration_format = Format::new().set_num_format("[h]:mm:ss");
    let (start_row, start_col) = range.start().unwrap_or((0, 0));

    for (row, col, cell) in range.used_cells() {
        let (row, col) = absolute_cell(start_row, start_col, row, col)?;

        match cell {
            Data::Empty => {}
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
                worksheet.write_string(row, col, s)?;
            }
            Data::Int(i) => {
                worksheet.write_number(row, col, *i as f64)?;
            }
            Data::Float(f) => {
                worksheet.write_number(row, col, *f)?;
            }
            Data::Bool(b) => {
                worksheet.write_boolean(row, col, *b)?;
            }
            // Kept as the serial number with a date format so it stays a date
            Data::DateTime(dt) => {
                let format = if dt.is_duration() {
                    &duration_format
                } else if dt.as_f64().fract() == 0.0 {
                    &date_format
                } else {
                    &datetime_format
                };
                worksheet.write_number_with_format(row, col, dt.as_f64(), format)?;
            }
            Data::Error(e) => {
                worksheet.write_string(row, col, e.to_string())?;
            }
        }
    }

    Ok(())
}

/// Re-create formula cells, keeping the cached value calamine read as the result.
fn copy_formulas(
    worksheet: &mut rust_xlsxwriter::Worksheet,
    formulas: &Range<String>,
    values: &Range<Data>,
) -> Result<(), BackendError> {
    let (start_row, start_col) = formulas.start().unwrap_or((0, 0));

    for (row, col, formula) in formulas.used_cells() {
        if formula.is_empty() {
            continue;
        }
        let (row, col) = absolute_cell(start_row, start_col, row, col)?;

        let mut formula = Formula::new(formula.as_str());
        if let Some(value) = values.get_value((row, u32::from(col))) {
            match cell_text(value) {
                Ok(Some(text)) => formula = formula.set_result(text),
                Ok(None) | Err(_) => {}
            }
        }
        worksheet.write_formula(row, col, formula)?;
    }

    Ok(())
}

fn absolute_cell(start_row: u32, start_col: u32, row: usize, col: usize) -> Result<(u32, u16), BackendError> {
    let col = start_col as usize + col;
    let col = u16::try_from(col)
        .map_err(|_| BackendError::SpreadsheetRead(format!("column {} out of range", col)))?;
    Ok((start_row + row as u32, col))
}

fn write_row(worksheet: &mut rust_xlsxwriter::Worksheet, row: u32, cells: &[&str]) -> Result<(), BackendError> {
    for (col, text) in cells.iter().enumerate() {
        if !text.is_empty() {
            worksheet.write_string(row, col as u16, *text)?;
        }
    }
    Ok(())
}
