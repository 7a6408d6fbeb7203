use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use tracing::{debug, info};

use crate::errors::CoreError;
use crate::models::table::{CellValue, RawTable};

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];

/// How the uploaded bytes are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    /// Any workbook calamine understands (xlsx, xlsm, xlsb, xls, ods)
    Excel,
    Csv,
}

impl SpreadsheetFormat {
    /// Format from a file name's extension (case-insensitive).
    ///
    /// Returns `Ok(None)` when there is no extension, and an error for an
    /// extension that is neither a workbook nor CSV.
    pub fn from_file_name(name: &str) -> Result<Option<Self>, CoreError> {
        let Some(ext) = Path::new(name).extension().and_then(|e| e.to_str()) else {
            return Ok(None);
        };
        match ext.to_ascii_lowercase().as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Some(SpreadsheetFormat::Excel)),
            "csv" => Ok(Some(SpreadsheetFormat::Csv)),
            other => Err(CoreError::UnsupportedFormat(format!(".{other}"))),
        }
    }

    /// Guess from content: ZIP or OLE containers are workbooks, anything
    /// else is treated as CSV text.
    #[must_use]
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(ZIP_MAGIC) || bytes.starts_with(OLE_MAGIC) {
            SpreadsheetFormat::Excel
        } else {
            SpreadsheetFormat::Csv
        }
    }
}

/// Reads an uploaded holdings file into a `RawTable`.
///
/// Only the first worksheet is read and its first row is the header.
/// No column is interpreted here; that is `AnalyticsService::derive`'s job.
pub struct ImportService;

impl ImportService {
    pub fn new() -> Self {
        Self
    }

    /// Parse in-memory file contents. `file_name` (if known) selects the
    /// format by extension; otherwise the content is sniffed.
    pub fn read_bytes(&self, bytes: &[u8], file_name: Option<&str>) -> Result<RawTable, CoreError> {
        let format = match file_name {
            Some(name) => SpreadsheetFormat::from_file_name(name)?,
            None => None,
        }
        .unwrap_or_else(|| SpreadsheetFormat::sniff(bytes));

        debug!(?format, size = bytes.len(), "reading holdings file");
        let table = match format {
            SpreadsheetFormat::Excel => Self::read_workbook(bytes)?,
            SpreadsheetFormat::Csv => Self::read_csv(bytes)?,
        };
        info!(
            columns = table.headers.len(),
            rows = table.row_count(),
            "holdings file read"
        );
        Ok(table)
    }

    /// Read a holdings file from disk (native only).
    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<RawTable, CoreError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path.file_name().and_then(|n| n.to_str());
        self.read_bytes(&bytes, name)
    }

    fn read_workbook(bytes: &[u8]) -> Result<RawTable, CoreError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(CoreError::EmptySheet)??;

        let mut rows = range.rows();
        let headers: Vec<String> = rows
            .next()
            .ok_or(CoreError::EmptySheet)?
            .iter()
            .map(header_text)
            .collect();
        let body = rows
            .map(|row| row.iter().map(cell_value).collect())
            .collect();

        Ok(RawTable::new(headers, body))
    }

    fn read_csv(bytes: &[u8]) -> Result<RawTable, CoreError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                // Spreadsheet exports often prefix UTF-8 CSV with a BOM.
                if i == 0 {
                    h.trim_start_matches('\u{feff}').to_string()
                } else {
                    h.to_string()
                }
            })
            .collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(CoreError::EmptySheet);
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(
                record
                    .iter()
                    .map(|field| {
                        if field.is_empty() {
                            CellValue::Empty
                        } else {
                            CellValue::Text(field.to_string())
                        }
                    })
                    .collect(),
            );
        }

        Ok(RawTable::new(headers, rows))
    }
}

impl Default for ImportService {
    fn default() -> Self {
        Self::new()
    }
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) => CellValue::Text(s.clone()),
        // Dates and durations are not meaningful here; keep their text.
        other => CellValue::Text(other.to_string()),
    }
}
