//! Decoding of uploaded files into rectangular tables.
//!
//! Only the row count and the values of a named column are used downstream,
//! so every cell is kept as text.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Reader};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors that can occur while decoding an uploaded file.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Unsupported file type: {0}")]
    Unsupported(String),

    #[error("File is empty or has no data rows")]
    Empty,

    #[error("File is neither UTF-8 nor CP949 text")]
    Encoding,

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported JSON layout: {0}")]
    JsonShape(String),

    #[error("Spreadsheet read error: {0}")]
    Excel(#[from] calamine::Error),
}

/// Declared file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Json,
    Excel,
}

impl FileKind {
    /// Detect the format from a file name's extension.
    pub fn from_file_name(name: &str) -> Result<Self, TableError> {
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(FileKind::Csv),
            "json" => Ok(FileKind::Json),
            "xlsx" | "xls" => Ok(FileKind::Excel),
            "" => Err(TableError::Unsupported(name.to_string())),
            _ => Err(TableError::Unsupported(ext)),
        }
    }
}

/// Ordered columns and text rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Decode `bytes` as `kind`. A table without rows is an error.
    pub fn decode(bytes: &[u8], kind: FileKind) -> Result<Self, TableError> {
        let table = match kind {
            FileKind::Csv => Self::from_csv(bytes)?,
            FileKind::Json => Self::from_json(bytes)?,
            FileKind::Excel => Self::from_excel(bytes)?,
        };

        if table.rows.is_empty() {
            return Err(TableError::Empty);
        }

        tracing::debug!(
            kind = ?kind,
            rows = table.row_count(),
            columns = table.columns.len(),
            "table decoded"
        );
        Ok(table)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Distinct values of `column` in first-appearance order. Empty when the
    /// column does not exist.
    pub fn unique_values(&self, column: &str) -> Vec<&str> {
        let Some(idx) = self.column_index(column) else {
            return Vec::new();
        };

        let mut seen = std::collections::HashSet::new();
        self.rows
            .iter()
            .filter_map(|row| row.get(idx))
            .map(String::as_str)
            .filter(|v| seen.insert(*v))
            .collect()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    fn from_csv(bytes: &[u8]) -> Result<Self, TableError> {
        let decoded = decode_text(bytes)?;
        let text: &str = decoded.strip_prefix('\u{feff}').unwrap_or(&decoded);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());

        let columns = reader.headers()?.iter().map(str::to_string).collect();
        let rows = reader
            .records()
            .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
            .collect::<Result<Vec<Vec<String>>, csv::Error>>()?;

        Ok(Self { columns, rows })
    }

    /// First worksheet only; the first row is the header.
    fn from_excel(bytes: &[u8]) -> Result<Self, TableError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
        let range = match workbook.worksheet_range_at(0) {
            Some(range) => range?,
            None => return Err(TableError::Empty),
        };

        let mut rows = range
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<_>>());
        let columns = rows.next().unwrap_or_default();
        let rows = rows.collect();

        Ok(Self { columns, rows })
    }

    /// Accepts an array of objects, an object whose first array value holds
    /// the rows, or a flat object read as a single row.
    fn from_json(bytes: &[u8]) -> Result<Self, TableError> {
        let value: Value = serde_json::from_slice(bytes)?;

        match value {
            Value::Array(items) => Self::from_json_rows(items),
            Value::Object(map) => match map.values().find_map(|v| v.as_array()) {
                Some(items) => Self::from_json_rows(items.clone()),
                None => Self::from_json_rows(vec![Value::Object(map)]),
            },
            other => Err(TableError::JsonShape(format!(
                "top-level {} is not a table",
                json_kind(&other)
            ))),
        }
    }

    fn from_json_rows(items: Vec<Value>) -> Result<Self, TableError> {
        let objects: Vec<Map<String, Value>> = items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => Ok(map),
                other => Err(TableError::JsonShape(format!(
                    "row is {}, expected an object",
                    json_kind(&other)
                ))),
            })
            .collect::<Result<_, _>>()?;

        let mut columns: Vec<String> = Vec::new();
        for object in &objects {
            for key in object.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = objects
            .iter()
            .map(|object| {
                columns
                    .iter()
                    .map(|c| object.get(c).map(cell_text).unwrap_or_default())
                    .collect()
            })
            .collect();

        Ok(Self { columns, rows })
    }
}

/// UTF-8 first, then CP949 (EUC-KR superset) for Korean spreadsheets.
fn decode_text(bytes: &[u8]) -> Result<std::borrow::Cow<'_, str>, TableError> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok(text.into());
    }

    encoding_rs::EUC_KR
        .decode_without_bom_handling_and_without_replacement(bytes)
        .ok_or(TableError::Encoding)
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
