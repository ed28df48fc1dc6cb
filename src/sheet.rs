//! Workbook access. Cells are lowered into [`CellValue`] so the rest of the
//! pipeline never touches calamine types.

use std::path::Path;
use std::time::Instant;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::info;

use crate::constants::DATA_SHEET_NAME;
use crate::error::SourceFileError;

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Text rendering used for identifiers and classification tokens.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            CellValue::Number(n) => n.to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(dt) => dt.to_string(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(value: NaiveDateTime) -> Self {
        CellValue::DateTime(value)
    }
}

/// ISO 8601 cell values: full timestamps with optional fractional seconds,
/// or a bare date taken as midnight.
fn parse_iso_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn lower_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) => CellValue::DateTime(value),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => match parse_iso_datetime(s) {
            Some(value) => CellValue::DateTime(value),
            None => CellValue::Text(s.clone()),
        },
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

/// Reads every row of the `Data` sheet, or of the first sheet when there is no `Data` sheet.
pub fn read_rows(path: &Path) -> Result<Vec<Vec<CellValue>>, SourceFileError> {
    let start_time = Instant::now();

    if !path.exists() {
        return Err(SourceFileError::NotFound(path.to_path_buf()));
    }

    let mut workbook =
        open_workbook_auto(path).map_err(|e| SourceFileError::InvalidWorkbook {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let sheet_names = workbook.sheet_names();
    let sheet = if sheet_names.iter().any(|name| name == DATA_SHEET_NAME) {
        DATA_SHEET_NAME.to_string()
    } else {
        sheet_names
            .first()
            .cloned()
            .ok_or_else(|| SourceFileError::InvalidWorkbook {
                path: path.to_path_buf(),
                message: "workbook contains no sheets".to_string(),
            })?
    };

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| SourceFileError::SheetRead {
            sheet: sheet.clone(),
            message: e.to_string(),
        })?;

    // calamine trims leading empty rows and columns; pad them back so
    // row and column numbers match the sheet
    let (top, left) = range
        .start()
        .map(|(row, col)| (row as usize, col as usize))
        .unwrap_or((0, 0));
    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); top];
    rows.extend(range.rows().map(|row| {
        std::iter::repeat(CellValue::Empty)
            .take(left)
            .chain(row.iter().map(lower_cell))
            .collect()
    }));

    info!(
        action = "read",
        component = "workbook",
        sheet = sheet.as_str(),
        row_count = rows.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Workbook sheet read"
    );
    Ok(rows)
}
