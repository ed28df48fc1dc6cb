use std::path::Path;
use std::time::Instant;

use tracing::info;

use crate::aggregate;
use crate::columns;
use crate::error::SourceFileError;
use crate::sheet::{self, CellValue};
use crate::transform::{self, IngestedData};

/// Runs header detection, aggregation and flattening over already-read rows.
pub fn ingest_rows(rows: &[Vec<CellValue>], source: &Path) -> Result<IngestedData, SourceFileError> {
    let header = columns::locate_header(rows).ok_or_else(|| SourceFileError::SchemaMismatch {
        path: source.to_path_buf(),
    })?;
    info!(
        action = "locate",
        component = "column_locator",
        header_row = header.header_row + 1,
        mapping = ?header.mapping,
        "Header row found"
    );

    let days = aggregate::collect(rows, &header)?;
    Ok(transform::transform(days))
}

/// Reads the whole spreadsheet once and returns storage-ready rows.
pub fn read_source(path: &Path) -> Result<IngestedData, SourceFileError> {
    let start_time = Instant::now();
    info!(action = "start", component = "ingest", source = ?path, "Reading source spreadsheet");

    let rows = sheet::read_rows(path)?;
    let data = ingest_rows(&rows, path)?;

    info!(
        action = "complete",
        component = "ingest",
        date_count = data.requests.len(),
        user_rows = data.users.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Source data read"
    );
    Ok(data)
}
