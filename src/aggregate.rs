use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info};

use crate::columns::HeaderLocation;
use crate::constants::{
    SOURCE_DATE_FORMAT, STATE_DOUBLE_MARKER, STATE_FOR_CREATION, STATE_FOR_EXPAND,
    STATUS_HANDLE_OVER, STATUS_RETURNED, STATUS_SENT_FOR_HANDLE,
};
use crate::error::SourceFileError;
use crate::sheet::CellValue;

/// Counters and distinct sets accumulated for one creation date.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DailyAggregate {
    pub loaded: i64,
    pub doubles: i64,
    pub for_creation: i64,
    pub for_expand: i64,
    pub handle_over: i64,
    pub returned: i64,
    pub sent_for_handle: i64,
    pub packages: HashSet<String>,
    pub users: HashSet<String>,
}

impl DailyAggregate {
    pub fn add(&mut self, state: &str, status: &str, author: &str, package_id: &str) {
        self.loaded += 1;

        // duplicate marker may be surrounded by qualifier text
        if state.contains(STATE_DOUBLE_MARKER) {
            self.doubles += 1;
        } else if state == STATE_FOR_CREATION {
            self.for_creation += 1;
        } else if state == STATE_FOR_EXPAND {
            self.for_expand += 1;
        }

        if status == STATUS_HANDLE_OVER {
            self.handle_over += 1;
        } else if status == STATUS_RETURNED {
            self.returned += 1;
        } else if status == STATUS_SENT_FOR_HANDLE {
            self.sent_for_handle += 1;
        }

        self.packages.insert(package_id.to_string());
        // a blank author is unknown, not a distinct user
        if !author.trim().is_empty() {
            self.users.insert(author.to_string());
        }
    }
}

pub type DailyAggregates = BTreeMap<NaiveDate, DailyAggregate>;

fn parse_creation_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::DateTime(dt) => Some(dt.date()),
        CellValue::Text(s) => NaiveDateTime::parse_from_str(s.trim(), SOURCE_DATE_FORMAT)
            .ok()
            .map(|dt| dt.date()),
        _ => None,
    }
}

fn cell_at(row: &[CellValue], position: usize) -> &CellValue {
    const EMPTY: &CellValue = &CellValue::Empty;
    row.get(position).unwrap_or(EMPTY)
}

/// Aggregates every data row following the header, grouped by creation date.
///
/// Rows with no content at all are skipped. A creation date that is neither a
/// date cell nor a `dd.mm.yyyy HH:MM:SS` string aborts with
/// [`SourceFileError::DateFormat`] carrying 1-based row and column numbers.
pub fn collect(
    rows: &[Vec<CellValue>],
    header: &HeaderLocation,
) -> Result<DailyAggregates, SourceFileError> {
    let start_time = Instant::now();
    let mapping = header.mapping;
    let mut result = DailyAggregates::new();
    let mut skipped = 0usize;

    for (row_index, row) in rows.iter().enumerate().skip(header.first_data_row()) {
        if row.iter().all(CellValue::is_empty) {
            skipped += 1;
            continue;
        }

        let creation = parse_creation_date(cell_at(row, mapping.creation_date)).ok_or(
            SourceFileError::DateFormat {
                row: row_index + 1,
                column: mapping.creation_date + 1,
            },
        )?;

        result.entry(creation).or_default().add(
            &cell_at(row, mapping.state).to_text(),
            &cell_at(row, mapping.status).to_text(),
            &cell_at(row, mapping.author).to_text(),
            &cell_at(row, mapping.package_id).to_text(),
        );
    }

    if skipped > 0 {
        debug!(action = "skip", component = "row_aggregation", skipped_rows = skipped, "Skipped empty rows");
    }
    info!(
        action = "complete",
        component = "row_aggregation",
        date_count = result.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Rows aggregated by creation date"
    );
    Ok(result)
}
