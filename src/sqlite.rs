use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rusqlite::{params, Connection};
use tracing::info;

use crate::date_code::DateCode;
use crate::error::StoreError;
use crate::stats::RangeTotals;
use crate::transform::IngestedData;

// Include the default schema at compile time
const DEFAULT_SCHEMA: &str = include_str!("../schema.sql");

const DATE_RANGE_INSERT: &str = "INSERT INTO date_range (min_date, max_date) VALUES (?1, ?2)";
const USERS_INSERT: &str = "INSERT INTO users (date, user_fio) VALUES (?1, ?2)";
const REQUESTS_INSERT: &str = "INSERT INTO requests (date, loaded, doubles, for_creation, for_expand, \
     handle_over, returned, sent_for_handle, packages) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";

const DATE_RANGE_SELECT: &str = "SELECT min_date, max_date FROM date_range";
const REQUESTS_SELECT: &str = "SELECT SUM(loaded), SUM(doubles), SUM(for_creation), SUM(for_expand), \
     SUM(handle_over), SUM(returned), SUM(sent_for_handle), SUM(packages) \
     FROM requests WHERE date >= ?1 AND date <= ?2";
const USERS_SELECT: &str =
    "SELECT COUNT(DISTINCT user_fio) FROM users WHERE date >= ?1 AND date <= ?2";

/// Reads the schema from `path`, or falls back to the embedded default.
pub fn load_schema(path: Option<&Path>) -> Result<String, StoreError> {
    match path {
        Some(path) => {
            let bytes = fs::read(path)
                .map_err(|e| StoreError::Schema(format!("{} could not be read: {}", path.display(), e)))?;
            String::from_utf8(bytes)
                .map_err(|_| StoreError::Schema(format!("{} is not valid UTF-8", path.display())))
        }
        None => Ok(DEFAULT_SCHEMA.to_string()),
    }
}

/// Anything able to answer a range query. The query server depends on this
/// rather than on [`Store`] directly.
pub trait TotalsSource: Send + Sync {
    fn range_totals(&self, min_date: DateCode, max_date: DateCode) -> Result<RangeTotals, StoreError>;
}

/// SQLite-backed storage. Every operation opens its own connection and runs
/// in a single transaction; the connection is closed when the call returns.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Store { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<Connection, StoreError> {
        Ok(Connection::open(&self.path)?)
    }

    /// Recreates the schema and writes all ingested rows. Nothing is kept if any step fails.
    pub fn bulk_load(&self, schema: &str, data: &IngestedData) -> Result<(), StoreError> {
        let start_time = Instant::now();
        info!(action = "start", component = "bulk_load", path = ?self.path, "Writing data to database");

        let mut conn = self.open()?;
        let tx = conn.transaction()?;
        tx.execute_batch(schema)?;
        tx.execute(DATE_RANGE_INSERT, params![data.min_date, data.max_date])?;
        {
            let mut stmt = tx.prepare_cached(USERS_INSERT)?;
            for visit in &data.users {
                stmt.execute(params![visit.date, visit.author])?;
            }

            let mut stmt = tx.prepare_cached(REQUESTS_INSERT)?;
            for r in &data.requests {
                stmt.execute(params![
                    r.date,
                    r.loaded,
                    r.doubles,
                    r.for_creation,
                    r.for_expand,
                    r.handle_over,
                    r.returned,
                    r.sent_for_handle,
                    r.packages
                ])?;
            }
        }
        tx.commit()?;

        info!(
            action = "complete",
            component = "bulk_load",
            user_rows = data.users.len(),
            request_rows = data.requests.len(),
            duration_ms = start_time.elapsed().as_millis(),
            "Data written to database"
        );
        Ok(())
    }

    pub fn date_range(&self) -> Result<(DateCode, DateCode), StoreError> {
        let mut conn = self.open()?;
        let tx = conn.transaction()?;
        let range = tx.query_row(DATE_RANGE_SELECT, [], |row| Ok((row.get(0)?, row.get(1)?)))?;
        tx.commit()?;
        Ok(range)
    }

    /// Sums counters over `[min_date, max_date]`. An empty range sums to zero.
    pub fn range_totals(&self, min_date: DateCode, max_date: DateCode) -> Result<RangeTotals, StoreError> {
        let mut conn = self.open()?;
        let tx = conn.transaction()?;

        let sums: [Option<i64>; 8] = tx.query_row(REQUESTS_SELECT, params![min_date, max_date], |row| {
            Ok([
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
                row.get(7)?,
            ])
        })?;
        let users: i64 = tx.query_row(USERS_SELECT, params![min_date, max_date], |row| row.get(0))?;
        tx.commit()?;

        let [loaded, doubles, for_creation, for_expand, handle_over, returned, sent_for_handle, packages] =
            sums.map(|v| v.unwrap_or(0));
        Ok(RangeTotals {
            loaded,
            doubles,
            for_creation,
            for_expand,
            handle_over,
            returned,
            sent_for_handle,
            packages,
            users,
        })
    }
}

impl TotalsSource for Store {
    fn range_totals(&self, min_date: DateCode, max_date: DateCode) -> Result<RangeTotals, StoreError> {
        Store::range_totals(self, min_date, max_date)
    }
}
