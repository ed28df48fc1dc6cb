#![allow(dead_code)]

pub mod workbook;

use anyhow::Result;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use reqstat::config::ServerConfig;
use reqstat::constants::*;
use reqstat::date_code::DateCode;
use reqstat::ingest;
use reqstat::sheet::CellValue;
use reqstat::sqlite::{self, Store, TotalsSource};
use reqstat::{prepare_metadata, QueryHandler, QueryServer, RangeTotals, StoreError};
use tempfile::TempDir;

pub fn setup_temp_dir() -> Result<TempDir> {
    tempfile::tempdir().map_err(anyhow::Error::from)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Header row with the required columns shuffled between unrelated ones.
pub fn header_row() -> Vec<CellValue> {
    vec![
        CellValue::from("№"),
        CellValue::from(COLUMN_AUTHOR),
        CellValue::from(COLUMN_PACKAGE_ID),
        CellValue::from("Регион"),
        CellValue::from(COLUMN_CREATION_DATE),
        CellValue::from(COLUMN_STATUS),
        CellValue::from(COLUMN_STATE),
    ]
}

pub fn data_row(state: &str, status: &str, author: &str, created: CellValue, package: f64) -> Vec<CellValue> {
    vec![
        CellValue::Number(1.0),
        CellValue::from(author),
        CellValue::Number(package),
        CellValue::Empty,
        created,
        CellValue::from(status),
        CellValue::from(state),
    ]
}

/// Date A (2023-05-17): a duplicate, a creation and an expansion request from
/// two authors over two packages. Date B (2023-05-20): two completed requests
/// from a third author.
pub fn scenario_rows() -> Vec<Vec<CellValue>> {
    let day_a = date(2023, 5, 17).and_hms_opt(8, 30, 0).unwrap();
    vec![
        vec![CellValue::from("Выгрузка заявок")],
        Vec::new(),
        header_row(),
        data_row(
            &format!("{} №115", STATE_DOUBLE_MARKER),
            "Черновик",
            "Иванов И.И.",
            CellValue::DateTime(day_a),
            501.0,
        ),
        data_row(STATE_FOR_CREATION, "Черновик", "Иванов И.И.", CellValue::DateTime(day_a), 501.0),
        data_row(STATE_FOR_EXPAND, "", "Петров П.П.", CellValue::from("17.05.2023 17:45:10"), 502.0),
        data_row("ИЗМЕНЕНИЕ", STATUS_HANDLE_OVER, "Сидоров С.С.", CellValue::from("20.05.2023 09:00:00"), 600.0),
        data_row("ИЗМЕНЕНИЕ", STATUS_HANDLE_OVER, "Сидоров С.С.", CellValue::from("20.05.2023 11:00:00"), 600.0),
        vec![CellValue::Empty; 7],
    ]
}

/// Ingests `rows` into a fresh database in `dir`.
pub fn load_store(dir: &Path, rows: &[Vec<CellValue>]) -> Result<Store> {
    let data = ingest::ingest_rows(rows, Path::new("scenario.xlsx"))?;
    let store = Store::new(dir.join("db.sqlite3"));
    store.bulk_load(&sqlite::load_schema(None)?, &data)?;
    Ok(store)
}

/// Store wrapper counting range queries.
pub struct CountingStore {
    pub store: Store,
    pub calls: AtomicUsize,
}

impl CountingStore {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TotalsSource for CountingStore {
    fn range_totals(&self, min_date: DateCode, max_date: DateCode) -> Result<RangeTotals, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.store.range_totals(min_date, max_date)
    }
}

/// Starts a server on an ephemeral port in a background thread.
pub fn start_test_server(store: Arc<CountingStore>, cache_capacity: usize) -> Result<SocketAddr> {
    let meta = prepare_metadata(&store.store)?;
    let config = ServerConfig {
        cache_capacity,
        ..ServerConfig::local_ephemeral()
    };
    let handler = QueryHandler::new(meta, config.cache_capacity, store);
    let server = QueryServer::bind(config, handler)?;
    let addr = server.local_addr()?;
    thread::spawn(move || {
        let _ = server.serve();
    });
    Ok(addr)
}
