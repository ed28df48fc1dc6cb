//! Error types shared across ingestion, storage and the wire protocol.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading the source spreadsheet. All of them are fatal to ingestion.
#[derive(Error, Debug)]
pub enum SourceFileError {
    #[error("source file {0:?} does not exist")]
    NotFound(PathBuf),
    #[error("source file {path:?} is not a valid xlsx workbook: {message}")]
    InvalidWorkbook { path: PathBuf, message: String },
    #[error("failed to read sheet '{sheet}': {message}")]
    SheetRead { sheet: String, message: String },
    #[error("source file {path:?} has no header row with the required column names")]
    SchemaMismatch { path: PathBuf },
    #[error("row {row}, column {column}: invalid date string format")]
    DateFormat { row: usize, column: usize },
}

/// Failures of the embedded database.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database schema error: {0}")]
    Schema(String),
    #[error("database error: {0}")]
    Database(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

/// Failures while framing or decoding a message on the wire.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("frame of {0} bytes exceeds the maximum frame size")]
    FrameTooLarge(usize),
    #[error("malformed json payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported request: {0}")]
    UnsupportedRequest(String),
}

/// Failures seen by a client of the query server.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("query server at {addr} is not responding, try again later ({message})")]
    Unreachable { addr: String, message: String },
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("unexpected response from query server: {0}")]
    Decode(String),
}
