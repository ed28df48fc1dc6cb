pub mod aggregate;
pub mod app;
pub mod args;
pub mod cache;
pub mod client;
pub mod columns;
pub mod config;
pub mod constants;
pub mod date_code;
pub mod error;
pub mod ingest;
pub mod protocol;
pub mod server;
pub mod sheet;
pub mod sqlite;
pub mod stats;
pub mod transform;
pub mod utils;

pub use args::Args;
pub use cache::RangeCache;
pub use client::Client;
pub use error::{ClientError, ProtocolError, SourceFileError, StoreError};
pub use server::{prepare_metadata, QueryHandler, QueryServer};
pub use sqlite::Store;
pub use stats::{Metadata, RangeAnswer, RangeTotals};
