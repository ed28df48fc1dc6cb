use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use crate::client::Client;
use crate::config::ServerConfig;
use crate::ingest;
use crate::server::{prepare_metadata, QueryHandler, QueryServer};
use crate::sqlite::{self, Store};
use crate::Args;

/// Reads the schema and the source spreadsheet, then loads everything into a
/// freshly created database.
pub fn initialize_data(args: &Args) -> Result<Store> {
    let total_start_time = Instant::now();

    let schema = sqlite::load_schema(args.schema.as_deref())?;
    info!(action = "load", component = "schema", custom = args.schema.is_some(), "Database schema read");

    let data = ingest::read_source(&args.source)?;

    let store = Store::new(&args.database);
    store.bulk_load(&schema, &data)?;

    info!(
        action = "complete",
        component = "initialize",
        duration_ms = total_start_time.elapsed().as_millis(),
        "Initialization completed"
    );
    Ok(store)
}

/// Ingests, prepares metadata and binds the server. Every fatal error
/// surfaces here, before any port is opened.
pub fn prepare_server(args: &Args) -> Result<QueryServer> {
    let store = initialize_data(args)?;
    let meta = prepare_metadata(&store).context("Failed to prepare metadata")?;
    let config = ServerConfig::from_args(args);
    let handler = QueryHandler::new(meta, config.cache_capacity, Arc::new(store));
    QueryServer::bind(config, handler)
}

/// Client mode: one request against a running server, printed as JSON.
pub fn run_client(args: &Args) -> Result<()> {
    let client = Client::new(args.address());
    let output = match &args.range {
        Some(range) => serde_json::to_string(&client.fetch_range(&range[0], &range[1])?)?,
        None => serde_json::to_string(&client.fetch_meta()?)?,
    };
    println!("{}", output);
    Ok(())
}
