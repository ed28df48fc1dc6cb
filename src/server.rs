use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::cache::{RangeCache, RangeKey};
use crate::config::ServerConfig;
use crate::date_code;
use crate::error::{ProtocolError, StoreError};
use crate::protocol::{self, Request};
use crate::sqlite::{Store, TotalsSource};
use crate::stats::{Metadata, RangeAnswer};

/// Computes the `["meta"]` answer: the stored date range plus the totals over it.
/// Runs once before the port is opened.
pub fn prepare_metadata(store: &Store) -> Result<Vec<u8>, StoreError> {
    let (min_date, max_date) = store.date_range()?;
    let totals = store.range_totals(min_date, max_date)?;
    let format = |code| {
        date_code::format_iso(code)
            .ok_or_else(|| StoreError::Database(format!("stored date {} is out of range", code)))
    };
    let meta = Metadata(format(min_date)?, format(max_date)?, totals);

    info!(
        action = "prepare",
        component = "metadata",
        min_date = %meta.0,
        max_date = %meta.1,
        loaded = totals.loaded,
        users = totals.users,
        "Metadata prepared"
    );
    serde_json::to_vec(&meta).map_err(|e| StoreError::Database(e.to_string()))
}

/// Request dispatch shared by all connection workers.
pub struct QueryHandler {
    meta: Arc<[u8]>,
    cache: RangeCache,
    source: Arc<dyn TotalsSource>,
}

impl QueryHandler {
    pub fn new(meta: Vec<u8>, cache_capacity: usize, source: Arc<dyn TotalsSource>) -> Self {
        Self {
            meta: Arc::from(meta),
            cache: RangeCache::new(cache_capacity),
            source,
        }
    }

    pub fn cache(&self) -> &RangeCache {
        &self.cache
    }

    fn range_answer(&self, min_date: &str, max_date: &str) -> RangeAnswer {
        let (Some(min), Some(max)) = (date_code::parse_iso(min_date), date_code::parse_iso(max_date)) else {
            return RangeAnswer::error(format!(
                "invalid date range '{}'..'{}', expected YYYY-MM-DD",
                min_date, max_date
            ));
        };
        match self.source.range_totals(min, max) {
            Ok(totals) => RangeAnswer::ok(totals),
            Err(e) => {
                warn!(action = "query", component = "query_handler", min_date, max_date, error = %e, "Range query failed");
                RangeAnswer::error(e.to_string())
            }
        }
    }

    /// Produces the response payload for one raw request payload.
    pub fn respond(&self, payload: &[u8]) -> Arc<[u8]> {
        match Request::decode(payload) {
            Ok(Request::Meta) => Arc::clone(&self.meta),
            Ok(Request::Range { min_date, max_date }) => {
                let key: RangeKey = (min_date, max_date);
                self.cache.get_or_compute(&key, || encode_answer(&self.range_answer(&key.0, &key.1)))
            }
            Err(e) => {
                warn!(action = "decode", component = "query_handler", error = %e, "Rejected request");
                Arc::from(encode_answer(&RangeAnswer::error(format!("protocol error: {}", e))))
            }
        }
    }
}

fn encode_answer(answer: &RangeAnswer) -> Vec<u8> {
    // a tuple of integers, strings and nulls always serializes
    serde_json::to_vec(answer).unwrap_or_else(|_| b"[null,\"serialization failure\"]".to_vec())
}

fn handle_connection(mut stream: TcpStream, handler: &QueryHandler) -> Result<(), ProtocolError> {
    let start_time = Instant::now();
    let payload = protocol::read_frame(&mut stream)?;
    let answer = handler.respond(&payload);
    protocol::write_frame(&mut stream, &answer)?;
    debug!(
        action = "respond",
        component = "query_server",
        request_bytes = payload.len(),
        response_bytes = answer.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Request served"
    );
    Ok(())
}

pub struct QueryServer {
    listener: TcpListener,
    handler: Arc<QueryHandler>,
    config: ServerConfig,
}

impl QueryServer {
    pub fn bind(config: ServerConfig, handler: QueryHandler) -> Result<Self> {
        let listener = TcpListener::bind(&config.address)
            .with_context(|| format!("Failed to bind query server to {}", config.address))?;
        Ok(Self {
            listener,
            handler: Arc::new(handler),
            config,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn handler(&self) -> Arc<QueryHandler> {
        Arc::clone(&self.handler)
    }

    /// Accepts connections forever, one thread per connection.
    pub fn serve(self) -> Result<()> {
        info!(action = "start", component = "query_server", address = %self.local_addr()?, "Query server started");

        for stream in self.listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    warn!(action = "accept", component = "query_server", error = %e, "Failed to accept connection");
                    continue;
                }
            };
            if let Err(e) = stream
                .set_read_timeout(self.config.io_timeout)
                .and_then(|_| stream.set_write_timeout(self.config.io_timeout))
            {
                warn!(action = "configure", component = "query_server", error = %e, "Failed to set connection timeouts");
            }

            let handler = Arc::clone(&self.handler);
            thread::spawn(move || {
                let peer = stream.peer_addr().ok();
                match handle_connection(stream, &handler) {
                    Ok(()) => {}
                    Err(ProtocolError::Io(e)) if e.kind() == ErrorKind::UnexpectedEof => {
                        debug!(action = "read", component = "query_server", peer = ?peer, "Peer closed before sending a full frame");
                    }
                    Err(e) => {
                        error!(action = "handle", component = "query_server", peer = ?peer, error = %e, "Connection failed");
                    }
                }
            });
        }
        Ok(())
    }
}
