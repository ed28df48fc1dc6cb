use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::debug;

use crate::error::ClientError;
use crate::protocol::{self, Request};
use crate::stats::{Metadata, RangeAnswer};

/// Talks to the query server, one connection per request.
#[derive(Debug, Clone)]
pub struct Client {
    address: String,
    timeout: Duration,
}

impl Client {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    fn unreachable(&self, message: impl ToString) -> ClientError {
        ClientError::Unreachable {
            addr: self.address.clone(),
            message: message.to_string(),
        }
    }

    fn connect(&self) -> Result<TcpStream, ClientError> {
        let addrs = self
            .address
            .to_socket_addrs()
            .map_err(|e| self.unreachable(e))?;

        let mut last_error = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => {
                    stream
                        .set_read_timeout(Some(self.timeout))
                        .and_then(|_| stream.set_write_timeout(Some(self.timeout)))
                        .map_err(|e| self.unreachable(e))?;
                    return Ok(stream);
                }
                Err(e) => last_error = Some(e),
            }
        }
        Err(match last_error {
            Some(e) => self.unreachable(e),
            None => self.unreachable("address resolved to nothing"),
        })
    }

    /// Sends one request and returns the raw JSON payload of the answer.
    pub fn exchange(&self, request: &Request) -> Result<Vec<u8>, ClientError> {
        let mut stream = self.connect()?;
        protocol::write_frame(&mut stream, &request.encode())?;
        let payload = protocol::read_frame(&mut stream)?;
        debug!(action = "exchange", component = "client", address = %self.address, response_bytes = payload.len(), "Received answer");
        Ok(payload)
    }

    pub fn fetch_meta(&self) -> Result<Metadata, ClientError> {
        let payload = self.exchange(&Request::Meta)?;
        serde_json::from_slice(&payload).map_err(|e| ClientError::Decode(e.to_string()))
    }

    pub fn fetch_range(&self, min_date: &str, max_date: &str) -> Result<RangeAnswer, ClientError> {
        let payload = self.exchange(&Request::Range {
            min_date: min_date.to_string(),
            max_date: max_date.to_string(),
        })?;
        serde_json::from_slice(&payload).map_err(|e| ClientError::Decode(e.to_string()))
    }
}
