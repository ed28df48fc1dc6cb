//! Length-prefixed JSON framing.
//!
//! Every message, in both directions, is a 4-byte little-endian length
//! followed by exactly that many bytes of UTF-8 JSON.

use std::io::{Read, Write};

use serde_json::Value;

use crate::constants::{MAX_FRAME_LEN, META_COMMAND};
use crate::error::ProtocolError;

/// A decoded client request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Meta,
    Range { min_date: String, max_date: String },
}

impl Request {
    pub fn decode(payload: &[u8]) -> Result<Request, ProtocolError> {
        let value: Value = serde_json::from_slice(payload)?;
        match value.as_array().map(Vec::as_slice) {
            Some([Value::String(cmd)]) if cmd == META_COMMAND => Ok(Request::Meta),
            Some([Value::String(min), Value::String(max)]) => Ok(Request::Range {
                min_date: min.clone(),
                max_date: max.clone(),
            }),
            _ => Err(ProtocolError::UnsupportedRequest(truncate(&value.to_string(), 128))),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let value = match self {
            Request::Meta => serde_json::json!([META_COMMAND]),
            Request::Range { min_date, max_date } => serde_json::json!([min_date, max_date]),
        };
        value.to_string().into_bytes()
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Reads one frame. `read_exact` keeps reading until the declared length has
/// arrived, however the bytes are split across socket reads.
pub fn read_frame<R: Read>(reader: &mut R) -> Result<Vec<u8>, ProtocolError> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf)?;
    let len = u32::from_le_bytes(len_buf) as usize;
    if len > MAX_FRAME_LEN {
        return Err(ProtocolError::FrameTooLarge(len));
    }

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload)?;
    Ok(payload)
}

pub fn write_frame<W: Write>(writer: &mut W, payload: &[u8]) -> Result<(), ProtocolError> {
    if payload.len() > MAX_FRAME_LEN {
        return Err(ProtocolError::FrameTooLarge(payload.len()));
    }
    writer.write_all(&(payload.len() as u32).to_le_bytes())?;
    writer.write_all(payload)?;
    writer.flush()?;
    Ok(())
}
