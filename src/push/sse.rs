//! Incremental decoder for the notification stream's SSE framing.
//!
//! The stream sends one JSON document per `data:` line. Heartbeats are
//! JSON objects tagged `{"type": "heartbeat"}` and exist only to keep
//! intermediaries from closing the connection; they never reach the
//! caller. Chunk boundaries are arbitrary, so the decoder buffers
//! partial lines across calls to [`SseDecoder::push_chunk`].

use serde_json::Value;
use tracing::{debug, warn};

use crate::models::Notification;

#[derive(Debug, Default)]
pub struct SseDecoder {
    buf: String,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a raw transport chunk, returning every notification whose
    /// line completed inside it. An incomplete trailing line stays
    /// buffered for the next chunk.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<Notification> {
        self.buf.push_str(&String::from_utf8_lossy(chunk));

        let mut out = Vec::new();
        while let Some(pos) = self.buf.find('\n') {
            let line: String = self.buf.drain(..=pos).collect();
            if let Some(notification) = Self::decode_line(line.trim_end_matches(['\r', '\n'])) {
                out.push(notification);
            }
        }
        out
    }

    fn decode_line(line: &str) -> Option<Notification> {
        if line.is_empty() || line.starts_with(':') {
            return None;
        }
        let payload = line
            .strip_prefix("data: ")
            .or_else(|| line.strip_prefix("data:"))?;
        Self::decode_payload(payload)
    }

    fn decode_payload(payload: &str) -> Option<Notification> {
        let value: Value = match serde_json::from_str(payload) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "dropping undecodable stream payload");
                return None;
            }
        };

        if value.get("type").and_then(Value::as_str) == Some("heartbeat") {
            debug!("stream heartbeat");
            return None;
        }

        match serde_json::from_value(value) {
            Ok(notification) => Some(notification),
            Err(err) => {
                warn!(error = %err, "dropping malformed notification payload");
                None
            }
        }
    }
}
