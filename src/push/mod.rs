//! Server-push transport: SSE wire decoding and the reconnecting
//! stream loop that feeds decoded notifications into a session.

mod sse;
mod transport;

pub use sse::SseDecoder;
pub use transport::PushTransport;
