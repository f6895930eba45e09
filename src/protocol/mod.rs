//! The `protocol` module defines the request values moved through the
//! queues and the HTTP/1.0-flavored line protocol spoken with the broker.
//!
//! - `request`: `Method`, `Request` and the URI surface of the broker.
//! - `message`: `Message`, the tagged result handed to the application.
//! - `framing`: writing requests and parsing responses over any
//!   `Write`/`BufRead` pair, plus the pure line parsers the reference
//!   broker reuses.

pub mod framing;
pub mod message;
pub mod request;

pub use framing::{check_body_len, parse_content_length, parse_request_line, read_response};
pub use message::Message;
pub use request::{Method, Request};

/// Reserved topic every started client subscribes to, and that `stop`
/// publishes to.
pub const END_OF_STREAM_TOPIC: &str = "SHUTDOWN";

/// Reserved body published on `END_OF_STREAM_TOPIC`. It is filtered out by
/// the puller and never reaches the application as data.
pub const END_OF_STREAM_BODY: &[u8] = b"SHUTDOWN";

/// Largest `Content-Length` accepted from a peer.
pub const MAX_BODY_LEN: usize = 16 * 1024 * 1024;

/// Longest request, status or header line accepted from a peer.
pub const MAX_LINE_LEN: usize = 8 * 1024;

/// Status token that marks a successful response.
pub const SUCCESS_STATUS: &str = "200 OK";
