//! The `error` module defines the error types used within `mqclient`.
//!
//! Application code only ever sees `ClientError`, and only from lifecycle
//! calls. Transport and protocol failures inside the pump loops are logged
//! and swallowed: delivery is best-effort.

use std::io;
use thiserror::Error;

/// Errors raised by `Client` lifecycle operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// `start` was called on a client whose pump threads already run.
    #[error("client already started")]
    AlreadyStarted,

    /// `stop` was called on a client that was never started.
    #[error("client was never started")]
    NotStarted,

    /// A pump thread could not be spawned.
    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        name: &'static str,
        #[source]
        source: io::Error,
    },

    /// A pump thread panicked before it could be joined.
    #[error("{0} thread panicked")]
    PumpPanicked(&'static str),
}

/// Errors raised while framing or parsing the line protocol.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The peer closed the connection before a full line was read.
    #[error("connection closed by peer")]
    Closed,

    #[error("malformed request line: {0:?}")]
    RequestLine(String),

    #[error("unsupported method: {0:?}")]
    Method(String),

    #[error("invalid Content-Length: {0:?}")]
    ContentLength(String),

    #[error("Content-Length {length} exceeds limit of {max} bytes")]
    BodyTooLarge { length: usize, max: usize },

    #[error("body truncated: expected {expected} bytes, got {got}")]
    Truncated { expected: usize, got: usize },

    #[error("line exceeds {0} bytes")]
    LineTooLong(usize),
}
