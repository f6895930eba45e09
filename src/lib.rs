//! # mqclient
//!
//! `mqclient` is the client half of a topic-based publish/subscribe
//! service. Application threads publish to named topics, subscribe and
//! unsubscribe, and retrieve delivered messages. Two background pump
//! threads carry requests to, and poll messages from, a remote broker over
//! short-lived synchronous connections.
//!
//! ## Core Modules
//!
//! - `queue`: the blocking FIFO that hands work between threads.
//! - `protocol`: requests, the `Message` result type, and the line protocol.
//! - `client`: the `Client` handle, its pump loops and shutdown handling.
//! - `transport`: the per-request TCP connection, and the listener for the
//!   reference broker.
//! - `broker`: an in-memory reference broker for local runs and tests.
//! - `config`: layered configuration loading.
//! - `utils`: error types and logging setup.

pub mod broker;
pub mod client;
pub mod config;
pub mod protocol;
pub mod queue;
pub mod transport;
pub mod utils;

pub use client::Client;
pub use protocol::Message;
pub use utils::error::{ClientError, ProtocolError};
