//! The `transport` module is responsible for network communication with
//! the broker.
//!
//! - `connection`: the blocking, short-lived TCP connection each pump-loop
//!   iteration opens, uses for one request/response cycle, and closes.
//! - `server`: the tokio listener fronting the in-memory reference broker,
//!   speaking the same line protocol.

pub mod connection;
pub mod server;

pub use connection::Connection;
pub use server::{serve, start_server};

#[cfg(test)]
mod tests;
