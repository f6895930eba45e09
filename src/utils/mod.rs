//! The `utils` module provides a collection of utility functions and common
//! definitions used across the `mqclient` crate.
//!
//! It centralizes the error types shared by the pump loops and the wire
//! codec, and the `tracing` subscriber setup used by the binary.

pub mod error;
pub mod logging;
