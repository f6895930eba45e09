//! The `broker` module is a minimal in-memory broker speaking the client's
//! line protocol.
//!
//! It exists so the client can be exercised end to end and demoed locally:
//! topics fan published bodies out into one mailbox per subscribed client
//! name, and a poll pops the oldest body from that mailbox. There is no
//! persistence.

pub mod engine;
pub mod topic;

pub use engine::Broker;
