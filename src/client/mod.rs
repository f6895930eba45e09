//! The `client` module is the client side of the message queue.
//!
//! `Client` owns two `BlockingQueue`s. Application threads push onto
//! `outgoing` and pop from `incoming`; two background pump threads move
//! requests between those queues and the broker, one short-lived
//! connection per request.
//!
//! ```text
//! publish/subscribe/unsubscribe -> outgoing -> pusher -> broker
//! broker -> puller -> incoming -> retrieve
//! ```

pub mod mq_client;
pub(crate) mod pump;
pub mod retry;
pub(crate) mod shutdown;

pub use mq_client::Client;
pub use retry::{Backoff, RetryPolicy};
