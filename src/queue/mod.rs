//! The `queue` module provides the thread-safe FIFO used to hand work
//! between application threads and the background pump loops.

pub mod blocking;

pub use blocking::BlockingQueue;

#[cfg(test)]
mod tests;
