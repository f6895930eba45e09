use std::collections::VecDeque;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// Unbounded FIFO with a blocking `pop`.
///
/// Any number of threads may push. `pop` moves the head item out to the
/// caller, so exactly one consumer ever observes a given item. Ordering is
/// strict push order, whatever the number of producers and consumers.
#[derive(Debug, Default)]
pub struct BlockingQueue<T> {
    items: Mutex<VecDeque<T>>,
    cond: Condvar,
}

impl<T> BlockingQueue<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            cond: Condvar::new(),
        }
    }

    /// Appends `item` at the tail and wakes one parked consumer. Never blocks
    /// beyond acquiring the lock.
    pub fn push(&self, item: T) {
        let mut items = self.items.lock();
        items.push_back(item);
        self.cond.notify_one();
    }

    /// Removes the head item, parking the caller until one is available.
    pub fn pop(&self) -> T {
        let mut items = self.items.lock();
        loop {
            if let Some(item) = items.pop_front() {
                self.cond.notify_one();
                return item;
            }
            self.cond.wait(&mut items);
        }
    }

    /// Like `pop`, but gives up once `timeout` has elapsed.
    pub fn pop_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let mut items = self.items.lock();
        loop {
            if let Some(item) = items.pop_front() {
                self.cond.notify_one();
                return Some(item);
            }
            if self.cond.wait_until(&mut items, deadline).timed_out() {
                // A push may have landed right at the deadline.
                let item = items.pop_front();
                if item.is_some() {
                    self.cond.notify_one();
                }
                return item;
            }
        }
    }

    pub fn try_pop(&self) -> Option<T> {
        let item = self.items.lock().pop_front();
        if item.is_some() {
            self.cond.notify_one();
        }
        item
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Takes every queued item, oldest first, leaving the queue empty.
    pub fn drain(&self) -> Vec<T> {
        self.items.lock().drain(..).collect()
    }
}
