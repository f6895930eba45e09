use std::time::Duration;

use parking_lot::{Condvar, Mutex};

/// The shutdown flag shared by a client and its pump loops.
///
/// The flag goes from false to true once and never back. Setting it wakes
/// loops sleeping in `wait_timeout`, but not a thread parked in a queue
/// `pop`: that one needs an item pushed to it.
#[derive(Debug, Default)]
pub(crate) struct ShutdownSignal {
    flag: Mutex<bool>,
    cond: Condvar,
}

impl ShutdownSignal {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Sets the flag. Returns false if it was already set.
    pub(crate) fn trigger(&self) -> bool {
        let mut flag = self.flag.lock();
        let first = !*flag;
        *flag = true;
        self.cond.notify_all();
        first
    }

    pub(crate) fn is_set(&self) -> bool {
        *self.flag.lock()
    }

    /// Sleeps for `timeout` or until the flag is set, whichever comes
    /// first. Returns the flag.
    pub(crate) fn wait_timeout(&self, timeout: Duration) -> bool {
        let mut flag = self.flag.lock();
        if !*flag && !timeout.is_zero() {
            // Spurious wakeups only shorten the sleep; callers re-check.
            self.cond.wait_for(&mut flag, timeout);
        }
        *flag
    }
}
