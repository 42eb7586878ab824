//! Single-slot blocking handoff between the REPL and the kernel thread.
//!
//! A [`Mailbox`] holds at most one value. Storing overwrites whatever is
//! there, so the last write wins. Readers can block, poll or wait with a
//! timeout; every successful read empties the slot.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::ast::Expression;

/// One reply per command: error text (empty on success) and the result.
pub type Reply = (String, Expression);

#[derive(Debug)]
pub struct Mailbox<T> {
    slot: Mutex<Option<T>>,
    ready: Condvar,
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Mailbox<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            ready: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores `value`, replacing any unread value.
    pub fn store(&self, value: T) {
        *self.lock() = Some(value);
        self.ready.notify_all();
    }

    /// Blocks until a value is available and takes it.
    pub fn get(&self) -> T {
        let mut slot = self.lock();
        loop {
            if let Some(value) = slot.take() {
                return value;
            }
            slot = self.ready.wait(slot).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Takes the value if one is waiting.
    pub fn try_get(&self) -> Option<T> {
        self.lock().take()
    }

    /// Waits up to `timeout` for a value.
    pub fn get_timeout(&self, timeout: Duration) -> Option<T> {
        let (mut slot, _) = self
            .ready
            .wait_timeout_while(self.lock(), timeout, |slot| slot.is_none())
            .unwrap_or_else(PoisonError::into_inner);
        slot.take()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_none()
    }
}

/// The input/output mailbox pair shared by the REPL and the kernel thread.
#[derive(Debug, Default)]
pub struct KernelChannels {
    input: Mailbox<String>,
    output: Mailbox<Reply>,
}

impl KernelChannels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store_input(&self, line: impl Into<String>) {
        self.input.store(line.into());
    }

    pub fn get_input(&self) -> String {
        self.input.get()
    }

    pub fn store_output(&self, reply: Reply) {
        self.output.store(reply);
    }

    pub fn get_output(&self) -> Reply {
        self.output.get()
    }

    pub fn try_get_output(&self) -> Option<Reply> {
        self.output.try_get()
    }

    pub fn get_output_timeout(&self, timeout: Duration) -> Option<Reply> {
        self.output.get_timeout(timeout)
    }

    /// Drops any unread input and output.
    pub fn clear(&self) {
        self.input.try_get();
        self.output.try_get();
    }
}
