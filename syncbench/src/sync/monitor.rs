//! # Monitor.
//!
//! A monitor expresses mutual exclusion as explicit state plus notification
//! instead of relying on a built-in lock type: a `held` flag, a mutex that
//! guards it and a condition variable to sleep on.
//!
//! - [`Monitor::enter`] waits while `held` is set, then sets it.
//! - [`Monitor::exit`] clears it and wakes one waiter.
//!
//! The mutex itself is only held for the few instructions that test or flip
//! the flag, never for the caller's critical section. Swapping the predicate
//! turns the same skeleton into any other monitor condition.

use crate::sync::Coordination;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Binary exclusive lock built from a flag, a mutex and a condition variable.
#[derive(Default)]
pub struct Monitor {
    held: Mutex<bool>,
    vacated: Condvar,
}

impl Monitor {
    /// Creates a monitor that nobody holds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks until the monitor is free, then takes it.
    ///
    /// Entering a monitor the calling thread already holds never returns.
    pub fn enter(&self) {
        let mut held = self
            .vacated
            .wait_while(self.lock(), |held| *held)
            .unwrap_or_else(PoisonError::into_inner);
        *held = true;
    }

    /// Takes the monitor if it is free, without blocking.
    pub fn try_enter(&self) -> bool {
        let mut held = self.lock();
        if *held {
            false
        } else {
            *held = true;
            true
        }
    }

    /// Leaves the monitor and wakes one waiter.
    pub fn exit(&self) {
        let mut held = self.lock();
        *held = false;
        self.vacated.notify_one();
    }

    /// Whether some thread currently holds the monitor.
    pub fn is_held(&self) -> bool {
        *self.lock()
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.held.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Coordination for Monitor {
    fn acquire(&self) {
        self.enter()
    }

    fn release(&self) {
        self.exit()
    }
}
