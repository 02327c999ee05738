//! # Slim Semaphore.
//!
//! Functionally the same bounded counter as [`Semaphore`], built the textbook
//! way from a mutex guarding the count and a condition variable for blocking.
//! The counter is only ever read or written with the mutex held.
//!
//! Releases saturate: once the count is back at its maximum, further
//! [`SlimSemaphore::release`] calls are silently dropped instead of raising
//! the count or reporting an error.
//!
//! [`Semaphore`]: crate::sync::Semaphore

use crate::{
    error::{Result, SyncError},
    sync::Coordination,
};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Bounded counting semaphore made of a [`Mutex`] and a [`Condvar`].
pub struct SlimSemaphore {
    count: Mutex<usize>,
    available: Condvar,
    max: usize,
}

impl SlimSemaphore {
    /// Creates a new semaphore holding `initial` of at most `max` permits.
    ///
    /// # Errors
    ///
    /// [`SyncError::ZeroMaximum`] if `max` is zero, and
    /// [`SyncError::InitialAboveMaximum`] if `initial > max`.
    pub fn new(initial: usize, max: usize) -> Result<Self> {
        if max == 0 {
            return Err(SyncError::ZeroMaximum);
        }
        if initial > max {
            return Err(SyncError::InitialAboveMaximum { initial, max });
        }
        Ok(Self {
            count: Mutex::new(initial),
            available: Condvar::new(),
            max,
        })
    }

    /// Waits until a permit becomes available and then takes it.
    ///
    /// The mutex is released while waiting and re-acquired before the count
    /// is checked again, so spurious wake-ups are harmless.
    pub fn acquire(&self) {
        let mut count = self
            .available
            .wait_while(self.lock(), |count| *count == 0)
            .unwrap_or_else(PoisonError::into_inner);
        *count -= 1;
    }

    /// Takes a permit if one is available, without blocking.
    pub fn try_acquire(&self) -> bool {
        let mut count = self.lock();
        if *count > 0 {
            *count -= 1;
            true
        } else {
            false
        }
    }

    /// Returns a permit and wakes one waiter, unless the count is already at
    /// its maximum, in which case nothing happens.
    pub fn release(&self) {
        let mut count = self.lock();
        if *count < self.max {
            *count += 1;
            self.available.notify_one();
        }
    }

    /// Number of permits currently available.
    pub fn available(&self) -> usize {
        *self.lock()
    }

    /// Maximum number of permits.
    pub fn max(&self) -> usize {
        self.max
    }

    // The guarded section never panics halfway through an update, so a
    // poisoned count is still consistent.
    fn lock(&self) -> MutexGuard<'_, usize> {
        self.count.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Coordination for SlimSemaphore {
    fn acquire(&self) {
        SlimSemaphore::acquire(self)
    }

    fn release(&self) {
        SlimSemaphore::release(self)
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.max())
    }
}
