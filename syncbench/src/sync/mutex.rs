//! # Mutex.
//!
//! The reference point the hand-built primitives are measured against: an
//! off-the-shelf mutual exclusion lock from `parking_lot`. It spins briefly,
//! then parks the thread in a global parking lot keyed by the lock's address.
//!
//! The harness needs split `acquire`/`release` calls rather than a guard tied
//! to a borrow, so this wraps the raw lock behind `lock_api::RawMutex` instead
//! of `parking_lot::Mutex<T>`.

use crate::sync::Coordination;
use parking_lot::lock_api::RawMutex as _;

/// Exclusive lock with no protected data.
pub struct Mutex {
    raw: parking_lot::RawMutex,
}

impl Mutex {
    /// Creates an unlocked mutex.
    pub const fn new() -> Self {
        Self {
            raw: parking_lot::RawMutex::INIT,
        }
    }

    /// Blocks until the mutex is free, then takes it.
    pub fn acquire(&self) {
        self.raw.lock()
    }

    /// Takes the mutex if nobody holds it.
    pub fn try_acquire(&self) -> bool {
        self.raw.try_lock()
    }

    /// Releases the mutex. Releasing an unlocked mutex does nothing.
    pub fn release(&self) {
        if self.raw.is_locked() {
            // SAFETY: the mutex is locked, and a `RawMutex` may be unlocked
            // from any thread.
            unsafe { self.raw.unlock() }
        }
    }

    /// Whether somebody holds the mutex.
    pub fn is_locked(&self) -> bool {
        self.raw.is_locked()
    }
}

impl Default for Mutex {
    fn default() -> Self {
        Self::new()
    }
}

impl Coordination for Mutex {
    fn acquire(&self) {
        Mutex::acquire(self)
    }

    fn release(&self) {
        Mutex::release(self)
    }
}
