//! Spin locks.
//!
//! A spin lock needs no help from the scheduler to block: a thread that wants
//! the lock 1) atomically sets a flag and reads its previous value, 2) owns
//! the lock if the flag was clear, and otherwise 3) tries again. Step 1 must
//! be a single atomic read-modify-write (test-and-set), performed with
//! *acquire* ordering so the critical section cannot float above it. The
//! unlock clears the flag with *release* ordering.
//!
//! The two variants here differ only in what a thread does between two
//! failed test-and-set attempts, expressed as a [`Relax`] strategy:
//!
//! - [`SpinLock`] keeps the core busy, hinting the CPU that it is in a spin
//!   loop ([`Spin`]). Lowest hand-off latency, but every waiter burns a core
//!   for as long as the lock is held.
//! - [`YieldingSpinLock`] gives the rest of its time slice back to the
//!   scheduler ([`Yield`]). Less wasted CPU under contention, at the price of
//!   a scheduler round-trip before the next attempt.
//!
//! Both are meant for short critical sections.

use crate::sync::Coordination;
use crossbeam_utils::CachePadded;
use std::{
    marker::PhantomData,
    sync::atomic::{AtomicBool, Ordering},
};

/// What a waiting thread does between two failed acquisition attempts.
pub trait Relax {
    /// Performs one relax step.
    fn relax();
}

/// Busy-wait with a CPU spin-loop hint.
pub struct Spin;

impl Relax for Spin {
    #[inline(always)]
    fn relax() {
        core::hint::spin_loop();
    }
}

/// Yield the remaining time slice to another runnable thread.
pub struct Yield;

impl Relax for Yield {
    #[inline(always)]
    fn relax() {
        std::thread::yield_now();
    }
}

/// Exclusive lock on a single atomic flag, parameterized by its [`Relax`]
/// strategy.
pub struct RawSpinLock<R: Relax> {
    locked: CachePadded<AtomicBool>,
    _relax: PhantomData<fn() -> R>,
}

/// Busy-waiting spin lock.
///
/// # Examples
///
/// ```
/// use syncbench::sync::SpinLock;
///
/// let lock = SpinLock::new();
/// lock.acquire();
/// assert!(!lock.try_acquire());
/// lock.release();
/// assert!(!lock.is_locked());
/// ```
pub type SpinLock = RawSpinLock<Spin>;

/// Spin lock that yields its time slice while waiting.
pub type YieldingSpinLock = RawSpinLock<Yield>;

impl<R: Relax> RawSpinLock<R> {
    /// Creates a new spin lock in an unlocked state.
    pub const fn new() -> Self {
        Self {
            locked: CachePadded::new(AtomicBool::new(false)),
            _relax: PhantomData,
        }
    }

    /// Acquires the lock, relaxing between attempts until it is free.
    ///
    /// Acquiring a lock the calling thread already holds never returns.
    pub fn acquire(&self) {
        while self.locked.swap(true, Ordering::Acquire) {
            R::relax();
        }
    }

    /// Attempts to acquire the lock with a single test-and-set.
    pub fn try_acquire(&self) -> bool {
        !self.locked.swap(true, Ordering::Acquire)
    }

    /// Releases the lock.
    pub fn release(&self) {
        self.locked.store(false, Ordering::Release);
    }

    /// Whether the flag is currently set.
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }
}

impl<R: Relax> Default for RawSpinLock<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Relax> Coordination for RawSpinLock<R> {
    fn acquire(&self) {
        RawSpinLock::acquire(self)
    }

    fn release(&self) {
        RawSpinLock::release(self)
    }
}
