//! # Counting Semaphore.
//!
//! A **semaphore** regulates concurrent access to a finite set of resources.
//! It maintains an internal count of available "permits"; each permit grants
//! one thread the right to proceed. [`Semaphore::acquire`] takes a permit,
//! blocking while none is left, and [`Semaphore::release`] gives one back.
//!
//! Unlike [`SlimSemaphore`], this semaphore keeps its counter in a single
//! atomic word and never takes a user-space lock. A thread that finds the
//! counter at zero registers itself in a lock-free waiter queue and is parked
//! by the operating system until a release hands it a wake-up. The count is
//! bounded: releasing into a full semaphore leaves the count at its maximum.
//!
//! ## Wake-up protocol
//! An acquirer enqueues its waiter *before* re-checking the counter, and a
//! releaser bumps the counter *before* popping a waiter. With a full fence on
//! both sides at least one of them sees the other, so a release can never
//! slip in between "counter is zero" and "parked" unnoticed.
//!
//! A waiter that manages to take a permit on its re-check withdraws from the
//! queue. If a releaser had already picked it, the wake-up is forwarded to the
//! next waiter instead of being lost.
//!
//! [`SlimSemaphore`]: crate::sync::SlimSemaphore

use crate::{
    error::{Result, SyncError},
    sync::Coordination,
};
use crossbeam_queue::SegQueue;
use crossbeam_utils::{
    CachePadded,
    sync::{Parker, Unparker},
};
use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering, fence},
};

/// A parked acquirer.
struct Waiter {
    unparker: Unparker,
    notified: AtomicBool,
}

impl Waiter {
    /// Claims this waiter and wakes it up. Returns `false` if someone else
    /// (a releaser, or the waiter itself) claimed it first.
    fn notify(&self) -> bool {
        if self.claim() {
            self.unparker.unpark();
            true
        } else {
            false
        }
    }

    fn claim(&self) -> bool {
        self.notified
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn is_notified(&self) -> bool {
        self.notified.load(Ordering::Acquire)
    }
}

/// Bounded counting semaphore backed by OS thread parking.
///
/// # Examples
///
/// ```
/// use syncbench::sync::Semaphore;
///
/// let sema = Semaphore::new(1, 1).unwrap();
/// sema.acquire();
/// assert!(!sema.try_acquire());
/// sema.release();
/// assert_eq!(sema.available(), 1);
/// ```
pub struct Semaphore {
    count: CachePadded<AtomicUsize>,
    max: usize,
    waiters: SegQueue<Arc<Waiter>>,
}

impl Semaphore {
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
            count: CachePadded::new(AtomicUsize::new(initial)),
            max,
            waiters: SegQueue::new(),
        })
    }

    /// Waits until a permit becomes available and then takes it.
    pub fn acquire(&self) {
        if self.try_acquire() {
            return;
        }
        let parker = Parker::new();
        loop {
            let waiter = Arc::new(Waiter {
                unparker: parker.unparker().clone(),
                notified: AtomicBool::new(false),
            });
            self.waiters.push(waiter.clone());
            fence(Ordering::SeqCst);

            if self.try_acquire() {
                if !waiter.claim() {
                    // A releaser already spent its wake-up on us.
                    self.wake_one();
                }
                return;
            }
            while !waiter.is_notified() {
                parker.park();
            }
            if self.try_acquire() {
                return;
            }
        }
    }

    /// Takes a permit if one is available, without blocking.
    pub fn try_acquire(&self) -> bool {
        self.count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |c| c.checked_sub(1))
            .is_ok()
    }

    /// Returns a permit and wakes at most one parked acquirer.
    ///
    /// The count never exceeds the maximum given at construction; a release
    /// into a full semaphore changes nothing.
    pub fn release(&self) {
        let max = self.max;
        if self
            .count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |c| {
                (c < max).then_some(c + 1)
            })
            .is_ok()
        {
            fence(Ordering::SeqCst);
            self.wake_one();
        }
    }

    /// Number of permits currently available.
    pub fn available(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Maximum number of permits.
    pub fn max(&self) -> usize {
        self.max
    }

    fn wake_one(&self) {
        while let Some(waiter) = self.waiters.pop() {
            if waiter.notify() {
                break;
            }
        }
    }
}

impl Coordination for Semaphore {
    fn acquire(&self) {
        Semaphore::acquire(self)
    }

    fn release(&self) {
        Semaphore::release(self)
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.max())
    }
}
