//! # Synchronization Primitives.
//!
//! Every primitive in this module coordinates a set of OS threads around a
//! small piece of shared state: a bounded counter, a barrier generation, a
//! `held` flag or a single atomic bit. They differ in what a thread does when
//! it cannot proceed yet.
//!
//! | Primitive              | Blocks Thread?     | Exclusive? | Typical Use Case                          |
//! |------------------------|--------------------|------------|-------------------------------------------|
//! | [`Mutex`]              | Yes (parking lot)  | Yes        | Baseline for the hand-built locks         |
//! | [`Semaphore`]          | Yes (OS parking)   | If max = 1 | Limiting access to a bounded resource     |
//! | [`SlimSemaphore`]      | Yes (condvar)      | If max = 1 | Same, without leaving user space to count |
//! | [`CyclicBarrier`]      | Yes (condvar)      | No         | Phased computation, rendezvous            |
//! | [`Monitor`]            | Yes (condvar)      | Yes        | Exclusive access expressed as a predicate |
//! | [`SpinLock`]           | No (busy wait)     | Yes        | Very short, rarely contended sections     |
//! | [`YieldingSpinLock`]   | No (yields slice)  | Yes        | Short sections under heavier contention   |
//!
//! The condvar-based primitives share one pattern: take the lock, wait on the
//! condition while a predicate holds (re-checking it after every wake-up),
//! mutate the state under the same lock, notify on the way out.
//!
//! None of the primitives supports timeouts or cancellation. An acquire that
//! is never matched by a release blocks its waiters forever.
//!
//! ## Driving primitives uniformly
//! The benchmark harness does not care which primitive it drives. It only
//! needs the [`Coordination`] capability: `acquire` before touching the shared
//! collection and `release` afterwards. A [`Permit`] bundles the pair and
//! releases on drop. [`Coordination::capacity`] tells the harness how many
//! workers the primitive admits at once, which is what it checks the run
//! against.
//!
//! [`Mutex`]: mutex::Mutex
//! [`Semaphore`]: semaphore::Semaphore
//! [`SlimSemaphore`]: slim_semaphore::SlimSemaphore
//! [`CyclicBarrier`]: barrier::CyclicBarrier
//! [`Monitor`]: monitor::Monitor
//! [`SpinLock`]: spinlock::SpinLock
//! [`YieldingSpinLock`]: spinlock::YieldingSpinLock

pub mod barrier;
pub mod monitor;
pub mod mutex;
pub mod semaphore;
pub mod slim_semaphore;
pub mod spinlock;

pub use barrier::*;
pub use monitor::*;
pub use mutex::*;
pub use semaphore::*;
pub use slim_semaphore::*;
pub use spinlock::*;

/// The capability set the benchmark harness drives: acquire the primitive's
/// coordination guarantee, then release it.
pub trait Coordination: Sync {
    /// Blocks (or spins) until the calling thread holds the guarantee.
    fn acquire(&self);

    /// Gives the guarantee back.
    fn release(&self);

    /// How many threads may hold the guarantee at the same time, or `None`
    /// if it does not bound them at all.
    fn capacity(&self) -> Option<usize> {
        Some(1)
    }

    /// Acquires and returns a guard that releases on drop.
    ///
    /// Unsized primitives (`dyn Coordination`) go through [`Permit::new`].
    fn enter(&self) -> Permit<'_, Self>
    where
        Self: Sized,
    {
        Permit::new(self)
    }
}

/// An RAII implementation of a "scoped acquire". When this structure is
/// dropped (falls out of scope), the primitive is released.
///
/// This structure is created by [`Coordination::enter`] or [`Permit::new`].
#[must_use = "the primitive is released as soon as the permit is dropped"]
pub struct Permit<'a, C: Coordination + ?Sized> {
    primitive: &'a C,
}

impl<'a, C: Coordination + ?Sized> Permit<'a, C> {
    /// Acquires `primitive` and holds it until the permit is dropped.
    pub fn new(primitive: &'a C) -> Self {
        primitive.acquire();
        Self { primitive }
    }
}

impl<C: Coordination + ?Sized> Drop for Permit<'_, C> {
    fn drop(&mut self) {
        self.primitive.release()
    }
}

impl<C: Coordination + ?Sized> Coordination for &C {
    fn acquire(&self) {
        (**self).acquire()
    }

    fn release(&self) {
        (**self).release()
    }

    fn capacity(&self) -> Option<usize> {
        (**self).capacity()
    }
}

impl<C: Coordination + ?Sized> Coordination for Box<C> {
    fn acquire(&self) {
        (**self).acquire()
    }

    fn release(&self) {
        (**self).release()
    }

    fn capacity(&self) -> Option<usize> {
        (**self).capacity()
    }
}
