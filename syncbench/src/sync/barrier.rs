//! # Cyclic Barrier.
//!
//! A barrier blocks a fixed number of *parties* until all of them have called
//! [`CyclicBarrier::wait`], then lets them all go at once. It resets itself on
//! the way out, so the same parties can meet again: each complete rendezvous
//! is one *generation*.
//!
//! The last party to arrive bumps the generation and broadcasts. Everybody
//! else sleeps until the generation differs from the one they saw on entry.
//! Comparing generations, rather than the arrival count, keeps a fast thread
//! that already re-entered the next round from confusing the stragglers of the
//! previous one.
//!
//! A party that never arrives blocks the others forever; there is no notion
//! of a broken barrier.

use crate::{
    error::{Result, SyncError},
    sync::Coordination,
};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

struct Generation {
    /// Parties still expected in the current generation.
    remaining: usize,
    id: u64,
}

/// A reusable rendezvous point for a fixed set of threads.
///
/// # Examples
///
/// ```
/// use syncbench::sync::CyclicBarrier;
///
/// let barrier = CyclicBarrier::new(3).unwrap();
/// std::thread::scope(|s| {
///     for _ in 0..3 {
///         s.spawn(|| barrier.wait());
///     }
/// });
/// assert_eq!(barrier.generation(), 1);
/// ```
pub struct CyclicBarrier {
    state: Mutex<Generation>,
    released: Condvar,
    parties: usize,
}

/// What a returning [`CyclicBarrier::wait`] call took part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarrierWaitResult {
    generation: u64,
    is_leader: bool,
}

impl BarrierWaitResult {
    /// The generation this call completed.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether this call was the last arrival that released the others.
    pub fn is_leader(&self) -> bool {
        self.is_leader
    }
}

impl CyclicBarrier {
    /// Creates a barrier for `parties` threads.
    ///
    /// # Errors
    ///
    /// [`SyncError::NoParties`] if `parties` is zero.
    pub fn new(parties: usize) -> Result<Self> {
        if parties == 0 {
            return Err(SyncError::NoParties);
        }
        Ok(Self {
            state: Mutex::new(Generation {
                remaining: parties,
                id: 0,
            }),
            released: Condvar::new(),
            parties,
        })
    }

    /// Blocks until all parties of the current generation have arrived.
    pub fn wait(&self) -> BarrierWaitResult {
        let mut state = self.lock();
        let generation = state.id;
        state.remaining -= 1;
        if state.remaining == 0 {
            state.id += 1;
            state.remaining = self.parties;
            self.released.notify_all();
            BarrierWaitResult {
                generation,
                is_leader: true,
            }
        } else {
            let _state = self
                .released
                .wait_while(state, |state| state.id == generation)
                .unwrap_or_else(PoisonError::into_inner);
            BarrierWaitResult {
                generation,
                is_leader: false,
            }
        }
    }

    /// Number of parties needed to trip the barrier.
    pub fn parties(&self) -> usize {
        self.parties
    }

    /// Number of completed generations.
    pub fn generation(&self) -> u64 {
        self.lock().id
    }

    fn lock(&self) -> MutexGuard<'_, Generation> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A barrier gives no exclusion: `acquire` is the rendezvous, and there is
/// nothing to give back.
impl Coordination for CyclicBarrier {
    fn acquire(&self) {
        self.wait();
    }

    fn release(&self) {}

    fn capacity(&self) -> Option<usize> {
        None
    }
}
