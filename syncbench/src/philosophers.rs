//! # Dining Philosophers.
//!
//! `N` philosophers sit around a round table with one fork between each pair
//! of neighbours. Seat `i` eats with its right fork `i` and its left fork
//! `(i + N - 1) mod N`, and must hold both at once. Each fork is a
//! [`Monitor`], so two philosophers can never hold the same fork.
//!
//! Every round a philosopher goes through the same lifecycle, recorded as a
//! [`Transition`] in the returned [`Journal`]:
//!
//! ```text
//! Thinking -> Waiting (for both forks) -> Eating -> Released
//! ```
//!
//! ## Acquisition order
//! How the two forks are picked up decides whether the table can deadlock:
//!
//! - [`AcquireOrder::RightThenLeft`] has every philosopher take the right fork
//!   and then the left one. If all of them grab their right fork at the same
//!   time, each waits on a left fork held by its neighbour and the wait cycle
//!   never resolves. Kept to demonstrate the problem; do not expect
//!   [`Table::dine`] to return under unlucky timing. Seating the philosophers
//!   far enough apart (see [`TableConfig::stagger`]) keeps them from ever
//!   reaching at once.
//! - [`AcquireOrder::Ranked`] (the default) always takes the lower-numbered
//!   fork first. The fork ranking is a total order, so no cycle can form.
//! - [`AcquireOrder::Backoff`] takes the right fork, *tries* the left one, and
//!   on failure puts the right fork back and backs off before retrying.

use crate::{
    config::TableConfig,
    error::{Result, SyncError},
    sync::Monitor,
};
use crossbeam_queue::SegQueue;
use crossbeam_utils::Backoff;
use std::{fmt, thread};
use tracing::{debug, info, warn};

/// Fork acquisition policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcquireOrder {
    /// Right fork, then left fork, for every seat. Deadlock-prone.
    RightThenLeft,
    /// Lower-numbered fork first.
    #[default]
    Ranked,
    /// Right fork, then try the left one; put both back and retry on failure.
    Backoff,
}

/// One step of a philosopher's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// Not interested in forks.
    Thinking,
    /// Reaching for both forks.
    Waiting,
    /// Holding both forks.
    Eating,
    /// Both forks put back.
    Released,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Thinking => "thinking",
            Phase::Waiting => "waiting for forks",
            Phase::Eating => "eating",
            Phase::Released => "done eating",
        })
    }
}

/// A recorded lifecycle step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Seat of the philosopher.
    pub seat: usize,
    /// Zero-based meal number.
    pub round: usize,
    /// Phase entered.
    pub phase: Phase,
}

/// Every transition of one dinner, in the order they were recorded.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    transitions: Vec<Transition>,
}

impl Journal {
    /// All transitions.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// The transitions of one seat, in order.
    pub fn of_seat(&self, seat: usize) -> impl Iterator<Item = &Transition> {
        self.transitions.iter().filter(move |t| t.seat == seat)
    }

    /// Number of meals eaten at `seat`.
    pub fn meals(&self, seat: usize) -> usize {
        self.of_seat(seat)
            .filter(|t| t.phase == Phase::Eating)
            .count()
    }
}

/// One shared resource slot: a fork guarded by its own monitor.
#[derive(Default)]
pub struct Fork {
    monitor: Monitor,
}

impl Fork {
    /// Picks the fork up, blocking while a neighbour holds it.
    pub fn pick_up(&self) {
        self.monitor.enter()
    }

    /// Picks the fork up if it is lying on the table.
    pub fn try_pick_up(&self) -> bool {
        self.monitor.try_enter()
    }

    /// Puts the fork back.
    pub fn put_down(&self) {
        self.monitor.exit()
    }

    /// Whether somebody holds the fork.
    pub fn in_use(&self) -> bool {
        self.monitor.is_held()
    }
}

/// A ring of forks and the philosophers sharing them.
pub struct Table {
    forks: Vec<Fork>,
    config: TableConfig,
}

impl Table {
    /// Lays the table for `config.seats()` philosophers.
    ///
    /// # Errors
    ///
    /// [`SyncError::RingTooSmall`] for fewer than two seats.
    pub fn new(config: TableConfig) -> Result<Self> {
        if config.seats() < 2 {
            return Err(SyncError::RingTooSmall(config.seats()));
        }
        let forks = (0..config.seats()).map(|_| Fork::default()).collect();
        Ok(Self { forks, config })
    }

    /// Number of seats.
    pub fn seats(&self) -> usize {
        self.forks.len()
    }

    /// The fork at position `index`.
    ///
    /// # Panics
    ///
    /// If `index` is not below [`Table::seats`].
    pub fn fork(&self, index: usize) -> &Fork {
        &self.forks[index]
    }

    /// Indices of the `(right, left)` forks of `seat`.
    pub fn forks_of(&self, seat: usize) -> (usize, usize) {
        let n = self.seats();
        (seat % n, (seat + n - 1) % n)
    }

    /// Seats every philosopher, lets each eat `rounds` meals and returns once
    /// all of them have left.
    ///
    /// # Errors
    ///
    /// [`SyncError::WorkerPanicked`] if a philosopher's thread panicked.
    pub fn dine(&self) -> Result<Journal> {
        let journal = SegQueue::new();
        info!(
            seats = self.seats(),
            rounds = self.config.rounds(),
            order = ?self.config.order(),
            "dinner starts"
        );
        if self.config.order() == AcquireOrder::RightThenLeft {
            warn!("right-then-left acquisition can deadlock the table");
        }

        let finished = thread::scope(|s| {
            let philosophers = (0..self.seats())
                .map(|seat| {
                    let journal = &journal;
                    s.spawn(move || {
                        self.arrive(seat);
                        for round in 0..self.config.rounds() {
                            self.meal(seat, round, journal);
                        }
                    })
                })
                .collect::<Vec<_>>();
            philosophers
                .into_iter()
                .map(|philosopher| philosopher.join())
                .fold(true, |ok, joined| ok && joined.is_ok())
        });
        if !finished {
            return Err(SyncError::WorkerPanicked("philosophers".to_owned()));
        }

        let mut transitions = Vec::with_capacity(journal.len());
        while let Some(transition) = journal.pop() {
            transitions.push(transition);
        }
        info!(transitions = transitions.len(), "dinner is over");
        Ok(Journal { transitions })
    }

    fn arrive(&self, seat: usize) {
        let stagger = self.config.stagger();
        if !stagger.is_zero() {
            let rank = u32::try_from(seat).unwrap_or(u32::MAX);
            thread::sleep(stagger.saturating_mul(rank));
        }
    }

    fn meal(&self, seat: usize, round: usize, journal: &SegQueue<Transition>) {
        let record = |phase: Phase| {
            info!("philosopher {} is {}", seat + 1, phase);
            journal.push(Transition { seat, round, phase });
        };

        record(Phase::Thinking);
        if !self.config.think_for().is_zero() {
            thread::sleep(self.config.think_for());
        }

        record(Phase::Waiting);
        let (first, second) = self.pick_up_both(seat);
        record(Phase::Eating);
        thread::sleep(self.config.eat_for());

        self.forks[second].put_down();
        self.forks[first].put_down();
        record(Phase::Released);
    }

    /// Picks up both forks of `seat` and returns them in pick-up order.
    fn pick_up_both(&self, seat: usize) -> (usize, usize) {
        let (right, left) = self.forks_of(seat);
        match self.config.order() {
            AcquireOrder::RightThenLeft => {
                self.forks[right].pick_up();
                self.forks[left].pick_up();
                (right, left)
            }
            AcquireOrder::Ranked => {
                let (low, high) = (right.min(left), right.max(left));
                self.forks[low].pick_up();
                self.forks[high].pick_up();
                (low, high)
            }
            AcquireOrder::Backoff => {
                let backoff = Backoff::new();
                loop {
                    self.forks[right].pick_up();
                    if self.forks[left].try_pick_up() {
                        break (right, left);
                    }
                    self.forks[right].put_down();
                    debug!(seat, "left fork busy, backing off");
                    backoff.snooze();
                }
            }
        }
    }
}
