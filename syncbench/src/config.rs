//! Run configuration.
//!
//! Both the benchmark and the dining table are configured through a builder
//! that checks its values once, in `build()`. Anything that would otherwise
//! only show up as a deadlock at run time (no workers, a one-seat ring) is
//! rejected there.

use crate::{
    error::{Result, SyncError},
    philosophers::AcquireOrder,
};
use std::time::Duration;

/// Parameters of one contention benchmark run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    workers: usize,
    iterations: usize,
    permits: usize,
}

impl BenchConfig {
    /// Number of worker threads in the reference scenario.
    pub const DEFAULT_WORKERS: usize = 4;
    /// Iterations per worker in the reference scenario.
    pub const DEFAULT_ITERATIONS: usize = 1000;

    /// Starts a builder with the reference values.
    pub fn builder() -> BenchConfigBuilder {
        BenchConfigBuilder {
            config: Self {
                workers: Self::DEFAULT_WORKERS,
                iterations: Self::DEFAULT_ITERATIONS,
                permits: 1,
            },
        }
    }

    /// Worker threads spawned per primitive.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Acquire/append/release cycles per worker.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Initial and maximum count of the semaphores under test.
    pub fn permits(&self) -> usize {
        self.permits
    }

    /// Number of symbols a complete run must leave in the collection.
    pub fn expected_len(&self) -> usize {
        self.workers * self.iterations
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self::builder().config
    }
}

/// A builder for [`BenchConfig`].
#[derive(Debug, Clone)]
pub struct BenchConfigBuilder {
    config: BenchConfig,
}

impl BenchConfigBuilder {
    /// Sets the number of worker threads.
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Sets the iterations per worker.
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.config.iterations = iterations;
        self
    }

    /// Sets the permits of the semaphores under test.
    pub fn permits(mut self, permits: usize) -> Self {
        self.config.permits = permits;
        self
    }

    /// Validates and returns the configuration.
    ///
    /// # Errors
    ///
    /// [`SyncError::NoWorkers`] without workers, [`SyncError::ZeroMaximum`]
    /// without permits.
    pub fn build(self) -> Result<BenchConfig> {
        if self.config.workers == 0 {
            return Err(SyncError::NoWorkers);
        }
        if self.config.permits == 0 {
            return Err(SyncError::ZeroMaximum);
        }
        Ok(self.config)
    }
}

/// Parameters of the dining-philosophers scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    seats: usize,
    rounds: usize,
    eat_for: Duration,
    think_for: Duration,
    stagger: Duration,
    order: AcquireOrder,
}

impl TableConfig {
    /// Ring size in the reference scenario.
    pub const DEFAULT_SEATS: usize = 5;
    /// Eating time in the reference scenario.
    pub const DEFAULT_EAT_FOR: Duration = Duration::from_secs(2);

    /// Starts a builder with the reference values.
    pub fn builder() -> TableConfigBuilder {
        TableConfigBuilder {
            config: Self {
                seats: Self::DEFAULT_SEATS,
                rounds: 1,
                eat_for: Self::DEFAULT_EAT_FOR,
                think_for: Duration::ZERO,
                stagger: Duration::ZERO,
                order: AcquireOrder::default(),
            },
        }
    }

    /// Number of philosophers (and forks) around the table.
    pub fn seats(&self) -> usize {
        self.seats
    }

    /// Meals each philosopher eats before leaving.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// How long a philosopher holds both forks.
    pub fn eat_for(&self) -> Duration {
        self.eat_for
    }

    /// How long a philosopher thinks before reaching for the forks.
    pub fn think_for(&self) -> Duration {
        self.think_for
    }

    /// Delay between two neighbours sitting down: seat `i` arrives after
    /// `i × stagger`.
    pub fn stagger(&self) -> Duration {
        self.stagger
    }

    /// Fork acquisition policy.
    pub fn order(&self) -> AcquireOrder {
        self.order
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::builder().config
    }
}

/// A builder for [`TableConfig`].
#[derive(Debug, Clone)]
pub struct TableConfigBuilder {
    config: TableConfig,
}

impl TableConfigBuilder {
    /// Sets the ring size.
    pub fn seats(mut self, seats: usize) -> Self {
        self.config.seats = seats;
        self
    }

    /// Sets the number of meals per philosopher.
    pub fn rounds(mut self, rounds: usize) -> Self {
        self.config.rounds = rounds;
        self
    }

    /// Sets the eating time.
    pub fn eat_for(mut self, eat_for: Duration) -> Self {
        self.config.eat_for = eat_for;
        self
    }

    /// Sets the thinking time.
    pub fn think_for(mut self, think_for: Duration) -> Self {
        self.config.think_for = think_for;
        self
    }

    /// Sets the delay between neighbours sitting down.
    pub fn stagger(mut self, stagger: Duration) -> Self {
        self.config.stagger = stagger;
        self
    }

    /// Sets the fork acquisition policy.
    pub fn order(mut self, order: AcquireOrder) -> Self {
        self.config.order = order;
        self
    }

    /// Validates and returns the configuration.
    ///
    /// # Errors
    ///
    /// [`SyncError::RingTooSmall`] for fewer than two seats.
    pub fn build(self) -> Result<TableConfig> {
        if self.config.seats < 2 {
            return Err(SyncError::RingTooSmall(self.config.seats));
        }
        Ok(self.config)
    }
}
