//! # Contention Benchmark Harness.
//!
//! For each primitive under test the harness spawns `W` worker threads. Each
//! worker runs `I` iterations of:
//!
//! 1. draw a symbol from the [`SymbolSource`],
//! 2. acquire the primitive's coordination guarantee,
//! 3. append the symbol,
//! 4. release.
//!
//! The wall-clock time from the first spawn to the last join is the
//! primitive's [`Measurement`]. After the join the run must hold exactly
//! `W × I` symbols, every one of which the source could have produced;
//! anything else is reported as an error.
//!
//! The harness only sees the [`Coordination`] capability, so the same loop
//! drives the mutex baseline, semaphores, the barrier, the monitor and both
//! spin locks.
//!
//! ## Where symbols go
//! | [`Coordination::capacity`] | Append target                              |
//! |----------------------------|--------------------------------------------|
//! | `Some(1)`                  | one [`SharedOutput`], a plain `Vec<u8>`    |
//! | `Some(n)`, `n > 1`         | a buffer per worker, joined at the end     |
//! | `None` (barrier)           | a buffer per worker, joined at the end     |
//!
//! Exclusive primitives are the only ones that can protect a single
//! unsynchronized collection, so only they get one. The others admit several
//! workers at once by contract, and a shared `Vec` under them would be a
//! data race rather than a measurement.
//!
//! Independently of the target, the harness counts the workers between
//! acquire and release. A peak above the capacity fails the run with
//! [`SyncError::ExclusionViolated`]. An exclusive append only happens when
//! that count confirms the worker is alone, so a broken primitive loses
//! symbols instead of corrupting memory.

use crate::{
    config::BenchConfig,
    error::{Result, SyncError},
    sync::{
        Coordination, CyclicBarrier, Monitor, Mutex, Permit, Semaphore, SlimSemaphore,
        SpinLock, YieldingSpinLock,
    },
};
use rand::Rng;
use std::{
    cell::UnsafeCell,
    fmt,
    ops::RangeInclusive,
    sync::atomic::{AtomicUsize, Ordering},
    thread,
    time::{Duration, Instant},
};
use tracing::{debug, info};

/// Produces the values workers append.
pub trait SymbolSource: Sync {
    /// Draws the next symbol.
    fn next_symbol(&self) -> u8;

    /// Whether `symbol` is something this source can produce.
    fn accepts(&self, _symbol: u8) -> bool {
        true
    }
}

impl<F: Fn() -> u8 + Sync> SymbolSource for F {
    fn next_symbol(&self) -> u8 {
        self()
    }
}

/// Uniformly random printable ASCII, `' '..='~'`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintableAscii;

impl PrintableAscii {
    /// The range symbols are drawn from.
    pub const RANGE: RangeInclusive<u8> = 32..=126;
}

impl SymbolSource for PrintableAscii {
    fn next_symbol(&self) -> u8 {
        rand::rng().random_range(Self::RANGE)
    }

    fn accepts(&self, symbol: u8) -> bool {
        Self::RANGE.contains(&symbol)
    }
}

/// Append-only collection guarded by the primitive under test.
///
/// The collection does no synchronization of its own: a push is a plain
/// `Vec::push`, and two overlapping pushes are a data race. Whoever pushes
/// must already have excluded everybody else.
#[derive(Default)]
pub struct SharedOutput {
    symbols: UnsafeCell<Vec<u8>>,
}

// SAFETY: shared access only happens through `push`, whose caller guarantees
// that no other push runs at the same time.
unsafe impl Sync for SharedOutput {}

impl SharedOutput {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty collection with room for `capacity` symbols.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            symbols: UnsafeCell::new(Vec::with_capacity(capacity)),
        }
    }

    /// Appends one symbol.
    ///
    /// # Safety
    ///
    /// No other thread may push at the same time.
    pub unsafe fn push(&self, symbol: u8) {
        unsafe { (*self.symbols.get()).push(symbol) }
    }

    /// Takes the symbols, in the order the pushes were serialized.
    pub fn into_vec(self) -> Vec<u8> {
        self.symbols.into_inner()
    }
}

/// Counts the workers currently between acquire and release.
#[derive(Default)]
struct Occupancy {
    inside: AtomicUsize,
    peak: AtomicUsize,
}

impl Occupancy {
    /// Registers the caller and returns how many workers are inside,
    /// the caller included.
    fn enter(&self) -> usize {
        let inside = self.inside.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(inside, Ordering::Relaxed);
        inside
    }

    fn exit(&self) {
        self.inside.fetch_sub(1, Ordering::SeqCst);
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::Relaxed)
    }
}

/// What `contend` hands over for verification.
struct Run {
    elapsed: Duration,
    symbols: Vec<u8>,
    peak: usize,
}

/// Wall-clock result of one primitive's run.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    /// Name of the primitive.
    pub name: String,
    /// Spawn-to-join time.
    pub elapsed: Duration,
    /// Symbols found in the collection after the join.
    pub collected: usize,
}

impl Measurement {
    /// Elapsed time in seconds.
    pub fn seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} time: {} seconds", self.name, self.seconds())
    }
}

/// The primitives the harness knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// `parking_lot`-backed [`Mutex`], the baseline.
    Mutex,
    /// [`Semaphore`] with `permits` initial and maximum permits.
    Semaphore,
    /// [`SlimSemaphore`] with `permits` initial and maximum permits.
    SlimSemaphore,
    /// [`CyclicBarrier`] for all workers.
    Barrier,
    /// [`Monitor`].
    Monitor,
    /// Busy-waiting [`SpinLock`].
    SpinLock,
    /// [`YieldingSpinLock`].
    YieldingSpinLock,
}

impl Primitive {
    /// Every primitive, in reporting order.
    pub const ALL: [Primitive; 7] = [
        Primitive::Mutex,
        Primitive::Semaphore,
        Primitive::SlimSemaphore,
        Primitive::Barrier,
        Primitive::Monitor,
        Primitive::SpinLock,
        Primitive::YieldingSpinLock,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Mutex => "Mutex",
            Primitive::Semaphore => "Semaphore",
            Primitive::SlimSemaphore => "SemaphoreSlim",
            Primitive::Barrier => "Barrier",
            Primitive::Monitor => "Monitor",
            Primitive::SpinLock => "SpinLock",
            Primitive::YieldingSpinLock => "SpinLock (yield)",
        }
    }

    /// Builds a fresh, unshared instance sized for `config`.
    pub fn build(self, config: &BenchConfig) -> Result<Box<dyn Coordination + Send>> {
        Ok(match self {
            Primitive::Mutex => Box::new(Mutex::new()),
            Primitive::Semaphore => Box::new(Semaphore::new(config.permits(), config.permits())?),
            Primitive::SlimSemaphore => {
                Box::new(SlimSemaphore::new(config.permits(), config.permits())?)
            }
            Primitive::Barrier => Box::new(CyclicBarrier::new(config.workers())?),
            Primitive::Monitor => Box::new(Monitor::new()),
            Primitive::SpinLock => Box::new(SpinLock::new()),
            Primitive::YieldingSpinLock => Box::new(YieldingSpinLock::new()),
        })
    }
}

/// Drives primitives through the acquire/append/release loop.
pub struct Harness<S: SymbolSource = PrintableAscii> {
    config: BenchConfig,
    source: S,
}

impl Harness<PrintableAscii> {
    /// Creates a harness drawing printable ASCII symbols.
    pub fn printable(config: BenchConfig) -> Self {
        Self::new(config, PrintableAscii)
    }
}

impl<S: SymbolSource> Harness<S> {
    /// Creates a harness drawing symbols from `source`.
    pub fn new(config: BenchConfig, source: S) -> Self {
        Self { config, source }
    }

    /// The configuration this harness runs with.
    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Runs the contended loop against `primitive` and checks the output.
    ///
    /// # Errors
    ///
    /// [`SyncError::WorkerPanicked`] if a worker did not finish,
    /// [`SyncError::ExclusionViolated`] if more workers got in than the
    /// primitive admits, [`SyncError::CountMismatch`] or
    /// [`SyncError::CorruptedSymbol`] if the collection does not hold up.
    pub fn run<C>(&self, name: &str, primitive: &C) -> Result<Measurement>
    where
        C: Coordination + ?Sized,
    {
        let run = self.contend(name, primitive)?;
        let measurement = Measurement {
            name: name.to_owned(),
            elapsed: run.elapsed,
            collected: run.symbols.len(),
        };
        self.verify(name, primitive.capacity(), run)?;
        info!(
            primitive = name,
            workers = self.config.workers(),
            iterations = self.config.iterations(),
            seconds = measurement.seconds(),
            "benchmark finished"
        );
        Ok(measurement)
    }

    /// Builds and runs each primitive in turn, keeping the given order.
    pub fn run_all(&self, primitives: &[Primitive]) -> Result<Vec<Measurement>> {
        primitives
            .iter()
            .map(|primitive| {
                let instance = primitive.build(&self.config)?;
                self.run(primitive.name(), &*instance)
            })
            .collect()
    }

    fn contend<C>(&self, name: &str, primitive: &C) -> Result<Run>
    where
        C: Coordination + ?Sized,
    {
        let capacity = primitive.capacity();
        let iterations = self.config.iterations();
        let output = SharedOutput::with_capacity(self.config.expected_len());
        let occupancy = Occupancy::default();

        let start = Instant::now();
        let joined = thread::scope(|s| {
            let workers = (0..self.config.workers())
                .map(|worker| {
                    let (output, occupancy) = (&output, &occupancy);
                    let source = &self.source;
                    debug!(primitive = name, worker, "spawning worker");
                    s.spawn(move || {
                        let mut own = Vec::new();
                        for _ in 0..iterations {
                            let symbol = source.next_symbol();
                            let _permit = Permit::new(primitive);
                            let inside = occupancy.enter();
                            if capacity == Some(1) {
                                // A second worker inside means the primitive
                                // failed; its symbol is dropped and the peak
                                // reports it after the join.
                                if inside == 1 {
                                    // SAFETY: every pusher is counted in
                                    // `occupancy` for the whole push, so a
                                    // count of one rules out a concurrent push.
                                    unsafe { output.push(symbol) }
                                }
                            } else {
                                own.push(symbol);
                            }
                            occupancy.exit();
                        }
                        own
                    })
                })
                .collect::<Vec<_>>();
            workers
                .into_iter()
                .map(|worker| worker.join())
                .collect::<Vec<_>>()
        });
        let elapsed = start.elapsed();

        let buffers = joined
            .into_iter()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| SyncError::WorkerPanicked(name.to_owned()))?;
        let mut symbols = output.into_vec();
        symbols.extend(buffers.into_iter().flatten());
        Ok(Run {
            elapsed,
            symbols,
            peak: occupancy.peak(),
        })
    }

    fn verify(&self, name: &str, capacity: Option<usize>, run: Run) -> Result<()> {
        if let Some(capacity) = capacity.filter(|&capacity| run.peak > capacity) {
            return Err(SyncError::ExclusionViolated {
                name: name.to_owned(),
                peak: run.peak,
                capacity,
            });
        }
        let expected = self.config.expected_len();
        if run.symbols.len() != expected {
            return Err(SyncError::CountMismatch {
                name: name.to_owned(),
                collected: run.symbols.len(),
                expected,
            });
        }
        match run
            .symbols
            .into_iter()
            .find(|symbol| !self.source.accepts(*symbol))
        {
            Some(symbol) => Err(SyncError::CorruptedSymbol {
                name: name.to_owned(),
                symbol,
            }),
            None => Ok(()),
        }
    }
}
