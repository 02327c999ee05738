//! # syncbench: Thread Coordination Primitives Under Contention
//!
//! This crate implements a handful of classic **synchronization primitives**
//! on top of OS threads, a **benchmark harness** that hammers each of them
//! with the same contended workload, and the **dining philosophers** scenario
//! that shows how acquiring two locks in the wrong order deadlocks.
//!
//! ## Crate Outline
//!
//! - [`Synchronization Primitives`]:
//!   - **Mutex**: an off-the-shelf lock, the baseline for everything else.
//!   - **Semaphore**: bounded counter, waiters parked by the OS.
//!   - **Slim Semaphore**: the same counter on a mutex and a condition
//!     variable, with saturating release.
//!   - **Cyclic Barrier**: reusable rendezvous for a fixed set of threads.
//!   - **Monitor**: exclusive lock expressed as wait/notify on a `held` flag.
//!   - **Spin Locks**: test-and-set locks that busy-wait or yield.
//!
//! - [`Benchmark Harness`]: runs `workers × iterations` acquire/append/release
//!   cycles per primitive and reports the wall-clock time of each.
//!
//! - [`Dining Philosophers`]: a ring of forks shared by neighbouring threads,
//!   with deadlock-prone and deadlock-free acquisition orders.
//!
//! Runs are configured through [`BenchConfig`] and [`TableConfig`]; every
//! fallible operation reports a [`SyncError`].
//!
//! [`Synchronization Primitives`]: sync
//! [`Benchmark Harness`]: bench
//! [`Dining Philosophers`]: philosophers
//! [`BenchConfig`]: config::BenchConfig
//! [`TableConfig`]: config::TableConfig
//! [`SyncError`]: error::SyncError

#![deny(rustdoc::broken_intra_doc_links)]

pub mod bench;
pub mod config;
pub mod error;
pub mod philosophers;
pub mod sync;

pub use error::{Result, SyncError};
