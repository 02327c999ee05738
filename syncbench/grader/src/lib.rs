//! Test cases for syncbench, and the driver that runs them.
//!
//! Each test case is a plain function grouped by the component it exercises.
//! [`TestDriver::start`] runs a list of them on fresh threads and prints a
//! summary; `tests/grade.rs` exposes the same functions to `cargo test`.

pub mod bench;
pub mod philosophers;
pub mod sync;

use std::{
    collections::BTreeSet,
    sync::mpsc,
    thread,
    time::Duration,
};

#[doc(hidden)]
pub trait TestCase
where
    Self: Sync + Send,
{
    fn name(&'static self) -> &'static str;
    fn run(&'static self) -> bool;
}

impl<T> TestCase for T
where
    T: Fn() + Send + Sync + 'static,
{
    fn name(&'static self) -> &'static str {
        core::any::type_name::<T>()
    }

    fn run(&'static self) -> bool {
        print!("test {} ... ", self.name());
        let passed = thread::Builder::new()
            .name(self.name().to_owned())
            .spawn(self)
            .map(|handle| handle.join().is_ok())
            .unwrap_or(false);
        println!("{}", if passed { "ok" } else { "FAILED" });
        passed
    }
}

/// A driver for running tests.
pub struct TestDriver;

impl TestDriver {
    /// Run the given tests, keeping only those named in `filter` unless it is
    /// empty. Returns whether every selected test passed.
    pub fn start<const TC: usize>(
        tests: [&'static dyn TestCase; TC],
        filter: impl IntoIterator<Item = String>,
    ) -> bool {
        let filter = filter.into_iter().collect::<BTreeSet<_>>();
        let tests = tests
            .into_iter()
            .filter(|test| {
                let name = test.name();
                let r = name.split("::").next().map(|n| n.len() + 2).unwrap_or(0);
                filter.is_empty() || filter.contains(&name[r..])
            })
            .collect::<Vec<_>>();

        let (total, mut succ) = (tests.len(), 0);
        println!(
            "Running {} test{}",
            total,
            if total == 1 { "" } else { "s" }
        );
        for test in tests {
            if test.run() {
                succ += 1;
            }
        }
        println!(
            "test result: {}. {} passed; {} failed",
            if total == succ { "ok" } else { "FAILED" },
            succ,
            total - succ
        );
        total == succ
    }
}

/// Runs `f` on its own thread and panics if it does not return within
/// `limit`. A thread that never returns is leaked.
pub fn within<R: Send + 'static>(limit: Duration, f: impl FnOnce() -> R + Send + 'static) -> R {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(f());
    });
    match rx.recv_timeout(limit) {
        Ok(r) => r,
        Err(mpsc::RecvTimeoutError::Timeout) => panic!("did not finish within {limit:?}"),
        Err(mpsc::RecvTimeoutError::Disconnected) => panic!("panicked before finishing"),
    }
}

/// Spins (yielding) until `cond` holds.
pub fn wait_until(cond: impl Fn() -> bool) {
    while !cond() {
        thread::yield_now();
    }
}
