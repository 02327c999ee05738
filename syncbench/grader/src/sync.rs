use std::{
    cell::UnsafeCell,
    sync::atomic::{AtomicUsize, Ordering},
};
use syncbench::sync::Coordination;

/// A counter that is deliberately not thread-safe on its own. Only touched
/// while the primitive under test is held.
struct Unguarded(UnsafeCell<usize>);

unsafe impl Sync for Unguarded {}

impl Unguarded {
    /// # Safety
    ///
    /// No other thread may bump the counter at the same time.
    unsafe fn bump(&self) {
        unsafe { *self.0.get() += 1 }
    }
}

/// `THREADS` threads each increment an unguarded counter `ROUNDS` times under
/// `lock`, checking that nobody else is inside the critical section.
fn exclusion<C: Coordination>(lock: &C) {
    const THREADS: usize = 8;
    const ROUNDS: usize = 10_000;

    let counter = Unguarded(UnsafeCell::new(0));
    let inside = AtomicUsize::new(0);
    std::thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                for _ in 0..ROUNDS {
                    lock.acquire();
                    assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                    unsafe { counter.bump() };
                    inside.fetch_sub(1, Ordering::SeqCst);
                    lock.release();
                }
            });
        }
    });
    assert_eq!(counter.0.into_inner(), THREADS * ROUNDS);
}

pub mod semaphore {
    use crate::wait_until;
    use std::{
        sync::{
            Arc,
            atomic::{AtomicBool, AtomicUsize, Ordering},
        },
        thread,
        time::Duration,
    };
    use syncbench::{SyncError, sync::Semaphore};

    pub fn sema_0() {
        let sema = Arc::new(Semaphore::new(0, 1).unwrap());
        let is_thread_active = Arc::new(AtomicBool::new(false));
        let is_woken_up = Arc::new(AtomicBool::new(false));

        let thread = {
            let (sema, is_thread_active, is_woken_up) =
                (sema.clone(), is_thread_active.clone(), is_woken_up.clone());
            thread::spawn(move || {
                is_thread_active.store(true, Ordering::SeqCst);
                sema.acquire();
                is_woken_up.store(true, Ordering::SeqCst);
            })
        };

        wait_until(|| is_thread_active.load(Ordering::SeqCst));
        thread::sleep(Duration::from_millis(50));
        assert!(!is_woken_up.load(Ordering::SeqCst));

        sema.release();
        thread.join().unwrap();
        assert!(is_woken_up.load(Ordering::SeqCst));
        assert_eq!(sema.available(), 0);
    }

    pub fn n_permits() {
        const COUNT: usize = 5;
        const PERMITS: usize = 3;

        let sema = Arc::new(Semaphore::new(PERMITS, PERMITS).unwrap());
        let entered = Arc::new(AtomicUsize::new(0));

        let threads = (0..COUNT)
            .map(|_| {
                let (sema, entered) = (sema.clone(), entered.clone());
                thread::spawn(move || {
                    sema.acquire();
                    entered.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect::<Vec<_>>();

        wait_until(|| entered.load(Ordering::SeqCst) == PERMITS);
        thread::sleep(Duration::from_millis(50));
        assert_eq!(entered.load(Ordering::SeqCst), PERMITS);

        sema.release();
        sema.release();
        for thread in threads {
            thread.join().unwrap();
        }
        assert_eq!(entered.load(Ordering::SeqCst), COUNT);
    }

    pub fn exclusion() {
        super::exclusion(&Semaphore::new(1, 1).unwrap());
    }

    pub fn release_is_capped() {
        let sema = Semaphore::new(1, 2).unwrap();
        for _ in 0..5 {
            sema.release();
        }
        assert_eq!(sema.available(), 2);
        assert!(sema.try_acquire());
        assert!(sema.try_acquire());
        assert!(!sema.try_acquire());
    }

    pub fn no_lost_wakeups() {
        const PAIRS: usize = 4;
        const ROUNDS: usize = 2_000;

        let sema = Semaphore::new(0, PAIRS * ROUNDS).unwrap();
        thread::scope(|s| {
            for _ in 0..PAIRS {
                s.spawn(|| {
                    for _ in 0..ROUNDS {
                        sema.acquire();
                    }
                });
                s.spawn(|| {
                    for _ in 0..ROUNDS {
                        sema.release();
                    }
                });
            }
        });
        assert_eq!(sema.available(), 0);
    }

    pub fn invalid() {
        assert_eq!(Semaphore::new(0, 0).err(), Some(SyncError::ZeroMaximum));
        assert_eq!(
            Semaphore::new(3, 2).err(),
            Some(SyncError::InitialAboveMaximum { initial: 3, max: 2 })
        );
    }
}

pub mod slim_semaphore {
    use crate::wait_until;
    use std::{
        sync::{
            Arc,
            atomic::{AtomicBool, AtomicUsize, Ordering},
        },
        thread,
        time::Duration,
    };
    use syncbench::{SyncError, sync::SlimSemaphore};

    pub fn sema_0() {
        let sema = Arc::new(SlimSemaphore::new(0, 1).unwrap());
        let is_thread_active = Arc::new(AtomicBool::new(false));
        let is_woken_up = Arc::new(AtomicBool::new(false));

        let thread = {
            let (sema, is_thread_active, is_woken_up) =
                (sema.clone(), is_thread_active.clone(), is_woken_up.clone());
            thread::spawn(move || {
                is_thread_active.store(true, Ordering::SeqCst);
                sema.acquire();
                is_woken_up.store(true, Ordering::SeqCst);
            })
        };

        wait_until(|| is_thread_active.load(Ordering::SeqCst));
        thread::sleep(Duration::from_millis(50));
        assert!(!is_woken_up.load(Ordering::SeqCst));

        sema.release();
        thread.join().unwrap();
        assert!(is_woken_up.load(Ordering::SeqCst));
    }

    pub fn sema_2() {
        const COUNT: usize = 16;

        let sema = Arc::new(SlimSemaphore::new(2, COUNT).unwrap());
        let counter = Arc::new(AtomicUsize::new(0));

        let threads = (0..COUNT)
            .map(|_| {
                let (sema, counter) = (sema.clone(), counter.clone());
                thread::spawn(move || {
                    sema.acquire();
                    counter.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect::<Vec<_>>();

        let mut expected_cnt = 2;
        loop {
            wait_until(|| counter.load(Ordering::SeqCst) == expected_cnt);
            thread::sleep(Duration::from_millis(10));
            assert_eq!(counter.load(Ordering::SeqCst), expected_cnt);
            if expected_cnt == COUNT {
                break;
            }
            expected_cnt += 2;
            sema.release();
            sema.release();
        }
        for thread in threads {
            thread.join().unwrap();
        }
    }

    pub fn exclusion() {
        super::exclusion(&SlimSemaphore::new(1, 1).unwrap());
    }

    pub fn saturation() {
        let sema = Arc::new(SlimSemaphore::new(1, 1).unwrap());
        sema.acquire();
        for _ in 0..4 {
            sema.release();
        }
        assert_eq!(sema.available(), 1);

        sema.acquire();
        assert_eq!(sema.available(), 0);

        // A fresh thread must still block once the count is back at zero.
        let acquired = Arc::new(AtomicBool::new(false));
        let thread = {
            let (sema, acquired) = (sema.clone(), acquired.clone());
            thread::spawn(move || {
                sema.acquire();
                acquired.store(true, Ordering::SeqCst);
            })
        };
        thread::sleep(Duration::from_millis(50));
        assert!(!acquired.load(Ordering::SeqCst));

        sema.release();
        thread.join().unwrap();
        assert!(acquired.load(Ordering::SeqCst));
        assert_eq!(sema.available(), 0);
    }

    pub fn invalid() {
        assert_eq!(SlimSemaphore::new(1, 0).err(), Some(SyncError::ZeroMaximum));
        assert_eq!(
            SlimSemaphore::new(5, 4).err(),
            Some(SyncError::InitialAboveMaximum { initial: 5, max: 4 })
        );
    }
}

pub mod barrier {
    use std::{
        sync::{
            Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        thread,
    };
    use syncbench::{SyncError, sync::CyclicBarrier};

    const PARTIES: usize = 6;

    pub fn rendezvous() {
        let barrier = CyclicBarrier::new(PARTIES).unwrap();
        let arrived = AtomicUsize::new(0);
        let leaders = AtomicUsize::new(0);

        thread::scope(|s| {
            for _ in 0..PARTIES {
                s.spawn(|| {
                    arrived.fetch_add(1, Ordering::SeqCst);
                    let result = barrier.wait();
                    assert_eq!(arrived.load(Ordering::SeqCst), PARTIES);
                    assert_eq!(result.generation(), 0);
                    if result.is_leader() {
                        leaders.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });
        assert_eq!(leaders.load(Ordering::SeqCst), 1);
        assert_eq!(barrier.generation(), 1);
    }

    pub fn reuse() {
        const ROUNDS: usize = 50;

        let barrier = CyclicBarrier::new(PARTIES).unwrap();
        let arrived = AtomicUsize::new(0);
        let generations = Mutex::new(Vec::new());

        thread::scope(|s| {
            for _ in 0..PARTIES {
                s.spawn(|| {
                    for round in 0..ROUNDS {
                        arrived.fetch_add(1, Ordering::SeqCst);
                        let result = barrier.wait();
                        // Nobody of the next round may have arrived before
                        // everybody of this one was released.
                        assert!(arrived.load(Ordering::SeqCst) >= (round + 1) * PARTIES);
                        assert_eq!(result.generation(), round as u64);
                        generations.lock().unwrap().push(result.generation());
                    }
                });
            }
        });

        let mut generations = generations.into_inner().unwrap();
        generations.sort();
        assert_eq!(generations.len(), ROUNDS * PARTIES);
        assert!(
            generations
                .chunks(PARTIES)
                .enumerate()
                .all(|(round, chunk)| chunk.iter().all(|g| *g == round as u64))
        );
        assert_eq!(barrier.generation(), ROUNDS as u64);
    }

    pub fn single_party() {
        let barrier = CyclicBarrier::new(1).unwrap();
        for generation in 0..3 {
            let result = barrier.wait();
            assert!(result.is_leader());
            assert_eq!(result.generation(), generation);
        }
        assert_eq!(barrier.parties(), 1);
    }

    pub fn invalid() {
        assert_eq!(CyclicBarrier::new(0).err(), Some(SyncError::NoParties));
    }
}

pub mod monitor {
    use crate::wait_until;
    use std::{
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
        thread,
        time::Duration,
    };
    use syncbench::sync::Monitor;

    pub fn smoke() {
        let monitor = Monitor::new();
        assert!(!monitor.is_held());
        monitor.enter();
        assert!(monitor.is_held());
        assert!(!monitor.try_enter());
        monitor.exit();
        assert!(monitor.try_enter());
        monitor.exit();
        assert!(!monitor.is_held());
    }

    pub fn parking() {
        let monitor = Arc::new(Monitor::new());
        monitor.enter();
        let thread_spawned = Arc::new(AtomicBool::new(false));
        let entered = Arc::new(AtomicBool::new(false));

        let blockee = {
            let (monitor, thread_spawned, entered) =
                (monitor.clone(), thread_spawned.clone(), entered.clone());
            thread::spawn(move || {
                thread_spawned.store(true, Ordering::SeqCst);
                monitor.enter();
                entered.store(true, Ordering::SeqCst);
                monitor.exit();
            })
        };

        wait_until(|| thread_spawned.load(Ordering::SeqCst));
        thread::sleep(Duration::from_millis(50));
        assert!(
            !entered.load(Ordering::SeqCst),
            "A thread entered a monitor that is still held"
        );

        monitor.exit();
        blockee.join().unwrap();
        assert!(entered.load(Ordering::SeqCst));
        assert!(!monitor.is_held());
    }

    pub fn exclusion() {
        super::exclusion(&Monitor::new());
    }
}

pub mod mutex {
    use std::{
        sync::atomic::{AtomicBool, Ordering},
        thread,
        time::Duration,
    };
    use syncbench::sync::{Coordination, Mutex};

    pub fn smoke() {
        let mutex = Mutex::new();
        assert!(mutex.try_acquire());
        assert!(mutex.is_locked());
        assert!(!mutex.try_acquire());
        mutex.release();
        assert!(!mutex.is_locked());
        // Releasing again is absorbed.
        mutex.release();
        assert!(mutex.try_acquire());
        mutex.release();
    }

    pub fn blocking() {
        let mutex = Mutex::new();
        let entered = AtomicBool::new(false);
        mutex.acquire();
        thread::scope(|s| {
            s.spawn(|| {
                mutex.acquire();
                entered.store(true, Ordering::SeqCst);
                mutex.release();
            });
            thread::sleep(Duration::from_millis(100));
            assert!(!entered.load(Ordering::SeqCst));
            mutex.release();
        });
        assert!(entered.load(Ordering::SeqCst));
        assert_eq!(mutex.capacity(), Some(1));
    }

    pub fn exclusion() {
        super::exclusion(&Mutex::new());
    }
}

pub mod spinlock {
    use syncbench::sync::{Coordination, Permit, SpinLock, YieldingSpinLock};

    pub fn smoke() {
        let lock = SpinLock::new();
        assert!(lock.try_acquire());
        assert!(lock.is_locked());
        assert!(!lock.try_acquire());
        lock.release();
        assert!(!lock.is_locked());
    }

    pub fn busy_exclusion() {
        super::exclusion(&SpinLock::new());
    }

    pub fn yielding_exclusion() {
        super::exclusion(&YieldingSpinLock::new());
    }

    pub fn permit() {
        let lock = YieldingSpinLock::new();
        {
            let _permit = lock.enter();
            assert!(lock.is_locked());
        }
        assert!(!lock.is_locked());

        let boxed: Box<dyn Coordination> = Box::new(SpinLock::new());
        let permit = Permit::new(&*boxed);
        drop(permit);
        let _again = Permit::new(&*boxed);
    }
}
