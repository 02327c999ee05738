use grader::{TestDriver, bench, philosophers, sync};
use std::process::ExitCode;

fn main() -> ExitCode {
    let passed = TestDriver::start(
        [
            // Counting semaphore.
            &sync::semaphore::sema_0,
            &sync::semaphore::n_permits,
            &sync::semaphore::exclusion,
            &sync::semaphore::release_is_capped,
            &sync::semaphore::no_lost_wakeups,
            &sync::semaphore::invalid,
            // Slim semaphore.
            &sync::slim_semaphore::sema_0,
            &sync::slim_semaphore::sema_2,
            &sync::slim_semaphore::exclusion,
            &sync::slim_semaphore::saturation,
            &sync::slim_semaphore::invalid,
            // Barrier.
            &sync::barrier::rendezvous,
            &sync::barrier::reuse,
            &sync::barrier::single_party,
            &sync::barrier::invalid,
            // Monitor.
            &sync::monitor::smoke,
            &sync::monitor::parking,
            &sync::monitor::exclusion,
            // Mutex.
            &sync::mutex::smoke,
            &sync::mutex::blocking,
            &sync::mutex::exclusion,
            // Spin locks.
            &sync::spinlock::smoke,
            &sync::spinlock::busy_exclusion,
            &sync::spinlock::yielding_exclusion,
            &sync::spinlock::permit,
            // Harness.
            &bench::every_primitive,
            &bench::no_exclusion,
            &bench::barrier_appends,
            &bench::shared_output,
            &bench::multi_permit_semaphores,
            &bench::ten_thousand_iterations,
            &bench::custom_source,
            &bench::corrupted_symbol,
            &bench::printable_range,
            &bench::invalid_config,
            &bench::report_line,
            // Dining philosophers.
            &philosophers::ranked_terminates,
            &philosophers::ranked_under_pressure,
            &philosophers::backoff_terminates,
            &philosophers::lifecycle,
            &philosophers::fork_layout,
            &philosophers::right_then_left_staggered,
            &philosophers::right_then_left_cycle,
            &philosophers::ring_too_small,
        ],
        std::env::args().skip(1),
    );
    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
