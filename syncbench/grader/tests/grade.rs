//! Exposes every grader case to `cargo test`.

macro_rules! cases {
    ($($case:ident),* $(,)?) => {
        $(
            #[test]
            fn $case() {
                cases::$case();
            }
        )*
    };
}

mod semaphore {
    use grader::sync::semaphore as cases;

    cases!(sema_0, n_permits, exclusion, release_is_capped, no_lost_wakeups, invalid);
}

mod slim_semaphore {
    use grader::sync::slim_semaphore as cases;

    cases!(sema_0, sema_2, exclusion, saturation, invalid);
}

mod barrier {
    use grader::sync::barrier as cases;

    cases!(rendezvous, reuse, single_party, invalid);
}

mod monitor {
    use grader::sync::monitor as cases;

    cases!(smoke, parking, exclusion);
}

mod mutex {
    use grader::sync::mutex as cases;

    cases!(smoke, blocking, exclusion);
}

mod spinlock {
    use grader::sync::spinlock as cases;

    cases!(smoke, busy_exclusion, yielding_exclusion, permit);
}

mod bench {
    use grader::bench as cases;

    cases!(
        every_primitive,
        no_exclusion,
        barrier_appends,
        shared_output,
        multi_permit_semaphores,
        ten_thousand_iterations,
        custom_source,
        corrupted_symbol,
        printable_range,
        invalid_config,
        report_line,
    );
}

mod philosophers {
    use grader::philosophers as cases;

    cases!(
        ranked_terminates,
        ranked_under_pressure,
        backoff_terminates,
        lifecycle,
        fork_layout,
        right_then_left_staggered,
        right_then_left_cycle,
        ring_too_small,
    );
}
