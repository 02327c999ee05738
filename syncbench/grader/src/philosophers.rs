use crate::within;
use std::time::Duration;
use syncbench::{
    SyncError,
    config::TableConfig,
    philosophers::{AcquireOrder, Phase, Table},
};

const LIMIT: Duration = Duration::from_secs(30);

fn dine(order: AcquireOrder, rounds: usize, eat_for: Duration) -> syncbench::philosophers::Journal {
    let config = TableConfig::builder()
        .seats(5)
        .rounds(rounds)
        .eat_for(eat_for)
        .order(order)
        .build()
        .unwrap();
    within(LIMIT, move || Table::new(config).unwrap().dine().unwrap())
}

pub fn ranked_terminates() {
    let journal = dine(AcquireOrder::Ranked, 3, Duration::from_millis(5));
    for seat in 0..5 {
        assert_eq!(journal.meals(seat), 3);
    }
}

pub fn ranked_under_pressure() {
    let journal = dine(AcquireOrder::Ranked, 200, Duration::ZERO);
    assert_eq!(journal.transitions().len(), 5 * 200 * 4);
}

pub fn backoff_terminates() {
    let journal = dine(AcquireOrder::Backoff, 200, Duration::ZERO);
    for seat in 0..5 {
        assert_eq!(journal.meals(seat), 200);
    }
}

pub fn lifecycle() {
    let journal = dine(AcquireOrder::Ranked, 2, Duration::from_millis(1));
    for seat in 0..5 {
        let phases = journal.of_seat(seat).map(|t| t.phase).collect::<Vec<_>>();
        assert_eq!(
            phases,
            [Phase::Thinking, Phase::Waiting, Phase::Eating, Phase::Released].repeat(2)
        );
        let rounds = journal.of_seat(seat).map(|t| t.round).collect::<Vec<_>>();
        assert_eq!(rounds, [0, 0, 0, 0, 1, 1, 1, 1]);
    }
}

pub fn fork_layout() {
    let table = Table::new(TableConfig::default()).unwrap();
    assert_eq!(table.seats(), 5);
    assert_eq!(table.forks_of(0), (0, 4));
    assert_eq!(table.forks_of(1), (1, 0));
    assert_eq!(table.forks_of(4), (4, 3));
}

/// Neighbours sit down far apart, so right-then-left never sees contention
/// and the seats eat in arrival order.
pub fn right_then_left_staggered() {
    let config = TableConfig::builder()
        .seats(5)
        .rounds(2)
        .eat_for(Duration::from_millis(1))
        .stagger(Duration::from_millis(200))
        .order(AcquireOrder::RightThenLeft)
        .build()
        .unwrap();
    let journal = within(LIMIT, move || Table::new(config).unwrap().dine().unwrap());

    for seat in 0..5 {
        assert_eq!(journal.meals(seat), 2);
    }
    let eaters = journal
        .transitions()
        .iter()
        .filter(|t| t.phase == Phase::Eating)
        .map(|t| t.seat)
        .collect::<Vec<_>>();
    assert_eq!(eaters, [0, 0, 1, 1, 2, 2, 3, 3, 4, 4]);
}

/// With every philosopher holding its right fork, every left fork is taken:
/// under right-then-left nobody can make progress.
pub fn right_then_left_cycle() {
    let config = TableConfig::builder()
        .order(AcquireOrder::RightThenLeft)
        .build()
        .unwrap();
    let table = Table::new(config).unwrap();

    for seat in 0..table.seats() {
        let (right, _) = table.forks_of(seat);
        table.fork(right).pick_up();
    }
    for seat in 0..table.seats() {
        let (_, left) = table.forks_of(seat);
        assert!(table.fork(left).in_use());
        assert!(!table.fork(left).try_pick_up());
    }
    for seat in 0..table.seats() {
        table.fork(seat).put_down();
    }
    assert!((0..table.seats()).all(|fork| !table.fork(fork).in_use()));
}

pub fn ring_too_small() {
    assert_eq!(
        TableConfig::builder().seats(1).build().err(),
        Some(SyncError::RingTooSmall(1))
    );
}
