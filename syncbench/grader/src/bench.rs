use std::time::Duration;
use syncbench::{
    SyncError,
    bench::{Harness, Measurement, PrintableAscii, Primitive, SharedOutput, SymbolSource},
    config::BenchConfig,
    sync::{Coordination, CyclicBarrier, Monitor},
};

pub fn every_primitive() {
    let config = BenchConfig::builder()
        .workers(4)
        .iterations(1000)
        .build()
        .unwrap();
    let measurements = Harness::printable(config).run_all(&Primitive::ALL).unwrap();

    assert_eq!(
        measurements.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
        Primitive::ALL.map(Primitive::name)
    );
    assert_eq!(measurements[0].name, "Mutex");
    for measurement in &measurements {
        assert_eq!(measurement.collected, 4000, "{}", measurement.name);
        assert!(measurement.seconds() >= 0.0);
    }
}

pub fn multi_permit_semaphores() {
    let config = BenchConfig::builder()
        .workers(8)
        .iterations(2000)
        .permits(4)
        .build()
        .unwrap();
    let measurements = Harness::printable(config)
        .run_all(&[Primitive::Semaphore, Primitive::SlimSemaphore])
        .unwrap();
    assert!(measurements.iter().all(|m| m.collected == 16_000));
}

pub fn ten_thousand_iterations() {
    let config = BenchConfig::builder().iterations(10_000).build().unwrap();
    let measurements = Harness::printable(config)
        .run_all(&[Primitive::SpinLock, Primitive::YieldingSpinLock])
        .unwrap();
    assert!(measurements.iter().all(|m| m.collected == 40_000));
}

pub fn custom_source() {
    let config = BenchConfig::builder().workers(3).iterations(10).build().unwrap();
    let harness = Harness::new(config, || b'x');
    let measurement = harness.run("Monitor", &Monitor::new()).unwrap();
    assert_eq!(measurement.collected, 30);
}

/// Claims to be exclusive but lets everybody in.
struct Doorless;

impl Coordination for Doorless {
    fn acquire(&self) {}

    fn release(&self) {}
}

pub fn no_exclusion() {
    let config = BenchConfig::builder()
        .workers(8)
        .iterations(100_000)
        .build()
        .unwrap();
    let harness = Harness::printable(config);

    // Overlap is a matter of scheduling; give it a few chances.
    let err = (0..10)
        .find_map(|_| harness.run("Doorless", &Doorless).err())
        .expect("a primitive without exclusion was accepted");
    match err {
        SyncError::ExclusionViolated {
            name,
            peak,
            capacity,
        } => {
            assert_eq!(name, "Doorless");
            assert_eq!(capacity, 1);
            assert!(peak > 1);
        }
        err => panic!("unexpected error: {err}"),
    }
}

pub fn barrier_appends() {
    let config = BenchConfig::builder().workers(6).iterations(500).build().unwrap();
    let barrier = CyclicBarrier::new(6).unwrap();
    let measurement = Harness::printable(config).run("Barrier", &barrier).unwrap();
    assert_eq!(measurement.collected, 3000);
    assert_eq!(barrier.generation(), 500);
}

pub fn shared_output() {
    let output = SharedOutput::with_capacity(3);
    for symbol in *b"abc" {
        unsafe { output.push(symbol) };
    }
    assert_eq!(output.into_vec(), b"abc");
}

/// Claims printable ASCII but emits a control character.
struct Liar;

impl SymbolSource for Liar {
    fn next_symbol(&self) -> u8 {
        0x07
    }

    fn accepts(&self, symbol: u8) -> bool {
        PrintableAscii.accepts(symbol)
    }
}

pub fn corrupted_symbol() {
    let config = BenchConfig::builder().workers(2).iterations(5).build().unwrap();
    let err = Harness::new(config, Liar)
        .run("Monitor", &Monitor::new())
        .unwrap_err();
    assert_eq!(
        err,
        SyncError::CorruptedSymbol {
            name: "Monitor".into(),
            symbol: 0x07
        }
    );
}

pub fn printable_range() {
    for _ in 0..10_000 {
        let symbol = PrintableAscii.next_symbol();
        assert!((32..=126).contains(&symbol));
    }
    assert!(!PrintableAscii.accepts(31));
    assert!(!PrintableAscii.accepts(127));
}

pub fn invalid_config() {
    assert_eq!(
        BenchConfig::builder().workers(0).build().err(),
        Some(SyncError::NoWorkers)
    );
    assert_eq!(
        BenchConfig::builder().permits(0).build().err(),
        Some(SyncError::ZeroMaximum)
    );
    let config = BenchConfig::default();
    assert_eq!(config.workers(), 4);
    assert_eq!(config.iterations(), 1000);
    assert_eq!(config.expected_len(), 4000);
}

pub fn report_line() {
    let measurement = Measurement {
        name: "SpinLock".into(),
        elapsed: Duration::from_millis(1500),
        collected: 4000,
    };
    assert_eq!(measurement.to_string(), "SpinLock time: 1.5 seconds");
}
