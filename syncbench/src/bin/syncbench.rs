use clap::{Parser, Subcommand, ValueEnum};
use std::{process::ExitCode, time::Duration};
use syncbench::{
    Result,
    bench::{Harness, Primitive},
    config::{BenchConfig, TableConfig},
    philosophers::{AcquireOrder, Table},
};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "syncbench", about = "Thread coordination primitives under contention")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Time every primitive on the same contended append loop.
    Bench {
        /// Worker threads per primitive.
        #[arg(short, long, default_value_t = BenchConfig::DEFAULT_WORKERS)]
        workers: usize,
        /// Acquire/append/release cycles per worker.
        #[arg(short, long, default_value_t = BenchConfig::DEFAULT_ITERATIONS)]
        iterations: usize,
        /// Initial and maximum count of both semaphores.
        #[arg(short, long, default_value_t = 1)]
        permits: usize,
    },
    /// Seat the philosophers and let them eat.
    Dine {
        /// Number of philosophers.
        #[arg(short, long, default_value_t = TableConfig::DEFAULT_SEATS)]
        seats: usize,
        /// Meals per philosopher.
        #[arg(short, long, default_value_t = 1)]
        rounds: usize,
        /// Eating time in milliseconds.
        #[arg(long, default_value_t = 2000)]
        eat_ms: u64,
        /// Thinking time in milliseconds.
        #[arg(long, default_value_t = 0)]
        think_ms: u64,
        /// Delay between neighbours sitting down, in milliseconds.
        #[arg(long, default_value_t = 0)]
        stagger_ms: u64,
        /// Fork acquisition order.
        #[arg(long, value_enum, default_value_t = Order::Ranked)]
        order: Order,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Order {
    /// Right fork then left fork (may deadlock).
    RightThenLeft,
    /// Lower-numbered fork first.
    Ranked,
    /// Try the second fork, back off on failure.
    Backoff,
}

impl From<Order> for AcquireOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::RightThenLeft => AcquireOrder::RightThenLeft,
            Order::Ranked => AcquireOrder::Ranked,
            Order::Backoff => AcquireOrder::Backoff,
        }
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Bench {
            workers,
            iterations,
            permits,
        } => {
            let config = BenchConfig::builder()
                .workers(workers)
                .iterations(iterations)
                .permits(permits)
                .build()?;
            for measurement in Harness::printable(config).run_all(&Primitive::ALL)? {
                println!("{measurement}");
            }
        }
        Command::Dine {
            seats,
            rounds,
            eat_ms,
            think_ms,
            stagger_ms,
            order,
        } => {
            let config = TableConfig::builder()
                .seats(seats)
                .rounds(rounds)
                .eat_for(Duration::from_millis(eat_ms))
                .think_for(Duration::from_millis(think_ms))
                .stagger(Duration::from_millis(stagger_ms))
                .order(order.into())
                .build()?;
            let journal = Table::new(config)?.dine()?;
            for seat in 0..seats {
                println!("Philosopher {} ate {} time(s)", seat + 1, journal.meals(seat));
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(Cli::parse().command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
