//! SetKV Binary
//!
//! Runs a command stream from stdin against a store, or maintains the store.

use std::io::{self, BufWriter};

use clap::{Parser, Subcommand};
use setkv::protocol::run_script;
use setkv::{Config, Engine};
use tracing_subscriber::{fmt, EnvFilter};

/// SetKV
#[derive(Parser, Debug)]
#[command(name = "setkv")]
#[command(about = "Persistent sorted integer sets keyed by string")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./database")]
    data_dir: String,

    /// Record file name inside the data directory
    #[arg(long, default_value = "values.dat")]
    data_file: String,

    /// Index file name inside the data directory
    #[arg(long, default_value = "index.idx")]
    index_file: String,

    /// Spare value slots reserved whenever a record is appended
    #[arg(short = 's', long, default_value = "0")]
    record_slack: u32,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read commands from stdin and print `find` results (default)
    Run,

    /// Rewrite the record file without dead space
    Compact,

    /// Print space usage
    Stats,
}

fn main() {
    // Logs go to stderr; stdout carries command output
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,setkv=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    tracing::debug!("SetKV v{}", setkv::VERSION);

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .data_file(&args.data_file)
        .index_file(&args.index_file)
        .record_slack(args.record_slack)
        .build();

    let mut engine = match Engine::open(config) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            std::process::exit(1);
        }
    };

    let result = match args.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let stdin = io::stdin();
            let mut stdout = BufWriter::new(io::stdout().lock());
            run_script(&mut engine, stdin.lock(), &mut stdout).map(|stats| {
                tracing::debug!(
                    executed = stats.executed,
                    skipped = stats.skipped,
                    "Script finished"
                );
            })
        }
        Commands::Compact => engine.compact().map(|stats| {
            println!(
                "compacted {} records: {} -> {} bytes",
                stats.records, stats.bytes_before, stats.bytes_after
            );
        }),
        Commands::Stats => engine.stats().map(|stats| {
            println!("keys:   {}", stats.keys);
            println!("live:   {} bytes", stats.live_bytes);
            println!("medium: {} bytes", stats.medium_bytes);
            println!("dead:   {} bytes", stats.dead_bytes);
        }),
    };

    // Save the index even if the run failed part way
    let closed = engine.close();

    if let Err(e) = result.and(closed) {
        tracing::error!("Store error: {}", e);
        std::process::exit(1);
    }
}
