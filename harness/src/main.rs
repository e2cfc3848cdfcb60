use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod workloads;

use config::HarnessConfig;

#[derive(Parser)]
#[command(name = "contention")]
#[command(about = "Drive the sharded counter and lock-coupled list under concurrent load", long_about = None)]
struct Cli {
    /// JSON file with run parameters
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Worker threads (overrides the config file)
    #[arg(long, global = true)]
    threads: Option<usize>,

    /// Increments per worker (overrides the config file)
    #[arg(long, global = true)]
    count: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-worker sharded counter
    Counter {
        /// Lift the slot bound
        #[arg(long, default_value_t = false)]
        unbounded: bool,
    },
    /// Single shared atomic counter, for comparison
    Shared,
    /// Concurrent appends to the lock-coupled list, then a traversal
    List {
        /// Keys appended by each worker
        #[arg(long)]
        keys: Option<usize>,

        /// Print every key visited
        #[arg(long, default_value_t = false)]
        print: bool,
    },
    /// Bounded bank, unbounded bank, shared counter, then the list
    All,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_thread_names(true).compact())
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = HarnessConfig::load(cli.config.as_deref())?;
    if let Some(threads) = cli.threads {
        config.threads = threads;
    }
    if let Some(count) = cli.count {
        config.count = count;
    }

    match cli.command {
        Commands::Counter { unbounded } => workloads::counter_bank(&config, unbounded)?,
        Commands::Shared => workloads::shared_counter(&config)?,
        Commands::List { keys, print } => {
            if let Some(keys) = keys {
                config.keys_per_worker = keys;
            }
            config.print_keys |= print;
            workloads::list(&config)?;
        }
        Commands::All => {
            workloads::counter_bank(&config, false)?;
            workloads::counter_bank(&config, true)?;
            workloads::shared_counter(&config)?;
            workloads::list(&config)?;
        }
    }

    Ok(())
}
