//! tipcache-replay: exercise a tip-set cache against a synthetic chain.
//!
//! The chain advances, skips heights (null rounds) and reorgs on a fixed
//! pattern, the same way a chain-event dispatcher would drive the cache.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{ensure, Context};
use clap::Parser;
use tipcache::{CacheConfig, TipSetCache};
use tipcache_nullables::{ChainBuilder, MemoryProvider};
use tipcache_provider::ChainProvider;
use tipcache_utils::LogFormat;

#[derive(Parser)]
#[command(name = "tipcache-replay", about = "Replay chain churn through a tip-set cache")]
struct Cli {
    /// Path to a TOML configuration file. CLI flags override its values.
    #[arg(long, env = "TIPCACHE_CONFIG")]
    config: Option<PathBuf>,

    /// Window size in heights.
    #[arg(long, env = "TIPCACHE_CAPACITY")]
    capacity: Option<usize>,

    /// Log format: "human" or "json".
    #[arg(long, env = "TIPCACHE_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "TIPCACHE_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Apply and revert tip-sets in a repeating pattern.
    Churn {
        /// Height of the first tip-set.
        #[arg(long, default_value_t = 75)]
        start: u64,

        /// Number of apply/revert steps.
        #[arg(long, default_value_t = 9000)]
        steps: u64,

        /// Length of one apply/revert cycle. 0 disables reverts.
        #[arg(long, default_value_t = 90)]
        revert_period: u64,

        /// Steps at the end of each cycle that revert the head.
        #[arg(long, default_value_t = 29)]
        revert_depth: u64,

        /// Leave a null round before every n-th applied tip-set. 0 disables.
        #[arg(long, default_value_t = 0)]
        null_every: u64,
    },

    /// Print the effective configuration as TOML.
    Config,
}

fn load_config(cli: &Cli) -> anyhow::Result<CacheConfig> {
    let mut config = match &cli.config {
        Some(path) => CacheConfig::from_toml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => CacheConfig::default(),
    };
    if let Some(capacity) = cli.capacity {
        config.capacity = capacity;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    config.validate()?;
    Ok(config)
}

struct Churn {
    start: u64,
    steps: u64,
    revert_period: u64,
    revert_depth: u64,
    null_every: u64,
}

impl Churn {
    fn reverts_at(&self, step: u64) -> bool {
        self.revert_period > 0 && step % self.revert_period >= self.revert_period - self.revert_depth
    }

    fn skips_before(&self, step: u64) -> bool {
        self.null_every > 0 && step % self.null_every == self.null_every - 1
    }

    fn run(&self, config: &CacheConfig) -> anyhow::Result<()> {
        ensure!(
            self.revert_period == 0 || self.revert_depth < self.revert_period,
            "revert depth {} must be below the revert period {}",
            self.revert_depth,
            self.revert_period
        );

        let provider = Arc::new(MemoryProvider::new());
        let mut cache = TipSetCache::from_config(config, provider.clone())?;
        let mut chain = ChainBuilder::new(self.start);

        let seed = chain.next();
        provider.insert(seed.clone());
        cache.add(seed)?;

        for step in 0..self.steps {
            if self.reverts_at(step) {
                if cache.is_empty() {
                    tracing::warn!(step, "cache drained, skipping revert");
                    continue;
                }
                let best = cache.best()?;
                cache.revert(&best)?;
                if let Some(ts) = chain.pop() {
                    provider.remove(ts.height());
                }
            } else {
                if self.skips_before(step) {
                    chain.skip(1);
                }
                let ts = chain.next();
                provider.insert(ts.clone());
                cache.add(ts)?;
            }
        }

        cache.check_integrity().map_err(anyhow::Error::msg)?;
        report(&cache)?;
        Ok(())
    }
}

fn report<P: ChainProvider>(cache: &TipSetCache<P>) -> anyhow::Result<()> {
    let best = cache.best()?;
    tracing::info!(
        head = best.height(),
        tail = ?cache.tail_height(),
        len = cache.len(),
        occupied = cache.occupied(),
        "replay finished"
    );

    println!("head:      {} {}", best.height(), best.key());
    println!("window:    {:?}..={:?}", cache.tail_height(), cache.head_height());
    println!("len:       {} / {}", cache.len(), cache.capacity());
    println!("occupied:  {}", cache.occupied());

    if let Some(tail) = cache.tail_height().filter(|&t| t > 0) {
        let below = cache.get(tail - 1)?;
        println!(
            "below tail ({}): {}",
            tail - 1,
            below.map_or_else(|| "null round".to_string(), |ts| ts.key().to_string())
        );
    }

    for (name, value) in cache.stats().snapshot() {
        println!("{name:<16} {value}");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    tipcache_utils::init_logging(config.log_format, &config.log_level);

    match cli.command {
        Command::Churn {
            start,
            steps,
            revert_period,
            revert_depth,
            null_every,
        } => {
            tracing::info!(capacity = config.capacity, steps, "starting churn replay");
            Churn {
                start,
                steps,
                revert_period,
                revert_depth,
                null_every,
            }
            .run(&config)?;
        }
        Command::Config => print!("{}", config.to_toml_string()),
    }

    Ok(())
}
