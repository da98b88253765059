//! CLI definition and dispatch.

use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::exchange_hours_adapter::StaticExchangeHours;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::in_memory_securities::InMemorySecurities;
use crate::domain::currency_feed::FeedResolution;
use crate::domain::data::build_timeline;
use crate::domain::engine_config::{validate_engine_config, EngineConfig};
use crate::domain::error::TradefeedError;
use crate::domain::forex::{CurrencyPair, CURRENCY_PAIRS};
use crate::domain::packet::ResultQueue;
use crate::domain::replay::run_replay;
use crate::domain::setup::{initialize, Setup};
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "tradefeed", about = "Subscription and currency-feed bootstrapper")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register subscriptions and resolve currency feeds, then print them
    Setup {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Run setup, then replay CSV data through the cash book
    Replay {
        #[arg(short, long)]
        config: PathBuf,
        /// Overrides [engine] data_folder
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Validate an engine configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List supported currency pairs
    Pairs {
        #[arg(long)]
        currency: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Setup { config } => run_setup(&config),
        Command::Replay { config, data } => run_replay_command(&config, data),
        Command::Validate { config } => run_validate(&config),
        Command::Pairs { currency } => run_pairs(currency.as_deref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = TradefeedError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn report(err: TradefeedError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

fn load_engine_config(path: &PathBuf) -> Result<EngineConfig, ExitCode> {
    eprintln!("Loading config from {}", path.display());
    let adapter = load_config(path)?;
    EngineConfig::from_config(&adapter).map_err(report)
}

fn print_setup(setup: &Setup) {
    println!("Subscriptions:");
    for config in setup.subscriptions.iter() {
        println!(
            "  [{}] {} {} {} {}{}",
            config.subscription_index(),
            config.symbol(),
            config.security_type(),
            config.resolution(),
            config.market(),
            if config.is_internal() { " (internal)" } else { "" }
        );
    }

    println!("Currency feeds:");
    for (symbol, feed) in &setup.feeds {
        match feed {
            FeedResolution::BaseCurrency => println!("  {symbol}: account currency"),
            FeedResolution::Existing {
                subscription_index,
                inverted,
            } => println!(
                "  {symbol}: existing subscription [{subscription_index}]{}",
                if *inverted { " inverted" } else { "" }
            ),
            FeedResolution::Synthesized {
                subscription_index,
                symbol: pair,
                inverted,
            } => println!(
                "  {symbol}: added {pair} [{subscription_index}]{}",
                if *inverted { " inverted" } else { "" }
            ),
        }
    }

    println!("Cash:");
    for line in setup.cash_book.to_string().lines() {
        println!("  {line}");
    }
}

fn run_setup(config_path: &PathBuf) -> ExitCode {
    let config = match load_engine_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let hours = StaticExchangeHours::new();
    let mut securities = InMemorySecurities::new();
    let setup = match initialize(&config, &hours, &mut securities) {
        Ok(s) => s,
        Err(e) => return report(e),
    };

    eprintln!("Algorithm: {}", config.algorithm);
    print_setup(&setup);
    ExitCode::SUCCESS
}

fn run_replay_command(config_path: &PathBuf, data: Option<PathBuf>) -> ExitCode {
    let config = match load_engine_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let hours = StaticExchangeHours::new();
    let mut securities = InMemorySecurities::new();
    let mut setup = match initialize(&config, &hours, &mut securities) {
        Ok(s) => s,
        Err(e) => return report(e),
    };

    let data_folder = data.unwrap_or_else(|| config.data_folder.clone());
    eprintln!("Reading data from {}", data_folder.display());
    let source = CsvAdapter::new(data_folder);

    let mut points = Vec::new();
    for subscription in setup.subscriptions.iter() {
        match source.fetch(subscription) {
            Ok(mut p) => {
                if p.is_empty() {
                    eprintln!("warning: no data for {}", subscription.symbol());
                }
                points.append(&mut p);
            }
            Err(e) => return report(e),
        }
    }

    let timeline = build_timeline(points);
    let mut queue = ResultQueue::new();
    let summary = run_replay(&mut setup, timeline, &mut queue);

    for line in queue.drain_messages(Utc::now()) {
        println!("{line}");
    }
    eprintln!(
        "Replayed {} slices ({} data points, {} internal)",
        summary.slices, summary.user_points, summary.internal_points
    );
    print_setup(&setup);
    ExitCode::SUCCESS
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating engine config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_engine_config(&adapter) {
        return report(e);
    }

    eprintln!("Engine configuration is valid.");
    ExitCode::SUCCESS
}

fn run_pairs(currency: Option<&str>) -> ExitCode {
    let filter = currency.map(str::to_uppercase);
    let mut count = 0;
    for symbol in CURRENCY_PAIRS {
        let Some(pair) = CurrencyPair::parse(symbol) else {
            continue;
        };
        let matches = match &filter {
            Some(ccy) => pair.base == *ccy || pair.quote == *ccy,
            None => true,
        };
        if !matches {
            continue;
        }
        println!("{symbol}  {pair}");
        count += 1;
    }
    eprintln!("{count} pairs");
    ExitCode::SUCCESS
}
