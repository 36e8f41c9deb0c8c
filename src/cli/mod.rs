//! CLI interface for hedge-desk
//!
//! Provides subcommands for:
//! - `greeks`: Price one option and print its Greeks
//! - `risk`: Aggregate a portfolio file into Greeks and VaR
//! - `hedge`: Size a hedge for a portfolio
//! - `route`: Rank venues for a hedge and stage a paper execution
//! - `backtest`: Replay a price series through a hedge strategy
//! - `config`: Show the effective configuration

mod backtest;
mod greeks;
mod hedge;
mod risk;
mod route;

pub use backtest::BacktestArgs;
pub use greeks::GreeksArgs;
pub use hedge::HedgeArgs;
pub use risk::RiskArgs;
pub use route::RouteArgs;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

#[derive(Parser, Debug)]
#[command(name = "hedge-desk")]
#[command(about = "Options risk, hedge sizing and execution-cost engine for crypto derivatives")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Price an option and print its Greeks
    Greeks(GreeksArgs),
    /// Portfolio Greeks, VaR and threshold check
    Risk(RiskArgs),
    /// Size a hedge for a portfolio
    Hedge(HedgeArgs),
    /// Rank venues by execution cost
    Route(RouteArgs),
    /// Run a backtest over a price series
    Backtest(BacktestArgs),
    /// Show configuration
    Config,
}

/// Output rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backtest::StrategyKind;
    use crate::hedging::HedgeStrategy;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_hedge_command() {
        let cli = Cli::try_parse_from([
            "hedge-desk",
            "hedge",
            "--strategy",
            "protective-put",
            "--positions",
            "book.json",
            "--spot",
            "30000",
        ])
        .unwrap();
        match cli.command {
            Commands::Hedge(args) => {
                assert_eq!(args.strategy, HedgeStrategy::ProtectivePut);
                assert_eq!(args.spot, Some(30000.0));
                assert_eq!(args.format, OutputFormat::Table);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(cli.config, "config.toml");
    }

    #[test]
    fn test_parse_negative_route_size() {
        let cli = Cli::try_parse_from([
            "hedge-desk", "route", "--books", "books.json", "--size", "-1.5", "--stage",
        ])
        .unwrap();
        match cli.command {
            Commands::Route(args) => {
                assert_eq!(args.size, dec!(-1.5));
                assert!(args.stage);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_backtest_strategy() {
        let cli = Cli::try_parse_from([
            "hedge-desk",
            "backtest",
            "--prices",
            "btc.json",
            "--strategy",
            "no-hedge",
            "--format",
            "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Backtest(args) => {
                assert_eq!(args.strategy, Some(StrategyKind::NoHedge));
                assert_eq!(args.format, OutputFormat::Json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
