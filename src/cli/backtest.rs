//! Backtest command implementation

use super::{print_json, OutputFormat};
use crate::backtest::{BacktestConfig, BacktestSimulator, PriceSeries, StrategyKind};
use crate::config::Config;
use crate::telemetry::{self, CounterMetric, GaugeMetric, LatencyMetric};
use clap::Args;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Args, Debug)]
pub struct BacktestArgs {
    /// JSON array of `{timestamp, price}` points
    #[arg(long)]
    pub prices: PathBuf,

    /// Strategy to replay; defaults to the configured one
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyKind>,

    /// Exposure held before the first step
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub initial_position: Decimal,

    /// Write the full result as JSON to this file
    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl BacktestArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        tracing::info!(prices = %self.prices.display(), "Running backtest");
        let series = PriceSeries::from_json_file(&self.prices)?;
        let simulator = BacktestSimulator::new(
            BacktestConfig::from_settings(&config.backtest, &config.execution)
                .with_initial_position(self.initial_position),
        );
        let mut strategy = self.strategy.unwrap_or(config.backtest.strategy).build();

        let started = Instant::now();
        let result = simulator.run(&series, strategy.as_mut())?;
        telemetry::record_latency(LatencyMetric::BacktestRun, started.elapsed());
        telemetry::increment_counter(CounterMetric::BacktestRuns);
        telemetry::set_gauge(
            GaugeMetric::BacktestFinalPnl,
            result.final_pnl.to_f64().unwrap_or_default(),
        );
        telemetry::set_gauge(
            GaugeMetric::BacktestVar95,
            result.var_95.to_f64().unwrap_or_default(),
        );

        if let Some(path) = &self.output {
            std::fs::write(path, serde_json::to_string_pretty(&result)?)?;
            tracing::info!(output = %path.display(), "Backtest result written");
        }

        let summary = result.summary();
        match self.format {
            OutputFormat::Json => print_json(&summary)?,
            OutputFormat::Table => println!("{}", summary.format_table()),
        }
        Ok(())
    }
}
