//! Hedge command implementation

use super::{print_json, read_json, OutputFormat};
use crate::config::HedgingConfig;
use crate::hedging::{
    HedgeOutcome, HedgeRequest, HedgeSizer, HedgeStrategy, MultiAssetRequest, OptionHedgeRequest,
    OptionQuote, StructuredRequest,
};
use crate::risk::{correlation_matrix, exposure_by_asset, Position};
use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Args;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct HedgeArgs {
    #[arg(long, value_enum)]
    pub strategy: HedgeStrategy,

    /// JSON array of positions
    #[arg(long)]
    pub positions: PathBuf,

    /// Asset to hedge, for single-asset strategies
    #[arg(long, default_value = "BTC")]
    pub asset: String,

    /// Spot price, required by option strategies
    #[arg(long)]
    pub spot: Option<f64>,

    /// JSON array of option quotes
    #[arg(long)]
    pub chain: Option<PathBuf>,

    /// JSON object of asset to price history, for multi-asset allocation
    #[arg(long)]
    pub prices: Option<PathBuf>,

    /// Override the configured risk reduction fraction
    #[arg(long)]
    pub risk_reduction: Option<f64>,

    /// Beta of the asset to its perpetual, for the perpetual strategy
    #[arg(long, default_value_t = 1.0, allow_hyphen_values = true)]
    pub beta: f64,

    /// Valuation time for the expiry window (RFC 3339); defaults to now
    #[arg(long)]
    pub as_of: Option<DateTime<Utc>>,

    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl HedgeArgs {
    pub fn build_request(&self, config: &HedgingConfig) -> anyhow::Result<HedgeRequest> {
        let positions: Vec<Position> = read_json(&self.positions)?;
        let exposures = exposure_by_asset(&positions)?;
        let delta = exposures.get(&self.asset).map_or(0.0, |g| g.delta);
        let risk_reduction = self
            .risk_reduction
            .unwrap_or(config.risk_reduction_fraction);
        let as_of = self.as_of.unwrap_or_else(Utc::now);

        let request = match self.strategy {
            HedgeStrategy::PerpetualDeltaNeutral => HedgeRequest::PerpetualDeltaNeutral {
                asset: self.asset.clone(),
                aggregate_delta: delta,
                beta: self.beta,
                risk_reduction,
            },
            HedgeStrategy::OptionBased => HedgeRequest::OptionBased(OptionHedgeRequest {
                asset: self.asset.clone(),
                aggregate_delta: delta,
                spot: self.spot()?,
                candidates: self.chain()?,
                risk_reduction,
                dynamic_optimization: config.dynamic_option_optimization,
                target_delta: config.target_option_delta,
                as_of,
                expiry_window: config.expiry_window(),
            }),
            HedgeStrategy::MultiAssetAllocation => {
                let path = self
                    .prices
                    .as_ref()
                    .context("--prices is required for multi_asset_allocation")?;
                let prices: BTreeMap<String, Vec<f64>> = read_json(path)?;
                HedgeRequest::MultiAssetAllocation(MultiAssetRequest {
                    exposures: exposures.iter().map(|(a, g)| (a.clone(), g.delta)).collect(),
                    correlation: correlation_matrix(&prices)?,
                })
            }
            HedgeStrategy::ProtectivePut | HedgeStrategy::CoveredCall | HedgeStrategy::Collar => {
                let structured = StructuredRequest {
                    asset: self.asset.clone(),
                    exposure: delta,
                    spot: self.spot()?,
                    chain: self.chain()?,
                    as_of,
                    expiry_window: config.expiry_window(),
                };
                match self.strategy {
                    HedgeStrategy::ProtectivePut => HedgeRequest::ProtectivePut(structured),
                    HedgeStrategy::CoveredCall => HedgeRequest::CoveredCall(structured),
                    _ => HedgeRequest::Collar(structured),
                }
            }
        };
        Ok(request)
    }

    fn spot(&self) -> anyhow::Result<f64> {
        self.spot
            .with_context(|| format!("--spot is required for {}", self.strategy.as_str()))
    }

    fn chain(&self) -> anyhow::Result<Vec<OptionQuote>> {
        match &self.chain {
            Some(path) => read_json(path),
            None => Ok(vec![]),
        }
    }

    pub async fn execute(&self, config: &HedgingConfig) -> anyhow::Result<()> {
        let request = self.build_request(config)?;
        let outcome = HedgeSizer::new().evaluate(&request)?;

        match self.format {
            OutputFormat::Json => print_json(&outcome)?,
            OutputFormat::Table => match &outcome {
                HedgeOutcome::Decision(decision) => {
                    println!("Strategy: {}", decision.strategy.as_str());
                    if decision.degraded {
                        println!("(fallback sizing)");
                    }
                    for leg in &decision.legs {
                        println!("  {:<28} {:+.4}", leg.instrument, leg.size);
                    }
                }
                HedgeOutcome::NoSuitableOption { strategy, reason } => {
                    println!("No suitable option for {}: {}", strategy.as_str(), reason);
                }
            },
        }
        Ok(())
    }
}
