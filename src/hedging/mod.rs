//! Hedge sizing module
//!
//! Turns portfolio exposure into hedge decisions:
//! - Perpetual delta-neutral hedges
//! - Single-option delta hedges (ATM or delta-targeted selection)
//! - Correlation-aware multi-asset allocation
//! - Protective put, covered call and collar structures

mod chain;
mod multi_asset;
mod option;
mod perpetual;
mod structured;

pub use chain::{ClassifiedOption, Moneyness, OptionQuote};
pub use multi_asset::{multi_asset_allocation, MultiAssetRequest, SINGULAR_TOLERANCE};
pub use option::{option_based, OptionHedgeRequest};
pub use perpetual::{beta_adjusted_delta_neutral, perpetual_delta_neutral};
pub use structured::{collar, covered_call, protective_put, select_option, StructuredRequest};

use crate::telemetry::{self, CounterMetric};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Closed set of hedging strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum HedgeStrategy {
    PerpetualDeltaNeutral,
    OptionBased,
    MultiAssetAllocation,
    ProtectivePut,
    CoveredCall,
    Collar,
}

impl HedgeStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            HedgeStrategy::PerpetualDeltaNeutral => "perpetual_delta_neutral",
            HedgeStrategy::OptionBased => "option_based",
            HedgeStrategy::MultiAssetAllocation => "multi_asset_allocation",
            HedgeStrategy::ProtectivePut => "protective_put",
            HedgeStrategy::CoveredCall => "covered_call",
            HedgeStrategy::Collar => "collar",
        }
    }
}

/// One instrument to trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HedgeLeg {
    pub instrument: String,
    /// Signed size: positive buys, negative sells
    pub size: f64,
    /// Selected option, for option legs
    pub option: Option<OptionQuote>,
}

impl HedgeLeg {
    pub fn new(instrument: impl Into<String>, size: f64) -> Self {
        Self {
            instrument: instrument.into(),
            size,
            option: None,
        }
    }

    pub fn with_option(quote: &OptionQuote, size: f64) -> Self {
        Self {
            instrument: quote.instrument.clone(),
            size,
            option: Some(quote.clone()),
        }
    }
}

/// A sized hedge and the exposure it answers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HedgeDecision {
    pub strategy: HedgeStrategy,
    pub legs: Vec<HedgeLeg>,
    /// Delta exposure by asset that the decision was derived from
    pub exposure: BTreeMap<String, f64>,
    /// Set when a fallback rule replaced the primary method
    pub degraded: bool,
}

impl HedgeDecision {
    /// Size of the leg trading `instrument`
    pub fn leg_size(&self, instrument: &str) -> Option<f64> {
        self.legs
            .iter()
            .find(|leg| leg.instrument == instrument)
            .map(|leg| leg.size)
    }
}

/// Result of a sizing request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HedgeOutcome {
    Decision(HedgeDecision),
    /// The chain held nothing usable; an expected business outcome
    NoSuitableOption {
        strategy: HedgeStrategy,
        reason: String,
    },
}

impl HedgeOutcome {
    pub fn decision(&self) -> Option<&HedgeDecision> {
        match self {
            HedgeOutcome::Decision(decision) => Some(decision),
            HedgeOutcome::NoSuitableOption { .. } => None,
        }
    }
}

/// Hedge sizing errors
#[derive(Debug, Error, PartialEq)]
pub enum HedgeError {
    /// Fraction of risk to remove must lie in [0, 1]
    #[error("Risk reduction fraction must be within [0, 1], got {0}")]
    InvalidRiskReduction(f64),
    /// Beta must be finite
    #[error("Beta must be finite, got {0}")]
    InvalidBeta(f64),
    /// No candidate option satisfied the filters
    #[error("No suitable option for {strategy:?}: {reason}")]
    NoSuitableOption {
        strategy: HedgeStrategy,
        reason: String,
    },
    /// Nothing to allocate
    #[error("Exposure map is empty")]
    EmptyExposure,
}

pub(crate) fn check_risk_reduction(fraction: f64) -> Result<(), HedgeError> {
    if (0.0..=1.0).contains(&fraction) {
        Ok(())
    } else {
        Err(HedgeError::InvalidRiskReduction(fraction))
    }
}

/// A sizing request for one strategy with all of its inputs
#[derive(Debug, Clone)]
pub enum HedgeRequest {
    PerpetualDeltaNeutral {
        asset: String,
        aggregate_delta: f64,
        /// Sensitivity of the asset to the hedge instrument; 1.0 when hedging in kind
        beta: f64,
        risk_reduction: f64,
    },
    OptionBased(OptionHedgeRequest),
    MultiAssetAllocation(MultiAssetRequest),
    ProtectivePut(StructuredRequest),
    CoveredCall(StructuredRequest),
    Collar(StructuredRequest),
}

impl HedgeRequest {
    pub fn strategy(&self) -> HedgeStrategy {
        match self {
            HedgeRequest::PerpetualDeltaNeutral { .. } => HedgeStrategy::PerpetualDeltaNeutral,
            HedgeRequest::OptionBased(_) => HedgeStrategy::OptionBased,
            HedgeRequest::MultiAssetAllocation(_) => HedgeStrategy::MultiAssetAllocation,
            HedgeRequest::ProtectivePut(_) => HedgeStrategy::ProtectivePut,
            HedgeRequest::CoveredCall(_) => HedgeStrategy::CoveredCall,
            HedgeRequest::Collar(_) => HedgeStrategy::Collar,
        }
    }
}

/// Dispatches sizing requests to their strategy handler
#[derive(Debug, Clone, Default)]
pub struct HedgeSizer;

impl HedgeSizer {
    pub fn new() -> Self {
        Self
    }

    /// Size a hedge. An empty option chain yields `HedgeOutcome::NoSuitableOption`.
    pub fn evaluate(&self, request: &HedgeRequest) -> Result<HedgeOutcome, HedgeError> {
        let strategy = request.strategy();
        let result = match request {
            HedgeRequest::PerpetualDeltaNeutral {
                asset,
                aggregate_delta,
                beta,
                risk_reduction,
            } => beta_adjusted_delta_neutral(asset, *aggregate_delta, *beta, *risk_reduction)
                .map(HedgeOutcome::Decision),
            HedgeRequest::OptionBased(req) => option_based(req).map(HedgeOutcome::Decision),
            HedgeRequest::MultiAssetAllocation(req) => {
                multi_asset_allocation(req).map(HedgeOutcome::Decision)
            }
            HedgeRequest::ProtectivePut(req) => Ok(protective_put(req)),
            HedgeRequest::CoveredCall(req) => Ok(covered_call(req)),
            HedgeRequest::Collar(req) => Ok(collar(req)),
        };

        let outcome = match result {
            Err(HedgeError::NoSuitableOption { strategy, reason }) => {
                HedgeOutcome::NoSuitableOption { strategy, reason }
            }
            other => other?,
        };

        match &outcome {
            HedgeOutcome::Decision(decision) => {
                telemetry::increment_counter(CounterMetric::HedgeDecisions);
                tracing::info!(
                    strategy = strategy.as_str(),
                    legs = decision.legs.len(),
                    degraded = decision.degraded,
                    "Hedge sized"
                );
            }
            HedgeOutcome::NoSuitableOption { reason, .. } => {
                tracing::info!(strategy = strategy.as_str(), %reason, "No suitable option");
            }
        }
        Ok(outcome)
    }
}
