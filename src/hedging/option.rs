//! Single-option delta hedge

use super::chain::{qualifying, OptionQuote};
use super::{check_risk_reduction, HedgeDecision, HedgeError, HedgeLeg, HedgeStrategy};
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;

/// Inputs for an option-based hedge
#[derive(Debug, Clone)]
pub struct OptionHedgeRequest {
    pub asset: String,
    pub aggregate_delta: f64,
    pub spot: f64,
    pub candidates: Vec<OptionQuote>,
    pub risk_reduction: f64,
    /// Select by delta efficiency and cost instead of plain ATM
    pub dynamic_optimization: bool,
    /// Per-contract delta sought when `dynamic_optimization` is on
    pub target_delta: f64,
    pub as_of: DateTime<Utc>,
    pub expiry_window: Duration,
}

/// Pick one option from the chain and size it to offset the aggregate delta.
///
/// Without dynamic optimization the candidate nearest the money wins, ties
/// going to the nearest expiry. With it, the candidate whose delta is closest
/// to `target_delta` wins, ties going to the lowest ask.
pub fn option_based(request: &OptionHedgeRequest) -> Result<HedgeDecision, HedgeError> {
    check_risk_reduction(request.risk_reduction)?;

    let no_option = |reason: &str| HedgeError::NoSuitableOption {
        strategy: HedgeStrategy::OptionBased,
        reason: reason.to_string(),
    };
    if request.candidates.is_empty() {
        return Err(no_option("option chain is empty"));
    }

    let candidates = qualifying(
        &request.candidates,
        request.spot,
        request.as_of,
        request.expiry_window,
    );
    let selected = if request.dynamic_optimization {
        candidates.min_by(|a, b| {
            let da = (a.quote.delta - request.target_delta).abs();
            let db = (b.quote.delta - request.target_delta).abs();
            da.total_cmp(&db)
                .then(a.quote.ask_price.total_cmp(&b.quote.ask_price))
        })
    } else {
        candidates.min_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then(a.quote.expiry.cmp(&b.quote.expiry))
        })
    }
    .ok_or_else(|| no_option("no candidate inside the expiry window"))?;

    let contracts = -request.aggregate_delta / selected.quote.delta * request.risk_reduction;

    tracing::debug!(
        instrument = %selected.quote.instrument,
        option_delta = selected.quote.delta,
        contracts,
        dynamic = request.dynamic_optimization,
        "Option hedge selected"
    );

    Ok(HedgeDecision {
        strategy: HedgeStrategy::OptionBased,
        legs: vec![HedgeLeg::with_option(selected.quote, contracts)],
        exposure: BTreeMap::from([(request.asset.clone(), request.aggregate_delta)]),
        degraded: false,
    })
}
