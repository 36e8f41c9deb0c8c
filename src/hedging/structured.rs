//! Protective put, covered call and collar structures

use super::chain::{qualifying, Moneyness, OptionQuote};
use super::{HedgeDecision, HedgeLeg, HedgeOutcome, HedgeStrategy};
use crate::pricing::OptionType;
use chrono::{DateTime, Duration, Utc};
use std::collections::BTreeMap;

/// Inputs shared by the structured strategies
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    pub asset: String,
    /// Delta exposure (or holdings) being protected
    pub exposure: f64,
    pub spot: f64,
    pub chain: Vec<OptionQuote>,
    pub as_of: DateTime<Utc>,
    pub expiry_window: Duration,
}

/// Nearest-strike option of the given type and moneyness bucket.
///
/// `Moneyness::Atm` keeps every candidate and simply takes the strike closest
/// to spot; `Otm` and `Itm` only consider strikes strictly on that side.
pub fn select_option<'a>(
    chain: &'a [OptionQuote],
    option_type: OptionType,
    bucket: Moneyness,
    spot: f64,
    as_of: DateTime<Utc>,
    window: Duration,
) -> Option<&'a OptionQuote> {
    qualifying(chain, spot, as_of, window)
        .filter(|c| c.quote.option_type == option_type)
        .filter(|c| bucket == Moneyness::Atm || c.moneyness == bucket)
        .min_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then(a.quote.expiry.cmp(&b.quote.expiry))
        })
        .map(|c| c.quote)
}

fn contracts(exposure: f64, quote: &OptionQuote) -> f64 {
    exposure.abs() / quote.delta.abs()
}

fn otm(request: &StructuredRequest, option_type: OptionType) -> Option<&OptionQuote> {
    select_option(
        &request.chain,
        option_type,
        Moneyness::Otm,
        request.spot,
        request.as_of,
        request.expiry_window,
    )
}

fn decision(
    request: &StructuredRequest,
    strategy: HedgeStrategy,
    legs: Vec<HedgeLeg>,
) -> HedgeOutcome {
    HedgeOutcome::Decision(HedgeDecision {
        strategy,
        legs,
        exposure: BTreeMap::from([(request.asset.clone(), request.exposure)]),
        degraded: false,
    })
}

fn not_found(strategy: HedgeStrategy, reason: &str) -> HedgeOutcome {
    HedgeOutcome::NoSuitableOption {
        strategy,
        reason: reason.to_string(),
    }
}

/// Buy OTM puts covering the exposure
pub fn protective_put(request: &StructuredRequest) -> HedgeOutcome {
    let strategy = HedgeStrategy::ProtectivePut;
    match otm(request, OptionType::Put) {
        Some(put) => {
            let leg = HedgeLeg::with_option(put, contracts(request.exposure, put));
            decision(request, strategy, vec![leg])
        }
        None => not_found(strategy, "no OTM put inside the expiry window"),
    }
}

/// Sell OTM calls against the holdings
pub fn covered_call(request: &StructuredRequest) -> HedgeOutcome {
    let strategy = HedgeStrategy::CoveredCall;
    match otm(request, OptionType::Call) {
        Some(call) => {
            let leg = HedgeLeg::with_option(call, -contracts(request.exposure, call));
            decision(request, strategy, vec![leg])
        }
        None => not_found(strategy, "no OTM call inside the expiry window"),
    }
}

/// Long OTM put plus short OTM call; both legs must be available
pub fn collar(request: &StructuredRequest) -> HedgeOutcome {
    let strategy = HedgeStrategy::Collar;
    let (Some(put), Some(call)) = (otm(request, OptionType::Put), otm(request, OptionType::Call))
    else {
        return not_found(strategy, "collar needs both an OTM put and an OTM call");
    };
    let legs = vec![
        HedgeLeg::with_option(put, contracts(request.exposure, put)),
        HedgeLeg::with_option(call, -contracts(request.exposure, call)),
    ];
    decision(request, strategy, legs)
}
