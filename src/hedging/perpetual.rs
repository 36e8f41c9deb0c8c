//! Perpetual delta-neutral hedge

use super::{check_risk_reduction, HedgeDecision, HedgeError, HedgeLeg, HedgeStrategy};
use std::collections::BTreeMap;

/// Perpetual size that offsets `risk_reduction` of the aggregate delta.
///
/// `risk_reduction = 1.0` is a full hedge.
pub fn perpetual_delta_neutral(
    asset: &str,
    aggregate_delta: f64,
    risk_reduction: f64,
) -> Result<HedgeDecision, HedgeError> {
    beta_adjusted_delta_neutral(asset, aggregate_delta, 1.0, risk_reduction)
}

/// Perpetual hedge of a delta whose market sensitivity is scaled by `beta`.
///
/// Size is `-aggregate_delta * beta * risk_reduction`, so a beta of 1.0 is
/// the plain delta-neutral hedge. `beta` must be finite.
pub fn beta_adjusted_delta_neutral(
    asset: &str,
    aggregate_delta: f64,
    beta: f64,
    risk_reduction: f64,
) -> Result<HedgeDecision, HedgeError> {
    check_risk_reduction(risk_reduction)?;
    if !beta.is_finite() {
        return Err(HedgeError::InvalidBeta(beta));
    }
    let size = -aggregate_delta * beta * risk_reduction;

    Ok(HedgeDecision {
        strategy: HedgeStrategy::PerpetualDeltaNeutral,
        legs: vec![HedgeLeg::new(format!("{asset}-PERPETUAL"), size)],
        exposure: BTreeMap::from([(asset.to_string(), aggregate_delta)]),
        degraded: false,
    })
}
