//! Stress scenarios, beta and weighted portfolio VaR

use super::aggregate::{aggregate, PortfolioGreeks};
use super::position::{Position, PositionKind};
use super::RiskError;
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, OrderStatistics, Statistics};

/// Portfolio before and after a uniform underlying move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShockResult {
    /// Relative move applied to every underlying, e.g. -0.2
    pub price_change: f64,
    pub shocked_positions: Vec<Position>,
    pub greeks_before: PortfolioGreeks,
    pub greeks_after: PortfolioGreeks,
}

impl ShockResult {
    pub fn delta_change(&self) -> f64 {
        self.greeks_after.delta - self.greeks_before.delta
    }
}

/// Move every underlying by `price_change` and reprice option Greeks.
///
/// Option spots are scaled by `1 + price_change`; linear positions keep
/// their delta. The move must be finite and greater than -1.
pub fn market_shock(positions: &[Position], price_change: f64) -> Result<ShockResult, RiskError> {
    if !price_change.is_finite() || price_change <= -1.0 {
        return Err(RiskError::InvalidShock(price_change));
    }

    let greeks_before = aggregate(positions)?;
    let shocked_positions: Vec<Position> = positions
        .iter()
        .cloned()
        .map(|mut position| {
            if let PositionKind::Option(params) = &mut position.kind {
                params.spot *= 1.0 + price_change;
            }
            position
        })
        .collect();
    let greeks_after = aggregate(&shocked_positions)?;

    tracing::info!(
        price_change,
        delta_before = greeks_before.delta,
        delta_after = greeks_after.delta,
        gamma_after = greeks_after.gamma,
        "Market shock applied"
    );

    Ok(ShockResult {
        price_change,
        shocked_positions,
        greeks_before,
        greeks_after,
    })
}

/// Regression slope of asset returns on benchmark returns
pub fn beta(asset_returns: &[f64], benchmark_returns: &[f64]) -> Result<f64, RiskError> {
    if asset_returns.len() != benchmark_returns.len() {
        return Err(RiskError::LengthMismatch);
    }
    if benchmark_returns.len() < 2 {
        return Err(RiskError::InsufficientData {
            needed: 2,
            got: benchmark_returns.len(),
        });
    }

    let variance = benchmark_returns.population_variance();
    if !(variance > 0.0) {
        return Err(RiskError::ZeroVariance);
    }
    let covariance = asset_returns
        .iter()
        .population_covariance(benchmark_returns.iter());
    Ok(covariance / variance)
}

/// Historical VaR of a weighted portfolio, as a return fraction.
///
/// `price_history` holds one row per observation and one column per asset.
/// Portfolio log returns are the weighted sum of asset log returns; the
/// result is the magnitude of their `(1 - confidence)` quantile.
pub fn portfolio_var(
    price_history: &[Vec<f64>],
    weights: &[f64],
    confidence: f64,
) -> Result<f64, RiskError> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(RiskError::InvalidConfidence(confidence));
    }
    if price_history.len() < 2 {
        return Err(RiskError::InsufficientData {
            needed: 2,
            got: price_history.len(),
        });
    }
    if price_history.iter().any(|row| row.len() != weights.len()) {
        return Err(RiskError::LengthMismatch);
    }
    if let Some(&bad) = weights.iter().find(|w| !w.is_finite()) {
        return Err(RiskError::InvalidWeight(bad));
    }
    if let Some(&bad) = price_history
        .iter()
        .flatten()
        .find(|p| !p.is_finite() || **p <= 0.0)
    {
        return Err(RiskError::InvalidPrice(bad));
    }

    let returns: Vec<f64> = price_history
        .windows(2)
        .map(|w| {
            w[0].iter()
                .zip(&w[1])
                .zip(weights)
                .map(|((prev, next), weight)| (next / prev).ln() * weight)
                .sum()
        })
        .collect();

    Ok(Data::new(returns).quantile(1.0 - confidence).abs())
}
