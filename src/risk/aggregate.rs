//! Portfolio Greek aggregation

use super::position::{Position, PositionKind};
use super::var::value_at_risk;
use super::RiskError;
use crate::pricing::Greeks;
use crate::telemetry::{self, GaugeMetric};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Summed sensitivities of a set of positions
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioGreeks {
    pub delta: f64,
    pub gamma: f64,
    pub vega: f64,
    pub theta: f64,
}

impl PortfolioGreeks {
    /// Contribution of a single position
    pub fn of_position(position: &Position) -> Result<Self, RiskError> {
        let size = position.signed_size();
        match &position.kind {
            PositionKind::Spot | PositionKind::Perpetual => Ok(Self {
                delta: size,
                ..Self::default()
            }),
            PositionKind::Option(params) => {
                let unit = Greeks::calculate(params)?;
                Ok(Self {
                    delta: unit.delta * size,
                    gamma: unit.gamma * size,
                    vega: unit.vega * size,
                    theta: unit.theta * size,
                })
            }
        }
    }
}

impl Add for PortfolioGreeks {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            delta: self.delta + rhs.delta,
            gamma: self.gamma + rhs.gamma,
            vega: self.vega + rhs.vega,
            theta: self.theta + rhs.theta,
        }
    }
}

impl AddAssign for PortfolioGreeks {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for PortfolioGreeks {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Fold positions into portfolio totals
pub fn aggregate(positions: &[Position]) -> Result<PortfolioGreeks, RiskError> {
    positions.iter().map(PortfolioGreeks::of_position).sum()
}

/// Totals grouped by underlying asset
pub fn exposure_by_asset(
    positions: &[Position],
) -> Result<BTreeMap<String, PortfolioGreeks>, RiskError> {
    let mut exposures: BTreeMap<String, PortfolioGreeks> = BTreeMap::new();
    for position in positions {
        *exposures.entry(position.asset.clone()).or_default() +=
            PortfolioGreeks::of_position(position)?;
    }
    Ok(exposures)
}

/// Positions with their aggregate Greeks and VaR
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub positions: Vec<Position>,
    pub greeks: PortfolioGreeks,
    pub value_at_risk: f64,
}

impl PortfolioSnapshot {
    /// Aggregate positions and compute parametric VaR over a price history
    pub fn build(
        positions: Vec<Position>,
        price_history: &[f64],
        confidence: f64,
    ) -> Result<Self, RiskError> {
        let greeks = aggregate(&positions)?;
        let value_at_risk = value_at_risk(price_history, confidence)?;

        telemetry::set_gauge(GaugeMetric::PortfolioDelta, greeks.delta);
        telemetry::set_gauge(GaugeMetric::PortfolioGamma, greeks.gamma);
        telemetry::set_gauge(GaugeMetric::PortfolioVega, greeks.vega);
        telemetry::set_gauge(GaugeMetric::PortfolioVar, value_at_risk);

        tracing::debug!(
            positions = positions.len(),
            delta = greeks.delta,
            gamma = greeks.gamma,
            vega = greeks.vega,
            theta = greeks.theta,
            value_at_risk,
            "Portfolio snapshot built"
        );

        Ok(Self {
            positions,
            greeks,
            value_at_risk,
        })
    }
}
