//! Strategy callbacks driven by the simulator

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Market state handed to a strategy at each step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketSnapshot {
    pub step: usize,
    pub timestamp: DateTime<Utc>,
    pub price: Decimal,
}

/// What a strategy wants done at this step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HedgeAction {
    pub hedge: bool,
    /// Signed size to trade when `hedge` is set
    pub size: Decimal,
}

impl HedgeAction {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn trade(size: Decimal) -> Self {
        Self { hedge: true, size }
    }
}

/// Decides a hedge from the market snapshot and the running position
pub trait BacktestStrategy {
    fn decide(&mut self, snapshot: &MarketSnapshot, position: Decimal) -> HedgeAction;

    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> BacktestStrategy for F
where
    F: FnMut(&MarketSnapshot, Decimal) -> HedgeAction,
{
    fn decide(&mut self, snapshot: &MarketSnapshot, position: Decimal) -> HedgeAction {
        self(snapshot, position)
    }
}

/// Trades the position back to a target delta whenever it drifts past a tolerance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeltaNeutral {
    pub target: Decimal,
    pub tolerance: Decimal,
}

impl Default for DeltaNeutral {
    fn default() -> Self {
        Self {
            target: Decimal::ZERO,
            tolerance: Decimal::new(1, 4), // 0.0001
        }
    }
}

impl BacktestStrategy for DeltaNeutral {
    fn decide(&mut self, _snapshot: &MarketSnapshot, position: Decimal) -> HedgeAction {
        let size = self.target - position;
        if size.abs() > self.tolerance {
            HedgeAction::trade(size)
        } else {
            HedgeAction::none()
        }
    }

    fn name(&self) -> &str {
        "delta_neutral"
    }
}

/// Never trades
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoHedge;

impl BacktestStrategy for NoHedge {
    fn decide(&mut self, _snapshot: &MarketSnapshot, _position: Decimal) -> HedgeAction {
        HedgeAction::none()
    }

    fn name(&self) -> &str {
        "no_hedge"
    }
}

/// Built-in strategies selectable from config and the CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    #[default]
    DeltaNeutral,
    NoHedge,
}

impl StrategyKind {
    pub fn build(self) -> Box<dyn BacktestStrategy> {
        match self {
            StrategyKind::DeltaNeutral => Box::new(DeltaNeutral::default()),
            StrategyKind::NoHedge => Box::new(NoHedge),
        }
    }
}
