//! Backtesting module
//!
//! Replays a historical price path through a hedge strategy with either a
//! flat-rate cost model or an order-book walk per step

mod analytics;
mod replay;
mod simulator;
mod strategies;

pub use analytics::{empirical_var, BacktestResult, BacktestSummary, HedgeCostEntry};
pub use replay::{PricePoint, PriceSeries};
pub use simulator::{BacktestPhase, BacktestSimulator, BacktestState, BookProvider};
pub use strategies::{
    BacktestStrategy, DeltaNeutral, HedgeAction, MarketSnapshot, NoHedge, StrategyKind,
};

use crate::config::{BacktestSettings, ExecutionConfig};
use crate::execution::ExecutionError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Backtest configuration
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    /// Fee rate of the flat-rate model, also used for book fills
    pub fee_rate: Decimal,
    /// Slippage rate of the flat-rate model
    pub slippage_rate: Decimal,
    /// Levels walked per step when order books are supplied
    pub depth_limit: usize,
    /// Exposure held before the first step
    pub initial_position: Decimal,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            fee_rate: Decimal::new(5, 4),
            slippage_rate: Decimal::new(2, 4),
            depth_limit: 5,
            initial_position: Decimal::ZERO,
        }
    }
}

impl BacktestConfig {
    pub fn from_settings(settings: &BacktestSettings, execution: &ExecutionConfig) -> Self {
        Self {
            fee_rate: settings.fee_rate,
            slippage_rate: settings.slippage_rate,
            depth_limit: execution.order_book_depth_limit,
            initial_position: Decimal::ZERO,
        }
    }

    pub fn with_initial_position(mut self, position: Decimal) -> Self {
        self.initial_position = position;
        self
    }
}

/// Backtest errors
#[derive(Debug, Error)]
pub enum BacktestError {
    /// Nothing to replay
    #[error("Price series is empty")]
    EmptySeries,
    /// Prices must be positive
    #[error("Invalid price {price} at step {step}")]
    InvalidPrice { step: usize, price: Decimal },
    /// Order-book fill failed for a reason other than empty liquidity
    #[error(transparent)]
    Execution(#[from] ExecutionError),
    #[error("Failed to read price series: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse price series: {0}")]
    Parse(#[from] serde_json::Error),
}
