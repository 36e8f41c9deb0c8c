//! Execution module
//!
//! Order-book cost estimation, venue selection and paper hedge execution

mod cost;
mod paper;
mod types;

pub use cost::{estimate_fill, hedging_cost, select_venue, HedgingCost, VenueSelection};
pub use paper::{PaperConfig, PaperExecutor};
pub use types::{
    ExecutionError, ExecutionEstimate, ExecutionRecord, ExecutionStatus, FillStatus, RecordId,
    Side,
};

use crate::hedging::HedgeStrategy;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A sized hedge leg ready to execute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HedgeOrder {
    pub asset: String,
    /// Venue symbol to route
    pub symbol: String,
    /// Signed size: positive buys, negative sells
    pub size: Decimal,
    pub strategy: HedgeStrategy,
}

/// Trait for hedge executor implementations
#[async_trait]
pub trait HedgeExecutor: Send + Sync {
    /// Execute (or stage) a hedge and return its record
    async fn execute(&self, order: HedgeOrder) -> Result<ExecutionRecord, ExecutionError>;
    /// All records so far
    async fn records(&self) -> Vec<ExecutionRecord>;
}
