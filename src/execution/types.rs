//! Execution types

use crate::feed::FetchError;
use crate::hedging::HedgeStrategy;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Execution record identifier
pub type RecordId = Uuid;

/// Trade side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Side that trades a signed size; zero maps to `Buy`
    pub fn for_size(size: Decimal) -> Self {
        if size.is_sign_negative() && !size.is_zero() {
            Side::Sell
        } else {
            Side::Buy
        }
    }
}

/// Whether the ladder covered the requested size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillStatus {
    Full,
    Partial,
}

/// Cost of taking `requested` size from one venue's book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionEstimate {
    pub venue: String,
    pub side: Side,
    pub requested: Decimal,
    /// Quantity the visible depth can fill, never above `requested`
    pub filled: Decimal,
    pub avg_price: Decimal,
    pub top_of_book: Decimal,
    /// |avg_price - top_of_book|, in price units
    pub slippage: Decimal,
    pub fee: Decimal,
    pub total_cost: Decimal,
    pub status: FillStatus,
}

impl ExecutionEstimate {
    /// Unfilled remainder
    pub fn shortfall(&self) -> Decimal {
        self.requested - self.filled
    }

    /// Slippage relative to top of book, in basis points
    pub fn slippage_bps(&self) -> Decimal {
        if self.top_of_book.is_zero() {
            return Decimal::ZERO;
        }
        self.slippage / self.top_of_book * Decimal::from(10_000)
    }
}

/// Lifecycle of a recorded hedge execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    /// Awaiting confirmation (auto-execute off)
    Pending,
    Success,
    /// Simulated fill
    Mocked,
    /// Simulated fill that the book could not fully cover
    Partial,
}

/// Record handed to logging and notification collaborators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub id: RecordId,
    pub asset: String,
    pub venue: String,
    /// Filled quantity, signed by side
    pub size: Decimal,
    pub side: Side,
    pub price: Decimal,
    /// Hedging cost: fee plus slippage on the filled quantity, excluding notional
    pub cost: Decimal,
    pub slippage: Decimal,
    pub timestamp: DateTime<Utc>,
    pub strategy: HedgeStrategy,
    pub status: ExecutionStatus,
}

/// Execution errors
#[derive(Debug, Error, PartialEq)]
pub enum ExecutionError {
    /// The ladder on the taken side has no size
    #[error("No liquidity on {venue}")]
    EmptyLiquidity { venue: String },
    /// Requested size must be positive
    #[error("Invalid order size {0}")]
    InvalidSize(Decimal),
    /// Depth limit must be at least one level
    #[error("Depth limit must be at least 1")]
    InvalidDepth,
    /// No venue book could be fetched
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_side_for_size() {
        assert_eq!(Side::for_size(dec!(1.5)), Side::Buy);
        assert_eq!(Side::for_size(dec!(-0.2)), Side::Sell);
        assert_eq!(Side::for_size(dec!(0)), Side::Buy);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ExecutionStatus::Mocked).unwrap(),
            "\"mocked\""
        );
        assert_eq!(serde_json::to_string(&Side::Sell).unwrap(), "\"sell\"");
    }

    #[test]
    fn test_slippage_bps() {
        let estimate = ExecutionEstimate {
            venue: "deribit".to_string(),
            side: Side::Buy,
            requested: dec!(2),
            filled: dec!(2),
            avg_price: dec!(30015),
            top_of_book: dec!(30000),
            slippage: dec!(15),
            fee: dec!(30.015),
            total_cost: dec!(60060.03),
            status: FillStatus::Full,
        };
        assert_eq!(estimate.slippage_bps(), dec!(5));
        assert_eq!(estimate.shortfall(), dec!(0));
    }
}
