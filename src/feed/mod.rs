//! Market data module
//!
//! Narrow interface to exchange collaborators: spot prices, venue order
//! books and option chains. Fetches are retried a fixed number of times.

mod retry;
mod static_source;

pub use retry::{with_retry, RetryPolicy};
pub use static_source::StaticMarketData;

use crate::hedging::OptionQuote;
use crate::orderbook::OrderBook;
use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

/// Collaborator fetch failures
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// The source has nothing for this key
    #[error("No data for {0}")]
    NotFound(String),
    /// Transport or upstream failure
    #[error("Market data source unavailable: {0}")]
    Unavailable(String),
    /// Every retry attempt failed
    #[error("Gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: String },
}

/// Source of market data for pricing, sizing and routing
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Latest spot price for a symbol
    async fn spot_price(&self, symbol: &str) -> Result<Decimal, FetchError>;
    /// Order book snapshot for a symbol on one venue
    async fn order_book(&self, venue: &str, symbol: &str) -> Result<OrderBook, FetchError>;
    /// Listed options on a currency
    async fn option_chain(&self, currency: &str) -> Result<Vec<OptionQuote>, FetchError>;
}
