//! Order book snapshot

use super::PriceLevel;
use crate::execution::Side;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// L2 aggregated order book for one instrument on one venue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    /// Venue name (e.g. "deribit")
    pub venue: String,
    /// Instrument symbol
    pub symbol: String,
    /// Bid levels, sorted best (highest) to worst
    pub bids: Vec<PriceLevel>,
    /// Ask levels, sorted best (lowest) to worst
    pub asks: Vec<PriceLevel>,
    /// Snapshot timestamp
    pub updated_at: DateTime<Utc>,
}

impl OrderBook {
    /// Create a new empty order book
    pub fn new(venue: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            venue: venue.into(),
            symbol: symbol.into(),
            bids: vec![],
            asks: vec![],
            updated_at: Utc::now(),
        }
    }

    /// Set both ladders, sorting each best-first
    pub fn with_levels(mut self, mut bids: Vec<PriceLevel>, mut asks: Vec<PriceLevel>) -> Self {
        bids.sort_by(|a, b| b.price.cmp(&a.price));
        asks.sort_by(|a, b| a.price.cmp(&b.price));
        self.bids = bids;
        self.asks = asks;
        self
    }

    /// Ladder a taker on `side` consumes: asks for buys, bids for sells
    pub fn ladder(&self, side: Side) -> &[PriceLevel] {
        match side {
            Side::Buy => &self.asks,
            Side::Sell => &self.bids,
        }
    }

    /// Get best bid price
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.first().map(|l| l.price)
    }

    /// Get best ask price
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.first().map(|l| l.price)
    }

    /// Get mid price
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::TWO),
            _ => None,
        }
    }

    /// Get spread
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    /// Best bid above best ask. Detected, never repaired.
    pub fn is_crossed(&self) -> bool {
        matches!((self.best_bid(), self.best_ask()), (Some(bid), Some(ask)) if bid > ask)
    }

    /// Total size over the first `levels` levels of one side
    pub fn depth(&self, side: Side, levels: usize) -> Decimal {
        self.ladder(side).iter().take(levels).map(|l| l.size).sum()
    }
}
