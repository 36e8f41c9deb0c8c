//! In-memory market data for paper mode and tests

use super::{FetchError, MarketDataSource};
use crate::hedging::OptionQuote;
use crate::orderbook::OrderBook;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

/// Fixed snapshot of spots, books and chains
#[derive(Debug, Clone, Default)]
pub struct StaticMarketData {
    spots: HashMap<String, Decimal>,
    books: HashMap<(String, String), OrderBook>,
    chains: HashMap<String, Vec<OptionQuote>>,
    down_venues: HashSet<String>,
}

impl StaticMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spot(mut self, symbol: impl Into<String>, price: Decimal) -> Self {
        self.spots.insert(symbol.into(), price);
        self
    }

    /// Register a book under its own venue and symbol
    pub fn with_book(mut self, book: OrderBook) -> Self {
        self.books
            .insert((book.venue.clone(), book.symbol.clone()), book);
        self
    }

    pub fn with_chain(mut self, currency: impl Into<String>, chain: Vec<OptionQuote>) -> Self {
        self.chains.insert(currency.into(), chain);
        self
    }

    /// Make every order book request to `venue` fail as unavailable
    pub fn with_venue_down(mut self, venue: impl Into<String>) -> Self {
        self.down_venues.insert(venue.into());
        self
    }
}

#[async_trait]
impl MarketDataSource for StaticMarketData {
    async fn spot_price(&self, symbol: &str) -> Result<Decimal, FetchError> {
        self.spots
            .get(symbol)
            .copied()
            .ok_or_else(|| FetchError::NotFound(symbol.to_string()))
    }

    async fn order_book(&self, venue: &str, symbol: &str) -> Result<OrderBook, FetchError> {
        if self.down_venues.contains(venue) {
            return Err(FetchError::Unavailable(format!("{venue} is down")));
        }
        self.books
            .get(&(venue.to_string(), symbol.to_string()))
            .cloned()
            .ok_or_else(|| FetchError::NotFound(format!("{venue}:{symbol}")))
    }

    async fn option_chain(&self, currency: &str) -> Result<Vec<OptionQuote>, FetchError> {
        self.chains
            .get(currency)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(currency.to_string()))
    }
}
