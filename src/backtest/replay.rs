//! Historical price series

use super::BacktestError;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One step of the replayed path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    #[serde(alias = "close")]
    pub price: Decimal,
}

/// Ordered price path replayed by the simulator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    /// Evenly spaced prices starting at `start`
    pub fn from_prices(start: DateTime<Utc>, interval: Duration, prices: &[Decimal]) -> Self {
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, &price)| PricePoint {
                timestamp: start + interval * i as i32,
                price,
            })
            .collect();
        Self { points }
    }

    /// Load a JSON array of `{"timestamp", "price"}` (or `"close"`) objects
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, BacktestError> {
        let content = std::fs::read_to_string(path)?;
        let series: PriceSeries = serde_json::from_str(&content)?;
        Ok(series)
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_price(&self) -> Option<Decimal> {
        self.points.first().map(|p| p.price)
    }
}

impl<'a> IntoIterator for &'a PriceSeries {
    type Item = &'a PricePoint;
    type IntoIter = std::slice::Iter<'a, PricePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
