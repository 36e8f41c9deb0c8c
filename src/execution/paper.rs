//! Paper hedge execution
//!
//! Prices hedges against live-shaped venue books and records the result.
//! No order ever leaves the process.

use super::{
    hedging_cost, select_venue, ExecutionError, ExecutionRecord, ExecutionStatus, FillStatus,
    HedgeExecutor, HedgeOrder, RecordId, Side,
};
use crate::feed::{with_retry, FetchError, MarketDataSource, RetryPolicy};
use crate::orderbook::OrderBook;
use crate::telemetry::{self, CounterMetric, GaugeMetric, LatencyMetric};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Paper executor settings
#[derive(Debug, Clone)]
pub struct PaperConfig {
    /// Venues queried for each hedge, in tie-break order
    pub venues: Vec<String>,
    pub fee_rate: Decimal,
    pub depth_limit: usize,
    /// Record simulated fills; otherwise records stay `Pending`
    pub auto_execute: bool,
    pub retry: RetryPolicy,
}

/// Simulated hedge execution against venue order books
pub struct PaperExecutor<S> {
    source: Arc<S>,
    config: PaperConfig,
    records: Arc<RwLock<Vec<ExecutionRecord>>>,
}

impl<S: MarketDataSource> PaperExecutor<S> {
    /// Create a new paper executor
    pub fn new(source: Arc<S>, config: PaperConfig) -> Self {
        Self {
            source,
            config,
            records: Arc::new(RwLock::new(vec![])),
        }
    }

    async fn fetch_books(&self, symbol: &str) -> Result<Vec<OrderBook>, FetchError> {
        let mut books = Vec::with_capacity(self.config.venues.len());
        let mut last_error = None;
        let source = &self.source;
        for venue in &self.config.venues {
            let started = Instant::now();
            let fetched = with_retry(self.config.retry, "order_book", move || {
                source.order_book(venue, symbol)
            })
            .await;
            telemetry::record_latency(LatencyMetric::MarketDataFetch, started.elapsed());
            match fetched {
                Ok(book) => books.push(book),
                Err(err) => {
                    tracing::warn!(%venue, symbol, error = %err, "Venue book unavailable");
                    last_error = Some(err);
                }
            }
        }
        match (books.is_empty(), last_error) {
            (true, Some(err)) => Err(err),
            _ => Ok(books),
        }
    }
}

#[async_trait]
impl<S: MarketDataSource> HedgeExecutor for PaperExecutor<S> {
    async fn execute(&self, order: HedgeOrder) -> Result<ExecutionRecord, ExecutionError> {
        let side = Side::for_size(order.size);
        let quantity = order.size.abs();
        if quantity.is_zero() {
            return Err(ExecutionError::InvalidSize(order.size));
        }

        let books = self.fetch_books(&order.symbol).await?;
        let selection = select_venue(
            side,
            quantity,
            &books,
            self.config.fee_rate,
            self.config.depth_limit,
        )?;
        let best = selection.best;

        let status = match (self.config.auto_execute, best.status) {
            (false, _) => ExecutionStatus::Pending,
            (true, FillStatus::Partial) => ExecutionStatus::Partial,
            (true, FillStatus::Full) => ExecutionStatus::Mocked,
        };
        let fee_rate = self.config.fee_rate;
        let cost = hedging_cost(best.avg_price, best.filled, fee_rate, best.slippage);
        let signed_fill = match side {
            Side::Buy => best.filled,
            Side::Sell => -best.filled,
        };

        let record = ExecutionRecord {
            id: RecordId::new_v4(),
            asset: order.asset,
            venue: best.venue.clone(),
            size: signed_fill,
            side,
            price: best.avg_price,
            cost: cost.total,
            slippage: best.slippage,
            timestamp: Utc::now(),
            strategy: order.strategy,
            status,
        };

        self.records.write().await.push(record.clone());

        telemetry::increment_counter(CounterMetric::ExecutionsRecorded);
        telemetry::set_gauge(
            GaugeMetric::LastSlippageBps,
            best.slippage_bps().to_f64().unwrap_or_default(),
        );
        tracing::info!(
            id = %record.id,
            venue = %record.venue,
            size = %record.size,
            price = %record.price,
            cost = %record.cost,
            status = ?record.status,
            fallback = selection.fallback.as_ref().map(|f| f.venue.as_str()),
            "Paper hedge recorded"
        );
        Ok(record)
    }

    async fn records(&self) -> Vec<ExecutionRecord> {
        self.records.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::StaticMarketData;
    use crate::hedging::HedgeStrategy;
    use crate::orderbook::PriceLevel;
    use rust_decimal_macros::dec;
    use std::time::Duration;

    fn book(venue: &str, ask: Decimal, bid: Decimal, size: Decimal) -> OrderBook {
        OrderBook::new(venue, "BTC-PERP").with_levels(
            vec![PriceLevel::new(bid, size)],
            vec![PriceLevel::new(ask, size)],
        )
    }

    fn executor(source: StaticMarketData, auto_execute: bool) -> PaperExecutor<StaticMarketData> {
        PaperExecutor::new(
            Arc::new(source),
            PaperConfig {
                venues: vec!["okx".into(), "bybit".into(), "deribit".into()],
                fee_rate: dec!(0.0005),
                depth_limit: 5,
                auto_execute,
                retry: RetryPolicy::new(3, Duration::ZERO),
            },
        )
    }

    fn order(size: Decimal) -> HedgeOrder {
        HedgeOrder {
            asset: "BTC".to_string(),
            symbol: "BTC-PERP".to_string(),
            size,
            strategy: HedgeStrategy::PerpetualDeltaNeutral,
        }
    }

    #[tokio::test]
    async fn test_sell_records_signed_fill() {
        let source = StaticMarketData::new()
            .with_book(book("okx", dec!(30010), dec!(29990), dec!(5)))
            .with_book(book("bybit", dec!(30002), dec!(29980), dec!(5)))
            .with_venue_down("deribit");
        let engine = executor(source, true);

        let record = engine.execute(order(dec!(-1))).await.unwrap();
        assert_eq!(record.side, Side::Sell);
        assert_eq!(record.size, dec!(-1));
        assert_eq!(record.status, ExecutionStatus::Mocked);
        assert_eq!(engine.records().await.len(), 1);
    }

    #[tokio::test]
    async fn test_partial_fill_status() {
        let source =
            StaticMarketData::new().with_book(book("okx", dec!(30010), dec!(29990), dec!(0.5)));
        let engine = executor(source, true);

        let record = engine.execute(order(dec!(2))).await.unwrap();
        assert_eq!(record.status, ExecutionStatus::Partial);
        assert_eq!(record.size, dec!(0.5));
        assert_eq!(record.venue, "okx");
    }

    #[tokio::test]
    async fn test_record_cost_is_fee_plus_slippage() {
        let okx = OrderBook::new("okx", "BTC-PERP").with_levels(
            vec![PriceLevel::new(dec!(29990), dec!(5))],
            vec![
                PriceLevel::new(dec!(30000), dec!(0.5)),
                PriceLevel::new(dec!(30020), dec!(5)),
            ],
        );
        let engine = executor(StaticMarketData::new().with_book(okx), true);

        let record = engine.execute(order(dec!(1))).await.unwrap();
        assert_eq!(record.price, dec!(30010));
        assert_eq!(record.slippage, dec!(10));
        // 30010 * 0.0005 + 10 * 1
        assert_eq!(record.cost, dec!(25.005));
        assert_eq!(
            crate::analytics::total_hedging_cost(&engine.records().await),
            dec!(25.005)
        );
    }

    #[tokio::test]
    async fn test_pending_when_auto_execute_off() {
        let source =
            StaticMarketData::new().with_book(book("bybit", dec!(30010), dec!(29990), dec!(5)));
        let engine = executor(source, false);

        let record = engine.execute(order(dec!(1))).await.unwrap();
        assert_eq!(record.status, ExecutionStatus::Pending);
    }

    #[tokio::test]
    async fn test_all_venues_unavailable() {
        let source = StaticMarketData::new()
            .with_venue_down("okx")
            .with_venue_down("bybit")
            .with_venue_down("deribit");
        let engine = executor(source, true);

        let err = engine.execute(order(dec!(1))).await.unwrap_err();
        assert!(matches!(
            err,
            ExecutionError::Fetch(FetchError::Exhausted { attempts: 3, .. })
        ));
        assert!(engine.records().await.is_empty());
    }

    #[tokio::test]
    async fn test_zero_size_rejected() {
        let engine = executor(StaticMarketData::new(), true);
        assert_eq!(
            engine.execute(order(dec!(0))).await,
            Err(ExecutionError::InvalidSize(dec!(0)))
        );
    }
}
