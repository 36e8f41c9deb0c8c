//! Venue routing through the paper executor

use hedge_desk::execution::{
    select_venue, ExecutionError, ExecutionStatus, HedgeExecutor, HedgeOrder, PaperConfig,
    PaperExecutor, Side,
};
use hedge_desk::feed::{RetryPolicy, StaticMarketData};
use hedge_desk::hedging::HedgeStrategy;
use hedge_desk::orderbook::{OrderBook, PriceLevel};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;

fn book(venue: &str, asks: &[(Decimal, Decimal)]) -> OrderBook {
    OrderBook::new(venue, "BTC-PERP").with_levels(
        vec![PriceLevel::new(dec!(29990), dec!(10))],
        asks.iter().map(|&(p, s)| PriceLevel::new(p, s)).collect(),
    )
}

fn config(auto_execute: bool) -> PaperConfig {
    PaperConfig {
        venues: vec!["okx".into(), "bybit".into(), "deribit".into()],
        fee_rate: dec!(0.0005),
        depth_limit: 5,
        auto_execute,
        retry: RetryPolicy::new(2, Duration::ZERO),
    }
}

fn order(size: Decimal) -> HedgeOrder {
    HedgeOrder {
        asset: "BTC".to_string(),
        symbol: "BTC-PERP".to_string(),
        size,
        strategy: HedgeStrategy::PerpetualDeltaNeutral,
    }
}

#[test]
fn test_deeper_book_wins_large_order() {
    let shallow = book("okx", &[(dec!(30000), dec!(0.5)), (dec!(30100), dec!(5))]);
    let deep = book("bybit", &[(dec!(30005), dec!(5))]);

    let selection = select_venue(Side::Buy, dec!(2), &[shallow, deep], dec!(0.0005), 5).unwrap();
    assert_eq!(selection.best.venue, "bybit");
    assert_eq!(selection.fallback.unwrap().venue, "okx");
}

#[tokio::test]
async fn test_paper_execution_skips_down_venue() {
    let source = StaticMarketData::new()
        .with_book(book("okx", &[(dec!(30010), dec!(3))]))
        .with_book(book("deribit", &[(dec!(30000), dec!(3))]))
        .with_venue_down("deribit");
    let executor = PaperExecutor::new(Arc::new(source), config(true));

    let record = executor.execute(order(dec!(1))).await.unwrap();
    assert_eq!(record.venue, "okx");
    assert_eq!(record.side, Side::Buy);
    assert_eq!(record.status, ExecutionStatus::Mocked);
    assert_eq!(record.price, dec!(30010));
}

#[tokio::test]
async fn test_pending_records_accumulate() {
    let source = StaticMarketData::new().with_book(book("bybit", &[(dec!(30000), dec!(3))]));
    let executor = PaperExecutor::new(Arc::new(source), config(false));

    executor.execute(order(dec!(0.5))).await.unwrap();
    executor.execute(order(dec!(0.25))).await.unwrap();

    let records = executor.records().await;
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.status == ExecutionStatus::Pending));
    assert_ne!(records[0].id, records[1].id);
}

#[tokio::test]
async fn test_no_books_anywhere_fails() {
    let executor = PaperExecutor::new(Arc::new(StaticMarketData::new()), config(true));
    let err = executor.execute(order(dec!(1))).await.unwrap_err();
    assert!(matches!(err, ExecutionError::Fetch(_)));
}
