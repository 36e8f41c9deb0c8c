//! Order-book cost model
//!
//! Walks a venue ladder from the best level outward to estimate average
//! fill price, slippage and fees, and ranks venues by total cost.

use super::{ExecutionError, ExecutionEstimate, FillStatus, Side};
use crate::orderbook::OrderBook;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Estimate taking `size` from `book` on `side`.
///
/// Zero-size levels are skipped and do not count toward `depth_limit`, so
/// top of book is the best level with quantity. At most `depth_limit` levels
/// are consumed. When the visible depth is shallower than `size` the estimate
/// is `FillStatus::Partial`.
pub fn estimate_fill(
    venue: &str,
    side: Side,
    size: Decimal,
    book: &OrderBook,
    fee_rate: Decimal,
    depth_limit: usize,
) -> Result<ExecutionEstimate, ExecutionError> {
    if size <= Decimal::ZERO {
        return Err(ExecutionError::InvalidSize(size));
    }
    if depth_limit == 0 {
        return Err(ExecutionError::InvalidDepth);
    }
    let empty = || ExecutionError::EmptyLiquidity {
        venue: venue.to_string(),
    };

    let mut levels = book
        .ladder(side)
        .iter()
        .filter(|l| l.size > Decimal::ZERO)
        .peekable();
    let top_of_book = levels.peek().map(|l| l.price).ok_or_else(empty)?;

    let mut filled = Decimal::ZERO;
    let mut notional = Decimal::ZERO;
    for level in levels.take(depth_limit) {
        let remaining = size - filled;
        if remaining <= Decimal::ZERO {
            break;
        }
        let take = remaining.min(level.size);
        notional += take * level.price;
        filled += take;
    }
    if filled.is_zero() {
        return Err(empty());
    }

    let avg_price = notional / filled;
    let slippage = (avg_price - top_of_book).abs();
    let fee = notional * fee_rate;
    let total_cost = notional * (Decimal::ONE + fee_rate) + slippage * filled;
    let status = if filled < size {
        FillStatus::Partial
    } else {
        FillStatus::Full
    };

    Ok(ExecutionEstimate {
        venue: venue.to_string(),
        side,
        requested: size,
        filled,
        avg_price,
        top_of_book,
        slippage,
        fee,
        total_cost,
        status,
    })
}

/// Cheapest venue and the runner-up
#[derive(Debug, Clone, PartialEq)]
pub struct VenueSelection {
    pub best: ExecutionEstimate,
    pub fallback: Option<ExecutionEstimate>,
}

/// Estimate every venue and rank by total cost, lowest first.
///
/// Venues with no liquidity on the taken side are skipped. Ties keep the
/// order of `books`.
pub fn select_venue(
    side: Side,
    size: Decimal,
    books: &[OrderBook],
    fee_rate: Decimal,
    depth_limit: usize,
) -> Result<VenueSelection, ExecutionError> {
    let mut estimates = Vec::with_capacity(books.len());
    for book in books {
        match estimate_fill(&book.venue, side, size, book, fee_rate, depth_limit) {
            Ok(estimate) => estimates.push(estimate),
            Err(ExecutionError::EmptyLiquidity { venue }) => {
                tracing::warn!(%venue, ?side, "Skipping venue with empty ladder");
            }
            Err(err) => return Err(err),
        }
    }

    estimates.sort_by(|a, b| a.total_cost.cmp(&b.total_cost));
    let mut ranked = estimates.into_iter();
    let best = ranked.next().ok_or_else(|| ExecutionError::EmptyLiquidity {
        venue: "any venue".to_string(),
    })?;

    tracing::debug!(
        venue = %best.venue,
        total_cost = %best.total_cost,
        slippage_bps = %best.slippage_bps(),
        "Venue selected"
    );

    Ok(VenueSelection {
        best,
        fallback: ranked.next(),
    })
}

/// Fee plus slippage cost of a hedge, absolute and as a fraction of notional
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HedgingCost {
    pub total: Decimal,
    pub pct: Decimal,
}

/// Cost of hedging `size` at `entry_price` with the given fee rate and
/// per-unit slippage. `pct` is 0 when the notional is 0.
pub fn hedging_cost(
    entry_price: Decimal,
    size: Decimal,
    fee_rate: Decimal,
    slippage: Decimal,
) -> HedgingCost {
    let quantity = size.abs();
    let notional = quantity * entry_price;
    let total = notional * fee_rate + quantity * slippage;
    let pct = if notional.is_zero() {
        Decimal::ZERO
    } else {
        total / notional
    };
    HedgingCost { total, pct }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orderbook::PriceLevel;
    use rust_decimal_macros::dec;

    fn book(venue: &str, asks: &[(Decimal, Decimal)], bids: &[(Decimal, Decimal)]) -> OrderBook {
        let level = |&(p, s): &(Decimal, Decimal)| PriceLevel::new(p, s);
        OrderBook::new(venue, "BTC-PERPETUAL").with_levels(
            bids.iter().map(level).collect(),
            asks.iter().map(level).collect(),
        )
    }

    fn deribit() -> OrderBook {
        book(
            "deribit",
            &[(dec!(30005), dec!(1)), (dec!(30010), dec!(2)), (dec!(30020), dec!(5))],
            &[(dec!(29995), dec!(1)), (dec!(29990), dec!(3))],
        )
    }

    fn fill(side: Side, size: Decimal, depth: usize) -> ExecutionEstimate {
        estimate_fill("deribit", side, size, &deribit(), dec!(0.0005), depth).unwrap()
    }

    #[test]
    fn test_buy_walks_asks() {
        let est = fill(Side::Buy, dec!(2), 5);
        assert_eq!(est.filled, dec!(2));
        assert_eq!(est.avg_price, dec!(30007.5));
        assert_eq!(est.top_of_book, dec!(30005));
        assert_eq!(est.slippage, dec!(2.5));
        assert_eq!(est.fee, dec!(30.0075));
        // 60015 * 1.0005 + 2.5 * 2
        assert_eq!(est.total_cost, dec!(60050.0075));
        assert_eq!(est.status, FillStatus::Full);
    }

    #[test]
    fn test_sell_walks_bids() {
        let est = estimate_fill("deribit", Side::Sell, dec!(2), &deribit(), dec!(0), 5)
            .unwrap();
        assert_eq!(est.avg_price, dec!(29992.5));
        assert_eq!(est.slippage, dec!(2.5));
    }

    #[test]
    fn test_depth_limit_gives_partial_fill() {
        let est = fill(Side::Buy, dec!(5), 2);
        assert_eq!(est.filled, dec!(3));
        assert_eq!(est.status, FillStatus::Partial);
        assert_eq!(est.shortfall(), dec!(2));
    }

    #[test]
    fn test_filled_never_exceeds_requested() {
        for size in [dec!(0.1), dec!(1), dec!(2.5), dec!(8), dec!(50)] {
            let est = fill(Side::Buy, size, 5);
            assert!(est.filled <= size);
        }
    }

    #[test]
    fn test_avg_price_monotone_in_size() {
        let mut last = Decimal::ZERO;
        for size in [dec!(0.5), dec!(1), dec!(1.5), dec!(3), dec!(6), dec!(8)] {
            let est = fill(Side::Buy, size, 5);
            assert!(est.avg_price >= last);
            last = est.avg_price;
        }
    }

    #[test]
    fn test_sell_avg_price_non_increasing_in_size() {
        let mut last = Decimal::MAX;
        for size in [dec!(0.5), dec!(1), dec!(1.5), dec!(3), dec!(4), dec!(6)] {
            let est = fill(Side::Sell, size, 5);
            assert!(est.filled <= size);
            assert!(est.avg_price <= last);
            last = est.avg_price;
        }
        assert_eq!(last, dec!(29991.25));
    }

    #[test]
    fn test_zero_size_levels_are_skipped() {
        let b = book(
            "deribit",
            &[(dec!(30000), dec!(0)), (dec!(30005), dec!(1)), (dec!(30010), dec!(2))],
            &[(dec!(29999), dec!(0))],
        );
        let est = estimate_fill("deribit", Side::Buy, dec!(1), &b, dec!(0), 1).unwrap();
        assert_eq!(est.top_of_book, dec!(30005));
        assert_eq!(est.avg_price, dec!(30005));
        assert_eq!(est.slippage, dec!(0));
        assert_eq!(est.status, FillStatus::Full);

        assert!(matches!(
            estimate_fill("deribit", Side::Sell, dec!(1), &b, dec!(0), 5),
            Err(ExecutionError::EmptyLiquidity { .. })
        ));
    }

    #[test]
    fn test_invalid_inputs() {
        let b = deribit();
        assert_eq!(
            estimate_fill("deribit", Side::Buy, dec!(0), &b, dec!(0.0005), 5),
            Err(ExecutionError::InvalidSize(dec!(0)))
        );
        assert_eq!(
            estimate_fill("deribit", Side::Buy, dec!(1), &b, dec!(0.0005), 0),
            Err(ExecutionError::InvalidDepth)
        );
        let empty = OrderBook::new("okx", "BTC-USDT-SWAP");
        assert!(matches!(
            estimate_fill("okx", Side::Sell, dec!(1), &empty, dec!(0.0005), 5),
            Err(ExecutionError::EmptyLiquidity { .. })
        ));
    }

    #[test]
    fn test_select_venue_ranks_by_total_cost() {
        let okx = book("okx", &[(dec!(30001), dec!(10))], &[(dec!(29999), dec!(10))]);
        let bybit = book("bybit", &[(dec!(30050), dec!(10))], &[]);
        let empty = OrderBook::new("binance", "BTCUSDT");

        let books = vec![deribit(), bybit, empty, okx];
        let selection = select_venue(Side::Buy, dec!(2), &books, dec!(0.0005), 5).unwrap();
        assert_eq!(selection.best.venue, "okx");
        assert_eq!(selection.fallback.unwrap().venue, "deribit");
    }

    #[test]
    fn test_select_venue_single_and_none() {
        let only = select_venue(Side::Buy, dec!(1), &[deribit()], dec!(0.0005), 5).unwrap();
        assert!(only.fallback.is_none());

        let none = select_venue(
            Side::Buy,
            dec!(1),
            &[OrderBook::new("okx", "BTC-USDT-SWAP")],
            dec!(0.0005),
            5,
        );
        assert!(matches!(none, Err(ExecutionError::EmptyLiquidity { .. })));
    }

    #[test]
    fn test_hedging_cost() {
        let cost = hedging_cost(dec!(30000), dec!(-2), dec!(0.0005), dec!(2.5));
        // 2 * 30000 * 0.0005 + 2 * 2.5
        assert_eq!(cost.total, dec!(35));
        assert_eq!(cost.pct, dec!(35) / dec!(60000));

        let zero = hedging_cost(dec!(30000), dec!(0), dec!(0.0005), dec!(2.5));
        assert_eq!(zero.pct, dec!(0));
    }
}
