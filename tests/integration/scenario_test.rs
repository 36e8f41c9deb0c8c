//! End-to-end hedging scenarios

use approx::assert_relative_eq;
use hedge_desk::analytics::{portfolio_pnl, PnlPosition};
use hedge_desk::hedging::{HedgeRequest, HedgeSizer, HedgeStrategy, MultiAssetRequest};
use hedge_desk::pricing::{OptionParams, OptionType};
use hedge_desk::risk::{
    aggregate, beta, correlation_matrix, exposure_by_asset, market_shock, CorrelationMatrix,
    Direction, Greek, GreekLimits, InstrumentKind, MonitoringSession, Position,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

fn pnl_position(
    kind: InstrumentKind,
    size: Decimal,
    direction: Direction,
    exit: Decimal,
) -> PnlPosition {
    PnlPosition {
        instrument: "BTC".to_string(),
        kind,
        entry_price: dec!(27000),
        current_price: exit,
        size,
        direction,
    }
}

#[test]
fn test_matched_hedge_has_zero_effectiveness() {
    let pnl = portfolio_pnl(&[
        pnl_position(InstrumentKind::Spot, dec!(1), Direction::Long, dec!(28000)),
        pnl_position(InstrumentKind::Perpetual, dec!(1), Direction::Short, dec!(28000)),
    ]);
    assert_eq!(pnl.spot, dec!(1000));
    assert_eq!(pnl.hedge, dec!(-1000));
    assert_eq!(pnl.total, dec!(0));
    assert_eq!(pnl.effectiveness, dec!(0));
}

#[test]
fn test_over_hedge_effectiveness() {
    let pnl = portfolio_pnl(&[
        pnl_position(InstrumentKind::Spot, dec!(1), Direction::Long, dec!(26000)),
        pnl_position(InstrumentKind::Perpetual, dec!(2), Direction::Short, dec!(26000)),
    ]);
    assert_eq!(pnl.spot, dec!(-1000));
    assert_eq!(pnl.hedge, dec!(2000));
    assert_eq!(pnl.total, dec!(1000));
    assert_eq!(pnl.effectiveness, dec!(200));
}

#[test]
fn test_multi_asset_allocation_preserves_gross_exposure() {
    let correlation = CorrelationMatrix::new(
        vec!["BTC".into(), "ETH".into()],
        vec![vec![1.0, 0.8], vec![0.8, 1.0]],
    )
    .unwrap();
    let request = HedgeRequest::MultiAssetAllocation(MultiAssetRequest {
        exposures: BTreeMap::from([("BTC".to_string(), 0.5), ("ETH".to_string(), -0.5)]),
        correlation,
    });

    let outcome = HedgeSizer::new().evaluate(&request).unwrap();
    let decision = outcome.decision().unwrap();
    assert_eq!(decision.strategy, HedgeStrategy::MultiAssetAllocation);
    assert!(!decision.degraded);

    let btc = decision.leg_size("BTC-PERPETUAL").unwrap();
    let eth = decision.leg_size("ETH-PERPETUAL").unwrap();
    assert_relative_eq!(btc.abs() + eth.abs(), 1.0, epsilon = 1e-9);
    assert!(btc < 0.0 && eth > 0.0);
}

#[test]
fn test_portfolio_to_perpetual_hedge() {
    let call = OptionParams::new(30000.0, 30000.0, 30.0 / 365.0, 0.0, 0.6, OptionType::Call);
    let positions = vec![
        Position::spot("BTC", 1.0, Direction::Long),
        Position::option("BTC-30000-C", "BTC", call, 2.0, Direction::Short).unwrap(),
    ];
    let greeks = aggregate(&positions).unwrap();

    let mut session = MonitoringSession::new("BTC", 0.1);
    let breach = session.check(greeks);

    let outcome = HedgeSizer::new()
        .evaluate(&HedgeRequest::PerpetualDeltaNeutral {
            asset: "BTC".to_string(),
            aggregate_delta: greeks.delta,
            beta: 1.0,
            risk_reduction: 1.0,
        })
        .unwrap();
    let size = outcome.decision().unwrap().leg_size("BTC-PERPETUAL").unwrap();
    assert_relative_eq!(greeks.delta + size, 0.0, epsilon = 1e-12);

    // Short two near-ATM calls against one spot leaves the book net short delta
    assert!(greeks.delta < 0.0);
    assert!(breach.is_none());
}

#[test]
fn test_correlation_from_price_history_feeds_allocation() {
    let btc: Vec<f64> = (0..30).map(|i| 30000.0 + 300.0 * (i as f64 * 0.7).sin()).collect();
    let eth: Vec<f64> = (0..30)
        .map(|i| 2000.0 + 15.0 * (i as f64 * 0.7).sin() + (i % 3) as f64)
        .collect();
    let prices = BTreeMap::from([("BTC".to_string(), btc), ("ETH".to_string(), eth)]);
    let correlation = correlation_matrix(&prices).unwrap();

    let positions = vec![
        Position::spot("BTC", 0.5, Direction::Long),
        Position::spot("ETH", 4.0, Direction::Long),
    ];
    let exposures = exposure_by_asset(&positions)
        .unwrap()
        .into_iter()
        .map(|(asset, greeks)| (asset, greeks.delta))
        .collect::<BTreeMap<_, _>>();

    let outcome = HedgeSizer::new()
        .evaluate(&HedgeRequest::MultiAssetAllocation(MultiAssetRequest {
            exposures,
            correlation,
        }))
        .unwrap();
    let decision = outcome.decision().unwrap();
    let gross: f64 = decision.legs.iter().map(|l| l.size.abs()).sum();
    assert_relative_eq!(gross, 4.5, epsilon = 1e-9);
}

#[test]
fn test_shocked_book_rehedged_with_beta() {
    let put = OptionParams::new(150.0, 140.0, 30.0 / 365.0, 0.0, 0.9, OptionType::Put);
    let positions = vec![
        Position::spot("SOL", 100.0, Direction::Long),
        Position::option("SOL-140-P", "SOL", put, 50.0, Direction::Long).unwrap(),
    ];

    let shock = market_shock(&positions, -0.15).unwrap();
    // Long puts gain delta magnitude as spot falls
    assert!(shock.delta_change() < 0.0);

    let limits = GreekLimits {
        delta: Some(10.0),
        ..Default::default()
    };
    let warnings = limits.check(&shock.greeks_after);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].greek, Greek::Delta);

    let benchmark = [0.02, -0.01, 0.03, -0.02, 0.01];
    let sol: Vec<f64> = benchmark.iter().map(|r| 2.0 * r).collect();
    let sol_beta = beta(&sol, &benchmark).unwrap();

    let outcome = HedgeSizer::new()
        .evaluate(&HedgeRequest::PerpetualDeltaNeutral {
            asset: "SOL".to_string(),
            aggregate_delta: shock.greeks_after.delta,
            beta: sol_beta,
            risk_reduction: 1.0,
        })
        .unwrap();
    let size = outcome.decision().unwrap().leg_size("SOL-PERPETUAL").unwrap();
    assert_relative_eq!(size, -2.0 * shock.greeks_after.delta, epsilon = 1e-9);
}
