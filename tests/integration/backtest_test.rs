//! Backtest determinism and file-driven runs

use chrono::{Duration, TimeZone, Utc};
use hedge_desk::backtest::{
    BacktestConfig, BacktestSimulator, DeltaNeutral, NoHedge, PriceSeries, StrategyKind,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::io::Write;

fn oscillating_series(steps: usize) -> PriceSeries {
    let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let prices: Vec<Decimal> = (0..steps)
        .map(|i| dec!(60000) + Decimal::from((i as i64 * 37) % 500) - dec!(250))
        .collect();
    PriceSeries::from_prices(start, Duration::minutes(5), &prices)
}

#[test]
fn test_repeated_runs_produce_identical_curves() {
    let series = oscillating_series(200);
    let simulator =
        BacktestSimulator::new(BacktestConfig::default().with_initial_position(dec!(1.25)));

    let first = simulator.run(&series, &mut DeltaNeutral::default()).unwrap();
    let second = simulator.run(&series, &mut DeltaNeutral::default()).unwrap();

    assert_eq!(first.equity_curve, second.equity_curve);
    assert_eq!(first.drawdown_curve, second.drawdown_curve);
    assert_eq!(first.exposure_curve, second.exposure_curve);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_hedging_reduces_drawdown_against_no_hedge() {
    let series = oscillating_series(200);
    let simulator =
        BacktestSimulator::new(BacktestConfig::default().with_initial_position(dec!(2)));

    let hedged = simulator.run(&series, &mut DeltaNeutral::default()).unwrap();
    let unhedged = simulator.run(&series, &mut NoHedge).unwrap();

    assert!(hedged.max_drawdown < unhedged.max_drawdown);
    assert!(hedged.var_95 <= unhedged.var_95);
    assert_eq!(hedged.final_position(), dec!(0));
    assert_eq!(unhedged.final_position(), dec!(2));
}

#[test]
fn test_configured_strategy_from_json_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[
            {{"timestamp": "2024-06-01T00:00:00Z", "price": "60000"}},
            {{"timestamp": "2024-06-01T00:05:00Z", "price": "59500"}},
            {{"timestamp": "2024-06-01T00:10:00Z", "price": "60200"}}
        ]"#
    )
    .unwrap();

    let series = PriceSeries::from_json_file(file.path()).unwrap();
    let mut strategy = StrategyKind::NoHedge.build();
    let result = BacktestSimulator::new(BacktestConfig::default().with_initial_position(dec!(-1)))
        .run(&series, strategy.as_mut())
        .unwrap();

    assert_eq!(result.strategy, "no_hedge");
    assert_eq!(result.equity_curve, vec![dec!(0), dec!(500), dec!(-200)]);
    assert_eq!(result.summary().steps, 3);
}
