//! Configuration file parsing

use hedge_desk::backtest::{BacktestConfig, StrategyKind};
use hedge_desk::config::Config;
use hedge_desk::telemetry::LogFormat;
use rust_decimal_macros::dec;
use std::io::Write;

#[test]
fn test_config_example_loads() {
    let config = Config::load(concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml.example")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_partial_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
        [execution]
        order_book_depth_limit = 10

        [backtest]
        slippage_rate = 0.001
        strategy = "no_hedge"

        [telemetry]
        log_format = "json"
        "#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.backtest.strategy, StrategyKind::NoHedge);
    assert_eq!(config.telemetry.log_format, LogFormat::Json);
    assert_eq!(config.hedging, Default::default());

    let backtest = BacktestConfig::from_settings(&config.backtest, &config.execution);
    assert_eq!(backtest.depth_limit, 10);
    assert_eq!(backtest.slippage_rate, dec!(0.001));
    assert_eq!(backtest.fee_rate, dec!(0.0005));
}

#[test]
fn test_invalid_config_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[hedging]\nrisk_reduction_fraction = 2.0\n").unwrap();
    assert!(Config::load(file.path()).is_err());
}
