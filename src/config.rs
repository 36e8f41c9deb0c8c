//! Configuration types for hedge-desk
//!
//! Every field has a default, so an empty file is a valid configuration.

use crate::backtest::StrategyKind;
use crate::feed::RetryPolicy;
use crate::risk::{Greek, GreekLimits};
use crate::telemetry::LogFormat;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub hedging: HedgingConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub backtest: BacktestSettings,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Risk aggregation and monitoring configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RiskConfig {
    /// Confidence level for parametric VaR
    #[serde(default = "default_var_confidence")]
    pub var_confidence: f64,

    /// Portfolio delta above which a monitoring session alerts
    #[serde(default = "default_delta_threshold")]
    pub delta_threshold: f64,

    /// Magnitude limits on aggregate Greeks
    #[serde(default)]
    pub limits: GreekLimits,
}

fn default_var_confidence() -> f64 {
    0.95
}
fn default_delta_threshold() -> f64 {
    0.1
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            var_confidence: default_var_confidence(),
            delta_threshold: default_delta_threshold(),
            limits: GreekLimits::default(),
        }
    }
}

/// Hedge sizing configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HedgingConfig {
    /// Fraction of delta to remove, in [0, 1]
    #[serde(default = "default_risk_reduction")]
    pub risk_reduction_fraction: f64,

    /// Pick options by delta efficiency and cost instead of nearest-the-money
    #[serde(default)]
    pub dynamic_option_optimization: bool,

    /// Per-contract delta sought by dynamic optimization
    #[serde(default = "default_target_option_delta")]
    pub target_option_delta: f64,

    /// Options expiring further out than this are ignored; at most
    /// `MAX_WINDOW_DAYS`
    #[serde(default = "default_window_days")]
    pub hedge_moneyness_window_days: i64,
}

fn default_risk_reduction() -> f64 {
    1.0
}
fn default_target_option_delta() -> f64 {
    -0.5
}
fn default_window_days() -> i64 {
    14
}

/// Upper bound accepted for `hedge_moneyness_window_days`
pub const MAX_WINDOW_DAYS: i64 = 3650;

impl Default for HedgingConfig {
    fn default() -> Self {
        Self {
            risk_reduction_fraction: default_risk_reduction(),
            dynamic_option_optimization: false,
            target_option_delta: default_target_option_delta(),
            hedge_moneyness_window_days: default_window_days(),
        }
    }
}

impl HedgingConfig {
    pub fn expiry_window(&self) -> chrono::Duration {
        chrono::Duration::try_days(self.hedge_moneyness_window_days)
            .unwrap_or(chrono::Duration::MAX)
    }
}

/// Execution cost model configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExecutionConfig {
    /// Taker fee as a fraction of notional
    #[serde(default = "default_fee_rate")]
    pub fee_rate: Decimal,

    /// Maximum book levels consumed per estimate
    #[serde(default = "default_depth_limit")]
    pub order_book_depth_limit: usize,

    /// Venues queried for routing, in tie-break order
    #[serde(default = "default_venues")]
    pub venues: Vec<String>,

    /// Record simulated fills immediately instead of leaving them pending
    #[serde(default)]
    pub auto_execute: bool,
}

fn default_fee_rate() -> Decimal {
    Decimal::new(5, 4) // 0.0005
}
fn default_depth_limit() -> usize {
    5
}
fn default_venues() -> Vec<String> {
    vec!["okx".to_string(), "bybit".to_string(), "deribit".to_string()]
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            fee_rate: default_fee_rate(),
            order_book_depth_limit: default_depth_limit(),
            venues: default_venues(),
            auto_execute: false,
        }
    }
}

/// Backtest defaults
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BacktestSettings {
    /// Fee charged by the simplified cost model
    #[serde(default = "default_fee_rate")]
    pub fee_rate: Decimal,

    /// Slippage charged by the simplified cost model
    #[serde(default = "default_slippage_rate")]
    pub slippage_rate: Decimal,

    /// Strategy run when the CLI does not name one
    #[serde(default)]
    pub strategy: StrategyKind,
}

fn default_slippage_rate() -> Decimal {
    Decimal::new(2, 4) // 0.0002
}

impl Default for BacktestSettings {
    fn default() -> Self {
        Self {
            fee_rate: default_fee_rate(),
            slippage_rate: default_slippage_rate(),
            strategy: StrategyKind::default(),
        }
    }
}

/// Market data collaborator configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FeedConfig {
    /// Attempts per fetch
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Fixed delay between attempts
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_retry_attempts() -> u32 {
    3
}
fn default_retry_delay_ms() -> u64 {
    1000
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl FeedConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_attempts, Duration::from_millis(self.retry_delay_ms))
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TelemetryConfig {
    /// Prometheus listener port; no exporter when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            metrics_port: None,
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        let confidence = self.risk.var_confidence;
        if !(confidence > 0.0 && confidence < 1.0) {
            anyhow::bail!("risk.var_confidence must be within (0, 1), got {confidence}");
        }
        let limits = self.risk.limits;
        for greek in [Greek::Delta, Greek::Gamma, Greek::Vega, Greek::Theta] {
            if let Some(limit) = limits.limit(greek) {
                if !(limit.is_finite() && limit >= 0.0) {
                    anyhow::bail!(
                        "risk.limits.{greek} must be finite and non-negative, got {limit}"
                    );
                }
            }
        }
        let fraction = self.hedging.risk_reduction_fraction;
        if !(0.0..=1.0).contains(&fraction) {
            anyhow::bail!("hedging.risk_reduction_fraction must be within [0, 1], got {fraction}");
        }
        let window = self.hedging.hedge_moneyness_window_days;
        if !(1..=MAX_WINDOW_DAYS).contains(&window) {
            anyhow::bail!(
                "hedging.hedge_moneyness_window_days must be within [1, {}], got {}",
                MAX_WINDOW_DAYS,
                window
            );
        }
        if self.execution.order_book_depth_limit == 0 {
            anyhow::bail!("execution.order_book_depth_limit must be at least 1");
        }
        if self.execution.fee_rate < Decimal::ZERO {
            anyhow::bail!("execution.fee_rate must not be negative");
        }
        Ok(())
    }
}
