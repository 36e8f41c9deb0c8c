//! Prometheus metrics

use std::time::Duration;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// Venue order book fetch, including retries
    MarketDataFetch,
    /// Full backtest run
    BacktestRun,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Aggregate portfolio delta
    PortfolioDelta,
    /// Aggregate portfolio gamma
    PortfolioGamma,
    /// Aggregate portfolio vega
    PortfolioVega,
    /// Parametric VaR of the latest snapshot
    PortfolioVar,
    /// Slippage of the last recorded execution
    LastSlippageBps,
    /// Final PnL of the last backtest
    BacktestFinalPnl,
    /// Empirical VaR of the last backtest
    BacktestVar95,
}

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Hedge decisions produced
    HedgeDecisions,
    /// Execution records written
    ExecutionsRecorded,
    /// Delta threshold breaches seen by monitoring sessions
    ThresholdBreaches,
    /// Greeks found above their configured limit
    LimitWarnings,
    /// Completed backtests
    BacktestRuns,
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let metric_name = match metric {
        LatencyMetric::MarketDataFetch => "hedgedesk_market_data_fetch_ms",
        LatencyMetric::BacktestRun => "hedgedesk_backtest_run_ms",
    };

    metrics::histogram!(metric_name).record(duration.as_secs_f64() * 1000.0);
    tracing::trace!(
        metric = metric_name,
        value_ms = duration.as_millis(),
        "Recording latency"
    );
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    let metric_name = match metric {
        GaugeMetric::PortfolioDelta => "hedgedesk_portfolio_delta",
        GaugeMetric::PortfolioGamma => "hedgedesk_portfolio_gamma",
        GaugeMetric::PortfolioVega => "hedgedesk_portfolio_vega",
        GaugeMetric::PortfolioVar => "hedgedesk_portfolio_var",
        GaugeMetric::LastSlippageBps => "hedgedesk_last_slippage_bps",
        GaugeMetric::BacktestFinalPnl => "hedgedesk_backtest_final_pnl",
        GaugeMetric::BacktestVar95 => "hedgedesk_backtest_var_95",
    };

    metrics::gauge!(metric_name).set(value);
    tracing::trace!(metric = metric_name, value = value, "Setting gauge");
}

/// Increment a counter by one
pub fn increment_counter(metric: CounterMetric) {
    let metric_name = match metric {
        CounterMetric::HedgeDecisions => "hedgedesk_hedge_decisions_total",
        CounterMetric::ExecutionsRecorded => "hedgedesk_executions_recorded_total",
        CounterMetric::ThresholdBreaches => "hedgedesk_threshold_breaches_total",
        CounterMetric::LimitWarnings => "hedgedesk_limit_warnings_total",
        CounterMetric::BacktestRuns => "hedgedesk_backtest_runs_total",
    };

    metrics::counter!(metric_name).increment(1);
}
