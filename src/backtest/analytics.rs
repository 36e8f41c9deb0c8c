//! Backtest results and reporting

use super::HedgeAction;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Cost charged for one executed hedge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HedgeCostEntry {
    pub step: usize,
    pub timestamp: DateTime<Utc>,
    /// Signed quantity actually traded
    pub size: Decimal,
    pub price: Decimal,
    pub cost: Decimal,
}

/// Complete backtest results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub strategy: String,
    pub timestamps: Vec<DateTime<Utc>>,
    pub equity_curve: Vec<Decimal>,
    pub drawdown_curve: Vec<Decimal>,
    /// Position held after each step
    pub exposure_curve: Vec<Decimal>,
    pub hedge_costs: Vec<HedgeCostEntry>,
    /// Strategy output at every step
    pub actions: Vec<HedgeAction>,
    /// Empirical 95% VaR of step PnL, as a non-negative loss
    pub var_95: Decimal,
    pub final_pnl: Decimal,
    pub max_drawdown: Decimal,
}

impl BacktestResult {
    pub fn total_hedge_cost(&self) -> Decimal {
        self.hedge_costs.iter().map(|c| c.cost).sum()
    }

    pub fn final_position(&self) -> Decimal {
        self.exposure_curve.last().copied().unwrap_or_default()
    }

    pub fn summary(&self) -> BacktestSummary {
        BacktestSummary {
            strategy: self.strategy.clone(),
            steps: self.equity_curve.len(),
            final_pnl: self.final_pnl,
            total_hedge_cost: self.total_hedge_cost(),
            hedge_count: self.hedge_costs.len(),
            max_drawdown: self.max_drawdown,
            var_95: self.var_95,
            final_position: self.final_position(),
        }
    }
}

/// Loss at the 5th percentile of equity first-differences, floored at 0.
///
/// Percentile uses linear interpolation between closest ranks.
pub fn empirical_var(equity: &[Decimal]) -> Decimal {
    let mut changes: Vec<Decimal> = equity.windows(2).map(|w| w[1] - w[0]).collect();
    if changes.is_empty() {
        return Decimal::ZERO;
    }
    changes.sort();

    let rank = dec!(0.05) * Decimal::from(changes.len() - 1);
    let lower = rank.floor();
    let fraction = rank - lower;
    let lower_idx = lower.to_usize().unwrap_or(0);
    let upper_idx = (lower_idx + 1).min(changes.len() - 1);
    let percentile = changes[lower_idx] + (changes[upper_idx] - changes[lower_idx]) * fraction;

    (-percentile).max(Decimal::ZERO)
}

/// Summary statistics from backtest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacktestSummary {
    pub strategy: String,
    pub steps: usize,
    pub final_pnl: Decimal,
    pub total_hedge_cost: Decimal,
    pub hedge_count: usize,
    /// Maximum drawdown (absolute)
    pub max_drawdown: Decimal,
    pub var_95: Decimal,
    pub final_position: Decimal,
}

impl BacktestSummary {
    /// Format as table for CLI output
    pub fn format_table(&self) -> String {
        format!(
            r#"
══════════════════════════════════════════════════════
               BACKTEST RESULTS: {}
══════════════════════════════════════════════════════

PERFORMANCE
───────────────────────────────────────────────────────
Final P&L:        {:+.2}
Max Drawdown:     {:.2}
VaR (95%):        {:.2}

ACTIVITY
───────────────────────────────────────────────────────
Steps:            {}
Hedges:           {}
Hedge Cost:       {:.2}
Final Position:   {}
══════════════════════════════════════════════════════
"#,
            self.strategy,
            self.final_pnl,
            self.max_drawdown,
            self.var_95,
            self.steps,
            self.hedge_count,
            self.total_hedge_cost,
            self.final_position,
        )
    }
}
