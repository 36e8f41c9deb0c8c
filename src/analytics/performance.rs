//! Hedge performance attribution

use crate::execution::ExecutionRecord;
use crate::risk::mean_std;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Volatility of PnL before and after hedging
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskReduction {
    /// `(vol_before - vol_after) / vol_before * 100`, 0 when `vol_before` is 0
    pub risk_reduction_pct: f64,
    /// Mean hedged PnL minus mean unhedged PnL
    pub mean_benefit: f64,
    pub vol_before: f64,
    pub vol_after: f64,
}

/// Compare an unhedged PnL series with its hedged counterpart
pub fn risk_reduction(unhedged: &[f64], hedged: &[f64]) -> RiskReduction {
    let (mean_before, vol_before) = stats(unhedged);
    let (mean_after, vol_after) = stats(hedged);
    let risk_reduction_pct = if vol_before == 0.0 {
        0.0
    } else {
        100.0 * (vol_before - vol_after) / vol_before
    };

    RiskReduction {
        risk_reduction_pct,
        mean_benefit: mean_after - mean_before,
        vol_before,
        vol_after,
    }
}

fn stats(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        (0.0, 0.0)
    } else {
        mean_std(values)
    }
}

/// Sum of execution costs
pub fn total_hedging_cost(records: &[ExecutionRecord]) -> Decimal {
    records.iter().map(|r| r.cost).sum()
}

/// Hedge activity summary for reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HedgePerformance {
    pub hedge_count: usize,
    pub total_cost: Decimal,
    pub reduction: RiskReduction,
}

impl HedgePerformance {
    pub fn new(records: &[ExecutionRecord], unhedged: &[f64], hedged: &[f64]) -> Self {
        Self {
            hedge_count: records.len(),
            total_cost: total_hedging_cost(records),
            reduction: risk_reduction(unhedged, hedged),
        }
    }

    /// Format as table for CLI output
    pub fn format_table(&self) -> String {
        format!(
            r#"
HEDGE PERFORMANCE
───────────────────────────────────────────────────────
Hedge Count:      {}
Total Cost:       {:.2}
Risk Reduction:   {:.1}%
Mean Benefit:     {:.2}
Vol Before:       {:.2}
Vol After:        {:.2}
"#,
            self.hedge_count,
            self.total_cost,
            self.reduction.risk_reduction_pct,
            self.reduction.mean_benefit,
            self.reduction.vol_before,
            self.reduction.vol_after,
        )
    }
}
