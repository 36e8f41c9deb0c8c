//! Post-trade analytics
//!
//! Two distinct effectiveness measures:
//! - `hedge_effectiveness_ratio`: hedge PnL as a percentage of total PnL
//! - `risk_reduction`: drop in PnL volatility once hedged

mod performance;
mod pnl;

pub use performance::{risk_reduction, total_hedging_cost, HedgePerformance, RiskReduction};
pub use pnl::{hedge_effectiveness_ratio, portfolio_pnl, position_pnl, PnlPosition, PortfolioPnl};
