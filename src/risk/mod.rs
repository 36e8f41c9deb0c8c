//! Risk management module
//!
//! Portfolio Greek aggregation, parametric and weighted historical VaR,
//! correlation, beta, stress shocks, drawdown tracking, Greek limits and
//! per-session threshold monitoring

mod aggregate;
mod correlation;
mod drawdown;
mod limits;
mod position;
mod session;
mod stress;
mod types;
mod var;

pub use aggregate::{aggregate, exposure_by_asset, PortfolioGreeks, PortfolioSnapshot};
pub use correlation::{correlation_matrix, CorrelationMatrix};
pub use drawdown::{max_drawdown_pct, DrawdownTracker};
pub use limits::{Greek, GreekLimits, LimitWarning};
pub use position::{Direction, InstrumentKind, Position, PositionKind};
pub use session::{MonitoringSession, ThresholdBreach};
pub use stress::{beta, market_shock, portfolio_var, ShockResult};
pub use types::RiskError;
pub use var::value_at_risk;

pub(crate) use var::mean_std;
