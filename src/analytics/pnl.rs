//! Position and portfolio PnL

use crate::risk::{Direction, InstrumentKind};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A position marked against its entry price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnlPosition {
    pub instrument: String,
    pub kind: InstrumentKind,
    pub entry_price: Decimal,
    pub current_price: Decimal,
    pub size: Decimal,
    pub direction: Direction,
}

/// PnL split between the spot book and its hedges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioPnl {
    pub spot: Decimal,
    pub hedge: Decimal,
    pub total: Decimal,
    /// Hedge PnL as a percentage of total PnL
    pub effectiveness: Decimal,
}

/// PnL of one position
pub fn position_pnl(
    entry_price: Decimal,
    current_price: Decimal,
    size: Decimal,
    direction: Direction,
) -> Decimal {
    match direction {
        Direction::Long => (current_price - entry_price) * size,
        Direction::Short => (entry_price - current_price) * size,
    }
}

/// `hedge / (spot + hedge) * 100`.
///
/// Returns 0 when total PnL is exactly zero. Read that as undefined, not as
/// "the hedge did nothing".
pub fn hedge_effectiveness_ratio(spot_pnl: Decimal, hedge_pnl: Decimal) -> Decimal {
    let total = spot_pnl + hedge_pnl;
    if total.is_zero() {
        return Decimal::ZERO;
    }
    hedge_pnl / total * Decimal::ONE_HUNDRED
}

/// Split PnL into spot and hedge legs. Perpetuals and options count as hedges.
pub fn portfolio_pnl(positions: &[PnlPosition]) -> PortfolioPnl {
    let (spot, hedge) = positions.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(spot, hedge), p| {
            let pnl = position_pnl(p.entry_price, p.current_price, p.size, p.direction);
            match p.kind {
                InstrumentKind::Spot => (spot + pnl, hedge),
                InstrumentKind::Perpetual | InstrumentKind::Option => (spot, hedge + pnl),
            }
        },
    );

    PortfolioPnl {
        spot,
        hedge,
        total: spot + hedge,
        effectiveness: hedge_effectiveness_ratio(spot, hedge),
    }
}
