//! Portfolio positions

use crate::pricing::{OptionParams, PricingError};
use serde::{Deserialize, Serialize};

/// Long or short
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// +1 for long, -1 for short
    pub fn sign(self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        }
    }
}

/// Instrument class without contract details
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstrumentKind {
    Spot,
    Perpetual,
    Option,
}

/// Instrument class with the contract terms needed for risk
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PositionKind {
    Spot,
    Perpetual,
    Option(OptionParams),
}

impl PositionKind {
    pub fn instrument_kind(&self) -> InstrumentKind {
        match self {
            PositionKind::Spot => InstrumentKind::Spot,
            PositionKind::Perpetual => InstrumentKind::Perpetual,
            PositionKind::Option(_) => InstrumentKind::Option,
        }
    }
}

/// A holding in the portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Instrument identifier (e.g. "BTC-PERPETUAL")
    pub instrument: String,
    /// Underlying asset (e.g. "BTC")
    pub asset: String,
    /// Instrument class and contract terms
    pub kind: PositionKind,
    /// Unsigned quantity
    pub quantity: f64,
    /// Long or short
    pub direction: Direction,
}

impl Position {
    /// Spot holding
    pub fn spot(asset: impl Into<String>, quantity: f64, direction: Direction) -> Self {
        let asset = asset.into();
        Self {
            instrument: asset.clone(),
            asset,
            kind: PositionKind::Spot,
            quantity,
            direction,
        }
    }

    /// Perpetual swap holding
    pub fn perpetual(asset: impl Into<String>, quantity: f64, direction: Direction) -> Self {
        let asset = asset.into();
        Self {
            instrument: format!("{asset}-PERPETUAL"),
            asset,
            kind: PositionKind::Perpetual,
            quantity,
            direction,
        }
    }

    /// Option holding; the contract terms are validated here
    pub fn option(
        instrument: impl Into<String>,
        asset: impl Into<String>,
        params: OptionParams,
        quantity: f64,
        direction: Direction,
    ) -> Result<Self, PricingError> {
        params.validate()?;
        Ok(Self {
            instrument: instrument.into(),
            asset: asset.into(),
            kind: PositionKind::Option(params),
            quantity,
            direction,
        })
    }

    /// Quantity with the direction applied
    pub fn signed_size(&self) -> f64 {
        self.quantity * self.direction.sign()
    }
}
