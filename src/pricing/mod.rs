//! Option pricing module
//!
//! Closed-form Black-Scholes price and Greeks for European options

mod black_scholes;

pub use black_scholes::{delta, gamma, price, theta, vega, Greeks};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Call or put
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

/// Pricing errors
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// An input lies outside the model's domain
    #[error("Invalid option parameter {parameter}={value}")]
    Domain { parameter: &'static str, value: f64 },
}

/// Inputs to the Black-Scholes formulas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionParams {
    /// Underlying price
    pub spot: f64,
    /// Strike price
    pub strike: f64,
    /// Time to expiry as a year fraction
    pub time_to_expiry: f64,
    /// Annualized risk-free rate
    pub rate: f64,
    /// Annualized implied volatility
    pub volatility: f64,
    /// Call or put
    pub option_type: OptionType,
}

impl OptionParams {
    /// Create option parameters without validating them
    pub fn new(
        spot: f64,
        strike: f64,
        time_to_expiry: f64,
        rate: f64,
        volatility: f64,
        option_type: OptionType,
    ) -> Self {
        Self {
            spot,
            strike,
            time_to_expiry,
            rate,
            volatility,
            option_type,
        }
    }

    /// Same contract with the other option type
    pub fn with_type(mut self, option_type: OptionType) -> Self {
        self.option_type = option_type;
        self
    }

    /// Check S>0, K>0, T>0, sigma>0 and a finite rate
    pub fn validate(&self) -> Result<(), PricingError> {
        let positive = [
            ("spot", self.spot),
            ("strike", self.strike),
            ("time_to_expiry", self.time_to_expiry),
            ("volatility", self.volatility),
        ];
        for (parameter, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(PricingError::Domain { parameter, value });
            }
        }
        if !self.rate.is_finite() {
            return Err(PricingError::Domain {
                parameter: "rate",
                value: self.rate,
            });
        }
        Ok(())
    }

    /// d1 and d2; callers must validate first
    pub(crate) fn d1_d2(&self) -> (f64, f64) {
        let sigma_sqrt_t = self.volatility * self.time_to_expiry.sqrt();
        let d1 = ((self.spot / self.strike).ln()
            + (self.rate + 0.5 * self.volatility * self.volatility) * self.time_to_expiry)
            / sigma_sqrt_t;
        (d1, d1 - sigma_sqrt_t)
    }
}
