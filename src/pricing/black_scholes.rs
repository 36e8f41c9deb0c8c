//! Black-Scholes pricing
//!
//! d1 = (ln(S/K) + (r + sigma^2/2)T) / (sigma*sqrt(T)), d2 = d1 - sigma*sqrt(T)
//!
//! Each function validates its inputs and can be called on its own.

use super::{OptionParams, OptionType, PricingError};
use serde::{Deserialize, Serialize};
use statrs::function::erf::erfc;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// Days used to turn annual theta into daily decay
const DAYS_PER_YEAR: f64 = 365.0;

/// Standard normal CDF
pub(crate) fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x * FRAC_1_SQRT_2)
}

/// Standard normal PDF
pub(crate) fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Option premium
pub fn price(params: &OptionParams) -> Result<f64, PricingError> {
    params.validate()?;
    let (d1, d2) = params.d1_d2();
    let discounted_strike = params.strike * (-params.rate * params.time_to_expiry).exp();

    Ok(match params.option_type {
        OptionType::Call => params.spot * norm_cdf(d1) - discounted_strike * norm_cdf(d2),
        OptionType::Put => discounted_strike * norm_cdf(-d2) - params.spot * norm_cdf(-d1),
    })
}

/// dV/dS
pub fn delta(params: &OptionParams) -> Result<f64, PricingError> {
    params.validate()?;
    let (d1, _) = params.d1_d2();

    Ok(match params.option_type {
        OptionType::Call => norm_cdf(d1),
        OptionType::Put => norm_cdf(d1) - 1.0,
    })
}

/// d2V/dS2, identical for calls and puts
pub fn gamma(params: &OptionParams) -> Result<f64, PricingError> {
    params.validate()?;
    let (d1, _) = params.d1_d2();
    Ok(norm_pdf(d1) / (params.spot * params.volatility * params.time_to_expiry.sqrt()))
}

/// dV/dsigma per one volatility point, identical for calls and puts
pub fn vega(params: &OptionParams) -> Result<f64, PricingError> {
    params.validate()?;
    let (d1, _) = params.d1_d2();
    Ok(params.spot * norm_pdf(d1) * params.time_to_expiry.sqrt() / 100.0)
}

/// Daily time decay
pub fn theta(params: &OptionParams) -> Result<f64, PricingError> {
    params.validate()?;
    let (d1, d2) = params.d1_d2();
    let sqrt_t = params.time_to_expiry.sqrt();
    let decay = -params.spot * norm_pdf(d1) * params.volatility / (2.0 * sqrt_t);
    let carry = params.rate * params.strike * (-params.rate * params.time_to_expiry).exp();

    let annual = match params.option_type {
        OptionType::Call => decay - carry * norm_cdf(d2),
        OptionType::Put => decay + carry * norm_cdf(-d2),
    };
    Ok(annual / DAYS_PER_YEAR)
}

/// Price and first-order Greeks of one option unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    pub price: f64,
    pub delta: f64,
    pub gamma: f64,
    /// Per 1% volatility move
    pub vega: f64,
    /// Per calendar day
    pub theta: f64,
}

impl Greeks {
    /// Compute everything in one pass
    pub fn calculate(params: &OptionParams) -> Result<Self, PricingError> {
        Ok(Self {
            price: price(params)?,
            delta: delta(params)?,
            gamma: gamma(params)?,
            vega: vega(params)?,
            theta: theta(params)?,
        })
    }
}
