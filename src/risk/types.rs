//! Risk types

use crate::pricing::PricingError;
use thiserror::Error;

/// Risk aggregation errors
#[derive(Debug, Error)]
pub enum RiskError {
    /// An option position carries invalid contract terms
    #[error(transparent)]
    Pricing(#[from] PricingError),
    /// Not enough observations for the statistic
    #[error("Need at least {needed} observations, got {got}")]
    InsufficientData { needed: usize, got: usize },
    /// Prices must be finite and positive
    #[error("Invalid price in series: {0}")]
    InvalidPrice(f64),
    /// Confidence must lie strictly between 0 and 1
    #[error("Invalid confidence level: {0}")]
    InvalidConfidence(f64),
    /// Price series of different lengths
    #[error("Price series lengths differ")]
    LengthMismatch,
    /// Portfolio weights must be finite
    #[error("Invalid portfolio weight: {0}")]
    InvalidWeight(f64),
    /// Benchmark returns with no variance give no regression slope
    #[error("Benchmark returns have zero variance")]
    ZeroVariance,
    /// Shock must be finite and leave prices positive
    #[error("Price shock must be finite and above -1, got {0}")]
    InvalidShock(f64),
    /// Correlation rows do not form an n x n matrix
    #[error("Correlation matrix is not {assets}x{assets}")]
    NotSquare { assets: usize },
}
