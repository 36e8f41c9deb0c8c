//! Parametric Value-at-Risk

use super::RiskError;
use statrs::distribution::{ContinuousCDF, Normal};
use statrs::statistics::Statistics;

/// Mean and population standard deviation
pub(crate) fn mean_std(values: &[f64]) -> (f64, f64) {
    (values.mean(), values.population_std_dev())
}

/// Normal-distribution VaR of a price series, in price units.
///
/// Fits a normal distribution to the log returns and scales the
/// `(1 - confidence)` quantile by the mean price. Always non-negative.
pub fn value_at_risk(prices: &[f64], confidence: f64) -> Result<f64, RiskError> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(RiskError::InvalidConfidence(confidence));
    }
    if prices.len() < 2 {
        return Err(RiskError::InsufficientData {
            needed: 2,
            got: prices.len(),
        });
    }
    if let Some(&bad) = prices.iter().find(|p| !p.is_finite() || **p <= 0.0) {
        return Err(RiskError::InvalidPrice(bad));
    }

    let returns: Vec<f64> = prices.windows(2).map(|w| (w[1] / w[0]).ln()).collect();
    let (mean, std) = mean_std(&returns);
    let mean_price = prices.mean();

    // A flat return series has no spread; its quantile is the mean itself
    let quantile = if std > 0.0 {
        Normal::new(mean, std)
            .map(|dist| dist.inverse_cdf(1.0 - confidence))
            .unwrap_or(mean)
    } else {
        mean
    };

    Ok((quantile * mean_price).abs())
}
