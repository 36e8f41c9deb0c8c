//! Correlation-aware multi-asset hedge allocation

use super::{HedgeDecision, HedgeError, HedgeLeg, HedgeStrategy};
use crate::risk::CorrelationMatrix;
use nalgebra::{DMatrix, DVector};
use std::collections::BTreeMap;

/// Smallest singular value, relative to the largest, below which the
/// correlation matrix is treated as singular
pub const SINGULAR_TOLERANCE: f64 = 1e-10;

/// Inputs for a multi-asset allocation
#[derive(Debug, Clone)]
pub struct MultiAssetRequest {
    /// Delta exposure per asset
    pub exposures: BTreeMap<String, f64>,
    pub correlation: CorrelationMatrix,
}

/// Spread the hedge across assets using the inverse correlation matrix.
///
/// Weights are `-pinv(C) * e`, rescaled so their absolute sum equals the
/// absolute sum of the exposures. When the matrix cannot be used the naive
/// per-asset hedge `-e` is returned with `degraded` set.
pub fn multi_asset_allocation(request: &MultiAssetRequest) -> Result<HedgeDecision, HedgeError> {
    if request.exposures.is_empty() {
        return Err(HedgeError::EmptyExposure);
    }

    let assets: Vec<&str> = request.exposures.keys().map(String::as_str).collect();
    let exposure = DVector::from_iterator(assets.len(), request.exposures.values().copied());

    let (weights, degraded) = match correlated_weights(&request.correlation, &assets, &exposure) {
        Ok(weights) => (weights, false),
        Err(reason) => {
            tracing::warn!(
                %reason,
                assets = ?assets,
                "Correlation allocation unavailable, using per-asset hedge"
            );
            (-exposure.clone(), true)
        }
    };

    let legs = assets
        .iter()
        .zip(weights.iter())
        .map(|(asset, weight)| HedgeLeg::new(format!("{asset}-PERPETUAL"), *weight))
        .collect();

    Ok(HedgeDecision {
        strategy: HedgeStrategy::MultiAssetAllocation,
        legs,
        exposure: request.exposures.clone(),
        degraded,
    })
}

fn correlated_weights(
    correlation: &CorrelationMatrix,
    assets: &[&str],
    exposure: &DVector<f64>,
) -> Result<DVector<f64>, &'static str> {
    let matrix = correlation
        .submatrix(assets)
        .ok_or("asset missing from correlation matrix")?;
    if matrix.iter().any(|v| !v.is_finite()) {
        return Err("correlation matrix has non-finite entries");
    }
    if is_singular(&matrix) {
        return Err("correlation matrix is singular");
    }

    let inverse = matrix.pseudo_inverse(SINGULAR_TOLERANCE)?;
    let mut weights = -(inverse * exposure);

    let weight_total = weights.iter().map(|w| w.abs()).sum::<f64>();
    let exposure_total = exposure.iter().map(|e| e.abs()).sum::<f64>();
    if weight_total > 0.0 {
        weights *= exposure_total / weight_total;
    }
    Ok(weights)
}

fn is_singular(matrix: &DMatrix<f64>) -> bool {
    let singular_values = matrix.clone().svd(false, false).singular_values;
    let largest = singular_values.max();
    let smallest = singular_values.min();
    largest <= 0.0 || smallest <= largest * SINGULAR_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_asset(rho: f64) -> CorrelationMatrix {
        CorrelationMatrix::new(
            vec!["BTC".into(), "ETH".into()],
            vec![vec![1.0, rho], vec![rho, 1.0]],
        )
        .unwrap()
    }

    fn request(exposures: &[(&str, f64)], correlation: CorrelationMatrix) -> MultiAssetRequest {
        MultiAssetRequest {
            exposures: exposures
                .iter()
                .map(|(a, e)| (a.to_string(), *e))
                .collect(),
            correlation,
        }
    }

    #[test]
    fn test_opposite_exposures_with_high_correlation() {
        let decision =
            multi_asset_allocation(&request(&[("BTC", 0.5), ("ETH", -0.5)], two_asset(0.8)))
                .unwrap();

        let btc = decision.leg_size("BTC-PERPETUAL").unwrap();
        let eth = decision.leg_size("ETH-PERPETUAL").unwrap();
        assert_relative_eq!(btc, -0.5, epsilon = 1e-9);
        assert_relative_eq!(eth, 0.5, epsilon = 1e-9);
        assert_relative_eq!(btc.abs() + eth.abs(), 1.0, epsilon = 1e-9);
        assert!(!decision.degraded);
    }

    #[test]
    fn test_total_notional_preserved() {
        let decision =
            multi_asset_allocation(&request(&[("BTC", 2.0), ("ETH", 1.0)], two_asset(0.3)))
                .unwrap();
        let total: f64 = decision.legs.iter().map(|l| l.size.abs()).sum();
        assert_relative_eq!(total, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_identity_correlation_is_naive_hedge() {
        let decision =
            multi_asset_allocation(&request(&[("BTC", 1.5), ("ETH", -0.5)], two_asset(0.0)))
                .unwrap();
        assert_relative_eq!(decision.leg_size("BTC-PERPETUAL").unwrap(), -1.5, epsilon = 1e-9);
        assert_relative_eq!(decision.leg_size("ETH-PERPETUAL").unwrap(), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_singular_matrix_falls_back() {
        let decision =
            multi_asset_allocation(&request(&[("BTC", 0.7), ("ETH", -0.2)], two_asset(1.0)))
                .unwrap();
        assert!(decision.degraded);
        assert_eq!(decision.leg_size("BTC-PERPETUAL"), Some(-0.7));
        assert_eq!(decision.leg_size("ETH-PERPETUAL"), Some(0.2));
    }

    #[test]
    fn test_missing_asset_falls_back() {
        let decision = multi_asset_allocation(&request(
            &[("BTC", 1.0), ("SOL", 3.0)],
            two_asset(0.5),
        ))
        .unwrap();
        assert!(decision.degraded);
        assert_eq!(decision.leg_size("SOL-PERPETUAL"), Some(-3.0));
    }

    #[test]
    fn test_nan_correlation_falls_back() {
        let decision =
            multi_asset_allocation(&request(&[("BTC", 1.0), ("ETH", 1.0)], two_asset(f64::NAN)))
                .unwrap();
        assert!(decision.degraded);
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let req = request(&[("BTC", 0.7), ("ETH", -0.2)], two_asset(1.0));
        assert_eq!(
            multi_asset_allocation(&req).unwrap(),
            multi_asset_allocation(&req).unwrap()
        );
    }

    #[test]
    fn test_single_asset_subset_of_larger_matrix() {
        let decision = multi_asset_allocation(&request(&[("ETH", 2.0)], two_asset(0.8))).unwrap();
        assert!(!decision.degraded);
        assert_relative_eq!(decision.leg_size("ETH-PERPETUAL").unwrap(), -2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_exposure() {
        let err = multi_asset_allocation(&request(&[], two_asset(0.5))).unwrap_err();
        assert_eq!(err, HedgeError::EmptyExposure);
    }
}
