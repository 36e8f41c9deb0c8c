//! Cross-asset correlation

use super::RiskError;
use nalgebra::DMatrix;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// Square correlation matrix labelled by asset
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    assets: Vec<String>,
    matrix: DMatrix<f64>,
}

impl CorrelationMatrix {
    /// Build from row-major values; `rows` must be `assets.len()` square
    pub fn new(assets: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self, RiskError> {
        let n = assets.len();
        if rows.len() != n || rows.iter().any(|row| row.len() != n) {
            return Err(RiskError::NotSquare { assets: n });
        }
        let matrix = DMatrix::from_row_iterator(n, n, rows.into_iter().flatten());
        Ok(Self { assets, matrix })
    }

    /// Asset labels in matrix order
    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    /// Correlation between two assets
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        Some(self.matrix[(i, j)])
    }

    /// Restrict to `assets` in the given order; `None` if any is unknown
    pub fn submatrix(&self, assets: &[&str]) -> Option<DMatrix<f64>> {
        let indices: Vec<usize> = assets
            .iter()
            .map(|a| self.index_of(a))
            .collect::<Option<_>>()?;
        let n = indices.len();
        Some(DMatrix::from_fn(n, n, |r, c| {
            self.matrix[(indices[r], indices[c])]
        }))
    }

    fn index_of(&self, asset: &str) -> Option<usize> {
        self.assets.iter().position(|a| a == asset)
    }
}

/// Pearson correlation of simple returns across assets.
///
/// Every series must have the same length. Pairs involving a series with no
/// return variance are NaN.
pub fn correlation_matrix(
    prices: &BTreeMap<String, Vec<f64>>,
) -> Result<CorrelationMatrix, RiskError> {
    let len = prices.values().next().map_or(0, Vec::len);
    if prices.values().any(|series| series.len() != len) {
        return Err(RiskError::LengthMismatch);
    }
    if len < 3 {
        return Err(RiskError::InsufficientData {
            needed: 3,
            got: len,
        });
    }

    let returns: Vec<Vec<f64>> = prices
        .values()
        .map(|series| series.windows(2).map(|w| w[1] / w[0] - 1.0).collect())
        .collect();
    let stds: Vec<f64> = returns.iter().map(|r| r.population_std_dev()).collect();

    let n = returns.len();
    let matrix = DMatrix::from_fn(n, n, |i, j| {
        let (std_i, std_j) = (stds[i], stds[j]);
        if std_i == 0.0 || std_j == 0.0 {
            return f64::NAN;
        }
        let covariance = returns[i].iter().population_covariance(returns[j].iter());
        (covariance / (std_i * std_j)).clamp(-1.0, 1.0)
    });

    Ok(CorrelationMatrix {
        assets: prices.keys().cloned().collect(),
        matrix,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn prices() -> BTreeMap<String, Vec<f64>> {
        let btc = vec![30000.0, 30300.0, 29900.0, 30500.0, 30100.0, 30800.0];
        // ETH moves proportionally with BTC
        let eth: Vec<f64> = btc.iter().map(|p| p / 15.0).collect();
        // SOL moves against BTC
        let sol = vec![20.0, 19.7, 20.4, 19.6, 20.3, 19.5];
        BTreeMap::from([
            ("BTC".to_string(), btc),
            ("ETH".to_string(), eth),
            ("SOL".to_string(), sol),
        ])
    }

    #[test]
    fn test_correlation_of_proportional_series_is_one() {
        let corr = correlation_matrix(&prices()).unwrap();
        assert_relative_eq!(corr.get("BTC", "ETH").unwrap(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(corr.get("BTC", "BTC").unwrap(), 1.0, epsilon = 1e-9);
        assert!(corr.get("BTC", "SOL").unwrap() < -0.5);
        assert_eq!(corr.assets(), ["BTC", "ETH", "SOL"]);
    }

    #[test]
    fn test_correlation_is_symmetric() {
        let corr = correlation_matrix(&prices()).unwrap();
        assert_eq!(corr.get("ETH", "SOL"), corr.get("SOL", "ETH"));
    }

    #[test]
    fn test_flat_series_gives_nan() {
        let mut p = prices();
        p.insert("USDT".to_string(), vec![1.0; 6]);
        let corr = correlation_matrix(&p).unwrap();
        assert!(corr.get("BTC", "USDT").unwrap().is_nan());
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let mut p = prices();
        p.get_mut("SOL").unwrap().pop();
        assert!(matches!(
            correlation_matrix(&p),
            Err(RiskError::LengthMismatch)
        ));
    }

    #[test]
    fn test_new_rejects_non_square() {
        let result = CorrelationMatrix::new(
            vec!["BTC".into(), "ETH".into()],
            vec![vec![1.0, 0.8], vec![0.8]],
        );
        assert!(matches!(result, Err(RiskError::NotSquare { assets: 2 })));
    }

    #[test]
    fn test_submatrix_reorders() {
        let corr = CorrelationMatrix::new(
            vec!["BTC".into(), "ETH".into(), "SOL".into()],
            vec![
                vec![1.0, 0.8, 0.3],
                vec![0.8, 1.0, 0.5],
                vec![0.3, 0.5, 1.0],
            ],
        )
        .unwrap();
        let sub = corr.submatrix(&["SOL", "BTC"]).unwrap();
        assert_eq!(sub[(0, 1)], 0.3);
        assert_eq!(sub[(1, 1)], 1.0);
        assert!(corr.submatrix(&["DOGE"]).is_none());
    }
}
