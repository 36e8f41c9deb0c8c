//! Absolute limits on aggregate Greeks

use super::PortfolioGreeks;
use crate::telemetry::{self, CounterMetric};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Portfolio sensitivity a limit applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Greek {
    Delta,
    Gamma,
    Vega,
    Theta,
}

impl Greek {
    pub fn as_str(&self) -> &'static str {
        match self {
            Greek::Delta => "delta",
            Greek::Gamma => "gamma",
            Greek::Vega => "vega",
            Greek::Theta => "theta",
        }
    }

    fn of(self, greeks: &PortfolioGreeks) -> f64 {
        match self {
            Greek::Delta => greeks.delta,
            Greek::Gamma => greeks.gamma,
            Greek::Vega => greeks.vega,
            Greek::Theta => greeks.theta,
        }
    }
}

impl fmt::Display for Greek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-Greek magnitude limits; `None` leaves a Greek unchecked
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GreekLimits {
    #[serde(default)]
    pub delta: Option<f64>,
    #[serde(default)]
    pub gamma: Option<f64>,
    #[serde(default)]
    pub vega: Option<f64>,
    #[serde(default)]
    pub theta: Option<f64>,
}

/// A Greek whose magnitude exceeds its limit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LimitWarning {
    pub greek: Greek,
    pub value: f64,
    pub limit: f64,
}

impl GreekLimits {
    pub fn limit(&self, greek: Greek) -> Option<f64> {
        match greek {
            Greek::Delta => self.delta,
            Greek::Gamma => self.gamma,
            Greek::Vega => self.vega,
            Greek::Theta => self.theta,
        }
    }

    /// Every configured Greek with `|value| > limit`, in delta, gamma, vega,
    /// theta order
    pub fn check(&self, greeks: &PortfolioGreeks) -> Vec<LimitWarning> {
        let warnings: Vec<LimitWarning> = [Greek::Delta, Greek::Gamma, Greek::Vega, Greek::Theta]
            .into_iter()
            .filter_map(|greek| {
                let limit = self.limit(greek)?;
                let value = greek.of(greeks);
                (value.abs() > limit).then_some(LimitWarning {
                    greek,
                    value,
                    limit,
                })
            })
            .collect();

        for warning in &warnings {
            telemetry::increment_counter(CounterMetric::LimitWarnings);
            tracing::warn!(
                greek = warning.greek.as_str(),
                value = warning.value,
                limit = warning.limit,
                "Greek limit exceeded"
            );
        }
        warnings
    }
}
