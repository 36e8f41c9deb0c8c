//! Per-session risk monitoring context
//!
//! Each monitoring loop owns one `MonitoringSession`; sessions share nothing,
//! so independent symbols can be watched concurrently.

use super::PortfolioGreeks;
use crate::telemetry::{self, CounterMetric};
use serde::{Deserialize, Serialize};

/// Delta limit breach with the hedge that brings delta back to the limit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdBreach {
    pub delta: f64,
    pub threshold: f64,
    /// Signed hedge size: `threshold - delta`
    pub recommended_hedge: f64,
}

/// Monitoring state for one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitoringSession {
    pub asset: String,
    pub delta_threshold: f64,
    pub active: bool,
    /// Waiting for the operator to supply a new threshold
    pub awaiting_threshold: bool,
    /// Last portfolio Greeks seen by `check`
    pub last_exposure: Option<PortfolioGreeks>,
}

impl MonitoringSession {
    /// Start monitoring `asset` against a delta threshold
    pub fn new(asset: impl Into<String>, delta_threshold: f64) -> Self {
        Self {
            asset: asset.into(),
            delta_threshold,
            active: true,
            awaiting_threshold: false,
            last_exposure: None,
        }
    }

    /// Record the latest exposure and report a breach when delta exceeds the threshold
    pub fn check(&mut self, greeks: PortfolioGreeks) -> Option<ThresholdBreach> {
        self.last_exposure = Some(greeks);
        if !self.active || greeks.delta <= self.delta_threshold {
            return None;
        }

        let breach = ThresholdBreach {
            delta: greeks.delta,
            threshold: self.delta_threshold,
            recommended_hedge: -greeks.delta + self.delta_threshold,
        };
        telemetry::increment_counter(CounterMetric::ThresholdBreaches);
        tracing::warn!(
            asset = %self.asset,
            delta = breach.delta,
            threshold = breach.threshold,
            recommended_hedge = breach.recommended_hedge,
            "Delta threshold breached"
        );
        Some(breach)
    }

    /// Ask for a new threshold; `check` keeps using the old one until it arrives
    pub fn request_threshold_change(&mut self) {
        self.awaiting_threshold = true;
    }

    /// Apply a new threshold
    pub fn set_threshold(&mut self, delta_threshold: f64) {
        self.delta_threshold = delta_threshold;
        self.awaiting_threshold = false;
    }

    pub fn stop(&mut self) {
        self.active = false;
    }
}
