//! Drawdown tracking

use rust_decimal::Decimal;

/// Tracks running peak equity and the drop from it
#[derive(Debug, Clone)]
pub struct DrawdownTracker {
    /// Peak equity value
    pub peak_equity: Decimal,
    /// Current equity value
    pub current_equity: Decimal,
    /// Largest absolute drawdown seen
    pub max_drawdown: Decimal,
}

impl DrawdownTracker {
    /// Create a tracker whose peak starts at `initial_equity`
    pub fn new(initial_equity: Decimal) -> Self {
        Self {
            peak_equity: initial_equity,
            current_equity: initial_equity,
            max_drawdown: Decimal::ZERO,
        }
    }

    /// Record a new equity value and return the current drawdown
    pub fn update(&mut self, new_equity: Decimal) -> Decimal {
        self.current_equity = new_equity;
        if new_equity > self.peak_equity {
            self.peak_equity = new_equity;
        }
        let drawdown = self.current_drawdown();
        if drawdown > self.max_drawdown {
            self.max_drawdown = drawdown;
        }
        drawdown
    }

    /// Absolute drop from peak
    pub fn current_drawdown(&self) -> Decimal {
        self.peak_equity - self.current_equity
    }

    /// Drop from peak as a fraction of the peak; 0 when the peak is not positive
    pub fn current_drawdown_pct(&self) -> Decimal {
        if self.peak_equity <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.current_drawdown() / self.peak_equity
    }
}

/// Largest peak-to-trough fall of a positive series, as a fraction of the peak
pub fn max_drawdown_pct(series: &[f64]) -> f64 {
    let mut peak = f64::MIN;
    let mut worst = 0.0_f64;
    for &value in series {
        peak = peak.max(value);
        if peak > 0.0 {
            worst = worst.max((peak - value) / peak);
        }
    }
    worst
}
