//! Risk command implementation

use super::{print_json, read_json, OutputFormat};
use crate::config::RiskConfig;
use crate::risk::{
    exposure_by_asset, market_shock, MonitoringSession, PortfolioSnapshot, Position,
};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct RiskArgs {
    /// JSON array of positions
    #[arg(long)]
    pub positions: PathBuf,

    /// JSON array of historical prices for VaR
    #[arg(long)]
    pub prices: PathBuf,

    /// Override the configured VaR confidence
    #[arg(long)]
    pub confidence: Option<f64>,

    /// Also report Greeks after moving every underlying by this fraction (e.g. -0.2)
    #[arg(long, allow_hyphen_values = true)]
    pub shock: Option<f64>,

    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl RiskArgs {
    pub async fn execute(&self, config: &RiskConfig) -> anyhow::Result<()> {
        let positions: Vec<Position> = read_json(&self.positions)?;
        let prices: Vec<f64> = read_json(&self.prices)?;
        let confidence = self.confidence.unwrap_or(config.var_confidence);

        let by_asset = exposure_by_asset(&positions)?;
        let shock = self
            .shock
            .map(|change| market_shock(&positions, change))
            .transpose()?;
        let snapshot = PortfolioSnapshot::build(positions, &prices, confidence)?;

        let breaches: Vec<_> = by_asset
            .iter()
            .filter_map(|(asset, greeks)| {
                MonitoringSession::new(asset.as_str(), config.delta_threshold)
                    .check(*greeks)
                    .map(|breach| (asset.clone(), breach))
            })
            .collect();
        let warnings = config.limits.check(&snapshot.greeks);

        match self.format {
            OutputFormat::Json => print_json(&serde_json::json!({
                "greeks": snapshot.greeks,
                "value_at_risk": snapshot.value_at_risk,
                "by_asset": by_asset,
                "breaches": breaches,
                "limit_warnings": warnings,
                "shock": shock.as_ref().map(|s| serde_json::json!({
                    "price_change": s.price_change,
                    "greeks_after": s.greeks_after,
                })),
            }))?,
            OutputFormat::Table => {
                let g = snapshot.greeks;
                println!("Positions:  {}", snapshot.positions.len());
                println!("Delta:      {:.4}", g.delta);
                println!("Gamma:      {:.6}", g.gamma);
                println!("Vega:       {:.4}", g.vega);
                println!("Theta:      {:.4}", g.theta);
                println!("VaR ({:.0}%):  {:.2}", confidence * 100.0, snapshot.value_at_risk);
                for (asset, breach) in &breaches {
                    println!(
                        "ALERT {asset}: delta {:.4} above {:.4}, hedge {:+.4}",
                        breach.delta, breach.threshold, breach.recommended_hedge
                    );
                }
                for warning in &warnings {
                    println!(
                        "LIMIT {}: {:.4} exceeds {:.4}",
                        warning.greek, warning.value, warning.limit
                    );
                }
                if let Some(shock) = &shock {
                    let after = shock.greeks_after;
                    println!(
                        "Shock {:+.1}%: delta {:.4} ({:+.4}), gamma {:.6}, vega {:.4}",
                        shock.price_change * 100.0,
                        after.delta,
                        shock.delta_change(),
                        after.gamma,
                        after.vega
                    );
                }
            }
        }
        Ok(())
    }
}
