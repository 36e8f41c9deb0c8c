//! Greeks command implementation

use super::{print_json, OutputFormat};
use crate::pricing::{Greeks, OptionParams, OptionType};
use clap::{Args, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OptionKindArg {
    Call,
    Put,
}

impl From<OptionKindArg> for OptionType {
    fn from(kind: OptionKindArg) -> Self {
        match kind {
            OptionKindArg::Call => OptionType::Call,
            OptionKindArg::Put => OptionType::Put,
        }
    }
}

#[derive(Args, Debug)]
pub struct GreeksArgs {
    /// Underlying price
    #[arg(long)]
    pub spot: f64,

    /// Strike price
    #[arg(long)]
    pub strike: f64,

    /// Time to expiry in years
    #[arg(long)]
    pub expiry: f64,

    /// Annualized implied volatility
    #[arg(long)]
    pub vol: f64,

    /// Annualized risk-free rate
    #[arg(long, default_value = "0")]
    pub rate: f64,

    #[arg(long = "type", value_enum, default_value = "call")]
    pub option_type: OptionKindArg,

    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl GreeksArgs {
    pub fn params(&self) -> OptionParams {
        OptionParams::new(
            self.spot,
            self.strike,
            self.expiry,
            self.rate,
            self.vol,
            self.option_type.into(),
        )
    }

    pub async fn execute(&self) -> anyhow::Result<()> {
        let greeks = Greeks::calculate(&self.params())?;
        match self.format {
            OutputFormat::Json => print_json(&greeks)?,
            OutputFormat::Table => {
                println!("Price:  {:.4}", greeks.price);
                println!("Delta:  {:.4}", greeks.delta);
                println!("Gamma:  {:.6}", greeks.gamma);
                println!("Vega:   {:.4}", greeks.vega);
                println!("Theta:  {:.4}", greeks.theta);
            }
        }
        Ok(())
    }
}
