//! Route command implementation

use super::{print_json, read_json, OutputFormat};
use crate::config::Config;
use crate::execution::{
    select_venue, ExecutionEstimate, HedgeExecutor, HedgeOrder, PaperConfig, PaperExecutor, Side,
};
use crate::feed::StaticMarketData;
use crate::hedging::HedgeStrategy;
use crate::orderbook::OrderBook;
use anyhow::Context;
use clap::Args;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct RouteArgs {
    /// JSON array of venue order books for one symbol
    #[arg(long)]
    pub books: PathBuf,

    /// Signed hedge size: positive buys, negative sells
    #[arg(long, allow_negative_numbers = true)]
    pub size: Decimal,

    /// Asset the hedge belongs to
    #[arg(long, default_value = "BTC")]
    pub asset: String,

    /// Record a paper execution through the configured venues
    #[arg(long)]
    pub stage: bool,

    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl RouteArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let books: Vec<OrderBook> = read_json(&self.books)?;
        let side = Side::for_size(self.size);
        let selection = select_venue(
            side,
            self.size.abs(),
            &books,
            config.execution.fee_rate,
            config.execution.order_book_depth_limit,
        )?;

        let record = if self.stage {
            let symbol = books
                .iter()
                .find(|b| b.venue == selection.best.venue)
                .map(|b| b.symbol.clone())
                .context("Selected venue has no book")?;
            let source = books
                .into_iter()
                .fold(StaticMarketData::new(), StaticMarketData::with_book);
            let executor = PaperExecutor::new(
                Arc::new(source),
                PaperConfig {
                    venues: config.execution.venues.clone(),
                    fee_rate: config.execution.fee_rate,
                    depth_limit: config.execution.order_book_depth_limit,
                    auto_execute: config.execution.auto_execute,
                    retry: config.feed.retry_policy(),
                },
            );
            let order = HedgeOrder {
                asset: self.asset.clone(),
                symbol,
                size: self.size,
                strategy: HedgeStrategy::PerpetualDeltaNeutral,
            };
            Some(executor.execute(order).await?)
        } else {
            None
        };

        match self.format {
            OutputFormat::Json => print_json(&serde_json::json!({
                "best": selection.best,
                "fallback": selection.fallback,
                "record": record,
            }))?,
            OutputFormat::Table => {
                print_estimate("Best", &selection.best);
                if let Some(fallback) = &selection.fallback {
                    print_estimate("Fallback", fallback);
                }
                if let Some(record) = record {
                    println!(
                        "Recorded {} on {}: {} @ {} ({:?})",
                        record.id, record.venue, record.size, record.price, record.status
                    );
                }
            }
        }
        Ok(())
    }
}

fn print_estimate(label: &str, estimate: &ExecutionEstimate) {
    println!(
        "{label:<9} {:<10} filled {} @ {:.2}  slippage {:.2} ({:.1} bps)  total {:.2}",
        estimate.venue,
        estimate.filled,
        estimate.avg_price,
        estimate.slippage,
        estimate.slippage_bps(),
        estimate.total_cost,
    );
}
