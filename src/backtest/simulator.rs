//! Backtest simulator engine
//!
//! Each price step moves through a fixed cycle of phases:
//! AwaitingStep -> EvaluatingStrategy -> [ExecutingHedge] -> Recording.
//! The run ends in `Finished` after the last price.

use super::{
    empirical_var, BacktestConfig, BacktestError, BacktestResult, BacktestStrategy,
    HedgeAction, HedgeCostEntry, MarketSnapshot, PriceSeries,
};
use crate::execution::{estimate_fill, ExecutionError, Side};
use crate::orderbook::OrderBook;
use crate::risk::DrawdownTracker;
use rust_decimal::Decimal;

/// Phase of the per-step cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BacktestPhase {
    AwaitingStep,
    EvaluatingStrategy,
    ExecutingHedge,
    Recording,
    Finished,
}

/// Mutable state owned by one run
#[derive(Debug, Clone)]
pub struct BacktestState {
    pub cash: Decimal,
    pub position: Decimal,
    pub last_equity: Decimal,
    pub drawdown: DrawdownTracker,
    pub step: usize,
    pub phase: BacktestPhase,
}

impl BacktestState {
    fn new(initial_position: Decimal) -> Self {
        Self {
            cash: Decimal::ZERO,
            position: initial_position,
            last_equity: Decimal::ZERO,
            drawdown: DrawdownTracker::new(Decimal::ZERO),
            step: 0,
            phase: BacktestPhase::AwaitingStep,
        }
    }

    fn enter(&mut self, phase: BacktestPhase) {
        tracing::trace!(step = self.step, from = ?self.phase, to = ?phase, "Backtest phase");
        self.phase = phase;
    }
}

/// Supplies the order book to fill against at a step
pub trait BookProvider {
    /// `None` falls back to the flat-rate cost model for this step
    fn book_at(&mut self, snapshot: &MarketSnapshot) -> Option<OrderBook>;
}

impl<F> BookProvider for F
where
    F: FnMut(&MarketSnapshot) -> Option<OrderBook>,
{
    fn book_at(&mut self, snapshot: &MarketSnapshot) -> Option<OrderBook> {
        self(snapshot)
    }
}

type NoBooks = fn(&MarketSnapshot) -> Option<OrderBook>;

/// Runs backtest simulation
#[derive(Debug, Clone, Default)]
pub struct BacktestSimulator {
    config: BacktestConfig,
}

impl BacktestSimulator {
    /// Create a new simulator
    pub fn new(config: BacktestConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    /// Run with the flat-rate cost model
    pub fn run<S>(
        &self,
        series: &PriceSeries,
        strategy: &mut S,
    ) -> Result<BacktestResult, BacktestError>
    where
        S: BacktestStrategy + ?Sized,
    {
        self.simulate::<S, NoBooks>(series, strategy, None)
    }

    /// Run, filling each hedge against the book `books` supplies for that step
    pub fn run_with_books<S, B>(
        &self,
        series: &PriceSeries,
        strategy: &mut S,
        books: &mut B,
    ) -> Result<BacktestResult, BacktestError>
    where
        S: BacktestStrategy + ?Sized,
        B: BookProvider + ?Sized,
    {
        self.simulate(series, strategy, Some(books))
    }

    fn simulate<S, B>(
        &self,
        series: &PriceSeries,
        strategy: &mut S,
        mut books: Option<&mut B>,
    ) -> Result<BacktestResult, BacktestError>
    where
        S: BacktestStrategy + ?Sized,
        B: BookProvider + ?Sized,
    {
        let first_price = series.first_price().ok_or(BacktestError::EmptySeries)?;

        let mut state = BacktestState::new(self.config.initial_position);
        let mut result = BacktestResult {
            strategy: strategy.name().to_string(),
            timestamps: Vec::with_capacity(series.len()),
            equity_curve: Vec::with_capacity(series.len()),
            drawdown_curve: Vec::with_capacity(series.len()),
            exposure_curve: Vec::with_capacity(series.len()),
            hedge_costs: vec![],
            actions: Vec::with_capacity(series.len()),
            var_95: Decimal::ZERO,
            final_pnl: Decimal::ZERO,
            max_drawdown: Decimal::ZERO,
        };

        for (step, point) in series.into_iter().enumerate() {
            debug_assert_eq!(state.phase, BacktestPhase::AwaitingStep);
            state.step = step;
            if point.price <= Decimal::ZERO {
                return Err(BacktestError::InvalidPrice {
                    step,
                    price: point.price,
                });
            }
            let snapshot = MarketSnapshot {
                step,
                timestamp: point.timestamp,
                price: point.price,
            };

            state.enter(BacktestPhase::EvaluatingStrategy);
            let action = strategy.decide(&snapshot, state.position);
            result.actions.push(action);

            if action.hedge && !action.size.is_zero() {
                state.enter(BacktestPhase::ExecutingHedge);
                let book = books.as_deref_mut().and_then(|b| b.book_at(&snapshot));
                let fill = match book {
                    Some(book) => self.fill_from_book(&book, action)?,
                    None => Some(self.fill_flat_rate(point.price, action)),
                };
                if let Some((filled, cost)) = fill {
                    state.position += filled;
                    state.cash -= cost;
                    result.hedge_costs.push(HedgeCostEntry {
                        step,
                        timestamp: point.timestamp,
                        size: filled,
                        price: point.price,
                        cost,
                    });
                }
            }

            state.enter(BacktestPhase::Recording);
            let equity = state.cash + state.position * (point.price - first_price);
            let drawdown = state.drawdown.update(equity);
            state.last_equity = equity;
            result.timestamps.push(point.timestamp);
            result.equity_curve.push(equity);
            result.drawdown_curve.push(drawdown);
            result.exposure_curve.push(state.position);

            state.enter(BacktestPhase::AwaitingStep);
        }
        state.enter(BacktestPhase::Finished);

        result.var_95 = empirical_var(&result.equity_curve);
        result.final_pnl = state.last_equity;
        result.max_drawdown = state.drawdown.max_drawdown;

        tracing::info!(
            strategy = %result.strategy,
            steps = result.equity_curve.len(),
            hedges = result.hedge_costs.len(),
            final_pnl = %result.final_pnl,
            var_95 = %result.var_95,
            "Backtest finished"
        );
        Ok(result)
    }

    /// Full fill of the requested size; cost is fee plus slippage on notional
    fn fill_flat_rate(&self, price: Decimal, action: HedgeAction) -> (Decimal, Decimal) {
        let notional = action.size.abs() * price;
        let cost = notional * self.config.fee_rate + notional * self.config.slippage_rate;
        (action.size, cost)
    }

    /// Fill limited by the book's visible depth; `None` when the ladder is empty
    fn fill_from_book(
        &self,
        book: &OrderBook,
        action: HedgeAction,
    ) -> Result<Option<(Decimal, Decimal)>, BacktestError> {
        let side = Side::for_size(action.size);
        let estimate = match estimate_fill(
            &book.venue,
            side,
            action.size.abs(),
            book,
            self.config.fee_rate,
            self.config.depth_limit,
        ) {
            Ok(estimate) => estimate,
            Err(ExecutionError::EmptyLiquidity { venue }) => {
                tracing::warn!(%venue, ?side, "No liquidity for backtest hedge, step skipped");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let filled = match side {
            Side::Buy => estimate.filled,
            Side::Sell => -estimate.filled,
        };
        let cost = estimate.fee + estimate.slippage * estimate.filled;
        Ok(Some((filled, cost)))
    }
}
