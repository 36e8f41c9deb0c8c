//! hedge-desk: Risk and hedging engine for crypto derivatives desks
//!
//! This library provides the core components for:
//! - Black-Scholes pricing and Greeks
//! - Portfolio Greek aggregation, parametric VaR and correlation
//! - Hedge sizing with perpetuals, options and option structures
//! - Order-book execution cost and venue selection
//! - Paper hedge execution against a market data source
//! - Backtesting hedge strategies over price paths
//! - PnL and hedge performance analytics
//! - Structured logging and Prometheus metrics

pub mod analytics;
pub mod backtest;
pub mod cli;
pub mod config;
pub mod execution;
pub mod feed;
pub mod hedging;
pub mod orderbook;
pub mod pricing;
pub mod risk;
pub mod telemetry;
