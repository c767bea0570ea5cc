//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `MarketDataProvider` trait that all providers implement
//! - Provider capabilities
//! - The five concrete adapters, in priority order: OKX, Gate.io, Binance,
//!   CoinGecko, CoinCap
//!
//! # Architecture
//!
//! Adapters own the translation between canonical assets/intervals and each
//! provider's naming and payload shape. They never retry or sleep
//! themselves; that is the job of the shared [`ResilientClient`].
//!
//! [`ResilientClient`]: crate::http::ResilientClient

mod capabilities;
pub(crate) mod parse;
mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub mod binance;
pub mod coincap;
pub mod coingecko;
pub mod gate_io;
pub mod okx;

use std::sync::Arc;

use crate::http::ResilientClient;

pub use capabilities::{Operation, ProviderCapabilities};
pub use parse::percent_change;
pub use traits::MarketDataProvider;

/// The built-in adapters sharing one client, in priority order.
pub fn default_providers(client: Arc<ResilientClient>) -> Vec<Arc<dyn MarketDataProvider>> {
    vec![
        Arc::new(okx::OkxProvider::new(client.clone())),
        Arc::new(gate_io::GateIoProvider::new(client.clone())),
        Arc::new(binance::BinanceProvider::new(client.clone())),
        Arc::new(coingecko::CoinGeckoProvider::new(client.clone())),
        Arc::new(coincap::CoinCapProvider::new(client)),
    ]
}
