//! Venue adapters implementing [`ExchangeGateway`](crate::gateway::ExchangeGateway).

pub mod binance;

pub use binance::BinanceFuturesGateway;
