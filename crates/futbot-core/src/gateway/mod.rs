//! Exchange gateway contract.
//!
//! [`ExchangeGateway`] is the only network surface the order pipeline knows
//! about. The Binance adapter implements it over HTTP; [`ScriptedGateway`]
//! implements it in memory for deterministic tests.
//!
//! | Operation | Input | Output |
//! |-----------|-------|--------|
//! | [`submit_order`](ExchangeGateway::submit_order) | [`OrderRequest`] | [`OrderResult`] |
//! | [`cancel_order`](ExchangeGateway::cancel_order) | [`CancelRequest`] | [`OrderResult`] |
//! | [`list_open_orders`](ExchangeGateway::list_open_orders) | optional [`Symbol`] | `Vec<OrderResult>` in venue order |
//! | [`list_tradable_symbols`](ExchangeGateway::list_tradable_symbols) | none | [`SymbolSet`] |

mod scripted;

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::domain::{CancelRequest, OrderRequest, OrderResult, Symbol, SymbolSet};

pub use scripted::{GatewayCall, ScriptedGateway};

/// Boxed future returned by every gateway operation.
pub type GatewayFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, GatewayError>> + Send + 'a>>;

/// Gateway failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorKind {
    /// The venue answered and refused the request.
    Rejected,
    /// The venue could not be reached.
    Connectivity,
}

/// Structured gateway error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayError {
    kind: GatewayErrorKind,
    code: Option<i64>,
    message: String,
}

impl GatewayError {
    pub fn rejected(code: i64, message: impl Into<String>) -> Self {
        Self {
            kind: GatewayErrorKind::Rejected,
            code: Some(code),
            message: message.into(),
        }
    }

    pub fn connectivity(message: impl Into<String>) -> Self {
        Self {
            kind: GatewayErrorKind::Connectivity,
            code: None,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> GatewayErrorKind {
        self.kind
    }

    pub const fn code(&self) -> Option<i64> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code {code})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for GatewayError {}

/// Order-management operations against a remote venue.
///
/// Implementations perform exactly one remote call per invocation and never
/// retry. Callers await each operation before issuing the next one.
pub trait ExchangeGateway: Send + Sync {
    /// Submit a validated order.
    ///
    /// MARKET orders send symbol, side, type and quantity only. LIMIT orders
    /// additionally send the price and the request's time-in-force.
    fn submit_order<'a>(&'a self, request: &'a OrderRequest) -> GatewayFuture<'a, OrderResult>;

    /// Cancel an open order by venue order id.
    fn cancel_order<'a>(&'a self, request: &'a CancelRequest) -> GatewayFuture<'a, OrderResult>;

    /// List open orders, optionally for one symbol, in the order the venue returns them.
    fn list_open_orders<'a>(
        &'a self,
        symbol: Option<&'a Symbol>,
    ) -> GatewayFuture<'a, Vec<OrderResult>>;

    /// Fetch the symbols whose trading status is active.
    fn list_tradable_symbols(&self) -> GatewayFuture<'_, SymbolSet>;
}

impl<G: ExchangeGateway + ?Sized> ExchangeGateway for Arc<G> {
    fn submit_order<'a>(&'a self, request: &'a OrderRequest) -> GatewayFuture<'a, OrderResult> {
        (**self).submit_order(request)
    }

    fn cancel_order<'a>(&'a self, request: &'a CancelRequest) -> GatewayFuture<'a, OrderResult> {
        (**self).cancel_order(request)
    }

    fn list_open_orders<'a>(
        &'a self,
        symbol: Option<&'a Symbol>,
    ) -> GatewayFuture<'a, Vec<OrderResult>> {
        (**self).list_open_orders(symbol)
    }

    fn list_tradable_symbols(&self) -> GatewayFuture<'_, SymbolSet> {
        (**self).list_tradable_symbols()
    }
}
