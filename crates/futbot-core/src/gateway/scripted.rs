use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::{CancelRequest, OrderRequest, OrderResult, Symbol, SymbolSet};
use crate::gateway::{ExchangeGateway, GatewayError, GatewayFuture};

/// One recorded gateway invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    SubmitOrder(OrderRequest),
    CancelOrder { symbol: String, order_id: u64 },
    ListOpenOrders(Option<String>),
    ListTradableSymbols,
}

impl GatewayCall {
    /// `true` for calls that change state on the venue.
    pub const fn is_mutating(&self) -> bool {
        matches!(self, Self::SubmitOrder(_) | Self::CancelOrder { .. })
    }
}

/// In-memory gateway with canned answers and a call log.
///
/// Unscripted submissions and cancellations echo the request back with
/// status `NEW` / `CANCELED`; unscripted listings return empty collections.
#[derive(Debug)]
pub struct ScriptedGateway {
    submit: Option<Result<OrderResult, GatewayError>>,
    cancel: Option<Result<OrderResult, GatewayError>>,
    open_orders: Result<Vec<OrderResult>, GatewayError>,
    symbols: Result<SymbolSet, GatewayError>,
    calls: Mutex<Vec<GatewayCall>>,
}

impl Default for ScriptedGateway {
    fn default() -> Self {
        Self {
            submit: None,
            cancel: None,
            open_orders: Ok(Vec::new()),
            symbols: Ok(SymbolSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.symbols = Ok(symbols.into_iter().collect());
        self
    }

    pub fn with_symbols_error(mut self, error: GatewayError) -> Self {
        self.symbols = Err(error);
        self
    }

    pub fn with_submit_response(mut self, response: Result<OrderResult, GatewayError>) -> Self {
        self.submit = Some(response);
        self
    }

    pub fn with_cancel_response(mut self, response: Result<OrderResult, GatewayError>) -> Self {
        self.cancel = Some(response);
        self
    }

    pub fn with_open_orders(mut self, response: Result<Vec<OrderResult>, GatewayError>) -> Self {
        self.open_orders = response;
        self
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.lock_calls().clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock_calls().len()
    }

    pub fn mutating_call_count(&self) -> usize {
        self.lock_calls()
            .iter()
            .filter(|call| call.is_mutating())
            .count()
    }

    fn record(&self, call: GatewayCall) {
        self.lock_calls().push(call);
    }

    fn lock_calls(&self) -> MutexGuard<'_, Vec<GatewayCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ExchangeGateway for ScriptedGateway {
    fn submit_order<'a>(&'a self, request: &'a OrderRequest) -> GatewayFuture<'a, OrderResult> {
        self.record(GatewayCall::SubmitOrder(request.clone()));
        let response = self.submit.clone().unwrap_or_else(|| {
            Ok(OrderResult {
                status: Some(String::from("NEW")),
                symbol: Some(request.symbol().to_string()),
                side: Some(request.side().to_string()),
                order_type: Some(request.order_type().to_string()),
                original_quantity: Some(request.quantity()),
                price: request.price(),
                time_in_force: Some(request.time_in_force().to_string()),
                ..OrderResult::default()
            })
        });
        Box::pin(async move { response })
    }

    fn cancel_order<'a>(&'a self, request: &'a CancelRequest) -> GatewayFuture<'a, OrderResult> {
        self.record(GatewayCall::CancelOrder {
            symbol: request.symbol().to_string(),
            order_id: request.order_id(),
        });
        let response = self.cancel.clone().unwrap_or_else(|| {
            Ok(OrderResult {
                order_id: Some(request.order_id()),
                status: Some(String::from("CANCELED")),
                symbol: Some(request.symbol().to_string()),
                ..OrderResult::default()
            })
        });
        Box::pin(async move { response })
    }

    fn list_open_orders<'a>(
        &'a self,
        symbol: Option<&'a Symbol>,
    ) -> GatewayFuture<'a, Vec<OrderResult>> {
        self.record(GatewayCall::ListOpenOrders(symbol.map(ToString::to_string)));
        let response = self.open_orders.clone();
        Box::pin(async move { response })
    }

    fn list_tradable_symbols(&self) -> GatewayFuture<'_, SymbolSet> {
        self.record(GatewayCall::ListTradableSymbols);
        let response = self.symbols.clone();
        Box::pin(async move { response })
    }
}
