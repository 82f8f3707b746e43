use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use futbot_core::{
    BinanceFuturesGateway, CancelRequest, Credentials, ExchangeGateway, GatewayConfig,
    GatewayErrorKind, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, OrderRequest,
    OrderResult, OrderSide, OrderType, ScriptedGateway, Symbol,
};

/// Fake venue answering by method and path, the way the futures testnet does.
#[derive(Default)]
struct StubVenue {
    requests: Mutex<Vec<HttpRequest>>,
}

impl StubVenue {
    fn recorded(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .clone()
    }

    fn answer(request: &HttpRequest) -> HttpResponse {
        let path = request
            .url
            .split_once("/fapi/v1/")
            .map(|(_, rest)| rest.split('?').next().unwrap_or_default())
            .unwrap_or_default();
        let symbol = request
            .query_pairs()
            .into_iter()
            .find(|(key, _)| key == "symbol")
            .map(|(_, value)| value);

        match (request.method, path) {
            (HttpMethod::Post, "order") => HttpResponse::ok_json(format!(
                r#"{{"orderId":1001,"status":"NEW","symbol":"{}","side":"BUY","type":"MARKET","executedQty":"0","avgPrice":"0.00","origQty":"0.01"}}"#,
                symbol.unwrap_or_default()
            )),
            (HttpMethod::Delete, "order") => HttpResponse::ok_json(format!(
                r#"{{"orderId":1001,"status":"CANCELED","symbol":"{}"}}"#,
                symbol.unwrap_or_default()
            )),
            (HttpMethod::Get, "openOrders") => match symbol.as_deref() {
                Some("ETHUSDT") => HttpResponse::ok_json(r#"[{"orderId":2,"symbol":"ETHUSDT"}]"#),
                Some(_) => HttpResponse::ok_json("[]"),
                None => HttpResponse::ok_json(
                    r#"[{"orderId":1,"symbol":"BTCUSDT"},{"orderId":2,"symbol":"ETHUSDT"}]"#,
                ),
            },
            (HttpMethod::Get, "exchangeInfo") => HttpResponse::ok_json(
                r#"{"symbols":[{"symbol":"BTCUSDT","status":"TRADING"},{"symbol":"ETHUSDT","status":"TRADING"},{"symbol":"DEADUSDT","status":"BREAK"}]}"#,
            ),
            _ => HttpResponse::new(404, ""),
        }
    }
}

impl HttpClient for StubVenue {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let response = Self::answer(&request);
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .push(request);
        Box::pin(async move { Ok(response) })
    }
}

struct GatewayCase {
    name: &'static str,
    gateway: Arc<dyn ExchangeGateway>,
}

fn gateway_cases() -> Vec<GatewayCase> {
    let binance = BinanceFuturesGateway::with_http_client(
        Arc::new(StubVenue::default()),
        GatewayConfig::new(Credentials::new("contract-key", "contract-secret")),
    )
    .expect("valid gateway");

    let scripted = ScriptedGateway::new()
        .with_symbols(["BTCUSDT", "ETHUSDT"])
        .with_open_orders(Ok(vec![
            OrderResult {
                order_id: Some(1),
                symbol: Some(String::from("BTCUSDT")),
                ..OrderResult::default()
            },
            OrderResult {
                order_id: Some(2),
                symbol: Some(String::from("ETHUSDT")),
                ..OrderResult::default()
            },
        ]));

    vec![
        GatewayCase {
            name: "binance",
            gateway: Arc::new(binance),
        },
        GatewayCase {
            name: "scripted",
            gateway: Arc::new(scripted),
        },
    ]
}

fn market_order() -> OrderRequest {
    OrderRequest::new("BTCUSDT", OrderSide::Buy, OrderType::Market, 0.01, None, None)
        .expect("valid order")
}

#[tokio::test]
async fn submit_returns_a_result_for_the_submitted_symbol() {
    for case in gateway_cases() {
        let result = case
            .gateway
            .submit_order(&market_order())
            .await
            .unwrap_or_else(|error| panic!("gateway '{}' submit failed: {error}", case.name));

        assert_eq!(result.symbol.as_deref(), Some("BTCUSDT"), "gateway '{}'", case.name);
        assert!(result.status.is_some(), "gateway '{}': status", case.name);
    }
}

#[tokio::test]
async fn cancel_reports_canceled_status() {
    let request = CancelRequest::new("BTCUSDT", 1001).expect("valid cancel");

    for case in gateway_cases() {
        let result = case
            .gateway
            .cancel_order(&request)
            .await
            .unwrap_or_else(|error| panic!("gateway '{}' cancel failed: {error}", case.name));

        assert_eq!(result.status.as_deref(), Some("CANCELED"), "gateway '{}'", case.name);
        assert_eq!(result.order_id, Some(1001), "gateway '{}'", case.name);
    }
}

#[tokio::test]
async fn unfiltered_listing_keeps_venue_order() {
    for case in gateway_cases() {
        let orders = case
            .gateway
            .list_open_orders(None)
            .await
            .unwrap_or_else(|error| panic!("gateway '{}' listing failed: {error}", case.name));

        assert_eq!(
            orders.iter().map(|order| order.order_id).collect::<Vec<_>>(),
            vec![Some(1), Some(2)],
            "gateway '{}'",
            case.name
        );
    }
}

#[tokio::test]
async fn tradable_symbols_contain_active_pairs() {
    let btc = Symbol::parse("BTCUSDT").expect("valid");
    let dead = Symbol::parse("DEADUSDT").expect("valid");

    for case in gateway_cases() {
        let symbols = case
            .gateway
            .list_tradable_symbols()
            .await
            .unwrap_or_else(|error| panic!("gateway '{}' symbols failed: {error}", case.name));

        assert!(symbols.contains(&btc), "gateway '{}'", case.name);
        assert!(!symbols.contains(&dead), "gateway '{}'", case.name);
    }
}

#[tokio::test]
async fn binance_filtered_listing_sends_symbol_and_signs_every_private_call() {
    let venue = Arc::new(StubVenue::default());
    let gateway = BinanceFuturesGateway::with_http_client(
        venue.clone(),
        GatewayConfig::new(Credentials::new("contract-key", "contract-secret")),
    )
    .expect("valid gateway");
    let eth = Symbol::parse("ethusdt").expect("valid");

    let orders = gateway
        .list_open_orders(Some(&eth))
        .await
        .expect("listing succeeds");
    gateway.list_tradable_symbols().await.expect("symbols fetched");

    assert_eq!(orders.len(), 1);
    let recorded = venue.recorded();
    assert!(recorded[0].url.contains("symbol=ETHUSDT"));
    assert!(recorded[0].url.contains("&signature="));
    assert!(!recorded[1].url.contains("signature="));
}

/// Transport that answers every request with an empty 404.
struct Unrouted;

impl HttpClient for Unrouted {
    fn execute<'a>(
        &'a self,
        _request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async { Ok(HttpResponse::new(404, "")) })
    }
}

#[tokio::test]
async fn binance_empty_error_body_is_a_rejection_with_http_status() {
    let gateway = BinanceFuturesGateway::with_http_client(
        Arc::new(Unrouted),
        GatewayConfig::new(Credentials::new("contract-key", "contract-secret")),
    )
    .expect("valid gateway");

    let error = gateway
        .list_tradable_symbols()
        .await
        .expect_err("404 must fail");

    assert_eq!(error.kind(), GatewayErrorKind::Rejected);
    assert_eq!(error.code(), Some(404));
    assert_eq!(error.message(), "HTTP status 404");
}
