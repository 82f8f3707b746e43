//! Binance USDT-M Futures REST adapter.
//!
//! | Operation | Method | Path | Signed |
//! |-----------|--------|------|--------|
//! | submit order | `POST` | `/fapi/v1/order` | yes |
//! | cancel order | `DELETE` | `/fapi/v1/order` | yes |
//! | open orders | `GET` | `/fapi/v1/openOrders` | yes |
//! | tradable symbols | `GET` | `/fapi/v1/exchangeInfo` | no |
//!
//! Signed requests carry every parameter in the query string, followed by
//! `recvWindow`, `timestamp` and the HMAC `signature`, plus the
//! `X-MBX-APIKEY` header.

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, GatewayConfig};
use crate::domain::{CancelRequest, OrderRequest, OrderResult, OrderType, Symbol, SymbolSet};
use crate::gateway::{ExchangeGateway, GatewayError, GatewayFuture};
use crate::http_client::{HttpClient, HttpMethod, HttpRequest, ReqwestHttpClient};
use crate::signing::QuerySigner;

pub const ORDER_PATH: &str = "/fapi/v1/order";
pub const OPEN_ORDERS_PATH: &str = "/fapi/v1/openOrders";
pub const EXCHANGE_INFO_PATH: &str = "/fapi/v1/exchangeInfo";

const API_KEY_HEADER: &str = "X-MBX-APIKEY";
const TRADING_STATUS: &str = "TRADING";

/// Venue error body: `{"code": -2019, "msg": "Margin is insufficient."}`.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: i64,
    msg: String,
}

#[derive(Debug, Deserialize)]
struct ExchangeInfoBody {
    symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Deserialize)]
struct SymbolInfo {
    symbol: String,
    status: String,
}

/// Gateway to the futures REST API.
#[derive(Clone)]
pub struct BinanceFuturesGateway {
    http_client: Arc<dyn HttpClient>,
    config: GatewayConfig,
    signer: QuerySigner,
}

impl Debug for BinanceFuturesGateway {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinanceFuturesGateway")
            .field("base_url", &self.config.base_url)
            .field("recv_window_ms", &self.config.recv_window_ms)
            .finish_non_exhaustive()
    }
}

impl BinanceFuturesGateway {
    /// Build a gateway over the production reqwest transport.
    pub fn connect(config: GatewayConfig) -> Result<Self, ConfigError> {
        let client = ReqwestHttpClient::new()
            .map_err(|error| ConfigError::Transport(error.message().to_owned()))?;
        Self::with_http_client(Arc::new(client), config)
    }

    pub fn with_http_client(
        http_client: Arc<dyn HttpClient>,
        config: GatewayConfig,
    ) -> Result<Self, ConfigError> {
        let signer = QuerySigner::new(config.credentials.api_secret())?;
        Ok(Self {
            http_client,
            config,
            signer,
        })
    }

    fn signed_request(
        &self,
        method: HttpMethod,
        path: &str,
        params: &[(&str, String)],
    ) -> HttpRequest {
        let query = self
            .signer
            .signed_query(params, self.config.recv_window_ms, timestamp_ms());
        HttpRequest::new(method, format!("{}{path}?{query}", self.config.base_url))
            .with_header(API_KEY_HEADER, self.config.credentials.api_key())
            .with_timeout_ms(self.config.timeout_ms)
    }

    /// Execute `request` and return the body of a 2xx response.
    async fn send(&self, request: HttpRequest, path: &'static str) -> Result<String, GatewayError> {
        debug!(method = %request.method, path, "sending exchange request");

        let response = self.http_client.execute(request).await.map_err(|error| {
            warn!(path, error = error.message(), "exchange unreachable");
            GatewayError::connectivity(error.message())
        })?;

        if !response.is_success() {
            let error = rejection(response.status, &response.body);
            warn!(
                path,
                status = response.status,
                code = error.code(),
                message = error.message(),
                "exchange rejected request"
            );
            return Err(error);
        }

        Ok(response.body)
    }
}

/// Query parameters for a new order, in wire order.
///
/// MARKET: `symbol`, `side`, `type`, `quantity`. LIMIT adds `price` and
/// `timeInForce`.
pub fn order_params(request: &OrderRequest) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("symbol", request.symbol().to_string()),
        ("side", request.side().to_string()),
        ("type", request.order_type().to_string()),
        ("quantity", request.quantity().to_string()),
    ];

    if request.order_type() == OrderType::Limit {
        if let Some(price) = request.price() {
            params.push(("price", price.to_string()));
        }
        params.push(("timeInForce", request.time_in_force().to_string()));
    }

    params
}

fn cancel_params(request: &CancelRequest) -> Vec<(&'static str, String)> {
    vec![
        ("symbol", request.symbol().to_string()),
        ("orderId", request.order_id().to_string()),
    ]
}

/// Map a non-2xx response. The venue's own code and message win when present.
fn rejection(status: u16, body: &str) -> GatewayError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(error) => GatewayError::rejected(error.code, error.msg),
        Err(_) => {
            let body = body.trim();
            if body.is_empty() {
                GatewayError::rejected(i64::from(status), format!("HTTP status {status}"))
            } else {
                GatewayError::rejected(i64::from(status), body)
            }
        }
    }
}

fn unexpected_body(path: &str, error: &serde_json::Error) -> GatewayError {
    GatewayError::rejected(0, format!("unexpected response from {path}: {error}"))
}

/// Order responses never fail to shape; a garbled success body yields N/A fields.
fn shape_order(body: &str) -> OrderResult {
    let value = serde_json::from_str::<Value>(body).unwrap_or(Value::Null);
    OrderResult::from_response(&value)
}

fn timestamp_ms() -> u64 {
    let nanos = time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    u64::try_from(nanos).unwrap_or_default()
}

impl ExchangeGateway for BinanceFuturesGateway {
    fn submit_order<'a>(&'a self, request: &'a OrderRequest) -> GatewayFuture<'a, OrderResult> {
        Box::pin(async move {
            let http_request =
                self.signed_request(HttpMethod::Post, ORDER_PATH, &order_params(request));
            let body = self.send(http_request, ORDER_PATH).await?;
            let result = shape_order(&body);
            info!(
                symbol = %request.symbol(),
                order_id = result.order_id,
                status = result.status.as_deref(),
                "order accepted"
            );
            Ok(result)
        })
    }

    fn cancel_order<'a>(&'a self, request: &'a CancelRequest) -> GatewayFuture<'a, OrderResult> {
        Box::pin(async move {
            let http_request =
                self.signed_request(HttpMethod::Delete, ORDER_PATH, &cancel_params(request));
            let body = self.send(http_request, ORDER_PATH).await?;
            let result = shape_order(&body);
            info!(
                symbol = %request.symbol(),
                order_id = request.order_id(),
                status = result.status.as_deref(),
                "order cancelled"
            );
            Ok(result)
        })
    }

    fn list_open_orders<'a>(
        &'a self,
        symbol: Option<&'a Symbol>,
    ) -> GatewayFuture<'a, Vec<OrderResult>> {
        Box::pin(async move {
            let params = symbol
                .map(|symbol| vec![("symbol", symbol.to_string())])
                .unwrap_or_default();
            let http_request = self.signed_request(HttpMethod::Get, OPEN_ORDERS_PATH, &params);
            let body = self.send(http_request, OPEN_ORDERS_PATH).await?;

            let orders = serde_json::from_str::<Vec<Value>>(&body)
                .map_err(|error| unexpected_body(OPEN_ORDERS_PATH, &error))?;
            debug!(count = orders.len(), "open orders fetched");
            Ok(orders.iter().map(OrderResult::from_response).collect())
        })
    }

    fn list_tradable_symbols(&self) -> GatewayFuture<'_, SymbolSet> {
        Box::pin(async move {
            let http_request =
                HttpRequest::get(format!("{}{EXCHANGE_INFO_PATH}", self.config.base_url))
                    .with_timeout_ms(self.config.timeout_ms);
            let body = self.send(http_request, EXCHANGE_INFO_PATH).await?;

            let info = serde_json::from_str::<ExchangeInfoBody>(&body)
                .map_err(|error| unexpected_body(EXCHANGE_INFO_PATH, &error))?;
            let symbols = info
                .symbols
                .into_iter()
                .filter(|entry| entry.status == TRADING_STATUS)
                .map(|entry| entry.symbol)
                .collect::<SymbolSet>();
            debug!(count = symbols.len(), "tradable symbols fetched");
            Ok(symbols)
        })
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    use super::*;
    use crate::config::Credentials;
    use crate::domain::{OrderSide, TimeInForce};
    use crate::gateway::GatewayErrorKind;
    use crate::http_client::{HttpError, HttpResponse};

    struct RecordingHttpClient {
        response: Result<HttpResponse, HttpError>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RecordingHttpClient {
        fn replying(response: Result<HttpResponse, HttpError>) -> Self {
            Self {
                response,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn recorded_requests(&self) -> Vec<HttpRequest> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .clone()
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self.response.clone();
            Box::pin(async move { response })
        }
    }

    fn gateway(client: &Arc<RecordingHttpClient>) -> BinanceFuturesGateway {
        let mut config = GatewayConfig::new(Credentials::new("key-123", "secret-456"));
        config.base_url = String::from("https://testnet.example");
        BinanceFuturesGateway::with_http_client(client.clone(), config).expect("valid gateway")
    }

    fn param<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
        pairs
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    fn market_buy() -> OrderRequest {
        OrderRequest::new("BTCUSDT", OrderSide::Buy, OrderType::Market, 0.01, None, None)
            .expect("valid order")
    }

    #[test]
    fn market_params_omit_price_and_time_in_force() {
        let params = order_params(&market_buy());
        let keys = params.iter().map(|(key, _)| *key).collect::<Vec<_>>();
        assert_eq!(keys, vec!["symbol", "side", "type", "quantity"]);
    }

    #[test]
    fn limit_params_carry_price_and_requested_time_in_force() {
        let request = OrderRequest::new(
            "ETHUSDT",
            OrderSide::Sell,
            OrderType::Limit,
            0.5,
            Some(3200.5),
            Some(TimeInForce::Ioc),
        )
        .expect("valid order");

        assert_eq!(
            order_params(&request),
            vec![
                ("symbol", String::from("ETHUSDT")),
                ("side", String::from("SELL")),
                ("type", String::from("LIMIT")),
                ("quantity", String::from("0.5")),
                ("price", String::from("3200.5")),
                ("timeInForce", String::from("IOC")),
            ]
        );
    }

    #[tokio::test]
    async fn submit_signs_request_and_sends_api_key_header() {
        let client = Arc::new(RecordingHttpClient::replying(Ok(HttpResponse::ok_json(
            r#"{"orderId":42,"status":"FILLED","executedQty":"0.01","avgPrice":"65000.0"}"#,
        ))));
        let gateway = gateway(&client);

        let result = gateway
            .submit_order(&market_buy())
            .await
            .expect("submission should succeed");
        assert_eq!(result.order_id, Some(42));
        assert_eq!(result.status.as_deref(), Some("FILLED"));

        let requests = client.recorded_requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, HttpMethod::Post);
        assert!(request.url.starts_with("https://testnet.example/fapi/v1/order?"));
        assert_eq!(
            request.headers.get("x-mbx-apikey").map(String::as_str),
            Some("key-123")
        );

        let pairs = request.query_pairs();
        assert_eq!(param(&pairs, "symbol"), Some("BTCUSDT"));
        assert_eq!(param(&pairs, "recvWindow"), Some("5000"));
        assert!(param(&pairs, "timestamp").is_some());
        assert_eq!(pairs.last().map(|(key, _)| key.as_str()), Some("signature"));

        let query = request.query().expect("query present");
        let (unsigned, signature) = query.split_once("&signature=").expect("signed");
        let signer = QuerySigner::new("secret-456").expect("valid");
        assert_eq!(signature, signer.sign(unsigned));
    }

    #[tokio::test]
    async fn venue_error_body_becomes_rejection_with_verbatim_code() {
        let client = Arc::new(RecordingHttpClient::replying(Ok(HttpResponse::new(
            400,
            r#"{"code":-2019,"msg":"Margin is insufficient."}"#,
        ))));

        let error = gateway(&client)
            .submit_order(&market_buy())
            .await
            .expect_err("must be rejected");
        assert_eq!(error.kind(), GatewayErrorKind::Rejected);
        assert_eq!(error.code(), Some(-2019));
        assert_eq!(error.message(), "Margin is insufficient.");
    }

    #[tokio::test]
    async fn non_json_error_body_falls_back_to_http_status() {
        let client = Arc::new(RecordingHttpClient::replying(Ok(HttpResponse::new(
            502,
            "Bad Gateway",
        ))));

        let error = gateway(&client)
            .list_open_orders(None)
            .await
            .expect_err("must be rejected");
        assert_eq!(error.code(), Some(502));
        assert_eq!(error.message(), "Bad Gateway");
    }

    #[tokio::test]
    async fn transport_failure_is_connectivity() {
        let client = Arc::new(RecordingHttpClient::replying(Err(HttpError::new(
            "connection failed: refused",
        ))));

        let request = CancelRequest::new("BTCUSDT", 7).expect("valid cancel");
        let error = gateway(&client)
            .cancel_order(&request)
            .await
            .expect_err("must fail");
        assert_eq!(error.kind(), GatewayErrorKind::Connectivity);
        assert!(error.message().contains("refused"));
    }

    #[tokio::test]
    async fn cancel_sends_symbol_and_order_id_via_delete() {
        let client = Arc::new(RecordingHttpClient::replying(Ok(HttpResponse::ok_json(
            r#"{"orderId":7,"status":"CANCELED","symbol":"BTCUSDT"}"#,
        ))));

        let request = CancelRequest::new("btcusdt", 7).expect("valid cancel");
        let result = gateway(&client)
            .cancel_order(&request)
            .await
            .expect("cancel should succeed");
        assert_eq!(result.status.as_deref(), Some("CANCELED"));

        let recorded = client.recorded_requests();
        assert_eq!(recorded[0].method, HttpMethod::Delete);
        let pairs = recorded[0].query_pairs();
        assert_eq!(param(&pairs, "symbol"), Some("BTCUSDT"));
        assert_eq!(param(&pairs, "orderId"), Some("7"));
    }

    #[tokio::test]
    async fn open_orders_without_filter_sends_no_symbol() {
        let client = Arc::new(RecordingHttpClient::replying(Ok(HttpResponse::ok_json(
            r#"[{"orderId":1,"symbol":"BTCUSDT"},{"orderId":2,"symbol":"ETHUSDT"}]"#,
        ))));

        let orders = gateway(&client)
            .list_open_orders(None)
            .await
            .expect("listing should succeed");
        assert_eq!(
            orders.iter().map(|order| order.order_id).collect::<Vec<_>>(),
            vec![Some(1), Some(2)]
        );

        let pairs = client.recorded_requests()[0].query_pairs();
        assert_eq!(param(&pairs, "symbol"), None);
    }

    #[tokio::test]
    async fn garbled_open_orders_body_is_rejected() {
        let client = Arc::new(RecordingHttpClient::replying(Ok(HttpResponse::ok_json(
            "<html>maintenance</html>",
        ))));

        let error = gateway(&client)
            .list_open_orders(None)
            .await
            .expect_err("must fail");
        assert_eq!(error.code(), Some(0));
        assert!(error.message().contains(OPEN_ORDERS_PATH));
    }

    #[tokio::test]
    async fn exchange_info_keeps_only_trading_symbols_and_is_unsigned() {
        let client = Arc::new(RecordingHttpClient::replying(Ok(HttpResponse::ok_json(
            r#"{"timezone":"UTC","symbols":[
                {"symbol":"BTCUSDT","status":"TRADING"},
                {"symbol":"OLDUSDT","status":"SETTLING"},
                {"symbol":"ETHUSDT","status":"TRADING"}
            ]}"#,
        ))));

        let symbols = gateway(&client)
            .list_tradable_symbols()
            .await
            .expect("exchange info should parse");
        assert_eq!(symbols.iter().collect::<Vec<_>>(), vec!["BTCUSDT", "ETHUSDT"]);

        let request = &client.recorded_requests()[0];
        assert_eq!(request.url, "https://testnet.example/fapi/v1/exchangeInfo");
        assert!(request.headers.is_empty());
    }

    #[tokio::test]
    async fn garbled_success_body_on_submit_degrades_to_unavailable_fields() {
        let client = Arc::new(RecordingHttpClient::replying(Ok(HttpResponse::ok_json("ok"))));

        let result = gateway(&client)
            .submit_order(&market_buy())
            .await
            .expect("a 2xx is still a success");
        assert_eq!(result, OrderResult::default());
    }
}
