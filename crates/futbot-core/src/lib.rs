//! # Futbot Core
//!
//! Order model, exchange gateway and command pipeline for placing and
//! managing orders on the Binance USDT-M Futures testnet.
//!
//! ## Overview
//!
//! - **Order request model** with validation that reports every bad field at once
//! - **Exchange gateway trait** with a Binance REST adapter and an in-memory scripted gateway
//! - **Command pipeline** for place, cancel and list, with dry run, best-effort
//!   symbol verification and an injected confirmation step
//! - **Result shaping** from loosely typed venue responses
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Binance USDT-M Futures REST gateway |
//! | [`config`] | Credentials and gateway settings from the environment |
//! | [`domain`] | Order requests, symbols and order results |
//! | [`error`] | Validation and pipeline errors |
//! | [`gateway`] | `ExchangeGateway` trait and the scripted test gateway |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`pipeline`] | Place / cancel / list state machines |
//! | [`signing`] | HMAC-SHA256 request signing |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / User     │
//! └────────┬────────┘
//!          │ RawOrder
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Command         │────▶│ Confirm          │
//! │ Pipeline        │     │ (callback)       │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ ExchangeGateway │────▶│ HTTP Client      │
//! │ (Binance/fake)  │     │ + QuerySigner    │
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Pipeline operations return [`PipelineError`]; a failed symbol-set fetch is
//! the one degradation that becomes a warning instead:
//!
//! ```rust
//! use futbot_core::{GatewayError, PipelineError};
//!
//! let error = PipelineError::from(GatewayError::rejected(-2019, "Margin is insufficient."));
//! assert_eq!(error.code(), "pipeline.remote_rejection");
//! ```
//!
//! ## Security
//!
//! - API credentials are read from the environment or `.env` only and never logged
//! - `Debug` output of credentials and signers is redacted

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod http_client;
pub mod pipeline;
pub mod signing;

// Adapter implementations
pub use adapters::BinanceFuturesGateway;

// Configuration
pub use config::{ConfigError, Credentials, GatewayConfig};

// Domain models
pub use domain::{
    CancelRequest, ListOrdersRequest, OrderRequest, OrderResult, OrderSide, OrderType, RawOrder,
    Symbol, SymbolSet, TimeInForce, NOT_AVAILABLE,
};

// Error types
pub use error::{Field, FieldViolation, PipelineError, ValidationErrors};

// Gateway contract
pub use gateway::{
    ExchangeGateway, GatewayCall, GatewayError, GatewayErrorKind, GatewayFuture, ScriptedGateway,
};

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
};

// Pipeline
pub use pipeline::{
    cancel_order, fetch_symbol_set, list_orders, place_order, CancelOrderCommand,
    CancelOrderOutcome, CommandReport, Confirm, ConfirmPrompt, OpenOrders, PlaceOrderCommand,
    PlaceOrderOutcome, Stage, SymbolVerification,
};

// Signing
pub use signing::QuerySigner;
