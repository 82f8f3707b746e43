//! # Domain Models
//!
//! Order intents and venue results for futbot.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`OrderRequest`] | Validated order intent, built from a [`RawOrder`] |
//! | [`CancelRequest`] | Validated cancellation target |
//! | [`ListOrdersRequest`] | Open-order listing with optional symbol filter |
//! | [`OrderResult`] | Venue response shaped for display |
//! | [`Symbol`] | Uppercase trading pair |
//! | [`SymbolSet`] | Symbols the venue reports as tradable |
//!
//! Request types enforce their invariants at construction time and report
//! every violated field at once:
//!
//! ```rust
//! use futbot_core::{Field, RawOrder};
//!
//! let raw = RawOrder {
//!     symbol: "btcusdt".into(),
//!     side: "SELL".into(),
//!     order_type: "LIMIT".into(),
//!     quantity: "0".into(),
//!     ..RawOrder::default()
//! };
//! let errors = raw.validate().unwrap_err();
//! assert!(errors.has_field(Field::Quantity));
//! assert!(errors.has_field(Field::Price));
//! ```

mod order;
mod query;
mod result;
mod symbol;

pub use order::{OrderRequest, OrderSide, OrderType, RawOrder, TimeInForce};
pub use query::{CancelRequest, ListOrdersRequest};
pub use result::{OrderResult, NOT_AVAILABLE};
pub use symbol::{Symbol, SymbolSet};
