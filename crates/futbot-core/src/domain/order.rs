use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::Symbol;
use crate::error::{Field, ValidationErrors};

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl FromStr for OrderSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUY" => Ok(Self::Buy),
            "SELL" => Ok(Self::Sell),
            _ => Err(format!("invalid side '{s}', expected one of BUY, SELL")),
        }
    }
}

impl Display for OrderSide {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported order types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Market,
    Limit,
}

impl OrderType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Market => "MARKET",
            Self::Limit => "LIMIT",
        }
    }

    pub const fn requires_price(self) -> bool {
        matches!(self, Self::Limit)
    }
}

impl FromStr for OrderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MARKET" => Ok(Self::Market),
            "LIMIT" => Ok(Self::Limit),
            _ => Err(format!("invalid order type '{s}', expected one of MARKET, LIMIT")),
        }
    }
}

impl Display for OrderType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time-in-force policy. Only forwarded for LIMIT orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    #[default]
    Gtc,
    Ioc,
    Fok,
}

impl TimeInForce {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gtc => "GTC",
            Self::Ioc => "IOC",
            Self::Fok => "FOK",
        }
    }
}

impl FromStr for TimeInForce {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GTC" => Ok(Self::Gtc),
            "IOC" => Ok(Self::Ioc),
            "FOK" => Ok(Self::Fok),
            _ => Err(format!(
                "invalid time in force '{s}', expected one of GTC, IOC, FOK"
            )),
        }
    }
}

impl Display for TimeInForce {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated, immutable order intent.
///
/// Only obtainable through [`OrderRequest::new`] or [`RawOrder::validate`],
/// both of which either return a fully valid value or every violation found.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRequest {
    symbol: Symbol,
    side: OrderSide,
    order_type: OrderType,
    quantity: f64,
    price: Option<f64>,
    time_in_force: TimeInForce,
}

impl OrderRequest {
    /// Build a request from already-typed values.
    ///
    /// A price supplied for a MARKET order is still checked for positivity
    /// but is not kept: market orders never carry a price.
    pub fn new(
        symbol: &str,
        side: OrderSide,
        order_type: OrderType,
        quantity: f64,
        price: Option<f64>,
        time_in_force: Option<TimeInForce>,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let symbol = collect_symbol(symbol, &mut errors);
        let quantity = check_positive(Field::Quantity, quantity, &mut errors);
        let price = match price {
            Some(value) => {
                PriceInput::from_checked(check_positive(Field::Price, value, &mut errors))
            }
            None => PriceInput::Absent,
        };

        assemble(
            symbol,
            Some(side),
            Some(order_type),
            quantity,
            price,
            Some(time_in_force.unwrap_or_default()),
            errors,
        )
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub const fn side(&self) -> OrderSide {
        self.side
    }

    pub const fn order_type(&self) -> OrderType {
        self.order_type
    }

    pub const fn quantity(&self) -> f64 {
        self.quantity
    }

    pub const fn price(&self) -> Option<f64> {
        self.price
    }

    pub const fn time_in_force(&self) -> TimeInForce {
        self.time_in_force
    }

    /// Estimated order value (`price * quantity`) for priced orders.
    pub fn notional(&self) -> Option<f64> {
        self.price.map(|price| price * self.quantity)
    }
}

/// Unvalidated order fields exactly as the operator typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOrder {
    pub symbol: String,
    pub side: String,
    pub order_type: String,
    pub quantity: String,
    pub price: Option<String>,
    pub time_in_force: Option<String>,
}

impl RawOrder {
    /// Parse and validate every field, collecting all violations.
    pub fn validate(&self) -> Result<OrderRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let symbol = collect_symbol(&self.symbol, &mut errors);
        let side = self
            .side
            .parse::<OrderSide>()
            .map_err(|message| errors.push(Field::Side, message))
            .ok();
        let order_type = self
            .order_type
            .parse::<OrderType>()
            .map_err(|message| errors.push(Field::OrderType, message))
            .ok();
        let quantity = parse_positive(Field::Quantity, &self.quantity, &mut errors);
        let price = match self.price.as_deref() {
            Some(raw) => {
                PriceInput::from_checked(parse_positive(Field::Price, raw, &mut errors))
            }
            None => PriceInput::Absent,
        };
        let time_in_force = match self.time_in_force.as_deref() {
            Some(raw) => raw
                .parse::<TimeInForce>()
                .map_err(|message| errors.push(Field::TimeInForce, message))
                .ok(),
            None => Some(TimeInForce::default()),
        };

        assemble(symbol, side, order_type, quantity, price, time_in_force, errors)
    }

    /// `true` when the operator explicitly passed a time-in-force.
    pub fn has_explicit_time_in_force(&self) -> bool {
        self.time_in_force.is_some()
    }

    pub fn has_explicit_price(&self) -> bool {
        self.price.is_some()
    }
}

/// Price as seen during validation: missing, rejected, or accepted.
#[derive(Debug, Clone, Copy)]
enum PriceInput {
    Absent,
    Invalid,
    Valid(f64),
}

impl PriceInput {
    fn from_checked(value: Option<f64>) -> Self {
        value.map_or(Self::Invalid, Self::Valid)
    }
}

fn collect_symbol(raw: &str, errors: &mut ValidationErrors) -> Option<Symbol> {
    Symbol::parse(raw)
        .map_err(|violation| errors.push_violation(violation))
        .ok()
}

fn parse_positive(field: Field, raw: &str, errors: &mut ValidationErrors) -> Option<f64> {
    match raw.trim().parse::<f64>() {
        Ok(value) => check_positive(field, value, errors),
        Err(_) => {
            errors.push(field, format!("'{}' is not a number", raw.trim()));
            None
        }
    }
}

fn check_positive(field: Field, value: f64, errors: &mut ValidationErrors) -> Option<f64> {
    if !value.is_finite() {
        errors.push(field, "must be a finite number");
        return None;
    }
    if value <= 0.0 {
        errors.push(field, "must be greater than zero");
        return None;
    }
    Some(value)
}

fn assemble(
    symbol: Option<Symbol>,
    side: Option<OrderSide>,
    order_type: Option<OrderType>,
    quantity: Option<f64>,
    price: PriceInput,
    time_in_force: Option<TimeInForce>,
    mut errors: ValidationErrors,
) -> Result<OrderRequest, ValidationErrors> {
    if let (Some(order_type), PriceInput::Absent) = (order_type, price) {
        if order_type.requires_price() {
            errors.push(Field::Price, format!("price is required for {order_type} orders"));
        }
    }

    match (symbol, side, order_type, quantity, time_in_force) {
        (Some(symbol), Some(side), Some(order_type), Some(quantity), Some(time_in_force))
            if errors.is_empty() =>
        {
            let price = match (order_type, price) {
                (OrderType::Limit, PriceInput::Valid(value)) => Some(value),
                _ => None,
            };
            Ok(OrderRequest {
                symbol,
                side,
                order_type,
                quantity,
                price,
                time_in_force,
            })
        }
        _ => Err(errors),
    }
}
