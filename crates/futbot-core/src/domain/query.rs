use serde::Serialize;

use crate::domain::Symbol;
use crate::error::{Field, ValidationErrors};

/// Validated request to cancel one open order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CancelRequest {
    symbol: Symbol,
    order_id: u64,
}

impl CancelRequest {
    pub fn new(symbol: &str, order_id: i64) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let symbol = Symbol::parse(symbol)
            .map_err(|violation| errors.push_violation(violation))
            .ok();
        let order_id = check_order_id(order_id, &mut errors);
        finish(symbol, order_id, errors)
    }

    /// Validate raw command-line values, collecting all violations.
    pub fn parse(symbol: &str, order_id: &str) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let symbol = Symbol::parse(symbol)
            .map_err(|violation| errors.push_violation(violation))
            .ok();
        let order_id = match order_id.trim().parse::<i64>() {
            Ok(value) => check_order_id(value, &mut errors),
            Err(_) => {
                errors.push(
                    Field::OrderId,
                    format!("'{}' is not a whole number", order_id.trim()),
                );
                None
            }
        };
        finish(symbol, order_id, errors)
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub const fn order_id(&self) -> u64 {
        self.order_id
    }
}

fn check_order_id(value: i64, errors: &mut ValidationErrors) -> Option<u64> {
    match u64::try_from(value) {
        Ok(id) if id > 0 => Some(id),
        _ => {
            errors.push(Field::OrderId, "order id must be a positive integer");
            None
        }
    }
}

fn finish(
    symbol: Option<Symbol>,
    order_id: Option<u64>,
    errors: ValidationErrors,
) -> Result<CancelRequest, ValidationErrors> {
    match (symbol, order_id) {
        (Some(symbol), Some(order_id)) if errors.is_empty() => {
            Ok(CancelRequest { symbol, order_id })
        }
        _ => Err(errors),
    }
}

/// Open-order listing, optionally narrowed to one symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListOrdersRequest {
    symbol: Option<Symbol>,
}

impl ListOrdersRequest {
    pub fn parse(symbol: Option<&str>) -> Result<Self, ValidationErrors> {
        let symbol = symbol.map(Symbol::parse).transpose()?;
        Ok(Self { symbol })
    }

    pub fn symbol(&self) -> Option<&Symbol> {
        self.symbol.as_ref()
    }
}
