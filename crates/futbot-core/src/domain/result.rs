use serde::Serialize;
use serde_json::{Map, Value};

/// Display marker for fields the venue did not report or that did not parse.
pub const NOT_AVAILABLE: &str = "N/A";

/// Venue's view of one order, shaped for display.
///
/// Every field is optional: `None` stands for "not available". Shaping a
/// response never fails, because a success response with odd fields is still
/// a success.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderResult {
    pub order_id: Option<u64>,
    pub status: Option<String>,
    pub symbol: Option<String>,
    pub side: Option<String>,
    pub order_type: Option<String>,
    pub executed_quantity: Option<f64>,
    pub average_price: Option<f64>,
    pub time_in_force: Option<String>,
    pub original_quantity: Option<f64>,
    pub price: Option<f64>,
}

impl OrderResult {
    /// Shape a raw venue response. Non-object values yield an empty result.
    pub fn from_response(response: &Value) -> Self {
        let Some(fields) = response.as_object() else {
            return Self::default();
        };

        Self {
            order_id: id_field(fields, "orderId"),
            status: text_field(fields, "status"),
            symbol: text_field(fields, "symbol"),
            side: text_field(fields, "side"),
            order_type: text_field(fields, "type"),
            executed_quantity: decimal_field(fields, "executedQty"),
            average_price: decimal_field(fields, "avgPrice"),
            time_in_force: text_field(fields, "timeInForce"),
            original_quantity: decimal_field(fields, "origQty"),
            price: decimal_field(fields, "price"),
        }
    }

    /// `executed_quantity * average_price` when both are known and positive.
    pub fn total_value(&self) -> Option<f64> {
        match (self.executed_quantity, self.average_price) {
            (Some(quantity), Some(price)) if quantity > 0.0 && price > 0.0 => {
                Some(quantity * price)
            }
            _ => None,
        }
    }
}

fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn decimal_field(fields: &Map<String, Value>, key: &str) -> Option<f64> {
    let value = match fields.get(key)? {
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        Value::Number(number) => number.as_f64()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

fn id_field(fields: &Map<String, Value>, key: &str) -> Option<u64> {
    match fields.get(key)? {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    }
}
