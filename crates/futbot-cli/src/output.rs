use std::fmt::Write as _;

use futbot_core::{
    CancelOrderOutcome, CommandReport, ConfirmPrompt, OpenOrders, OrderRequest, OrderResult,
    OrderType, PlaceOrderOutcome, SymbolVerification, NOT_AVAILABLE,
};
use serde_json::{json, Value};
use time::OffsetDateTime;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::metadata::{format_rfc3339, Invocation};

/// Successful outcome of one command, ready for rendering.
#[derive(Debug, Clone)]
pub enum Report {
    PlaceOrder(CommandReport<PlaceOrderOutcome>),
    CancelOrder(CommandReport<CancelOrderOutcome>),
    ListOrders(CommandReport<OpenOrders>),
}

impl Report {
    pub fn status(&self) -> &'static str {
        match self {
            Self::PlaceOrder(report) => match report.outcome {
                PlaceOrderOutcome::DryRun(_) => "dry_run",
                PlaceOrderOutcome::Declined(_) => "declined",
                PlaceOrderOutcome::Placed { .. } => "placed",
            },
            Self::CancelOrder(report) => match report.outcome {
                CancelOrderOutcome::Declined(_) => "declined",
                CancelOrderOutcome::Cancelled { .. } => "cancelled",
            },
            Self::ListOrders(_) => "ok",
        }
    }

    pub fn warnings(&self) -> &[String] {
        match self {
            Self::PlaceOrder(report) => &report.warnings,
            Self::CancelOrder(report) => &report.warnings,
            Self::ListOrders(report) => &report.warnings,
        }
    }

    fn data(&self) -> Result<Value, CliError> {
        let data = match self {
            Self::PlaceOrder(report) => match &report.outcome {
                PlaceOrderOutcome::DryRun(request) | PlaceOrderOutcome::Declined(request) => {
                    json!({ "request": request, "estimated_value": request.notional() })
                }
                PlaceOrderOutcome::Placed {
                    request,
                    result,
                    verification,
                } => json!({
                    "request": request,
                    "result": result,
                    "total_value": result.total_value(),
                    "symbol_verified": *verification == SymbolVerification::Verified,
                }),
            },
            Self::CancelOrder(report) => match &report.outcome {
                CancelOrderOutcome::Declined(request) => json!({ "request": request }),
                CancelOrderOutcome::Cancelled { request, result } => {
                    json!({ "request": request, "result": result })
                }
            },
            Self::ListOrders(report) => json!({
                "symbol": report.outcome.filter,
                "count": report.outcome.orders.len(),
                "orders": serde_json::to_value(&report.outcome.orders)?,
            }),
        };
        Ok(data)
    }
}

pub fn render(
    report: &Report,
    format: OutputFormat,
    invocation: &Invocation,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => println!("{}", render_json(report, invocation)?),
        OutputFormat::Table => print!("{}", render_table(report, OffsetDateTime::now_utc())),
    }
    Ok(())
}

/// JSON error object for `--format json`; the one-line cause still goes to stderr.
pub fn render_error(error: &CliError, invocation: &Invocation) -> Result<String, CliError> {
    let violations = match error {
        CliError::Pipeline(pipeline) => pipeline
            .violations()
            .map(serde_json::to_value)
            .transpose()?,
        _ => None,
    };

    let payload = json!({
        "invocation": invocation,
        "status": "error",
        "error": {
            "code": error.code(),
            "message": error.to_string(),
            "violations": violations,
        },
    });
    Ok(serde_json::to_string_pretty(&payload)?)
}

pub fn render_json(report: &Report, invocation: &Invocation) -> Result<String, CliError> {
    let payload = json!({
        "invocation": invocation,
        "status": report.status(),
        "warnings": report.warnings(),
        "data": report.data()?,
    });
    Ok(serde_json::to_string_pretty(&payload)?)
}

pub fn render_table(report: &Report, now: OffsetDateTime) -> String {
    let mut out = String::new();

    match report {
        Report::PlaceOrder(report) => match &report.outcome {
            PlaceOrderOutcome::DryRun(request) => {
                out.push_str(&order_preview(request));
                out.push_str("\nDry run: order validated, nothing was sent.\n");
            }
            PlaceOrderOutcome::Declined(_) => {
                out.push_str("Order placement cancelled by user.\n");
            }
            PlaceOrderOutcome::Placed {
                result,
                verification,
                ..
            } => {
                out.push_str(&result_table("Order Placed", result, now));
                if *verification == SymbolVerification::Unverified {
                    out.push_str("\nNote: symbol could not be verified against the exchange.\n");
                }
            }
        },
        Report::CancelOrder(report) => match &report.outcome {
            CancelOrderOutcome::Declined(_) => {
                out.push_str("Order cancellation cancelled by user.\n");
            }
            CancelOrderOutcome::Cancelled { result, .. } => {
                out.push_str(&result_table("Order Cancelled", result, now));
            }
        },
        Report::ListOrders(report) => out.push_str(&open_orders_table(&report.outcome)),
    }

    if !report.warnings().is_empty() {
        out.push_str("\nWarnings:\n");
        for warning in report.warnings() {
            let _ = writeln!(out, "  - {warning}");
        }
    }

    out
}

/// Text shown above the confirmation question.
pub fn confirmation_preview(prompt: &ConfirmPrompt<'_>) -> String {
    match prompt {
        ConfirmPrompt::PlaceOrder(request) => order_preview(request),
        ConfirmPrompt::CancelOrder(request) => {
            let mut out = String::from("Cancel Order\n");
            push_row(&mut out, "Symbol", request.symbol());
            push_row(&mut out, "Order ID", request.order_id());
            out
        }
    }
}

pub fn order_preview(request: &OrderRequest) -> String {
    let mut out = String::from("Order Preview\n");
    push_row(&mut out, "Symbol", request.symbol());
    push_row(&mut out, "Side", request.side());
    push_row(&mut out, "Type", request.order_type());
    push_row(&mut out, "Quantity", format_quantity(request.quantity()));
    if request.order_type() == OrderType::Limit {
        push_row(&mut out, "Price", format_optional_quantity(request.price()));
        push_row(&mut out, "Time in Force", request.time_in_force());
    }
    if let Some(notional) = request.notional() {
        push_row(&mut out, "Est. Value", format!("{notional:.2} USDT"));
    }
    out
}

pub fn result_table(title: &str, result: &OrderResult, now: OffsetDateTime) -> String {
    let mut out = format!("{title}\n");
    push_row(&mut out, "Order ID", text(result.order_id.map(|id| id.to_string())));
    push_row(&mut out, "Status", text(result.status.clone()));
    push_row(&mut out, "Symbol", text(result.symbol.clone()));
    push_row(&mut out, "Side", text(result.side.clone()));
    push_row(&mut out, "Type", text(result.order_type.clone()));
    push_row(&mut out, "Executed Qty", format_optional_quantity(result.executed_quantity));
    push_row(&mut out, "Avg Price", format_average_price(result.average_price));
    if let Some(total) = result.total_value() {
        push_row(&mut out, "Total Value", format!("{total:.2} USDT"));
    }
    push_row(&mut out, "Timestamp", format_rfc3339(now));
    out
}

pub fn open_orders_table(open: &OpenOrders) -> String {
    if open.orders.is_empty() {
        return match &open.filter {
            Some(symbol) => format!("No open orders for {symbol}.\n"),
            None => String::from("No open orders.\n"),
        };
    }

    let mut out = format!(
        "{:<14} {:<12} {:<5} {:<7} {:>14} {:>14} {:>14} {:<10} {:<4}\n",
        "ORDER ID", "SYMBOL", "SIDE", "TYPE", "PRICE", "ORIG QTY", "EXECUTED", "STATUS", "TIF"
    );
    for order in &open.orders {
        let _ = writeln!(
            out,
            "{:<14} {:<12} {:<5} {:<7} {:>14} {:>14} {:>14} {:<10} {:<4}",
            text(order.order_id.map(|id| id.to_string())),
            text(order.symbol.clone()),
            text(order.side.clone()),
            text(order.order_type.clone()),
            format_optional_quantity(order.price),
            format_optional_quantity(order.original_quantity),
            format_optional_quantity(order.executed_quantity),
            text(order.status.clone()),
            text(order.time_in_force.clone()),
        );
    }
    let _ = writeln!(out, "\n{} open order(s)", open.orders.len());
    out
}

/// Up to 8 decimals with trailing zeros removed: `1.50000000` -> `1.5`.
pub fn format_quantity(value: f64) -> String {
    trim_decimals(&format!("{value:.8}"))
}

fn trim_decimals(rendered: &str) -> String {
    let trimmed = rendered.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        String::from("0")
    } else {
        trimmed.to_owned()
    }
}

fn format_optional_quantity(value: Option<f64>) -> String {
    value.map_or_else(|| String::from(NOT_AVAILABLE), format_quantity)
}

/// Up to four decimals in USDT (`3200.5 USDT`), or N/A when missing or not positive.
pub fn format_average_price(value: Option<f64>) -> String {
    match value {
        Some(price) if price > 0.0 => {
            format!("{} USDT", trim_decimals(&format!("{price:.4}")))
        }
        _ => String::from(NOT_AVAILABLE),
    }
}

fn text(value: Option<String>) -> String {
    value.unwrap_or_else(|| String::from(NOT_AVAILABLE))
}

fn push_row(out: &mut String, label: &str, value: impl std::fmt::Display) {
    let _ = writeln!(out, "  {label:<14}: {value}");
}
