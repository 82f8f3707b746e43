//! Order command pipeline.
//!
//! Each command runs a short linear state machine:
//!
//! ```text
//! place:  Validating -> PreviewOnly (dry run)
//!         Validating -> Authenticating -> SymbolChecking | SymbolCheckSkipped
//!                    -> AwaitingConfirmation -> Aborted | Submitting -> Reported
//! cancel: Validating -> Authenticating -> AwaitingConfirmation -> Aborted | Submitting -> Reported
//! list:   Validating -> Authenticating -> Submitting -> Reported
//! ```
//!
//! The gateway is produced by a caller-supplied connector that runs only
//! after validation succeeds and only when a network call is needed, so a
//! dry run never builds one. Every gateway call is awaited before the next
//! one starts.

use tracing::{debug, info, warn};

use crate::domain::{
    CancelRequest, ListOrdersRequest, OrderRequest, OrderResult, OrderType, RawOrder, Symbol,
    SymbolSet,
};
use crate::error::PipelineError;
use crate::gateway::ExchangeGateway;

/// Pipeline state, logged at debug level on every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    PreviewOnly,
    Authenticating,
    SymbolChecking,
    SymbolCheckSkipped,
    AwaitingConfirmation,
    Submitting,
    Reported,
    Aborted,
}

impl Stage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::PreviewOnly => "preview_only",
            Self::Authenticating => "authenticating",
            Self::SymbolChecking => "symbol_checking",
            Self::SymbolCheckSkipped => "symbol_check_skipped",
            Self::AwaitingConfirmation => "awaiting_confirmation",
            Self::Submitting => "submitting",
            Self::Reported => "reported",
            Self::Aborted => "aborted",
        }
    }
}

fn enter(command: &'static str, stage: Stage) {
    debug!(command, stage = stage.as_str(), "pipeline stage");
}

/// What the operator is asked to approve.
#[derive(Debug, Clone, Copy)]
pub enum ConfirmPrompt<'a> {
    PlaceOrder(&'a OrderRequest),
    CancelOrder(&'a CancelRequest),
}

/// Yes/no decision before the single mutating call of a command.
pub trait Confirm {
    fn confirm(&mut self, prompt: &ConfirmPrompt<'_>) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&ConfirmPrompt<'_>) -> bool,
{
    fn confirm(&mut self, prompt: &ConfirmPrompt<'_>) -> bool {
        self(prompt)
    }
}

/// Raw `place-order` input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceOrderCommand {
    pub order: RawOrder,
    pub dry_run: bool,
}

/// Raw `cancel-order` input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CancelOrderCommand {
    pub symbol: String,
    pub order_id: String,
}

/// Successful command outcome plus any warnings raised on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandReport<T> {
    pub outcome: T,
    pub warnings: Vec<String>,
}

/// Whether the symbol was checked against the live tradable set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolVerification {
    Verified,
    Unverified,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlaceOrderOutcome {
    /// Validated and previewed; nothing was sent.
    DryRun(OrderRequest),
    /// The operator declined at the prompt.
    Declined(OrderRequest),
    Placed {
        request: OrderRequest,
        result: OrderResult,
        verification: SymbolVerification,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum CancelOrderOutcome {
    Declined(CancelRequest),
    Cancelled {
        request: CancelRequest,
        result: OrderResult,
    },
}

/// Open orders as returned by the venue, in venue order.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenOrders {
    pub filter: Option<Symbol>,
    pub orders: Vec<OrderResult>,
}

/// Validate, verify, confirm and submit one order.
pub async fn place_order<G, C, P>(
    command: PlaceOrderCommand,
    connect: C,
    confirm: &mut P,
) -> Result<CommandReport<PlaceOrderOutcome>, PipelineError>
where
    G: ExchangeGateway,
    C: FnOnce() -> Result<G, PipelineError>,
    P: Confirm + ?Sized,
{
    const COMMAND: &str = "place-order";

    enter(COMMAND, Stage::Validating);
    let request = command.order.validate()?;
    let mut warnings = Vec::new();

    if request.order_type() == OrderType::Market {
        if command.order.has_explicit_price() {
            warnings.push(String::from("price is ignored for MARKET orders"));
        }
        if command.order.has_explicit_time_in_force() {
            warnings.push(format!(
                "time-in-force {} is ignored for MARKET orders",
                request.time_in_force()
            ));
        }
    }
    for warning in &warnings {
        warn!(command = COMMAND, "{warning}");
    }

    if command.dry_run {
        enter(COMMAND, Stage::PreviewOnly);
        info!(symbol = %request.symbol(), "dry run, order not sent");
        return Ok(CommandReport {
            outcome: PlaceOrderOutcome::DryRun(request),
            warnings,
        });
    }

    enter(COMMAND, Stage::Authenticating);
    let gateway = connect()?;

    enter(COMMAND, Stage::SymbolChecking);
    let verification = match fetch_symbol_set(&gateway).await {
        Some(symbols) => {
            if !symbols.contains(request.symbol()) {
                return Err(PipelineError::UnknownSymbol {
                    symbol: request.symbol().to_string(),
                });
            }
            SymbolVerification::Verified
        }
        None => {
            enter(COMMAND, Stage::SymbolCheckSkipped);
            warnings.push(format!(
                "could not verify symbol {} against the exchange; continuing",
                request.symbol()
            ));
            SymbolVerification::Unverified
        }
    };

    enter(COMMAND, Stage::AwaitingConfirmation);
    if !confirm.confirm(&ConfirmPrompt::PlaceOrder(&request)) {
        enter(COMMAND, Stage::Aborted);
        info!("order placement declined");
        return Ok(CommandReport {
            outcome: PlaceOrderOutcome::Declined(request),
            warnings,
        });
    }

    enter(COMMAND, Stage::Submitting);
    let result = gateway.submit_order(&request).await?;

    enter(COMMAND, Stage::Reported);
    Ok(CommandReport {
        outcome: PlaceOrderOutcome::Placed {
            request,
            result,
            verification,
        },
        warnings,
    })
}

/// Validate, confirm and cancel one open order.
pub async fn cancel_order<G, C, P>(
    command: CancelOrderCommand,
    connect: C,
    confirm: &mut P,
) -> Result<CommandReport<CancelOrderOutcome>, PipelineError>
where
    G: ExchangeGateway,
    C: FnOnce() -> Result<G, PipelineError>,
    P: Confirm + ?Sized,
{
    const COMMAND: &str = "cancel-order";

    enter(COMMAND, Stage::Validating);
    let request = CancelRequest::parse(&command.symbol, &command.order_id)?;

    enter(COMMAND, Stage::Authenticating);
    let gateway = connect()?;

    enter(COMMAND, Stage::AwaitingConfirmation);
    if !confirm.confirm(&ConfirmPrompt::CancelOrder(&request)) {
        enter(COMMAND, Stage::Aborted);
        info!("order cancellation declined");
        return Ok(CommandReport {
            outcome: CancelOrderOutcome::Declined(request),
            warnings: Vec::new(),
        });
    }

    enter(COMMAND, Stage::Submitting);
    let result = gateway.cancel_order(&request).await?;

    enter(COMMAND, Stage::Reported);
    Ok(CommandReport {
        outcome: CancelOrderOutcome::Cancelled { request, result },
        warnings: Vec::new(),
    })
}

/// List open orders, optionally for one symbol. Read-only, no confirmation.
pub async fn list_orders<G, C>(
    symbol: Option<&str>,
    connect: C,
) -> Result<CommandReport<OpenOrders>, PipelineError>
where
    G: ExchangeGateway,
    C: FnOnce() -> Result<G, PipelineError>,
{
    const COMMAND: &str = "list-orders";

    enter(COMMAND, Stage::Validating);
    let request = ListOrdersRequest::parse(symbol)?;

    enter(COMMAND, Stage::Authenticating);
    let gateway = connect()?;

    enter(COMMAND, Stage::Submitting);
    let orders = gateway.list_open_orders(request.symbol()).await?;

    enter(COMMAND, Stage::Reported);
    Ok(CommandReport {
        outcome: OpenOrders {
            filter: request.symbol().cloned(),
            orders,
        },
        warnings: Vec::new(),
    })
}

/// Best-effort fetch of the tradable symbol set.
///
/// `None` means "could not verify", which is not the same as an empty set.
pub async fn fetch_symbol_set<G>(gateway: &G) -> Option<SymbolSet>
where
    G: ExchangeGateway + ?Sized,
{
    match gateway.list_tradable_symbols().await {
        Ok(symbols) => Some(symbols),
        Err(error) => {
            warn!(%error, "symbol verification skipped");
            None
        }
    }
}
