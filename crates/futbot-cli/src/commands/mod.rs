mod cancel_order;
mod list_orders;
mod place_order;

use futbot_core::{BinanceFuturesGateway, GatewayConfig, PipelineError};
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::output::Report;

pub async fn run(cli: &Cli) -> Result<Report, CliError> {
    match &cli.command {
        Command::PlaceOrder(args) => place_order::run(args).await,
        Command::CancelOrder(args) => cancel_order::run(args).await,
        Command::ListOrders(args) => list_orders::run(args).await,
    }
}

/// Load credentials and build the live gateway. Only runs once a command
/// actually needs the network.
fn connect() -> Result<BinanceFuturesGateway, PipelineError> {
    let config = GatewayConfig::from_env()?;
    debug!(base_url = %config.base_url, "connecting to exchange");
    Ok(BinanceFuturesGateway::connect(config)?)
}
