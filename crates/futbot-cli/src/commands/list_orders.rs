use crate::cli::ListOrdersArgs;
use crate::error::CliError;
use crate::output::Report;

pub async fn run(args: &ListOrdersArgs) -> Result<Report, CliError> {
    let report = futbot_core::list_orders(args.symbol.as_deref(), super::connect).await?;
    Ok(Report::ListOrders(report))
}
