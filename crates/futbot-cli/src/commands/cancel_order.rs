use futbot_core::CancelOrderCommand;

use crate::cli::CancelOrderArgs;
use crate::error::CliError;
use crate::output::Report;
use crate::prompt::LineConfirm;

pub async fn run(args: &CancelOrderArgs) -> Result<Report, CliError> {
    let command = CancelOrderCommand {
        symbol: args.symbol.clone(),
        order_id: args.order_id.clone(),
    };

    let mut confirm = LineConfirm::stdio();
    let report = futbot_core::cancel_order(command, super::connect, &mut confirm).await?;
    Ok(Report::CancelOrder(report))
}
