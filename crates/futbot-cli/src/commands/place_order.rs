use futbot_core::{PlaceOrderCommand, RawOrder};

use crate::cli::PlaceOrderArgs;
use crate::error::CliError;
use crate::output::Report;
use crate::prompt::LineConfirm;

pub async fn run(args: &PlaceOrderArgs) -> Result<Report, CliError> {
    let command = PlaceOrderCommand {
        order: RawOrder {
            symbol: args.symbol.clone(),
            side: args.side.clone(),
            order_type: args.order_type.clone(),
            quantity: args.quantity.clone(),
            price: args.price.clone(),
            time_in_force: args.time_in_force.clone(),
        },
        dry_run: args.dry_run,
    };

    let mut confirm = LineConfirm::stdio();
    let report = futbot_core::place_order(command, super::connect, &mut confirm).await?;
    Ok(Report::PlaceOrder(report))
}
