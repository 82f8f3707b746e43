//! CLI argument definitions for futbot.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `place-order` | Validate, confirm and submit a MARKET or LIMIT order |
//! | `cancel-order` | Confirm and cancel an open order by id |
//! | `list-orders` | List open orders, optionally for one symbol |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json) |
//! | `--log-file` | `logs/futbot.log` | Debug log file |
//! | `--no-log-file` | `false` | Disable the log file |
//!
//! # Examples
//!
//! ```bash
//! futbot place-order --symbol BTCUSDT --side BUY --type MARKET --quantity 0.01
//! futbot place-order --symbol ETHUSDT --side SELL --type LIMIT --quantity 0.5 --price 3500 --dry-run
//! futbot cancel-order --symbol BTCUSDT --order-id 123456
//! futbot list-orders --symbol BTCUSDT --format json
//! ```
//!
//! Side, type, quantity, price, time-in-force and order id are accepted as
//! raw text here and validated by the order model, so every bad field is
//! reported together.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub const DEFAULT_LOG_FILE: &str = "logs/futbot.log";

/// Exit code for a failed parse: `--help`/`--version` exit with 0, every
/// usage error with 1.
pub fn parse_exit_code(error: &clap::Error) -> u8 {
    if error.use_stderr() {
        1
    } else {
        0
    }
}

/// Place and manage orders on the Binance USDT-M Futures testnet.
#[derive(Debug, Parser)]
#[command(
    name = "futbot",
    author,
    version,
    about = "Order CLI for the Binance USDT-M Futures testnet",
    long_about = "futbot places, cancels and lists orders on the Binance USDT-M Futures testnet.\n\
\n\
Credentials are read from BINANCE_API_KEY and BINANCE_API_SECRET, either in the\n\
environment or in a .env file. Orders are validated locally and confirmed\n\
interactively before anything is sent.\n\
\n\
Use 'futbot <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Append debug-level logs to this file.
    #[arg(long, global = true, value_name = "PATH", default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Log to the console only.
    #[arg(long, global = true, default_value_t = false)]
    pub no_log_file: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Log file path, unless file logging is disabled.
    pub fn log_file(&self) -> Option<&PathBuf> {
        (!self.no_log_file).then_some(&self.log_file)
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables.
    Table,
    /// Single JSON object.
    Json,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Place a MARKET or LIMIT order.
    ///
    /// # Examples
    ///
    ///   futbot place-order --symbol BTCUSDT --side BUY --type MARKET --quantity 0.01
    ///   futbot place-order --symbol ETHUSDT --side SELL --type LIMIT --quantity 0.5 --price 3500 --time-in-force IOC
    PlaceOrder(PlaceOrderArgs),

    /// Cancel an open order.
    ///
    /// # Examples
    ///
    ///   futbot cancel-order --symbol BTCUSDT --order-id 123456
    CancelOrder(CancelOrderArgs),

    /// List open orders.
    ///
    /// # Examples
    ///
    ///   futbot list-orders
    ///   futbot list-orders --symbol BTCUSDT
    ListOrders(ListOrdersArgs),
}

impl Command {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PlaceOrder(_) => "place-order",
            Self::CancelOrder(_) => "cancel-order",
            Self::ListOrders(_) => "list-orders",
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct PlaceOrderArgs {
    /// Trading pair, e.g. BTCUSDT.
    #[arg(long, short = 's')]
    pub symbol: String,

    /// Order side: BUY or SELL.
    #[arg(long)]
    pub side: String,

    /// Order type: MARKET or LIMIT.
    #[arg(long = "type", short = 't', value_name = "TYPE")]
    pub order_type: String,

    /// Order quantity, greater than zero.
    #[arg(long, short = 'q', allow_hyphen_values = true)]
    pub quantity: String,

    /// Limit price, required for LIMIT orders.
    #[arg(long, short = 'p', allow_hyphen_values = true)]
    pub price: Option<String>,

    /// Time in force for LIMIT orders: GTC (default), IOC or FOK.
    #[arg(long)]
    pub time_in_force: Option<String>,

    /// Validate and preview only; nothing is sent.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Args)]
pub struct CancelOrderArgs {
    /// Trading pair of the order.
    #[arg(long, short = 's')]
    pub symbol: String,

    /// Venue order id.
    #[arg(long, allow_hyphen_values = true)]
    pub order_id: String,
}

#[derive(Debug, Clone, Args)]
pub struct ListOrdersArgs {
    /// Only list orders for this trading pair.
    #[arg(long, short = 's')]
    pub symbol: Option<String>,
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::*;

    #[test]
    fn place_order_keeps_raw_values_for_validation() {
        let cli = Cli::try_parse_from([
            "futbot",
            "place-order",
            "--symbol",
            "btcusdt",
            "--side",
            "buy",
            "--type",
            "MARKET",
            "--quantity",
            "-1",
            "--dry-run",
        ])
        .expect("arguments should parse");

        let Command::PlaceOrder(args) = cli.command else {
            panic!("expected place-order");
        };
        assert_eq!(args.symbol, "btcusdt");
        assert_eq!(args.side, "buy");
        assert_eq!(args.quantity, "-1");
        assert!(args.dry_run);
        assert_eq!(args.price, None);
    }

    #[test]
    fn defaults_to_table_output_and_log_file() {
        let cli = Cli::try_parse_from(["futbot", "list-orders"]).expect("arguments should parse");
        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(
            cli.log_file().map(|path| path.to_string_lossy().into_owned()),
            Some(String::from(DEFAULT_LOG_FILE))
        );
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::try_parse_from([
            "futbot",
            "list-orders",
            "--symbol",
            "ETHUSDT",
            "--format",
            "json",
            "--no-log-file",
        ])
        .expect("arguments should parse");
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.log_file().is_none());
    }

    #[test]
    fn missing_required_argument_is_a_usage_error() {
        let error = Cli::try_parse_from(["futbot", "cancel-order", "--symbol", "BTCUSDT"])
            .expect_err("order id is required");
        assert_eq!(error.kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(parse_exit_code(&error), 1);
    }

    #[test]
    fn unknown_format_value_exits_with_one() {
        let error = Cli::try_parse_from(["futbot", "list-orders", "--format", "yaml"])
            .expect_err("yaml is not a format");
        assert_eq!(error.kind(), ErrorKind::InvalidValue);
        assert_eq!(parse_exit_code(&error), 1);
    }

    #[test]
    fn help_and_version_exit_with_zero() {
        let help = Cli::try_parse_from(["futbot", "--help"]).expect_err("help short-circuits");
        assert_eq!(help.kind(), ErrorKind::DisplayHelp);
        assert_eq!(parse_exit_code(&help), 0);

        let version =
            Cli::try_parse_from(["futbot", "--version"]).expect_err("version short-circuits");
        assert_eq!(version.kind(), ErrorKind::DisplayVersion);
        assert_eq!(parse_exit_code(&version), 0);
    }
}
