mod cli;
mod commands;
mod error;
mod logging;
mod metadata;
mod output;
mod prompt;

use std::process::ExitCode;

use clap::Parser;
use tracing::Instrument;

use crate::cli::{parse_exit_code, Cli, OutputFormat};
use crate::error::CliError;
use crate::metadata::Invocation;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return ExitCode::from(parse_exit_code(&error));
        }
    };

    let invocation = Invocation::start(cli.command.name());

    if let Err(error) = logging::init(cli.log_file().map(|path| path.as_path())) {
        let _ = logging::init(None);
        tracing::warn!(%error, "file logging disabled");
    }

    let span = tracing::info_span!(
        "invocation",
        id = %invocation.invocation_id,
        command = invocation.command
    );

    match run(&cli, &invocation).instrument(span).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::debug!(code = error.code(), %error, "command failed");
            eprintln!("error: {error}");
            if cli.format == OutputFormat::Json {
                if let Ok(payload) = output::render_error(&error, &invocation) {
                    println!("{payload}");
                }
            }
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run(cli: &Cli, invocation: &Invocation) -> Result<(), CliError> {
    let report = commands::run(cli).await?;
    output::render(&report, cli.format, invocation)
}
