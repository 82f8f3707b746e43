use futbot_core::PipelineError;
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Every failure exits with 1; success, dry run and declined prompts exit with 0.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Pipeline(_) => 1,
            Self::Logging(_) => 1,
            Self::Serialization(_) => 1,
            Self::Io(_) => 1,
        }
    }

    /// Stable machine-readable code for JSON error output.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Pipeline(error) => error.code(),
            Self::Logging(_) => "cli.logging",
            Self::Serialization(_) => "cli.serialization",
            Self::Io(_) => "cli.io",
        }
    }
}
