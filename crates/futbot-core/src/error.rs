use std::fmt::{Display, Formatter};

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::gateway::{GatewayError, GatewayErrorKind};

/// Request field a validation rule is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Symbol,
    Side,
    OrderType,
    Quantity,
    Price,
    TimeInForce,
    OrderId,
}

impl Field {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Symbol => "symbol",
            Self::Side => "side",
            Self::OrderType => "order_type",
            Self::Quantity => "quantity",
            Self::Price => "price",
            Self::TimeInForce => "time_in_force",
            Self::OrderId => "order_id",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single violated rule, attributed to the field that broke it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{field}: {message}")]
pub struct FieldViolation {
    pub field: Field,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Every rule a raw request violated, in field order.
///
/// Construction of request types never stops at the first problem; callers
/// get the full list so the operator can fix all of them in one go.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: Field, message: impl Into<String>) {
        self.violations.push(FieldViolation::new(field, message));
    }

    pub fn push_violation(&mut self, violation: FieldViolation) {
        self.violations.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Returns `true` when at least one violation is attributed to `field`.
    pub fn has_field(&self, field: Field) -> bool {
        self.violations.iter().any(|violation| violation.field == field)
    }

    pub fn messages_for(&self, field: Field) -> Vec<&str> {
        self.violations
            .iter()
            .filter(|violation| violation.field == field)
            .map(|violation| violation.message.as_str())
            .collect()
    }
}

impl From<FieldViolation> for ValidationErrors {
    fn from(value: FieldViolation) -> Self {
        Self {
            violations: vec![value],
        }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let rendered = self
            .violations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&rendered)
    }
}

impl std::error::Error for ValidationErrors {}

/// Terminal failure of a single command invocation.
///
/// Every variant ends the invocation with exit code 1. The one degradation
/// that is not an error, a failed symbol-set fetch, never reaches this type.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("could not reach the exchange: {0}")]
    Connectivity(String),

    #[error("exchange rejected the request: {message} (code {code})")]
    RemoteRejection { code: i64, message: String },

    #[error("symbol '{symbol}' is not an actively traded symbol on the exchange")]
    UnknownSymbol { symbol: String },
}

impl PipelineError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "pipeline.validation",
            Self::Configuration(_) => "pipeline.configuration",
            Self::Connectivity(_) => "pipeline.connectivity",
            Self::RemoteRejection { .. } => "pipeline.remote_rejection",
            Self::UnknownSymbol { .. } => "pipeline.unknown_symbol",
        }
    }

    pub fn violations(&self) -> Option<&[FieldViolation]> {
        match self {
            Self::Validation(errors) => Some(errors.violations()),
            _ => None,
        }
    }
}

impl From<GatewayError> for PipelineError {
    fn from(error: GatewayError) -> Self {
        match error.kind() {
            GatewayErrorKind::Connectivity => Self::Connectivity(error.message().to_owned()),
            GatewayErrorKind::Rejected => Self::RemoteRejection {
                code: error.code().unwrap_or_default(),
                message: error.message().to_owned(),
            },
        }
    }
}
