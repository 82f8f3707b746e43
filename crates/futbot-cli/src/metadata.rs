use std::fmt::{Display, Formatter};

use serde::{Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

/// Invocation identifier (UUID v4), shared by the log span and the JSON report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct InvocationId(Uuid);

impl InvocationId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for InvocationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Per-invocation context attached to every rendered report.
#[derive(Debug, Clone, Serialize)]
pub struct Invocation {
    pub invocation_id: InvocationId,
    pub command: &'static str,
    #[serde(serialize_with = "serialize_rfc3339")]
    pub started_at: OffsetDateTime,
}

impl Invocation {
    pub fn start(command: &'static str) -> Self {
        Self {
            invocation_id: InvocationId::new_v4(),
            command,
            started_at: OffsetDateTime::now_utc(),
        }
    }
}

pub fn format_rfc3339(value: OffsetDateTime) -> String {
    value
        .format(&Rfc3339)
        .unwrap_or_else(|_| value.unix_timestamp().to_string())
}

fn serialize_rfc3339<S>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_rfc3339(*value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invocation_id_is_uuid_v4() {
        let id = InvocationId::new_v4();
        assert_eq!(id.0.get_version_num(), 4);
        assert_eq!(id.to_string().len(), 36);
    }

    #[test]
    fn started_at_serializes_as_rfc3339() {
        let invocation = Invocation {
            invocation_id: InvocationId::new_v4(),
            command: "list-orders",
            started_at: OffsetDateTime::UNIX_EPOCH,
        };

        let value = serde_json::to_value(&invocation).expect("serializes");
        assert_eq!(value["started_at"], "1970-01-01T00:00:00Z");
        assert_eq!(value["command"], "list-orders");
    }
}
