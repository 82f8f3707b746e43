//! HMAC-SHA256 query signing for the futures REST API.
//!
//! The venue signs the full query string: `hex(HMAC-SHA256(secret, query))`,
//! appended as the final `signature` parameter. The secret never appears in
//! logs or error messages.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::config::ConfigError;

type HmacSha256 = Hmac<Sha256>;

/// Keyed signer, built once per gateway from the API secret.
#[derive(Clone)]
pub struct QuerySigner {
    mac: HmacSha256,
}

impl QuerySigner {
    pub fn new(secret: &str) -> Result<Self, ConfigError> {
        let mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|_| ConfigError::InvalidSecret)?;
        Ok(Self { mac })
    }

    /// Lowercase hex signature of `query`.
    pub fn sign(&self, query: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(query.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Encode `params`, append `recvWindow` and `timestamp`, then the signature.
    pub fn signed_query(
        &self,
        params: &[(&str, String)],
        recv_window_ms: u64,
        timestamp_ms: u64,
    ) -> String {
        let mut query = encode_query(params);
        if !query.is_empty() {
            query.push('&');
        }
        query.push_str(&format!("recvWindow={recv_window_ms}&timestamp={timestamp_ms}"));
        let signature = self.sign(&query);
        format!("{query}&signature={signature}")
    }
}

impl std::fmt::Debug for QuerySigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("QuerySigner(<redacted>)")
    }
}

/// `key=value` pairs joined by `&`, values percent-encoded.
pub fn encode_query(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}
