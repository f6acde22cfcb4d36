//! Slot payload codec.
//!
//! Collections are written inside a version-tagged envelope:
//!
//! ```text
//! {"version": 1, "savedAt": "<RFC 3339>", "data": [ ... ]}
//! ```
//!
//! A bare JSON array is the untagged format written by the browser edition
//! and is read as version 0.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use vibemail_common::{Error, Result};

/// Current payload version.
pub const CODEC_VERSION: u32 = 1;

/// Payloads larger than this are rejected before parsing (16 MB).
const MAX_PAYLOAD_SIZE: usize = 16 * 1024 * 1024;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeRef<'a, T> {
    version: u32,
    saved_at: DateTime<Utc>,
    data: &'a [T],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeHeader {
    version: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<T> {
    #[allow(dead_code)]
    version: u32,
    #[allow(dead_code)]
    saved_at: Option<DateTime<Utc>>,
    data: Vec<T>,
}

/// A decoded collection and the version it was stored with
#[derive(Debug)]
pub struct Decoded<T> {
    pub items: Vec<T>,
    pub version: u32,
}

impl<T> Decoded<T> {
    /// Whether the payload predates the current version
    pub fn needs_migration(&self) -> bool {
        self.version < CODEC_VERSION
    }
}

/// Serializes a collection into a versioned envelope.
pub fn encode<T: Serialize>(items: &[T], saved_at: DateTime<Utc>) -> Result<Vec<u8>> {
    let envelope = EnvelopeRef {
        version: CODEC_VERSION,
        saved_at,
        data: items,
    };
    serde_json::to_vec(&envelope).map_err(|e| Error::Serialization(e.to_string()))
}

/// Deserializes a collection, validating the version and record shape.
///
/// # Errors
/// - payload larger than the size cap
/// - unsupported envelope version
/// - records that do not match the schema
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<Decoded<T>> {
    if bytes.len() > MAX_PAYLOAD_SIZE {
        return Err(Error::Storage(format!(
            "payload size {} exceeds maximum {}",
            bytes.len(),
            MAX_PAYLOAD_SIZE
        )));
    }

    let value: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|e| Error::Serialization(format!("malformed payload: {}", e)))?;

    match value {
        serde_json::Value::Array(_) => {
            let items = serde_json::from_value(value)
                .map_err(|e| Error::Serialization(format!("schema mismatch: {}", e)))?;
            Ok(Decoded { items, version: 0 })
        }
        serde_json::Value::Object(_) => {
            let header: EnvelopeHeader = serde_json::from_value(value.clone())
                .map_err(|e| Error::Serialization(format!("missing envelope version: {}", e)))?;

            if header.version != CODEC_VERSION {
                return Err(Error::Storage(format!(
                    "unsupported payload version: {} (expected {})",
                    header.version, CODEC_VERSION
                )));
            }

            let envelope: Envelope<T> = serde_json::from_value(value)
                .map_err(|e| Error::Serialization(format!("schema mismatch: {}", e)))?;
            Ok(Decoded {
                items: envelope.data,
                version: header.version,
            })
        }
        _ => Err(Error::Serialization(
            "payload is neither an envelope nor an array".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Campaign, EmailAccount};
    use crate::seed;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_envelope_round_trip() {
        let accounts = seed::accounts();
        let bytes = encode(&accounts, Utc::now()).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["version"], CODEC_VERSION);
        assert!(value["savedAt"].is_string());

        let decoded: Decoded<EmailAccount> = decode(&bytes).unwrap();
        assert_eq!(decoded.items, accounts);
        assert!(!decoded.needs_migration());
    }

    #[test]
    fn test_campaign_round_trip_keeps_last_run() {
        let mut campaigns = seed::campaigns();
        campaigns[0].last_run_timestamp = "2024-05-01T12:00:00.123Z".parse().ok();

        let bytes = encode(&campaigns, Utc::now()).unwrap();
        let decoded: Decoded<Campaign> = decode(&bytes).unwrap();
        assert_eq!(decoded.items, campaigns);
    }

    #[test]
    fn test_legacy_array_is_version_zero() {
        let legacy = br#"[{"id":"1","email":"sales@vibe-agency.com","provider":"google",
            "status":"active","warmupEnabled":true,"dailyLimit":50,"sentToday":12}]"#;

        let decoded: Decoded<EmailAccount> = decode(legacy).unwrap();
        assert_eq!(decoded.version, 0);
        assert!(decoded.needs_migration());
        assert_eq!(decoded.items[0].sent_today, 12);
    }

    #[test]
    fn test_unknown_version_rejected() {
        let future = br#"{"version": 9, "data": []}"#;
        let err = decode::<EmailAccount>(future).unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }

    #[test]
    fn test_schema_mismatch_rejected() {
        let wrong = br#"{"version": 1, "data": [{"id": "1", "email": 42}]}"#;
        assert!(matches!(
            decode::<EmailAccount>(wrong).unwrap_err(),
            Error::Serialization(_)
        ));

        assert!(decode::<EmailAccount>(b"\"just a string\"").is_err());
        assert!(decode::<EmailAccount>(b"{not json").is_err());
    }
}
