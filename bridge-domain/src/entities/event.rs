// Raw event notification and full event detail

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Push notification payload for `deviceEventUpdate` / `eventUpdate`.
/// Carries just enough to fetch the full detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventNotification {
    #[serde(deserialize_with = "de_id")]
    pub device_id: String,
    #[serde(deserialize_with = "de_id")]
    pub event_id: String,
    #[serde(default, rename = "type")]
    pub event_type: Option<String>,
}

/// Full record from `getEvent`. Every field beyond the ids is optional on
/// the wire; enrichment degrades per-field rather than rejecting the event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail {
    #[serde(default, deserialize_with = "de_opt_id")]
    pub device_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub event_id: Option<String>,
    #[serde(default, deserialize_with = "de_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub event_trigger_source: Option<i64>,
    #[serde(default)]
    pub event_classification: Option<i64>,
    #[serde(default)]
    pub rfid_codes: Vec<String>,
    #[serde(default)]
    pub frame_count: Option<i64>,
    #[serde(default)]
    pub access_token: Option<String>,
}

// The gateway is loose about id types (numbers in some payloads, strings in
// others). Accept both and normalize to strings.
fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

// Timestamps arrive either as RFC3339 strings or epoch milliseconds.
// Anything unparseable maps to None so the record is still published
// without an eventtime.
fn de_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Ok(DateTime::parse_from_rfc3339(&text)
            .ok()
            .map(|parsed| parsed.with_timezone(&Utc))),
        Some(Value::Number(number)) => Ok(number
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single())),
        _ => Ok(None),
    }
}
