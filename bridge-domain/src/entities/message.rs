// Canonical output record published to MQTT

use serde::{Deserialize, Serialize};

/// The enriched event record. Field names and omission behavior are part of
/// the downstream contract: optional fields disappear from the JSON entirely
/// when unresolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eventtime: Option<String>,
    pub eventid: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    pub deviceid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub devicename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggersource: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
    pub rfidcodes: Vec<RfidCodeEntry>,
    pub captureurl: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framecount: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accesstoken: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RfidCodeEntry {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
