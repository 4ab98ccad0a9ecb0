// Device and RFID reference records returned by the gateway

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Full device record from `getDevice`. The gateway returns more metadata
/// than the bridge needs; unrecognized fields are retained in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub device_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// List element from `getDevices`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRef {
    pub device_id: String,
}

/// List element from `getLastSeenRfidCodesByDevice`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RfidCodeRef {
    pub rfid_code: String,
}

/// Response from `getRfidProfile`. A tag without an assigned label is valid.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RfidProfile {
    #[serde(default)]
    pub label: Option<String>,
}

/// List element from `getDeviceTransitPolicies`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitPolicyRef {
    pub device_transit_policy_id: i64,
}
