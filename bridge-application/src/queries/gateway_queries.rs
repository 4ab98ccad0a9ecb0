// Typed wrappers over the gateway request/response protocol
//
// Each remote procedure takes a request object and answers with a payload
// whose `error` field (if any) has already been mapped to RpcError by the
// transport. The wrappers only deserialize the success shape.

use serde_json::{json, Value};

use bridge_domain::{
    Device, DeviceRef, EventDetail, GatewayRpc, RfidCodeRef, RfidProfile, TransitPolicyRef,
};

use crate::AppError;

pub async fn get_devices(gateway: &dyn GatewayRpc) -> Result<Vec<DeviceRef>, AppError> {
    let response = gateway.call("getDevices", json!({ "subscribe": true })).await?;
    Ok(serde_json::from_value(response)?)
}

pub async fn get_device(gateway: &dyn GatewayRpc, device_id: &str) -> Result<Device, AppError> {
    let response = gateway
        .call("getDevice", json!({ "subscribe": true, "deviceId": device_id }))
        .await?;
    Ok(serde_json::from_value(response)?)
}

pub async fn get_last_seen_rfid_codes(
    gateway: &dyn GatewayRpc,
    device_id: &str,
) -> Result<Vec<RfidCodeRef>, AppError> {
    let response = gateway
        .call("getLastSeenRfidCodesByDevice", json!({ "deviceId": device_id }))
        .await?;
    Ok(serde_json::from_value(response)?)
}

pub async fn get_rfid_profile(
    gateway: &dyn GatewayRpc,
    rfid_code: &str,
) -> Result<RfidProfile, AppError> {
    let response = gateway
        .call("getRfidProfile", json!({ "rfidCode": rfid_code }))
        .await?;
    Ok(serde_json::from_value(response)?)
}

pub async fn get_device_transit_policies(
    gateway: &dyn GatewayRpc,
    device_id: &str,
) -> Result<Vec<TransitPolicyRef>, AppError> {
    let response = gateway
        .call("getDeviceTransitPolicies", json!({ "deviceId": device_id }))
        .await?;
    Ok(serde_json::from_value(response)?)
}

pub async fn get_device_transit_policy(
    gateway: &dyn GatewayRpc,
    policy_id: i64,
) -> Result<Value, AppError> {
    let response = gateway
        .call(
            "getDeviceTransitPolicy",
            json!({ "deviceTransitPolicyId": policy_id }),
        )
        .await?;
    Ok(response)
}

pub async fn get_events(gateway: &dyn GatewayRpc) -> Result<Vec<Value>, AppError> {
    let response = gateway.call("getEvents", json!({ "subscribe": true })).await?;
    Ok(serde_json::from_value(response)?)
}

pub async fn get_device_events(
    gateway: &dyn GatewayRpc,
    device_id: &str,
) -> Result<Vec<Value>, AppError> {
    let response = gateway
        .call("getDeviceEvents", json!({ "subscribe": true, "deviceId": device_id }))
        .await?;
    Ok(serde_json::from_value(response)?)
}

pub async fn get_event(
    gateway: &dyn GatewayRpc,
    device_id: &str,
    event_id: &str,
) -> Result<EventDetail, AppError> {
    let response = gateway
        .call(
            "getEvent",
            json!({ "subscribe": true, "deviceId": device_id, "eventId": event_id }),
        )
        .await?;
    Ok(serde_json::from_value(response)?)
}
