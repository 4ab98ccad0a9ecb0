// Reference cache rebuild, run once per successful connection

use tracing::{debug, info, warn};

use crate::queries::gateway_queries;
use crate::{AppError, AppState};

#[derive(Debug, Clone, Copy)]
pub struct RefreshSummary {
    pub devices: usize,
    pub tags: usize,
}

/// Walks the device list, device details and per-device RFID tags and
/// repopulates the cache. A failed device or RFID fetch fails the routine;
/// the caller decides what that means (currently: log and wait for the next
/// reconnect, enrichment keeps degrading gracefully in the meantime).
pub async fn refresh_reference_data(state: &AppState) -> Result<RefreshSummary, AppError> {
    // Discard old entries up front so a rebuild never merges with stale data.
    state.cache.write().await.clear();

    info!("retrieving devices (flaps) from gateway");
    let devices = gateway_queries::get_devices(state.gateway.as_ref()).await?;
    info!("found {} device(s)", devices.len());

    for device_ref in &devices {
        let device =
            gateway_queries::get_device(state.gateway.as_ref(), &device_ref.device_id).await?;
        info!(
            "cached device [{}] with description [{}]",
            device.device_id,
            device.description.as_deref().unwrap_or("")
        );
        state.cache.write().await.insert_device(device);

        let codes =
            gateway_queries::get_last_seen_rfid_codes(state.gateway.as_ref(), &device_ref.device_id)
                .await?;
        info!(
            "found {} rfid tag(s) on device [{}]",
            codes.len(),
            device_ref.device_id
        );
        for code_ref in &codes {
            if state.cache.read().await.contains_tag(&code_ref.rfid_code) {
                info!(
                    "skipped rfid tag [{}], already cached from another device",
                    code_ref.rfid_code
                );
                continue;
            }
            let profile =
                gateway_queries::get_rfid_profile(state.gateway.as_ref(), &code_ref.rfid_code)
                    .await?;
            info!(
                "cached rfid tag [{}] with label [{}]",
                code_ref.rfid_code,
                profile.label.as_deref().unwrap_or("")
            );
            state
                .cache
                .write()
                .await
                .insert_tag(code_ref.rfid_code.clone(), profile.label);
        }

        // Transit policies and stored events are fetched for completeness and
        // logging only; nothing downstream consumes them, so their failures
        // do not abort the refresh.
        match gateway_queries::get_device_transit_policies(
            state.gateway.as_ref(),
            &device_ref.device_id,
        )
        .await
        {
            Ok(policies) => {
                for policy_ref in &policies {
                    match gateway_queries::get_device_transit_policy(
                        state.gateway.as_ref(),
                        policy_ref.device_transit_policy_id,
                    )
                    .await
                    {
                        Ok(policy) => debug!(
                            "transit policy [{}]: {}",
                            policy_ref.device_transit_policy_id, policy
                        ),
                        Err(err) => warn!(
                            "could not retrieve transit policy [{}]: {}",
                            policy_ref.device_transit_policy_id, err
                        ),
                    }
                }
            }
            Err(err) => warn!(
                "could not retrieve transit policies for device [{}]: {}",
                device_ref.device_id, err
            ),
        }

        match gateway_queries::get_device_events(state.gateway.as_ref(), &device_ref.device_id)
            .await
        {
            Ok(history) => info!(
                "retrieved {} stored event(s) from device [{}]",
                history.len(),
                device_ref.device_id
            ),
            Err(err) => warn!(
                "could not retrieve stored events from device [{}]: {}",
                device_ref.device_id, err
            ),
        }
    }

    let summary = {
        let cache = state.cache.read().await;
        RefreshSummary {
            devices: cache.device_count(),
            tags: cache.tag_count(),
        }
    };
    state.metrics.record_refresh();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::{json, Value};
    use tokio::sync::RwLock;

    use bridge_domain::{
        EventPublisher, GatewayRpc, ReferenceCache, RpcError, RuntimeConfig,
    };

    use super::*;
    use crate::Metrics;

    struct FakeGateway;

    #[async_trait]
    impl GatewayRpc for FakeGateway {
        async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
            match method {
                "getDevices" => Ok(json!([{ "deviceId": "D1" }, { "deviceId": "D2" }])),
                "getDevice" => {
                    let id = params["deviceId"].as_str().unwrap_or_default();
                    Ok(json!({ "deviceId": id, "description": format!("Flap {}", id) }))
                }
                "getLastSeenRfidCodesByDevice" => {
                    match params["deviceId"].as_str().unwrap_or_default() {
                        // AABB shows up on both devices; first-seen must win.
                        "D1" => Ok(json!([{ "rfidCode": "AABB" }, { "rfidCode": "CCDD" }])),
                        _ => Ok(json!([{ "rfidCode": "AABB" }])),
                    }
                }
                "getRfidProfile" => match params["rfidCode"].as_str().unwrap_or_default() {
                    "AABB" => Ok(json!({ "label": "Whiskers" })),
                    _ => Ok(json!({ "label": null })),
                },
                "getDeviceTransitPolicies" => Ok(json!([{ "deviceTransitPolicyId": 7 }])),
                "getDeviceTransitPolicy" => {
                    Ok(json!({ "deviceTransitPolicyId": 7, "transitPolicy": { "rules": [] } }))
                }
                "getDeviceEvents" => Ok(json!([])),
                other => Err(RpcError::Remote(format!("unexpected method {}", other))),
            }
        }
    }

    // Devices and RFID data resolve fine; the completeness-only fetches
    // (transit policies, stored events) error out.
    struct HistoryFailingGateway;

    #[async_trait]
    impl GatewayRpc for HistoryFailingGateway {
        async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
            match method {
                "getDeviceTransitPolicies" | "getDeviceEvents" => {
                    Err(RpcError::Remote("not available".to_string()))
                }
                other => FakeGateway.call(other, params).await,
            }
        }
    }

    struct FailingGateway;

    #[async_trait]
    impl GatewayRpc for FailingGateway {
        async fn call(&self, _method: &str, _params: Value) -> Result<Value, RpcError> {
            Err(RpcError::Remote("no subscription".to_string()))
        }
    }

    struct NullPublisher;

    #[async_trait]
    impl EventPublisher for NullPublisher {
        async fn publish(&self, _topic: &str, _payload: Vec<u8>) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn test_state(gateway: Arc<dyn GatewayRpc>) -> AppState {
        AppState {
            config: RuntimeConfig {
                gateway_url: "https://gateway.onlycat.com".to_string(),
                auth_token: None,
                mqtt_topic: "onlycat2mqtt/event".to_string(),
                request_timeout_seconds: 5,
                reconnect_delay_seconds: 5,
            },
            gateway,
            publisher: Arc::new(NullPublisher),
            cache: Arc::new(RwLock::new(ReferenceCache::new())),
            metrics: Arc::new(Metrics::default()),
        }
    }

    #[tokio::test]
    async fn refresh_populates_devices_and_deduplicates_tags() {
        let state = test_state(Arc::new(FakeGateway));
        let summary = refresh_reference_data(&state).await.expect("refresh");
        assert_eq!(summary.devices, 2);
        assert_eq!(summary.tags, 2);

        let cache = state.cache.read().await;
        assert_eq!(
            cache
                .lookup_device("D1")
                .and_then(|d| d.description.as_deref()),
            Some("Flap D1")
        );
        assert_eq!(cache.lookup_tag("AABB"), Some("Whiskers"));
        // Cached, but without a label.
        assert!(cache.contains_tag("CCDD"));
        assert_eq!(cache.lookup_tag("CCDD"), None);
    }

    #[tokio::test]
    async fn refresh_is_idempotent() {
        let state = test_state(Arc::new(FakeGateway));
        let first = refresh_reference_data(&state).await.expect("first refresh");
        let second = refresh_reference_data(&state).await.expect("second refresh");
        assert_eq!(first.devices, second.devices);
        assert_eq!(first.tags, second.tags);

        let cache = state.cache.read().await;
        assert_eq!(cache.device_count(), 2);
        assert_eq!(cache.tag_count(), 2);
        assert_eq!(cache.lookup_tag("AABB"), Some("Whiskers"));
    }

    #[tokio::test]
    async fn refresh_survives_policy_and_history_failures() {
        let state = test_state(Arc::new(HistoryFailingGateway));
        let summary = refresh_reference_data(&state).await.expect("refresh");
        assert_eq!(summary.devices, 2);
        assert_eq!(summary.tags, 2);

        let cache = state.cache.read().await;
        assert_eq!(cache.lookup_tag("AABB"), Some("Whiskers"));
        assert!(cache.lookup_device("D2").is_some());
    }

    #[tokio::test]
    async fn refresh_failure_surfaces_as_error() {
        let state = test_state(Arc::new(FailingGateway));
        let result = refresh_reference_data(&state).await;
        assert!(matches!(result, Err(AppError::Rpc(RpcError::Remote(_)))));
        let cache = state.cache.read().await;
        assert_eq!(cache.device_count(), 0);
    }
}
