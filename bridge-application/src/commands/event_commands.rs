// Event enrichment pipeline: notification -> detail fetch -> cache join -> publish

use chrono::SecondsFormat;
use serde_json::Value;
use tracing::{debug, info, warn};

use bridge_domain::{
    EventClassification, EventDetail, EventMessage, EventNotification, PushKind, ReferenceCache,
    RfidCodeEntry, TriggerSource,
};

use crate::queries::gateway_queries;
use crate::{AppError, AppState};

const CAPTURE_BASE_URL: &str = "https://gateway.onlycat.com/sharing/video";

/// Best-effort handler for `deviceEventUpdate` / `eventUpdate` pushes. Any
/// failure drops the event with a log line; later events are unaffected.
pub async fn handle_event_update(state: AppState, kind: PushKind, payload: Value) {
    state.metrics.record_event_received();
    match enrich_and_publish(&state, payload).await {
        Ok(event_id) => {
            state.metrics.record_event_published();
            info!("published event [{}] kind [{}]", event_id, kind.as_str());
        }
        Err(err) => {
            state.metrics.record_event_dropped();
            warn!("dropping {} event: {}", kind.as_str(), err);
        }
    }
}

async fn enrich_and_publish(state: &AppState, payload: Value) -> Result<String, AppError> {
    let notification: EventNotification = serde_json::from_value(payload)?;
    debug!(
        "event notification [{}] on device [{}]",
        notification.event_id, notification.device_id
    );

    let detail = gateway_queries::get_event(
        state.gateway.as_ref(),
        &notification.device_id,
        &notification.event_id,
    )
    .await?;

    let message = {
        let cache = state.cache.read().await;
        build_event_message(&notification, &detail, &cache)
    };
    let body = serde_json::to_vec(&message)?;
    debug!("enriched event payload: {}", String::from_utf8_lossy(&body));

    state
        .publisher
        .publish(&state.config.mqtt_topic, body)
        .await
        .map_err(AppError::Internal)?;
    Ok(notification.event_id)
}

/// Pure join of notification + detail + cache. Lookup misses and unknown
/// enumeration codes leave the corresponding field unset.
pub fn build_event_message(
    notification: &EventNotification,
    detail: &EventDetail,
    cache: &ReferenceCache,
) -> EventMessage {
    let device_id = detail
        .device_id
        .clone()
        .unwrap_or_else(|| notification.device_id.clone());
    let event_id = detail
        .event_id
        .clone()
        .unwrap_or_else(|| notification.event_id.clone());

    let rfidcodes = detail
        .rfid_codes
        .iter()
        .map(|code| RfidCodeEntry {
            tag: code.clone(),
            name: cache.lookup_tag(code).map(str::to_string),
        })
        .collect();

    EventMessage {
        eventtime: detail
            .timestamp
            .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, false)),
        eventid: notification.event_id.clone(),
        event_type: notification.event_type.clone(),
        devicename: cache
            .lookup_device(&device_id)
            .and_then(|device| device.description.clone()),
        triggersource: detail
            .event_trigger_source
            .and_then(TriggerSource::from_code)
            .map(|source| source.as_str().to_string()),
        classification: detail
            .event_classification
            .and_then(EventClassification::from_code)
            .map(|class| class.as_str().to_string()),
        rfidcodes,
        captureurl: capture_url(
            &device_id,
            &event_id,
            detail.access_token.as_deref().unwrap_or_default(),
        ),
        framecount: detail.frame_count,
        accesstoken: detail.access_token.clone(),
        deviceid: device_id,
    }
}

pub fn capture_url(device_id: &str, event_id: &str, access_token: &str) -> String {
    format!("{CAPTURE_BASE_URL}/{device_id}/{event_id}?t={access_token}")
}
