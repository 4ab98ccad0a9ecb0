use std::time::Duration;

use anyhow::Result;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use bridge_application::commands::event_commands::handle_event_update;
use bridge_application::commands::refresh_commands::refresh_reference_data;
use bridge_application::AppState;
use bridge_domain::{ChannelEvent, PushKind};
use bridge_infrastructure::{AppConfig, SocketGateway};

use crate::context::AppContext;

pub async fn run(config: AppConfig) -> Result<()> {
    let context = AppContext::new(&config)?;
    info!(
        "starting OnlyCat gateway to MQTT bridge, version {}",
        env!("CARGO_PKG_VERSION")
    );

    let reconnect_delay = Duration::from_secs(context.config.reconnect_delay_seconds);
    loop {
        tokio::select! {
            _ = shutdown_signal() => {
                info!("shutdown signal received, cleaning up");
                break;
            }
            connected = SocketGateway::connect(&context.config) => match connected {
                Ok((gateway, events)) => {
                    let state = context.connection_state(gateway);
                    tokio::select! {
                        _ = shutdown_signal() => {
                            info!("shutdown signal received, cleaning up");
                            break;
                        }
                        _ = run_session(state, events) => {}
                    }
                }
                Err(err) => warn!("gateway connection failed: {}", err),
            }
        }

        info!(
            "reconnecting in {}s",
            context.config.reconnect_delay_seconds
        );
        tokio::select! {
            _ = shutdown_signal() => {
                info!("shutdown signal received, cleaning up");
                break;
            }
            _ = sleep(reconnect_delay) => {}
        }
    }

    info!("exited; {}", context.metrics.summary());
    Ok(())
}

/// Drains channel events until the connection drops. In-flight enrichments
/// are spawned tasks and simply abandoned when the process ends.
async fn run_session(state: AppState, mut events: mpsc::Receiver<ChannelEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            ChannelEvent::Connected => {
                info!("socket connected");
                let refresh_state = state.clone();
                tokio::spawn(async move {
                    match refresh_reference_data(&refresh_state).await {
                        Ok(summary) => info!(
                            "reference cache ready: {} device(s), {} rfid tag(s)",
                            summary.devices, summary.tags
                        ),
                        // Non-fatal: enrichment degrades to absent names
                        // until the next reconnect rebuilds the cache.
                        Err(err) => error!("reference data refresh failed: {}", err),
                    }
                });
            }
            ChannelEvent::Disconnected { reason } => {
                warn!("socket disconnected: {}", reason);
                return;
            }
            ChannelEvent::Push { kind, payload } => dispatch_push(&state, kind, payload),
        }
    }
}

fn dispatch_push(state: &AppState, kind: PushKind, payload: Value) {
    if kind.triggers_enrichment() {
        // Each notification runs independently; no ordering, no backpressure.
        tokio::spawn(handle_event_update(state.clone(), kind, payload));
        return;
    }
    match kind {
        PushKind::UserUpdate => info!(
            "user [{}] with id [{}] logged in",
            payload.get("name").and_then(serde_json::Value::as_str).unwrap_or(""),
            payload.get("id").cloned().unwrap_or(serde_json::Value::Null)
        ),
        other => debug!("{}: {}", other.as_str(), payload),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("sigterm handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
