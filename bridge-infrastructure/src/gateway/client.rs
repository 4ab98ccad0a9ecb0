// Socket gateway connection: push events out, request/response calls in

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use bridge_domain::{ChannelEvent, GatewayRpc, PushKind, RpcError, RuntimeConfig};

use crate::gateway::frame::{self, Frame};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type WsSource = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// One live connection to the gateway. Calls share the socket; each call
/// registers a pending slot keyed by its ack id and waits (bounded by the
/// configured timeout) for the matching ack frame.
pub struct SocketGateway {
    writer: Mutex<WsSink>,
    pending: Mutex<HashMap<u64, oneshot::Sender<Result<Value, RpcError>>>>,
    next_ack_id: AtomicU64,
    call_timeout: Duration,
}

impl SocketGateway {
    /// Connects and spawns the read loop. Lifecycle and push events arrive
    /// on the returned receiver; the handle itself serves RPC calls.
    pub async fn connect(
        config: &RuntimeConfig,
    ) -> anyhow::Result<(Arc<Self>, mpsc::Receiver<ChannelEvent>)> {
        let url = build_ws_url(&config.gateway_url);
        debug!("connecting to {}", url);
        let (socket, _) = connect_async(url.as_str()).await?;
        let (sink, stream) = socket.split();

        let gateway = Arc::new(Self {
            writer: Mutex::new(sink),
            pending: Mutex::new(HashMap::new()),
            next_ack_id: AtomicU64::new(1),
            call_timeout: Duration::from_secs(config.request_timeout_seconds),
        });

        let auth = match &config.auth_token {
            Some(token) => json!({ "token": token }),
            None => Value::Null,
        };
        let (events_tx, events_rx) = mpsc::channel(64);
        tokio::spawn(read_loop(gateway.clone(), stream, events_tx, auth));

        Ok((gateway, events_rx))
    }

    async fn send(&self, message: Message) -> Result<(), RpcError> {
        self.writer
            .lock()
            .await
            .send(message)
            .await
            .map_err(|err| RpcError::Transport(err.to_string()))
    }

    async fn complete(&self, id: u64, outcome: Result<Value, RpcError>) {
        match self.pending.lock().await.remove(&id) {
            Some(slot) => {
                let _ = slot.send(outcome);
            }
            None => debug!("ack for unknown call id {}", id),
        }
    }

    async fn fail_all_pending(&self) {
        let mut pending = self.pending.lock().await;
        for (_, slot) in pending.drain() {
            let _ = slot.send(Err(RpcError::ChannelClosed));
        }
    }
}

#[async_trait]
impl GatewayRpc for SocketGateway {
    async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let id = self.next_ack_id.fetch_add(1, Ordering::Relaxed);
        let (slot_tx, slot_rx) = oneshot::channel();
        self.pending.lock().await.insert(id, slot_tx);

        let emit = frame::encode_emit(id, method, &params);
        if let Err(err) = self.send(Message::Text(emit)).await {
            self.pending.lock().await.remove(&id);
            return Err(err);
        }

        match timeout(self.call_timeout, slot_rx).await {
            Err(_) => {
                self.pending.lock().await.remove(&id);
                Err(RpcError::Timeout)
            }
            Ok(Err(_)) => Err(RpcError::ChannelClosed),
            Ok(Ok(outcome)) => outcome,
        }
    }
}

async fn read_loop(
    gateway: Arc<SocketGateway>,
    mut stream: WsSource,
    events: mpsc::Sender<ChannelEvent>,
    auth: Value,
) {
    let reason = loop {
        match stream.next().await {
            Some(Ok(Message::Text(text))) => {
                match frame::parse_frame(&text) {
                    Ok(Frame::Open(_)) => {
                        if let Err(err) = gateway.send(Message::Text(frame::encode_connect(&auth))).await {
                            break format!("handshake send failed: {}", err);
                        }
                    }
                    Ok(Frame::Ping) => {
                        if let Err(err) = gateway.send(Message::Text(frame::encode_pong())).await {
                            break format!("pong send failed: {}", err);
                        }
                    }
                    Ok(Frame::ConnectAck(_)) => {
                        if events.send(ChannelEvent::Connected).await.is_err() {
                            break "event receiver dropped".to_string();
                        }
                    }
                    Ok(Frame::ConnectError(payload)) => {
                        break format!("gateway refused connection: {}", payload);
                    }
                    Ok(Frame::Disconnect) => {
                        break "gateway disconnected namespace".to_string();
                    }
                    Ok(Frame::Event { name, payload }) => {
                        let push = ChannelEvent::Push {
                            kind: PushKind::from_name(&name),
                            payload,
                        };
                        if events.send(push).await.is_err() {
                            break "event receiver dropped".to_string();
                        }
                    }
                    Ok(Frame::Ack { id, payload }) => {
                        gateway.complete(id, ack_outcome(payload)).await;
                    }
                    Ok(Frame::Close) => break "transport close packet".to_string(),
                    Ok(Frame::Pong) | Ok(Frame::Other(_)) => {}
                    Err(err) => warn!("ignoring unparseable frame: {}", err),
                }
            }
            Some(Ok(Message::Ping(bytes))) => {
                if gateway.send(Message::Pong(bytes)).await.is_err() {
                    break "pong send failed".to_string();
                }
            }
            Some(Ok(Message::Close(close))) => break format!("closed by peer: {:?}", close),
            Some(Ok(_)) => {}
            Some(Err(err)) => break format!("stream error: {}", err),
            None => break "stream ended".to_string(),
        }
    };

    gateway.fail_all_pending().await;
    let _ = events.send(ChannelEvent::Disconnected { reason }).await;
}

/// A response whose body carries an `error` field fails the call with that
/// message; anything else is the success payload.
fn ack_outcome(payload: Value) -> Result<Value, RpcError> {
    if let Some(error) = payload.get("error") {
        if !error.is_null() {
            let message = match error {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            return Err(RpcError::Remote(message));
        }
    }
    Ok(payload)
}

fn build_ws_url(base: &str) -> String {
    let mapped = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        base.to_string()
    };
    format!(
        "{}/socket.io/?EIO=4&transport=websocket&platform=onlycat2mqtt&device=ionic-app",
        mapped.trim_end_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ws_url_from_https_base() {
        assert_eq!(
            build_ws_url("https://gateway.onlycat.com"),
            "wss://gateway.onlycat.com/socket.io/?EIO=4&transport=websocket&platform=onlycat2mqtt&device=ionic-app"
        );
    }

    #[test]
    fn ws_url_keeps_explicit_ws_scheme_and_trims_slash() {
        assert_eq!(
            build_ws_url("ws://localhost:8080/"),
            "ws://localhost:8080/socket.io/?EIO=4&transport=websocket&platform=onlycat2mqtt&device=ionic-app"
        );
    }

    #[test]
    fn ack_error_field_fails_the_call() {
        let outcome = ack_outcome(json!({ "error": "no subscription" }));
        match outcome {
            Err(RpcError::Remote(message)) => assert_eq!(message, "no subscription"),
            other => panic!("expected remote error, got {:?}", other),
        }
    }

    #[test]
    fn ack_without_error_is_success() {
        let outcome = ack_outcome(json!({ "deviceId": "D1" })).expect("success");
        assert_eq!(outcome["deviceId"], "D1");
    }

    #[test]
    fn ack_with_null_error_is_success() {
        assert!(ack_outcome(json!({ "error": null, "deviceId": "D1" })).is_ok());
    }

    #[test]
    fn array_ack_payload_is_success() {
        let outcome = ack_outcome(json!([{ "deviceId": "D1" }])).expect("success");
        assert_eq!(outcome[0]["deviceId"], "D1");
    }
}
