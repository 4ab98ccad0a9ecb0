// MQTT publisher for enriched event records

use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use tracing::{debug, info, warn};

use bridge_domain::{EventPublisher, MqttConfig};

/// Thin wrapper over the rumqttc client. QoS 0 / fire-and-forget: a record
/// that cannot be delivered is dropped, matching the bridge's best-effort
/// stance.
pub struct MqttPublisher {
    client: AsyncClient,
}

impl MqttPublisher {
    /// Creates the client and spawns the driver task that keeps the
    /// connection alive. rumqttc reconnects internally on the next poll
    /// after an error.
    pub fn connect(config: &MqttConfig) -> Result<Self> {
        let (host, port) = parse_broker_url(&config.server)?;
        let mut options = MqttOptions::new(&config.client_id, host, port);
        options.set_keep_alive(Duration::from_secs(30));
        options.set_clean_session(true);
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            options.set_credentials(username, password);
        }

        let (client, mut eventloop) = AsyncClient::new(options, 100);
        tokio::spawn(async move {
            loop {
                match eventloop.poll().await {
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        info!("connected to MQTT broker");
                    }
                    Ok(event) => {
                        debug!("mqtt event: {:?}", event);
                    }
                    Err(err) => {
                        warn!("mqtt connection error: {}", err);
                        tokio::time::sleep(Duration::from_secs(5)).await;
                    }
                }
            }
        });

        Ok(Self { client })
    }
}

#[async_trait]
impl EventPublisher for MqttPublisher {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<()> {
        self.client
            .publish(topic, QoS::AtMostOnce, false, payload)
            .await
            .map_err(|err| anyhow!("mqtt publish failed: {}", err))
    }
}

/// Parse broker URL in format mqtt://host:port, tcp://host:port or host:port.
fn parse_broker_url(url: &str) -> Result<(&str, u16)> {
    let url = url.trim_start_matches("mqtt://");
    let url = url.trim_start_matches("tcp://");

    let parts: Vec<&str> = url.split(':').collect();
    match parts.len() {
        1 => Ok((parts[0], 1883)),
        2 => {
            let port = parts[1]
                .parse::<u16>()
                .map_err(|_| anyhow!("invalid port in broker URL: {}", parts[1]))?;
            Ok((parts[0], port))
        }
        _ => Err(anyhow!("invalid broker URL format: {}", url)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_broker_url_with_port() {
        let (host, port) = parse_broker_url("mqtt://localhost:1883").unwrap();
        assert_eq!(host, "localhost");
        assert_eq!(port, 1883);
    }

    #[test]
    fn parses_broker_url_without_scheme() {
        let (host, port) = parse_broker_url("broker.example.com:8883").unwrap();
        assert_eq!(host, "broker.example.com");
        assert_eq!(port, 8883);
    }

    #[test]
    fn parses_broker_url_default_port() {
        let (host, port) = parse_broker_url("mqtt://broker.local").unwrap();
        assert_eq!(host, "broker.local");
        assert_eq!(port, 1883);
    }

    #[test]
    fn rejects_malformed_broker_url() {
        assert!(parse_broker_url("mqtt://host:port:extra").is_err());
        assert!(parse_broker_url("mqtt://host:notaport").is_err());
    }
}
