use std::sync::Arc;

use anyhow::Result;
use tokio::sync::RwLock;

use bridge_application::{AppState, Metrics};
use bridge_domain::{EventPublisher, GatewayRpc, ReferenceCache, RuntimeConfig};
use bridge_infrastructure::{AppConfig, MqttPublisher};

/// Connection-independent parts of the bridge. The cache intentionally
/// survives reconnects; every refresh clears it before repopulating.
pub struct AppContext {
    pub config: RuntimeConfig,
    pub publisher: Arc<dyn EventPublisher>,
    pub cache: Arc<RwLock<ReferenceCache>>,
    pub metrics: Arc<Metrics>,
}

impl AppContext {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let publisher = Arc::new(MqttPublisher::connect(&config.to_mqtt_config())?);

        Ok(Self {
            config: config.to_runtime_config(),
            publisher,
            cache: Arc::new(RwLock::new(ReferenceCache::new())),
            metrics: Arc::new(Metrics::default()),
        })
    }

    /// State handle for one gateway connection.
    pub fn connection_state(&self, gateway: Arc<dyn GatewayRpc>) -> AppState {
        AppState {
            config: self.config.clone(),
            gateway,
            publisher: self.publisher.clone(),
            cache: self.cache.clone(),
            metrics: self.metrics.clone(),
        }
    }
}
