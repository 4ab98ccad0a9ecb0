use std::sync::Arc;

use tokio::sync::RwLock;

use bridge_domain::{EventPublisher, GatewayRpc, ReferenceCache, RuntimeConfig};

use crate::Metrics;

/// Shared handles for one gateway connection. The cache and publisher
/// outlive individual connections; the gateway handle is swapped on
/// reconnect.
#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub gateway: Arc<dyn GatewayRpc>,
    pub publisher: Arc<dyn EventPublisher>,
    pub cache: Arc<RwLock<ReferenceCache>>,
    pub metrics: Arc<Metrics>,
}
