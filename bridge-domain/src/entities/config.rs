// Runtime configuration shared across layers

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub gateway_url: String,
    pub auth_token: Option<String>,
    pub mqtt_topic: String,
    pub request_timeout_seconds: u64,
    pub reconnect_delay_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct MqttConfig {
    pub server: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub client_id: String,
}
