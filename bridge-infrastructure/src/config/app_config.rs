use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use bridge_domain::{MqttConfig, RuntimeConfig};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub gateway_url: String,
    pub auth_token: Option<String>,
    pub mqtt_server: String,
    pub mqtt_username: Option<String>,
    pub mqtt_password: Option<String>,
    pub mqtt_topic: String,
    pub mqtt_client_id: String,
    pub log_level: Option<String>,
    pub log_dir: Option<String>,
    pub request_timeout_seconds: u64,
    pub reconnect_delay_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gateway_url: "https://gateway.onlycat.com".to_string(),
            auth_token: None,
            mqtt_server: "mqtt://127.0.0.1:1883".to_string(),
            mqtt_username: None,
            mqtt_password: None,
            mqtt_topic: "onlycat2mqtt/event".to_string(),
            mqtt_client_id: "onlycat2mqtt".to_string(),
            log_level: None,
            log_dir: Some("./log".to_string()),
            request_timeout_seconds: 30,
            reconnect_delay_seconds: 5,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var("ONLYCAT_CONFIG").unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        if !file_path.exists() {
            warn!("config.toml not found, using defaults");
            let mut config = AppConfig::default();
            config.apply_env_overrides();
            config.normalize();
            config.validate()?;
            return Ok(config);
        }
        let content = fs::read_to_string(file_path).await?;
        let mut config: AppConfig = toml::from_str(&content)?;
        config.apply_env_overrides();
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        if let Some(token) = &self.auth_token {
            if token.trim().is_empty() {
                self.auth_token = None;
            }
        }
        if let Some(user) = &self.mqtt_username {
            if user.trim().is_empty() {
                self.mqtt_username = None;
            }
        }
        if let Some(password) = &self.mqtt_password {
            if password.trim().is_empty() {
                self.mqtt_password = None;
            }
        }
        if let Some(level) = &self.log_level {
            if level.trim().is_empty() {
                self.log_level = None;
            }
        }
        if let Some(dir) = &self.log_dir {
            if dir.trim().is_empty() {
                self.log_dir = None;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let gateway_url = self.gateway_url.trim();
        if gateway_url.is_empty() {
            return Err(anyhow!("gateway_url must not be empty"));
        }
        if !["http://", "https://", "ws://", "wss://"]
            .iter()
            .any(|scheme| gateway_url.starts_with(scheme))
        {
            return Err(anyhow!("gateway_url must be an http(s) or ws(s) URL"));
        }
        if self.mqtt_server.trim().is_empty() {
            return Err(anyhow!("mqtt_server must not be empty"));
        }
        if self.mqtt_topic.trim().is_empty() {
            return Err(anyhow!("mqtt_topic must not be empty"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }
        if self.reconnect_delay_seconds == 0 {
            return Err(anyhow!("reconnect_delay_seconds must be greater than 0"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            gateway_url: self.gateway_url.clone(),
            auth_token: self.auth_token.clone(),
            mqtt_topic: self.mqtt_topic.clone(),
            request_timeout_seconds: self.request_timeout_seconds,
            reconnect_delay_seconds: self.reconnect_delay_seconds,
        }
    }

    pub fn to_mqtt_config(&self) -> MqttConfig {
        MqttConfig {
            server: self.mqtt_server.clone(),
            username: self.mqtt_username.clone(),
            password: self.mqtt_password.clone(),
            client_id: self.mqtt_client_id.clone(),
        }
    }

    // Environment names match the original deployment contract.
    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("ONLYCAT_GATEWAY_URL") {
            self.gateway_url = value;
        }
        if let Ok(value) = env::var("TOKEN") {
            self.auth_token = Some(value);
        }
        if let Ok(value) = env::var("MQTT_SERVER") {
            self.mqtt_server = value;
        }
        if let Ok(value) = env::var("MQTT_USERNAME") {
            self.mqtt_username = Some(value);
        }
        if let Ok(value) = env::var("MQTT_PASSWORD") {
            self.mqtt_password = Some(value);
        }
        if let Ok(value) = env::var("LOG_LEVEL") {
            self.log_level = Some(value);
        }
        if let Ok(value) = env::var("ONLYCAT_LOG_DIR") {
            self.log_dir = Some(value);
        }
        if let Ok(value) = env::var("ONLYCAT_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Ok(value) = env::var("ONLYCAT_RECONNECT_DELAY_SECONDS") {
            self.reconnect_delay_seconds = value.parse().unwrap_or(self.reconnect_delay_seconds);
        }
    }
}
