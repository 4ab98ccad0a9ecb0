use async_trait::async_trait;

/// Fire-and-forget publish primitive onto the message bus.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> anyhow::Result<()>;
}
