use async_trait::async_trait;
use tandem_core::{ConnectionId, ServerEvent};

/// Where the room manager sends events addressed to a single connection.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Deliver `event` to `conn_id`. Delivery is fire-and-forget.
    async fn send_event(&self, conn_id: ConnectionId, event: ServerEvent);
}
