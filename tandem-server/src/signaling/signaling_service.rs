use crate::ServerError;
use crate::room::{RoomCommand, RoomManager, RoomStats};
use crate::signaling::SignalingOutput;
use async_trait::async_trait;
use axum::extract::ws::Message;
use dashmap::DashMap;
use std::sync::Arc;
use tandem_core::{ConnectionId, ServerEvent};
use tokio::sync::{mpsc, oneshot};
use tracing::{error, warn};

struct SignalingInner {
    peers: DashMap<ConnectionId, mpsc::UnboundedSender<Message>>,
}

/// Registry of live sockets plus the command channel into the room manager.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
    room_cmd_tx: mpsc::Sender<RoomCommand>,
}

impl SignalingService {
    pub fn new(room_cmd_tx: mpsc::Sender<RoomCommand>) -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                peers: DashMap::new(),
            }),
            room_cmd_tx,
        }
    }

    /// Spawns a room manager wired back to a fresh service.
    pub fn start(buffer: usize) -> Self {
        let (tx, rx) = mpsc::channel(buffer);
        let service = Self::new(tx);

        let manager = RoomManager::new(rx, Arc::new(service.clone()));
        tokio::spawn(manager.run());

        service
    }

    pub fn add_peer(&self, conn_id: ConnectionId, tx: mpsc::UnboundedSender<Message>) {
        self.inner.peers.insert(conn_id, tx);
    }

    pub fn remove_peer(&self, conn_id: &ConnectionId) {
        self.inner.peers.remove(conn_id);
    }

    pub async fn dispatch(&self, cmd: RoomCommand) -> Result<(), ServerError> {
        self.room_cmd_tx
            .send(cmd)
            .await
            .map_err(|_| ServerError::RoomManagerClosed)
    }

    pub async fn occupancy(&self, room_id: &str) -> Result<usize, ServerError> {
        let (reply, rx) = oneshot::channel();
        self.dispatch(RoomCommand::Occupancy {
            room_id: room_id.to_owned(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| ServerError::RoomManagerClosed)
    }

    pub async fn stats(&self) -> Result<RoomStats, ServerError> {
        let (reply, rx) = oneshot::channel();
        self.dispatch(RoomCommand::Stats { reply }).await?;
        rx.await.map_err(|_| ServerError::RoomManagerClosed)
    }

    pub fn send_signal(&self, conn_id: ConnectionId, event: ServerEvent) {
        if let Some(peer) = self.inner.peers.get(&conn_id) {
            match serde_json::to_string(&event) {
                Ok(json) => {
                    if let Err(e) = peer.send(Message::Text(json.into())) {
                        error!("Failed to send WS message to {}: {:?}", conn_id, e);
                    }
                }
                Err(e) => error!("Failed to serialize {}: {}", event.name(), e),
            }
        } else {
            warn!(
                "Attempted to send {} to disconnected connection {}",
                event.name(),
                conn_id
            );
        }
    }
}

#[async_trait]
impl SignalingOutput for SignalingService {
    async fn send_event(&self, conn_id: ConnectionId, event: ServerEvent) {
        self.send_signal(conn_id, event);
    }
}
