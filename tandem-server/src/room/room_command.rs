use crate::room::RoomStats;
use tandem_core::{ClientEvent, ConnectionId};
use tokio::sync::oneshot;

/// Commands delivered to the room manager from WebSocket tasks and HTTP handlers.
#[derive(Debug)]
pub enum RoomCommand {
    /// A decoded frame from a live connection.
    Signal {
        conn_id: ConnectionId,
        event: ClientEvent,
    },

    /// The connection's socket is gone.
    Disconnect { conn_id: ConnectionId },

    Occupancy {
        room_id: String,
        reply: oneshot::Sender<usize>,
    },

    Stats { reply: oneshot::Sender<RoomStats> },
}
