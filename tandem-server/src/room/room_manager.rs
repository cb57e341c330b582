use crate::room::{Admission, RoomCommand, RoomTable};
use crate::signaling::SignalingOutput;
use serde_json::Value;
use std::sync::Arc;
use tandem_core::{ClientEvent, ConnectionId, IceCandidateSignal, RoomId, ServerEvent};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Sole owner of the room table. Commands are handled one at a time, in
/// arrival order, so every join, relay and disconnect sees a consistent table.
pub struct RoomManager {
    table: RoomTable,
    command_rx: mpsc::Receiver<RoomCommand>,
    signaling: Arc<dyn SignalingOutput>,
}

impl RoomManager {
    pub fn new(
        command_rx: mpsc::Receiver<RoomCommand>,
        signaling: Arc<dyn SignalingOutput>,
    ) -> Self {
        Self {
            table: RoomTable::new(),
            command_rx,
            signaling,
        }
    }

    pub async fn run(mut self) {
        info!("Room manager started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;
        }

        info!("Command channel closed. Room manager stopped.");
    }

    async fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Signal { conn_id, event } => match event {
                ClientEvent::Join(room) => match RoomId::parse(room) {
                    Ok(room_id) => self.join(conn_id, room_id).await,
                    Err(e) => warn!("Dropping join from {}: {}", conn_id, e),
                },
                ClientEvent::StartCall(room) => self.relay_call_start(conn_id, &room).await,
                ClientEvent::WebrtcOffer(desc) => {
                    self.relay_offer(conn_id, &desc.room_id, desc.sdp).await
                }
                ClientEvent::WebrtcAnswer(desc) => {
                    self.relay_answer(conn_id, &desc.room_id, desc.sdp).await
                }
                ClientEvent::WebrtcIceCandidate(ice) => {
                    self.relay_ice_candidate(conn_id, ice).await
                }
            },

            RoomCommand::Disconnect { conn_id } => self.on_disconnect(conn_id),

            RoomCommand::Occupancy { room_id, reply } => {
                let _ = reply.send(self.table.occupancy(&room_id));
            }

            RoomCommand::Stats { reply } => {
                let _ = reply.send(self.table.stats());
            }
        }
    }

    async fn join(&mut self, conn_id: ConnectionId, room_id: RoomId) {
        let outcome = match self.table.admit(conn_id, &room_id) {
            Admission::Created => {
                info!("Creating room '{}' for {}", room_id, conn_id);
                ServerEvent::RoomCreated(room_id)
            }
            Admission::Joined => {
                info!("{} joined room '{}'", conn_id, room_id);
                ServerEvent::RoomJoined(room_id)
            }
            Admission::Full => {
                info!("Room '{}' is full, turning away {}", room_id, conn_id);
                ServerEvent::FullRoom(room_id)
            }
        };

        self.signaling.send_event(conn_id, outcome).await;
    }

    async fn relay_call_start(&self, sender: ConnectionId, room_id: &str) {
        self.relay(sender, room_id, ServerEvent::StartCall).await;
    }

    async fn relay_offer(&self, sender: ConnectionId, room_id: &str, sdp: Value) {
        self.relay(sender, room_id, ServerEvent::WebrtcOffer(sdp)).await;
    }

    async fn relay_answer(&self, sender: ConnectionId, room_id: &str, sdp: Value) {
        self.relay(sender, room_id, ServerEvent::WebrtcAnswer(sdp)).await;
    }

    async fn relay_ice_candidate(&self, sender: ConnectionId, ice: IceCandidateSignal) {
        let room_id = ice.room_id.clone();
        self.relay(sender, &room_id, ServerEvent::WebrtcIceCandidate(ice))
            .await;
    }

    async fn relay(&self, sender: ConnectionId, room_id: &str, event: ServerEvent) {
        let targets = self.table.relay_targets(sender, room_id);

        debug!(
            "Relaying {} from {} in '{}' to {} peer(s)",
            event.name(),
            sender,
            room_id,
            targets.len()
        );

        for target in targets {
            self.signaling.send_event(target, event.clone()).await;
        }
    }

    fn on_disconnect(&mut self, conn_id: ConnectionId) {
        let Some(departure) = self.table.release(conn_id) else {
            debug!("{} left without joining a room", conn_id);
            return;
        };

        if departure.remaining == 0 {
            info!("Room '{}' is empty, removing it", departure.room_id);
        } else {
            info!(
                "{} left room '{}', {} occupant(s) remain",
                conn_id, departure.room_id, departure.remaining
            );
        }
    }
}
