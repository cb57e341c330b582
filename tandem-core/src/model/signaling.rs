use crate::ModelError;
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Offer or answer as sent by the browser. Only `sdp` is forwarded, and it
/// may be any JSON value (a bare SDP string or a whole `RTCSessionDescription`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDescription {
    #[serde(rename = "roomId")]
    pub room_id: String,
    pub sdp: Value,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Value>,
}

/// ICE candidate event. Only `roomId` is read; every other field is
/// carried as-is so the peer receives the object it was sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IceCandidateSignal {
    #[serde(rename = "roomId")]
    pub room_id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Frames a client may send: `{"event": "...", "data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    Join(String),
    StartCall(String),
    WebrtcOffer(SessionDescription),
    WebrtcAnswer(SessionDescription),
    WebrtcIceCandidate(IceCandidateSignal),
}

impl ClientEvent {
    pub fn parse(text: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(text)?)
    }

    /// The room this event addresses.
    pub fn room_id(&self) -> &str {
        match self {
            ClientEvent::Join(room) | ClientEvent::StartCall(room) => room.as_str(),
            ClientEvent::WebrtcOffer(desc) | ClientEvent::WebrtcAnswer(desc) => desc.room_id.as_str(),
            ClientEvent::WebrtcIceCandidate(ice) => ice.room_id.as_str(),
        }
    }
}

/// Frames the server sends back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    RoomCreated(RoomId),
    RoomJoined(RoomId),
    FullRoom(RoomId),
    StartCall,
    WebrtcOffer(Value),
    WebrtcAnswer(Value),
    WebrtcIceCandidate(IceCandidateSignal),
}

impl ServerEvent {
    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Wire name of the event.
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::RoomCreated(_) => "room_created",
            ServerEvent::RoomJoined(_) => "room_joined",
            ServerEvent::FullRoom(_) => "full_room",
            ServerEvent::StartCall => "start_call",
            ServerEvent::WebrtcOffer(_) => "webrtc_offer",
            ServerEvent::WebrtcAnswer(_) => "webrtc_answer",
            ServerEvent::WebrtcIceCandidate(_) => "webrtc_ice_candidate",
        }
    }
}
