#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("room id must not be empty")]
    EmptyRoomId,

    #[error("invalid connection id '{0}'")]
    InvalidConnectionId(String),

    #[error("malformed signal: {0}")]
    Malformed(#[from] serde_json::Error),
}
