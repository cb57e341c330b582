use tandem_core::{ConnectionId, RoomId, ServerEvent};

use crate::integration::{create_test_manager, init_tracing};
use crate::utils::{assert_no_delivery, join};

#[tokio::test]
async fn test_outcome_reaches_joiner_only() {
    init_tracing();

    let (room_cmd_tx, mut signal_rx, signaling) = create_test_manager();

    let first = ConnectionId::new();
    let second = ConnectionId::new();

    join(&room_cmd_tx, &mut signal_rx, first, "quiet")
        .await
        .unwrap();
    join(&room_cmd_tx, &mut signal_rx, second, "quiet")
        .await
        .unwrap();

    assert_no_delivery(&room_cmd_tx, &mut signal_rx).await.unwrap();

    // The first occupant is never told that someone arrived.
    assert_eq!(
        signaling.events_for(&first).await,
        vec![ServerEvent::RoomCreated(RoomId::parse("quiet").unwrap())]
    );
}
