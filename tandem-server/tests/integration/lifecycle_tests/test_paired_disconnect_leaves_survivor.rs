use tandem_core::{ClientEvent, ConnectionId, RoomId, ServerEvent};

use crate::integration::{create_test_manager, init_tracing};
use crate::utils::{assert_no_delivery, disconnect, join, occupancy, offer, signal};

#[tokio::test]
async fn test_paired_disconnect_leaves_survivor() {
    init_tracing();

    let (room_cmd_tx, mut signal_rx, signaling) = create_test_manager();
    let room = RoomId::parse("pair").unwrap();

    let leaver = ConnectionId::new();
    let survivor = ConnectionId::new();
    join(&room_cmd_tx, &mut signal_rx, leaver, "pair").await.unwrap();
    join(&room_cmd_tx, &mut signal_rx, survivor, "pair")
        .await
        .unwrap();

    disconnect(&room_cmd_tx, leaver).await.unwrap();
    assert_eq!(occupancy(&room_cmd_tx, "pair").await.unwrap(), 1);

    // No departure notice reaches the survivor.
    assert_no_delivery(&room_cmd_tx, &mut signal_rx).await.unwrap();
    assert_eq!(
        signaling.events_for(&survivor).await,
        vec![ServerEvent::RoomJoined(room.clone())]
    );

    // Relays from the survivor go nowhere.
    signal(&room_cmd_tx, survivor, ClientEvent::StartCall("pair".into()))
        .await
        .unwrap();
    signal(&room_cmd_tx, survivor, offer("pair", "v=0"))
        .await
        .unwrap();
    assert_no_delivery(&room_cmd_tx, &mut signal_rx).await.unwrap();

    // The freed slot can be taken by a newcomer.
    let newcomer = ConnectionId::new();
    let outcome = join(&room_cmd_tx, &mut signal_rx, newcomer, "pair")
        .await
        .unwrap();
    assert_eq!(outcome, ServerEvent::RoomJoined(room));
    assert_eq!(occupancy(&room_cmd_tx, "pair").await.unwrap(), 2);
}
