use teleop_core::{PeerRole, SignalMessage};
use teleop_server::RoomCommand;

use crate::integration::{create_test_room, init_tracing, offer};

#[tokio::test]
async fn test_relay_without_counterpart_is_dropped() {
    init_tracing();

    let mut room = create_test_room("demo");
    let operator = room.join(PeerRole::Operator).await;
    room.next_signal().await;

    room.cmd_tx
        .send(RoomCommand::Relay {
            peer_id: operator,
            message: offer("v=0"),
        })
        .await
        .unwrap();

    room.assert_quiet().await;
}

#[tokio::test]
async fn test_control_messages_are_not_relayed() {
    init_tracing();

    let mut room = create_test_room("demo");
    let (operator, _robot) = room.seat_both().await;

    room.cmd_tx
        .send(RoomCommand::Relay {
            peer_id: operator,
            message: SignalMessage::PeerLeft {
                role: PeerRole::Operator,
            },
        })
        .await
        .unwrap();

    room.assert_quiet().await;
}
