use std::collections::BTreeMap;
use teleop_core::{SdpKind, SignalMessage};
use teleop_server::RoomCommand;

use crate::integration::{create_test_room, init_tracing, offer};

#[tokio::test]
async fn test_relay_to_counterpart() {
    init_tracing();

    let mut room = create_test_room("demo");
    let (operator, robot) = room.seat_both().await;

    room.cmd_tx
        .send(RoomCommand::Relay {
            peer_id: operator.clone(),
            message: offer("v=0 operator"),
        })
        .await
        .unwrap();

    let answer = SignalMessage::Description {
        kind: SdpKind::Answer,
        sdp: "v=0 robot".into(),
    };
    let camera_info = SignalMessage::CameraInfo {
        streams: BTreeMap::from([("stream-1".to_owned(), "overhead".to_owned())]),
    };
    for message in [answer.clone(), camera_info.clone()] {
        room.cmd_tx
            .send(RoomCommand::Relay {
                peer_id: robot.clone(),
                message,
            })
            .await
            .unwrap();
    }

    let first = room.next_signal().await;
    assert_eq!(first.peer_id, robot);
    assert_eq!(first.message, offer("v=0 operator"));

    let second = room.next_signal().await;
    assert_eq!(second.peer_id, operator);
    assert_eq!(second.message, answer);

    let third = room.next_signal().await;
    assert_eq!(third.peer_id, operator);
    assert_eq!(third.message, camera_info);

    assert_eq!(room.signaling.signals_for(&robot).await.last(), Some(&offer("v=0 operator")));
}
