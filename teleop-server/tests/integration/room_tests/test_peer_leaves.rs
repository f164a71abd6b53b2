use std::sync::Arc;
use std::time::Duration;
use teleop_core::{PeerId, PeerRole, RoomName, SignalMessage};
use teleop_server::{Room, RoomCommand};
use tokio::sync::mpsc;

use crate::integration::{SIGNAL_TIMEOUT, create_test_room, init_tracing};
use crate::utils::MockSignalingOutput;

#[tokio::test]
async fn test_peer_leaves_notifies_counterpart() {
    init_tracing();

    let mut room = create_test_room("demo");
    let (operator, robot) = room.seat_both().await;

    room.cmd_tx
        .send(RoomCommand::Leave {
            peer_id: robot.clone(),
        })
        .await
        .unwrap();

    let left = room.next_signal().await;
    assert_eq!(left.peer_id, operator);
    assert_eq!(
        left.message,
        SignalMessage::PeerLeft {
            role: PeerRole::Robot
        }
    );

    // The seat is free again.
    let robot_again = room.join(PeerRole::Robot).await;
    let joined = room.next_signal().await;
    assert_eq!(joined.peer_id, robot_again);
    assert!(matches!(joined.message, SignalMessage::Joined { .. }));
}

#[tokio::test]
async fn test_room_stops_when_last_peer_leaves() {
    init_tracing();

    let mut room = create_test_room("demo");
    let operator = room.join(PeerRole::Operator).await;
    room.next_signal().await;

    room.cmd_tx
        .send(RoomCommand::Leave { peer_id: operator })
        .await
        .unwrap();

    tokio::time::timeout(Duration::from_secs(2), &mut room.finished)
        .await
        .expect("room did not stop")
        .expect("room task panicked");
    assert!(room.cmd_tx.is_closed());
}

#[tokio::test]
async fn test_join_queued_behind_last_leave_is_served() {
    init_tracing();

    let (cmd_tx, cmd_rx) = mpsc::channel::<RoomCommand>(100);
    let (signaling, mut signal_rx) = MockSignalingOutput::new();
    let old_robot = PeerId::new();
    let new_robot = PeerId::new();

    // Queued before the room runs: the old robot leaves as the new one arrives.
    for cmd in [
        RoomCommand::Join {
            peer_id: old_robot.clone(),
            role: PeerRole::Robot,
        },
        RoomCommand::Leave {
            peer_id: old_robot.clone(),
        },
        RoomCommand::Join {
            peer_id: new_robot.clone(),
            role: PeerRole::Robot,
        },
    ] {
        cmd_tx.send(cmd).await.unwrap();
    }

    let room = Room::new(RoomName::from("demo"), cmd_rx, Arc::new(signaling));
    let finished = tokio::spawn(room.run());

    let mut joined = Vec::new();
    for _ in 0..2 {
        let delivered = tokio::time::timeout(SIGNAL_TIMEOUT, signal_rx.recv())
            .await
            .expect("timed out waiting for a signal")
            .expect("signal channel closed");
        assert!(matches!(delivered.message, SignalMessage::Joined { .. }));
        joined.push(delivered.peer_id);
    }
    assert_eq!(joined, vec![old_robot, new_robot.clone()]);
    assert!(!cmd_tx.is_closed());
    assert!(!finished.is_finished());

    cmd_tx
        .send(RoomCommand::Leave { peer_id: new_robot })
        .await
        .unwrap();
    tokio::time::timeout(Duration::from_secs(2), finished)
        .await
        .expect("room did not stop")
        .expect("room task panicked");
}
