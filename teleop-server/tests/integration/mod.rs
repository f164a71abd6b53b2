pub mod room_tests;
pub mod ws_tests;

use std::sync::Arc;
use std::time::Duration;
use teleop_core::{PeerId, PeerRole, RoomName, SignalMessage};
use teleop_server::{Room, RoomCommand};
use tokio::sync::mpsc;
use tracing::Level;

use crate::utils::{Delivered, MockSignalingOutput};

pub const SIGNAL_TIMEOUT: Duration = Duration::from_secs(2);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub struct TestRoom {
    pub cmd_tx: mpsc::Sender<RoomCommand>,
    pub signal_rx: mpsc::UnboundedReceiver<Delivered>,
    pub signaling: MockSignalingOutput,
    pub finished: tokio::task::JoinHandle<()>,
}

pub fn create_test_room(name: &str) -> TestRoom {
    let (cmd_tx, cmd_rx) = mpsc::channel::<RoomCommand>(100);
    let (signaling, signal_rx) = MockSignalingOutput::new();

    let room = Room::new(RoomName::from(name), cmd_rx, Arc::new(signaling.clone()));
    let finished = tokio::spawn(async move {
        room.run().await;
    });

    TestRoom {
        cmd_tx,
        signal_rx,
        signaling,
        finished,
    }
}

impl TestRoom {
    pub async fn join(&self, role: PeerRole) -> PeerId {
        let peer_id = PeerId::new();
        self.cmd_tx
            .send(RoomCommand::Join {
                peer_id: peer_id.clone(),
                role,
            })
            .await
            .expect("room is gone");
        peer_id
    }

    pub async fn next_signal(&mut self) -> Delivered {
        tokio::time::timeout(SIGNAL_TIMEOUT, self.signal_rx.recv())
            .await
            .expect("timed out waiting for a signal")
            .expect("signal channel closed")
    }

    /// Joins both seats and drains the pairing notifications.
    pub async fn seat_both(&mut self) -> (PeerId, PeerId) {
        let operator = self.join(PeerRole::Operator).await;
        self.next_signal().await;
        let robot = self.join(PeerRole::Robot).await;
        for _ in 0..3 {
            self.next_signal().await;
        }
        (operator, robot)
    }

    pub async fn assert_quiet(&mut self) {
        let res = tokio::time::timeout(Duration::from_millis(100), self.signal_rx.recv()).await;
        assert!(res.is_err(), "unexpected signal: {:?}", res);
    }
}

pub fn offer(sdp: &str) -> SignalMessage {
    SignalMessage::Description {
        kind: teleop_core::SdpKind::Offer,
        sdp: sdp.to_owned(),
    }
}
