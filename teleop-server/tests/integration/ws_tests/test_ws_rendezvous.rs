use futures::{SinkExt, StreamExt};
use std::time::Duration;
use teleop_core::{IceServerConfig, PeerRole, RoomName, SignalMessage};
use teleop_server::{SignalingService, router};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::integration::{SIGNAL_TIMEOUT, init_tracing, offer};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start_server() -> (String, SignalingService) {
    let service = SignalingService::new(vec![IceServerConfig {
        urls: vec!["stun:stun.example.org:3478".into()],
        username: None,
        credential: None,
    }]);
    let app = router(service.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("ws://{}/ws", addr), service)
}

async fn send(socket: &mut Socket, msg: &SignalMessage) {
    let json = serde_json::to_string(msg).unwrap();
    socket.send(Message::Text(json.into())).await.unwrap();
}

async fn recv(socket: &mut Socket) -> SignalMessage {
    loop {
        let frame = tokio::time::timeout(SIGNAL_TIMEOUT, socket.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("socket closed")
            .expect("socket error");
        if let Message::Text(text) = frame {
            return serde_json::from_str(&text).expect("bad signal json");
        }
    }
}

async fn connect_and_join(url: &str, role: PeerRole) -> Socket {
    let (mut socket, _) = connect_async(url).await.expect("connect failed");

    let ice = recv(&mut socket).await;
    assert!(matches!(ice, SignalMessage::IceConfig { ref ice_servers } if ice_servers.len() == 1));

    send(
        &mut socket,
        &SignalMessage::Join {
            room: RoomName::from("demo"),
            role,
        },
    )
    .await;
    assert!(matches!(recv(&mut socket).await, SignalMessage::Joined { role: r, .. } if r == role));
    socket
}

#[tokio::test]
async fn test_ws_rendezvous_pairs_and_relays() {
    init_tracing();

    let (url, service) = start_server().await;

    let mut operator = connect_and_join(&url, PeerRole::Operator).await;
    let mut robot = connect_and_join(&url, PeerRole::Robot).await;

    assert_eq!(
        recv(&mut robot).await,
        SignalMessage::PeerJoined {
            role: PeerRole::Operator
        }
    );
    assert_eq!(
        recv(&mut operator).await,
        SignalMessage::PeerJoined {
            role: PeerRole::Robot
        }
    );
    assert!(service.rooms().contains(&RoomName::from("demo")));

    send(&mut robot, &offer("v=0 robot")).await;
    assert_eq!(recv(&mut operator).await, offer("v=0 robot"));

    robot.close(None).await.unwrap();
    assert_eq!(
        recv(&mut operator).await,
        SignalMessage::PeerLeft {
            role: PeerRole::Robot
        }
    );

    operator.close(None).await.unwrap();

    // The emptied room is dropped from the manager.
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while service.rooms().contains(&RoomName::from("demo")) {
        assert!(tokio::time::Instant::now() < deadline, "room was not removed");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
