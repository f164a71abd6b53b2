use crate::SignalingService;
use crate::room::RoomCommand;
use axum::Router;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use futures::{SinkExt, StreamExt};
use teleop_core::{PeerId, RoomName, SignalMessage};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Rendezvous routes: `GET /ws` upgrades to a signaling socket.
pub fn router(service: SignalingService) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .with_state(service)
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<SignalingService>,
) -> impl IntoResponse {
    let peer_id = PeerId::new();

    ws.on_upgrade(move |socket| handle_socket(socket, peer_id, service))
}

async fn handle_socket(socket: WebSocket, peer_id: PeerId, service: SignalingService) {
    info!("New WebSocket connection: {}", peer_id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    service.add_peer(peer_id.clone(), tx);
    service.send_signal(
        &peer_id,
        &SignalMessage::IceConfig {
            ice_servers: service.get_ice_servers(),
        },
    );

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();
        let peer_id = peer_id.clone();

        async move {
            let mut room_tx: Option<mpsc::Sender<RoomCommand>> = None;

            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<SignalMessage>(&text) {
                        Ok(SignalMessage::Join { room, role }) => {
                            if room_tx.is_some() {
                                warn!("Peer {} sent a second Join, ignoring", peer_id);
                                continue;
                            }
                            info!("Peer {} wants to join room '{}' as {}", peer_id, room, role);
                            match join_room(&service, &room, peer_id.clone(), role).await {
                                Some(tx) => room_tx = Some(tx),
                                None => break,
                            }
                        }
                        Ok(signal) if signal.is_relayed() => {
                            let Some(tx) = &room_tx else {
                                warn!("Peer {} signaled before joining a room", peer_id);
                                continue;
                            };
                            let cmd = RoomCommand::Relay {
                                peer_id: peer_id.clone(),
                                message: signal,
                            };
                            if let Err(e) = tx.send(cmd).await {
                                error!("Room died: {}", e);
                                break;
                            }
                        }
                        Ok(other) => warn!("Unexpected signal from {}: {:?}", peer_id, other),
                        Err(e) => warn!("Invalid SignalMessage from {}: {:?}", peer_id, e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }

            if let Some(tx) = room_tx {
                let _ = tx
                    .send(RoomCommand::Leave {
                        peer_id: peer_id.clone(),
                    })
                    .await;
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    service.remove_peer(&peer_id);
    info!("WebSocket disconnected: {}", peer_id);
}

async fn join_room(
    service: &SignalingService,
    room: &RoomName,
    peer_id: PeerId,
    role: teleop_core::PeerRole,
) -> Option<mpsc::Sender<RoomCommand>> {
    // A room that just emptied may still be registered; retry once on a fresh one.
    for _ in 0..2 {
        let tx = service.rooms().room_sender(room);
        let cmd = RoomCommand::Join {
            peer_id: peer_id.clone(),
            role,
        };
        if tx.send(cmd).await.is_ok() {
            return Some(tx);
        }
    }
    error!("Could not reach room '{}' for {}", room, peer_id);
    None
}
