use crate::room::RoomManager;
use crate::signaling::SignalingOutput;
use async_trait::async_trait;
use axum::extract::ws::Message;
use dashmap::DashMap;
use std::sync::Arc;
use teleop_core::{IceServerConfig, PeerId, SignalMessage};
use tokio::sync::mpsc;
use tracing::{error, warn};

struct SignalingInner {
    peers: DashMap<PeerId, mpsc::UnboundedSender<Message>>,
    ice_servers: Vec<IceServerConfig>,
}

impl SignalingInner {
    fn push_signal(&self, peer_id: &PeerId, msg: &SignalMessage) {
        if let Some(peer) = self.peers.get(peer_id) {
            match serde_json::to_string(msg) {
                Ok(json) => {
                    if let Err(e) = peer.send(Message::Text(json.into())) {
                        error!("Failed to send WS message to {}: {:?}", peer_id, e);
                    }
                }
                Err(e) => error!("Failed to serialize signal message: {}", e),
            }
        } else {
            warn!("Attempted to send signal to disconnected peer {}", peer_id);
        }
    }
}

#[async_trait]
impl SignalingOutput for SignalingInner {
    async fn send_signal(&self, peer_id: PeerId, msg: SignalMessage) {
        self.push_signal(&peer_id, &msg);
    }
}

/// Shared state of the rendezvous endpoint: open sockets plus the rooms they feed.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
    rooms: RoomManager,
}

impl SignalingService {
    pub fn new(ice_servers: Vec<IceServerConfig>) -> Self {
        let inner = Arc::new(SignalingInner {
            peers: DashMap::new(),
            ice_servers,
        });
        let rooms = RoomManager::new(inner.clone());
        Self { inner, rooms }
    }

    pub fn rooms(&self) -> &RoomManager {
        &self.rooms
    }

    pub fn get_ice_servers(&self) -> Vec<IceServerConfig> {
        self.inner.ice_servers.clone()
    }

    pub fn add_peer(&self, peer_id: PeerId, tx: mpsc::UnboundedSender<Message>) {
        self.inner.peers.insert(peer_id, tx);
    }

    pub fn remove_peer(&self, peer_id: &PeerId) {
        self.inner.peers.remove(peer_id);
    }

    pub fn peer_count(&self) -> usize {
        self.inner.peers.len()
    }

    pub fn send_signal(&self, peer_id: &PeerId, msg: &SignalMessage) {
        self.inner.push_signal(peer_id, msg);
    }
}
