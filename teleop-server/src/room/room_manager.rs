use crate::room::{Room, RoomCommand};
use crate::signaling::SignalingOutput;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use teleop_core::RoomName;
use tokio::sync::mpsc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct RoomManager {
    rooms: Arc<DashMap<RoomName, mpsc::Sender<RoomCommand>>>,
    signaling: Arc<dyn SignalingOutput>,
}

impl RoomManager {
    pub fn new(signaling: Arc<dyn SignalingOutput>) -> Self {
        Self {
            rooms: Arc::new(DashMap::new()),
            signaling,
        }
    }

    /// Returns the command sender of the named room, spawning the room on first use.
    pub fn room_sender(&self, room: &RoomName) -> mpsc::Sender<RoomCommand> {
        match self.rooms.entry(room.clone()) {
            Entry::Occupied(e) if !e.get().is_closed() => e.get().clone(),
            entry => {
                let tx = self.spawn_room(room);
                entry.insert(tx.clone());
                tx
            }
        }
    }

    fn spawn_room(&self, room: &RoomName) -> mpsc::Sender<RoomCommand> {
        info!("Creating new room: {}", room);
        let (tx, rx) = mpsc::channel(100);
        let room_actor = Room::new(room.clone(), rx, self.signaling.clone());

        let rooms = self.rooms.clone();
        let name = room.clone();
        tokio::spawn(async move {
            room_actor.run().await;
            // The receiver is gone now, so only this room's sender reports closed.
            if rooms.remove_if(&name, |_, sender| sender.is_closed()).is_some() {
                debug!("Removed room {}", name);
            }
        });

        tx
    }

    pub fn contains(&self, room: &RoomName) -> bool {
        self.rooms.contains_key(room)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
