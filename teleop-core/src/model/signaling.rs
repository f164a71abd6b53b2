use crate::model::peer::PeerId;
use crate::model::room::{PeerRole, RoomName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpKind {
    Offer,
    Answer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "d")]
pub enum SignalMessage {
    IceConfig {
        ice_servers: Vec<IceServerConfig>,
    },
    Join {
        room: RoomName,
        role: PeerRole,
    },
    Joined {
        room: RoomName,
        role: PeerRole,
        peer_id: PeerId,
    },
    /// The counterpart seat has been filled.
    PeerJoined {
        role: PeerRole,
    },
    PeerLeft {
        role: PeerRole,
    },
    Description {
        kind: SdpKind,
        sdp: String,
    },
    IceCandidate {
        candidate: String,
        sdp_mid: Option<String>,
        sdp_m_line_index: Option<u16>,
    },
    /// Stream id -> logical camera name, published by the robot.
    CameraInfo {
        streams: BTreeMap<String, String>,
    },
    Error {
        reason: String,
    },
}

impl SignalMessage {
    /// Messages the rendezvous forwards verbatim to the counterpart.
    pub fn is_relayed(&self) -> bool {
        matches!(
            self,
            Self::Description { .. } | Self::IceCandidate { .. } | Self::CameraInfo { .. }
        )
    }
}
