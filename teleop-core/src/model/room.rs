use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of the rendezvous room both participants join.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
#[serde(transparent)]
pub struct RoomName(pub String);

impl From<&str> for RoomName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for RoomName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two seats of a room.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Hash, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum PeerRole {
    Operator,
    Robot,
}

impl PeerRole {
    pub fn counterpart(self) -> Self {
        match self {
            Self::Operator => Self::Robot,
            Self::Robot => Self::Operator,
        }
    }

    /// The operator yields on offer collisions, the robot's offer wins.
    pub fn politeness(self) -> Politeness {
        match self {
            Self::Operator => Politeness::Polite,
            Self::Robot => Politeness::Impolite,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Operator => "operator",
            Self::Robot => "robot",
        }
    }
}

impl fmt::Display for PeerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeerRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "operator" => Ok(Self::Operator),
            "robot" => Ok(Self::Robot),
            other => Err(format!("unknown peer role '{other}'")),
        }
    }
}

/// Precedence of a participant when both sides offer at once.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Politeness {
    Polite,
    Impolite,
}
