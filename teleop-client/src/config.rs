use crate::providers::{ActionMode, DEFAULT_VELOCITY_SCALE, ProviderSettings, clamp_velocity_scale};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use teleop_core::utils::{DEFAULT_STUN_ADDR, DEFAULT_STUN_ADDR_2};
use teleop_core::{IceServerConfig, RoomName};
use thiserror::Error;

pub const DEFAULT_SIGNALING_URL: &str = "ws://127.0.0.1:3000/ws";
pub const DEFAULT_ROOM: &str = "teleop";
const DEFAULT_GRACE_PERIOD_MS: u64 = 4000;
const DEFAULT_VIDEO_TRACKS: usize = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: Option<String>,
    pub messaging_sender_id: Option<String>,
    pub app_id: Option<String>,
    pub measurement_id: Option<String>,
}

/// Where layouts are persisted. Parsed and carried, not acted on here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    #[default]
    Local,
    Firebase(FirebaseConfig),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsoleConfig {
    pub signaling_url: String,
    pub room: RoomName,
    pub grace_period_ms: u64,
    pub velocity_scale: f64,
    pub action_mode: ActionMode,
    pub ice_servers: Vec<IceServerConfig>,
    pub video_tracks: usize,
    pub storage: StorageConfig,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            signaling_url: DEFAULT_SIGNALING_URL.to_owned(),
            room: RoomName::from(DEFAULT_ROOM),
            grace_period_ms: DEFAULT_GRACE_PERIOD_MS,
            velocity_scale: DEFAULT_VELOCITY_SCALE,
            action_mode: ActionMode::default(),
            ice_servers: vec![IceServerConfig {
                urls: vec![DEFAULT_STUN_ADDR.to_owned(), DEFAULT_STUN_ADDR_2.to_owned()],
                username: None,
                credential: None,
            }],
            video_tracks: DEFAULT_VIDEO_TRACKS,
            storage: StorageConfig::default(),
        }
    }
}

impl ConsoleConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validated()
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }

    pub fn provider_settings(&self) -> ProviderSettings {
        ProviderSettings {
            velocity_scale: self.velocity_scale,
            action_mode: self.action_mode,
        }
    }

    /// Normalizes ranges and rejects values the console cannot start with.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        if !(self.signaling_url.starts_with("ws://") || self.signaling_url.starts_with("wss://"))
        {
            return Err(ConfigError::Invalid(format!(
                "signaling_url must be a ws:// or wss:// url, got `{}`",
                self.signaling_url
            )));
        }
        if self.room.0.trim().is_empty() {
            return Err(ConfigError::Invalid("room must not be empty".to_owned()));
        }
        if self.grace_period_ms == 0 {
            return Err(ConfigError::Invalid(
                "grace_period_ms must be positive".to_owned(),
            ));
        }
        if self.ice_servers.iter().any(|s| s.urls.is_empty()) {
            return Err(ConfigError::Invalid(
                "every ice server needs at least one url".to_owned(),
            ));
        }
        self.velocity_scale = clamp_velocity_scale(self.velocity_scale);
        Ok(self)
    }
}
