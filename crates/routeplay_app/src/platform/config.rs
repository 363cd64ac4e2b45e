//! Optional RON configuration for routeplay, overridable from the command line.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use routeplay_core::{FramingPolicy, DEFAULT_SPEED_KMH, DEFAULT_TICK_INTERVAL_MS};
use routeplay_engine::{BackendSettings, ControllerSettings, JobError, PlaybackSettings};
use routeplay_logging::{rp_info, rp_warn};
use serde::{Deserialize, Serialize};

use super::cli::Cli;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FramingSetting {
    #[default]
    Buffered,
    PerChunk,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: String,
    pub sample: String,
    pub connect_timeout_secs: u64,
    pub artifact_timeout_secs: u64,
    pub tick_interval_ms: u64,
    pub speed_kmh: f64,
    pub framing: FramingSetting,
    pub download_dir: Option<PathBuf>,
    pub notify_backend_on_cancel: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: BackendSettings::DEFAULT_BASE_URL.to_string(),
            sample: String::new(),
            connect_timeout_secs: BackendSettings::DEFAULT_CONNECT_TIMEOUT.as_secs(),
            artifact_timeout_secs: BackendSettings::DEFAULT_ARTIFACT_TIMEOUT.as_secs(),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            speed_kmh: DEFAULT_SPEED_KMH,
            framing: FramingSetting::default(),
            download_dir: None,
            notify_backend_on_cancel: true,
        }
    }
}

impl AppConfig {
    /// Command-line values win over file values.
    pub fn apply_cli(mut self, cli: &Cli) -> Self {
        if let Some(server) = &cli.server {
            self.server = server.clone();
        }
        if let Some(sample) = &cli.sample {
            self.sample = sample.clone();
        }
        if let Some(dir) = &cli.download_dir {
            self.download_dir = Some(dir.clone());
        }
        if let Some(framing) = cli.framing {
            self.framing = framing.into();
        }
        self
    }

    pub fn backend_settings(&self) -> Result<BackendSettings, JobError> {
        let mut settings = BackendSettings::with_base_url(&self.server)?;
        settings.connect_timeout = Duration::from_secs(self.connect_timeout_secs);
        settings.artifact_timeout = Duration::from_secs(self.artifact_timeout_secs);
        Ok(settings)
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        let speed_kmh = if self.speed_kmh.is_finite() && self.speed_kmh > 0.0 {
            self.speed_kmh
        } else {
            rp_warn!("Ignoring invalid speed {} km/h", self.speed_kmh);
            DEFAULT_SPEED_KMH
        };
        ControllerSettings {
            framing: map_framing(self.framing),
            playback: PlaybackSettings {
                tick_interval: Duration::from_millis(self.tick_interval_ms.max(1)),
                speed_kmh,
            },
            download_dir: self.download_dir.clone(),
            notify_backend_on_cancel: self.notify_backend_on_cancel,
        }
    }

    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::new())
    }
}

/// Loads the configuration file. A missing file yields defaults; an
/// unreadable or malformed one is logged and also yields defaults.
pub fn load_config(path: &Path) -> AppConfig {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return AppConfig::default();
        }
        Err(err) => {
            rp_warn!("Failed to read config from {:?}: {}", path, err);
            return AppConfig::default();
        }
    };

    match ron::from_str(&content) {
        Ok(config) => {
            rp_info!("Loaded config from {:?}", path);
            config
        }
        Err(err) => {
            rp_warn!("Failed to parse config from {:?}: {}", path, err);
            AppConfig::default()
        }
    }
}

fn map_framing(setting: FramingSetting) -> FramingPolicy {
    match setting {
        FramingSetting::Buffered => FramingPolicy::Buffered,
        FramingSetting::PerChunk => FramingPolicy::PerChunk,
    }
}
