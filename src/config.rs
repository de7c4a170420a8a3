//=========================================================================
// Configuration
//=========================================================================
//
// TOML settings for display, input, audio, storage and assets.
//
// Lookup order:
//   1. `MUSHITROOM_CONFIG` environment variable
//   2. `mushitroom.toml` in the working directory
//
// Every field has a default; a missing or malformed file never stops the
// appliance from booting.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

//=== Constants ===========================================================

pub const CONFIG_ENV_VAR: &str = "MUSHITROOM_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "mushitroom.toml";

//=== ConfigError =========================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

//=== AppConfig ===========================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub display: DisplayConfig,
    pub input: InputConfig,
    pub audio: AudioConfig,
    pub storage: StorageConfig,
    pub assets: AssetsConfig,
}

impl AppConfig {
    /// Loads the configuration from the usual locations, falling back to
    /// defaults on any failure.
    pub fn load() -> Self {
        let path = Self::config_path();
        match Self::load_from_file(&path) {
            Ok(config) => {
                log::info!("Config loaded from {}", path.display());
                config
            }
            Err(ConfigError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config file at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Parses a config file. Missing fields take their defaults.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Resolves the config file path from the environment.
    pub fn config_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV_VAR)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }
}

//=== DisplayConfig =======================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Desktop window magnification.
    pub scale: u32,
    pub title: String,
    pub background: [u8; 3],
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            fps: 24,
            scale: 2,
            title: "MUSHITROOM".to_string(),
            background: [255, 255, 255],
        }
    }
}

//=== InputConfig =========================================================

/// Which input/display backend to start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformChoice {
    /// Embedded on a Raspberry Pi, desktop everywhere else.
    #[default]
    Auto,
    Desktop,
    Embedded,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub platform: PlatformChoice,
    pub gpio: GpioConfig,
}

/// BCM pin numbers of the push-buttons (pull-up, active low).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpioConfig {
    pub prev: u8,
    pub next: u8,
    pub enter: u8,
    pub escape: Option<u8>,
    pub bounce_ms: u64,
    pub sysfs_root: PathBuf,
}

impl Default for GpioConfig {
    fn default() -> Self {
        Self {
            prev: 21,
            next: 20,
            enter: 16,
            escape: None,
            bounce_ms: 50,
            sysfs_root: PathBuf::from("/sys/class/gpio"),
        }
    }
}

//=== AudioConfig =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    pub main_volume: u8,
    pub bgm_volume: u8,
    pub sfx_volume: u8,
    pub player: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            main_volume: 100,
            bgm_volume: 100,
            sfx_volume: 100,
            player: "aplay".to_string(),
        }
    }
}

//=== Storage & Assets ====================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { path: PathBuf::from("mushitroom.json") }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    pub root: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self { root: PathBuf::from("assets") }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_appliance() {
        let config = AppConfig::default();
        assert_eq!(config.display.width, 320);
        assert_eq!(config.display.height, 240);
        assert_eq!(config.display.fps, 24);
        assert_eq!(config.input.platform, PlatformChoice::Auto);
        assert_eq!(config.input.gpio.enter, 16);
        assert_eq!(config.input.gpio.escape, None);
        assert_eq!(config.audio.player, "aplay");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mushitroom.toml");
        std::fs::write(
            &path,
            "[display]\nfps = 30\n\n[input]\nplatform = \"desktop\"\n\n[input.gpio]\nescape = 26\n",
        )
        .unwrap();

        let config = AppConfig::load_from_file(&path).unwrap();

        assert_eq!(config.display.fps, 30);
        assert_eq!(config.display.width, 320);
        assert_eq!(config.input.platform, PlatformChoice::Desktop);
        assert_eq!(config.input.gpio.escape, Some(26));
        assert_eq!(config.input.gpio.prev, 21);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[display\nfps = ").unwrap();

        let err = AppConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load_from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn serialized_config_parses_back() {
        let mut config = AppConfig::default();
        config.audio.bgm_volume = 40;
        let text = config.to_toml().unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
