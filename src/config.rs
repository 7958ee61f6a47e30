//! Configuration management for invidplay
//!
//! Handles config file loading/saving and the player/instance fallback chain.
//! Config is stored at ~/.config/invidplay/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::api::invidious::DEFAULT_INSTANCE;

/// Environment variable overriding the player command
pub const PLAYER_ENV: &str = "INVIDPLAY_PLAYER_CMD";
/// Environment variable overriding the Invidious instance
pub const INSTANCE_ENV: &str = "INVIDPLAY_INSTANCE";

const DEFAULT_PLAYER: &str = "mpv";
const DEFAULT_DOWNLOADER: &str = "curl";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Player command line, e.g. "mpv --no-video"
    pub player: Option<String>,
    /// Downloader program (must accept `<url> -L -o <file>`)
    pub downloader: Option<String>,
    /// Invidious instance base URL
    pub instance: Option<String>,
    /// Directory downloads are written to
    pub download_dir: Option<PathBuf>,
}

impl Config {
    /// Get config file path (~/.config/invidplay/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("invidplay").join("config.toml"))
    }

    /// Load config from the default location, or defaults if not found
    pub fn load() -> Self {
        Self::path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default()
    }

    /// Load config from a specific file, or defaults if unreadable
    pub fn load_from(path: &Path) -> Self {
        let Ok(text) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match toml::from_str(&text) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Save config to the default location, returning where it went
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Get player command with fallback chain:
    /// 1. Explicit override (command line flag)
    /// 2. Environment variable INVIDPLAY_PLAYER_CMD
    /// 3. Config file
    /// 4. mpv
    pub fn player_command(&self, flag: Option<&str>) -> String {
        resolve(flag, std::env::var(PLAYER_ENV).ok(), self.player.as_deref(), DEFAULT_PLAYER)
    }

    /// Get instance URL with the same fallback chain (env INVIDPLAY_INSTANCE)
    pub fn instance_url(&self, flag: Option<&str>) -> String {
        resolve(flag, std::env::var(INSTANCE_ENV).ok(), self.instance.as_deref(), DEFAULT_INSTANCE)
    }

    pub fn downloader_program(&self) -> String {
        self.downloader
            .clone()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DOWNLOADER.to_string())
    }

    /// Download directory, flag first, then config, then the current directory
    pub fn download_dir(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.download_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Every setting resolved through its fallback chain
    pub fn effective(
        &self,
        player: Option<&str>,
        instance: Option<&str>,
        download_dir: Option<&Path>,
    ) -> Config {
        Config {
            player: Some(self.player_command(player)),
            downloader: Some(self.downloader_program()),
            instance: Some(self.instance_url(instance)),
            download_dir: Some(self.download_dir(download_dir)),
        }
    }
}

/// First non-blank value wins
fn resolve(flag: Option<&str>, env: Option<String>, file: Option<&str>, default: &str) -> String {
    flag.map(str::to_string)
        .into_iter()
        .chain(env)
        .chain(file.map(str::to_string))
        .find(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
