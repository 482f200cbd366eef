//! Configuration loading and management.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Application configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Global settings.
    #[serde(default)]
    pub settings: Settings,

    /// Device filters.
    #[serde(default)]
    pub filters: Filters,
}

/// Global settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Include raw descriptor dumps in reports.
    #[serde(default = "default_show_descriptors")]
    pub show_descriptors: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_descriptors: default_show_descriptors(),
        }
    }
}

fn default_show_descriptors() -> bool {
    true
}

/// Device filters.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Filters {
    /// Devices to skip, as `vid:pid` hex patterns. `*` matches any id,
    /// e.g. `"1d6b:*"` hides Linux Foundation root hubs.
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl Config {
    /// Load configuration from default locations.
    /// Search order:
    /// 1. ./usbinfo.toml
    /// 2. ~/.config/usbinfo/config.toml
    /// 3. /etc/usbinfo.toml
    pub fn load() -> Result<Self, ConfigError> {
        for path in Self::config_paths().into_iter().flatten() {
            if path.exists() {
                return Self::load_from_path(&path);
            }
        }

        // No config file found - use defaults
        Ok(Config::default())
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Get list of possible config paths.
    fn config_paths() -> Vec<Option<PathBuf>> {
        vec![
            std::env::current_dir().ok().map(|p| p.join("usbinfo.toml")),
            dirs::config_dir().map(|p| p.join("usbinfo").join("config.toml")),
            Some(PathBuf::from("/etc/usbinfo.toml")),
        ]
    }

    /// Check whether a device matches one of the ignore patterns.
    pub fn is_ignored(&self, vendor_id: u16, product_id: u16) -> bool {
        self.filters
            .ignore
            .iter()
            .any(|pattern| matches_pattern(pattern, vendor_id, product_id))
    }
}

/// Match a `vid:pid` pattern against a device. Either side may be `*`;
/// hex ids may carry an optional `0x` prefix. Malformed patterns match
/// nothing.
fn matches_pattern(pattern: &str, vendor_id: u16, product_id: u16) -> bool {
    let Some((vid_part, pid_part)) = pattern.split_once(':') else {
        return false;
    };

    let id_matches = |part: &str, id: u16| {
        if part == "*" {
            return true;
        }
        u16::from_str_radix(part.trim_start_matches("0x"), 16)
            .map(|value| value == id)
            .unwrap_or(false)
    };

    id_matches(vid_part, vendor_id) && id_matches(pid_part, product_id)
}

/// Generate example configuration content.
pub fn example_config() -> &'static str {
    r#"# usbinfo configuration file
# Place in ./usbinfo.toml, ~/.config/usbinfo/config.toml, or /etc/usbinfo.toml

[settings]
# Include raw device/configuration descriptor dumps in reports
show_descriptors = true

[filters]
# Devices to skip, as "vid:pid" hex patterns ("*" matches any id)
# ignore = ["1d6b:*"]
ignore = []
"#
}
