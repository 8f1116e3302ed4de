/// User configuration
///
/// Stored as JSON in the user's config directory:
/// - Linux: ~/.config/tier-maker/config.json
/// - macOS: ~/Library/Application Support/tier-maker/config.json
/// - Windows: %APPDATA%\tier-maker\config.json
///
/// Every field is optional; anything missing falls back to the defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::data::TierId;
use crate::error::ConfigError;

/// An opaque sRGB color, written as `#rrggbb` in the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);
    pub const BLACK: Rgb = Rgb::new(0x00, 0x00, 0x00);

    /// Convert for use in iced styles
    pub fn to_color(self) -> iced::Color {
        iced::Color::from_rgb8(self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .filter(|hex| hex.len() == 6 && hex.is_ascii())
            .ok_or_else(|| ConfigError::Parse(format!("expected #rrggbb color, got {s:?}")))?;
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| ConfigError::Parse(format!("invalid hex digits in {s:?}")))
        };
        Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Label and colors of one ranked tier
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TierStyle {
    pub label: String,
    pub background: Rgb,
    pub text: Rgb,
}

impl TierStyle {
    fn new(label: &str, background: Rgb, text: Rgb) -> Self {
        Self {
            label: label.to_string(),
            background,
            text,
        }
    }

    /// Built-in style for a tier
    pub fn default_for(tier: TierId) -> Self {
        match tier {
            TierId::Legendary => Self::new("Legendary", Rgb::new(0xdc, 0x26, 0x26), Rgb::WHITE),
            TierId::TopTier => Self::new("Top Tier", Rgb::new(0xf9, 0x73, 0x16), Rgb::WHITE),
            TierId::Elite => Self::new("Elite", Rgb::new(0xfa, 0xcc, 0x15), Rgb::BLACK),
            TierId::Npc => Self::new("NPC", Rgb::new(0xf3, 0xf4, 0xf6), Rgb::new(0x11, 0x18, 0x27)),
            TierId::Washed => Self::new("Washed Up", Rgb::new(0x6b, 0x72, 0x80), Rgb::WHITE),
            TierId::Pool => Self::new("Pool", Rgb::new(0x1e, 0x29, 0x3b), Rgb::WHITE),
        }
    }
}

/// Export related settings
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ExportSettings {
    /// Where exported PNGs go (download directory when unset)
    pub output_dir: Option<PathBuf>,
    /// Only use system fonts; do not attempt `font_files`
    pub skip_fonts: bool,
    /// Extra font files to load for tier labels
    pub font_files: Vec<PathBuf>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: None,
            skip_fonts: true,
            font_files: Vec::new(),
        }
    }
}

impl ExportSettings {
    /// Resolve the directory exported files are written to
    pub fn resolve_output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .or_else(dirs::download_dir)
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Whole configuration file
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Per-tier overrides; tiers not listed keep their built-in style
    pub tiers: BTreeMap<TierId, TierStyle>,
    pub export: ExportSettings,
}

impl AppConfig {
    /// Style for a tier, falling back to the built-in one
    pub fn style(&self, tier: TierId) -> TierStyle {
        self.tiers
            .get(&tier)
            .cloned()
            .unwrap_or_else(|| TierStyle::default_for(tier))
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Parse from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Get the path where the config file should be stored
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("tier-maker");
        path.push("config.json");
        Some(path)
    }

    /// Read the config at `path`. A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
        }
    }

    /// Write the config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |e: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, self.to_json()?).map_err(io_err)
    }

    /// Load the user's config, falling back to defaults on any problem
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            log::warn!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            let config = Self::default();
            match config.save_to(&path) {
                Ok(()) => log::info!("Wrote default config to {}", path.display()),
                Err(e) => log::warn!("Could not write default config: {}", e),
            }
            return config;
        }

        match Self::load_from(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
