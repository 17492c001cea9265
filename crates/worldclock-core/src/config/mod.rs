mod loader;
pub mod template;

use serde::{Deserialize, Serialize};

use crate::clock::ClockConfig;
use crate::log::LogConfig;
use crate::sync::NTP_PORT;

pub use loader::{config_dir, config_path, load, load_from, try_load, try_load_from};

/// Top-level configuration for worldclock.
///
/// Loaded from `~/.config/worldclock/config.toml`. Missing sections
/// fall back to defaults thanks to `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Clocks in display order.
    pub clocks: Vec<ClockConfig>,
    /// Panel appearance.
    pub display: DisplayConfig,
    /// Startup network time sync.
    pub sync: SyncConfig,
    /// File logging.
    pub logging: LogConfig,
}

/// How the clocks are arranged on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// One clock per row, top to bottom.
    #[default]
    Vertical,
    /// Clocks side by side, left to right.
    Horizontal,
}

/// Panel appearance settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub orientation: Orientation,
    /// Render times with large block digits instead of plain text.
    pub big_digits: bool,
    /// Background color (hex, e.g. "#000000").
    pub background: String,
    /// Time label color (hex).
    pub foreground: String,
    /// City label color (hex).
    pub city_color: String,
    /// Blank columns left of the clocks.
    pub margin_left: u16,
    /// Blank rows above the first clock.
    pub margin_top: u16,
    /// Blank rows (vertical) or columns (horizontal) between clocks.
    pub spacing: u16,
}

/// Startup time sync settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Whether to query a time server at startup.
    pub enabled: bool,
    /// SNTP server hostname.
    pub server: String,
    /// SNTP server UDP port.
    pub port: u16,
    /// How long to wait for the reply.
    pub timeout_ms: u64,
    /// How long shutdown waits for an unfinished sync before abandoning it.
    pub shutdown_grace_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clocks: default_clocks(),
            display: DisplayConfig::default(),
            sync: SyncConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            big_digits: true,
            background: "#000000".into(),
            foreground: "#ffffff".into(),
            city_color: "#ffffff".into(),
            margin_left: 6,
            margin_top: 1,
            spacing: 1,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            server: "pool.ntp.org".into(),
            port: NTP_PORT,
            timeout_ms: 5000,
            shutdown_grace_ms: 500,
        }
    }
}

/// The two clocks shown when no config file exists.
pub fn default_clocks() -> Vec<ClockConfig> {
    vec![
        ClockConfig::new("San Francisco", "America/Los_Angeles"),
        ClockConfig::new("Tokyo", "Asia/Tokyo"),
    ]
}

impl Config {
    /// Clamps values to safe ranges and replaces unusable ones.
    ///
    /// Timezones are not checked here; an unknown zone is a startup
    /// error raised when the clock panel is built.
    pub fn validate(&mut self) {
        self.display.margin_left = self.display.margin_left.min(200);
        self.display.margin_top = self.display.margin_top.min(50);
        self.display.spacing = self.display.spacing.min(20);
        let defaults = DisplayConfig::default();
        fix_color(&mut self.display.background, &defaults.background);
        fix_color(&mut self.display.foreground, &defaults.foreground);
        fix_color(&mut self.display.city_color, &defaults.city_color);

        self.sync.timeout_ms = self.sync.timeout_ms.clamp(100, 30_000);
        self.sync.shutdown_grace_ms = self.sync.shutdown_grace_ms.min(10_000);
        if self.sync.port == 0 {
            self.sync.port = NTP_PORT;
        }
        if self.sync.server.trim().is_empty() {
            self.sync.server = SyncConfig::default().server;
        }

        self.logging.max_file_mb = self.logging.max_file_mb.min(1024);
    }
}

/// Parses `#rrggbb` into its components.
pub fn parse_hex_color(s: &str) -> Option<(u8, u8, u8)> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

fn fix_color(field: &mut String, fallback: &str) {
    if parse_hex_color(field).is_none() {
        *field = fallback.to_string();
    }
}
