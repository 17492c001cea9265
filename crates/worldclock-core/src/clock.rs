//! A single city clock: one city label, one time label.

use std::fmt;
use std::sync::Arc;

use chrono::DateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::time_source::{TimeSource, resolve_timezone};

/// Format used for every time label. Always 24-hour, zero-padded.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// One configured clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Label shown above the time (e.g. "Tokyo").
    pub city: String,
    /// IANA timezone identifier (e.g. "Asia/Tokyo").
    pub timezone: String,
    /// Kept for config compatibility. Labels are always 24-hour.
    #[serde(default = "default_true")]
    pub use_24_hour: bool,
}

fn default_true() -> bool {
    true
}

impl ClockConfig {
    pub fn new(city: impl Into<String>, timezone: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            timezone: timezone.into(),
            use_24_hour: true,
        }
    }
}

/// Errors raised while assembling clocks. All of them are startup-fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    /// The identifier is not in the tz database.
    InvalidTimezone {
        city: Option<String>,
        timezone: String,
    },
    /// The clock list is empty.
    NoClocks,
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTimezone {
                city: Some(city),
                timezone,
            } => write!(f, "invalid timezone \"{timezone}\" for clock \"{city}\""),
            Self::InvalidTimezone {
                city: None,
                timezone,
            } => write!(f, "invalid timezone \"{timezone}\""),
            Self::NoClocks => f.write_str("no clocks configured"),
        }
    }
}

impl std::error::Error for ClockError {}

/// Formats an instant as the label text.
pub fn format_time(local: &DateTime<Tz>) -> String {
    local.format(TIME_FORMAT).to_string()
}

/// A city label plus a time label that is refreshed on every tick.
pub struct ClockDisplayUnit {
    config: ClockConfig,
    timezone: Tz,
    text: String,
    source: Arc<dyn TimeSource>,
}

impl ClockDisplayUnit {
    /// Creates a unit and renders its first frame.
    ///
    /// The timezone is validated here so a bad identifier aborts startup
    /// instead of surfacing on the first tick.
    pub fn new(config: ClockConfig, source: Arc<dyn TimeSource>) -> Result<Self, ClockError> {
        let timezone = resolve_timezone(&config.timezone).map_err(|_| {
            ClockError::InvalidTimezone {
                city: Some(config.city.clone()),
                timezone: config.timezone.clone(),
            }
        })?;
        let mut unit = Self {
            config,
            timezone,
            text: String::new(),
            source,
        };
        unit.tick();
        Ok(unit)
    }

    /// Refreshes the time label from the time source.
    pub fn tick(&mut self) {
        let local = self.source.now_in(self.timezone);
        self.text = format_time(&local);
    }

    pub fn city(&self) -> &str {
        &self.config.city
    }

    /// The time label as of the most recent tick.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }
}

impl fmt::Debug for ClockDisplayUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClockDisplayUnit")
            .field("city", &self.config.city)
            .field("timezone", &self.timezone)
            .field("text", &self.text)
            .finish()
    }
}
