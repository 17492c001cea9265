//! Outcome of the one-shot startup time sync.
//!
//! The sync only estimates how far the local clock is from a network
//! time server. The estimate is reported and then dropped: nothing in
//! the application ever adjusts the system clock.

use std::fmt;

use serde::Serialize;

/// Standard NTP/SNTP UDP port.
pub const NTP_PORT: u16 = 123;

/// One measurement taken from a server reply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NtpSample {
    /// Server clock minus local clock.
    pub offset_seconds: f64,
    pub round_trip_seconds: f64,
    pub stratum: u8,
}

impl NtpSample {
    /// Builds a sample from microsecond offset and round-trip values.
    pub fn from_micros(offset_micros: i64, round_trip_micros: u64, stratum: u8) -> Self {
        Self {
            offset_seconds: offset_micros as f64 / 1e6,
            round_trip_seconds: round_trip_micros as f64 / 1e6,
            stratum,
        }
    }
}

/// Why a time sync attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SyncError {
    /// The server hostname did not resolve to any address.
    Resolve(String),
    /// Socket setup, send or receive failed.
    Io(String),
    /// No reply arrived before the timeout.
    Timeout { millis: u64 },
    /// The reply was not a valid SNTP server response.
    Malformed(String),
    /// The server refused service (stratum 0 reply).
    KissOfDeath(String),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolve(e) => write!(f, "could not resolve server: {e}"),
            Self::Io(e) => write!(f, "network error: {e}"),
            Self::Timeout { millis } => write!(f, "no reply within {millis} ms"),
            Self::Malformed(e) => write!(f, "malformed reply: {e}"),
            Self::KissOfDeath(e) => write!(f, "server refused service: {e}"),
        }
    }
}

impl std::error::Error for SyncError {}

/// Result of a single sync attempt. Produced once, logged, discarded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSyncResult {
    /// Server that was queried (host or `host:port`).
    pub server: String,
    /// Estimated server clock minus local clock. Zero on failure.
    pub offset_seconds: f64,
    /// Round-trip delay of the exchange. Zero on failure.
    pub round_trip_seconds: f64,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<SyncError>,
}

impl TimeSyncResult {
    pub fn success(server: impl Into<String>, sample: NtpSample) -> Self {
        Self {
            server: server.into(),
            offset_seconds: sample.offset_seconds,
            round_trip_seconds: sample.round_trip_seconds,
            succeeded: true,
            error: None,
        }
    }

    pub fn failure(server: impl Into<String>, error: SyncError) -> Self {
        Self {
            server: server.into(),
            offset_seconds: 0.0,
            round_trip_seconds: 0.0,
            succeeded: false,
            error: Some(error),
        }
    }

    /// Human-readable failure description, if any.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// Single-line JSON used by `worldclock sync --json`.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
    }
}

impl fmt::Display for TimeSyncResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            None => write!(
                f,
                "offset {:+.3}s from {} (round trip {:.0} ms)",
                self.offset_seconds,
                self.server,
                self.round_trip_seconds * 1000.0
            ),
            Some(e) => write!(f, "sync with {} failed: {e}", self.server),
        }
    }
}

/// Hook for applying a measured offset to the system clock.
///
/// The system clock is never changed. The offset is only logged.
pub fn apply_offset(offset_seconds: f64) {
    crate::log_info!("Clock offset {offset_seconds:+.3}s not applied to the system clock");
}
