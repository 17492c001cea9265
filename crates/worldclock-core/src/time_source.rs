//! Wall-clock access, localized to an IANA timezone.
//!
//! Everything that needs "now" goes through [`TimeSource`] so tests can
//! pin the instant with [`ManualTimeSource`] instead of racing the real
//! clock.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

use crate::clock::ClockError;

/// Resolves an IANA timezone identifier (e.g. `"Asia/Tokyo"`).
///
/// Identifiers are matched exactly as they appear in the tz database.
pub fn resolve_timezone(id: &str) -> Result<Tz, ClockError> {
    id.parse::<Tz>().map_err(|_| ClockError::InvalidTimezone {
        city: None,
        timezone: id.to_string(),
    })
}

/// A source of the current instant.
pub trait TimeSource: Send + Sync {
    /// Returns the current instant in UTC.
    fn utc_now(&self) -> DateTime<Utc>;

    /// Returns the current instant as local calendar time in `timezone`.
    fn now(&self, timezone: &str) -> Result<DateTime<Tz>, ClockError> {
        let tz = resolve_timezone(timezone)?;
        Ok(self.now_in(tz))
    }

    /// Same as [`TimeSource::now`] for an already resolved zone.
    fn now_in(&self, tz: Tz) -> DateTime<Tz> {
        self.utc_now().with_timezone(&tz)
    }
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn utc_now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualTimeSource {
    now: Mutex<DateTime<Utc>>,
}

impl ManualTimeSource {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Jumps to `instant`.
    pub fn set(&self, instant: DateTime<Utc>) {
        if let Ok(mut now) = self.now.lock() {
            *now = instant;
        }
    }

    /// Moves the clock forward by `step`.
    pub fn advance(&self, step: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += step;
        }
    }
}

impl TimeSource for ManualTimeSource {
    fn utc_now(&self) -> DateTime<Utc> {
        self.now
            .lock()
            .map_or_else(|poisoned| *poisoned.into_inner(), |now| *now)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Timelike};

    use super::*;

    /// Formats `utc` shifted by a fixed offset without going through the tz database.
    fn reference_hms(utc: DateTime<Utc>, offset_secs: i64) -> String {
        let secs = i64::from(utc.num_seconds_from_midnight()) + offset_secs;
        let secs = secs.rem_euclid(86_400);
        format!(
            "{:02}:{:02}:{:02}",
            secs / 3600,
            secs / 60 % 60,
            secs % 60
        )
    }

    fn assert_all_hours(timezone: &str, year: i32, month: u32, day: u32, offset_secs: i64) {
        for hour in 0..24 {
            let utc = Utc
                .with_ymd_and_hms(year, month, day, hour, 17, 42)
                .unwrap();
            let source = ManualTimeSource::new(utc);

            let local = source.now(timezone).unwrap();

            assert_eq!(
                local.format("%H:%M:%S").to_string(),
                reference_hms(utc, offset_secs),
                "{timezone} at {utc}"
            );
        }
    }

    #[test]
    fn los_angeles_standard_time_matches_reference() {
        assert_all_hours("America/Los_Angeles", 2024, 1, 15, -8 * 3600);
    }

    #[test]
    fn los_angeles_daylight_time_matches_reference() {
        assert_all_hours("America/Los_Angeles", 2024, 7, 15, -7 * 3600);
    }

    #[test]
    fn tokyo_has_no_dst() {
        assert_all_hours("Asia/Tokyo", 2024, 1, 15, 9 * 3600);
        assert_all_hours("Asia/Tokyo", 2024, 7, 15, 9 * 3600);
    }

    #[test]
    fn half_hour_offsets_shift_minutes() {
        assert_all_hours("Asia/Kolkata", 2024, 3, 1, 5 * 3600 + 1800);
    }

    #[test]
    fn southern_hemisphere_dst_is_inverted() {
        // Sydney observes DST in January (UTC+11), standard time in July (UTC+10).
        assert_all_hours("Australia/Sydney", 2024, 1, 15, 11 * 3600);
        assert_all_hours("Australia/Sydney", 2024, 7, 15, 10 * 3600);
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let source = SystemTimeSource;

        let err = source.now("Mars/Olympus_Mons").unwrap_err();

        assert_eq!(
            err,
            ClockError::InvalidTimezone {
                city: None,
                timezone: "Mars/Olympus_Mons".into()
            }
        );
    }

    #[test]
    fn timezone_names_are_case_sensitive() {
        assert!(resolve_timezone("asia/tokyo").is_err());
        assert!(resolve_timezone("Asia/Tokyo").is_ok());
    }

    #[test]
    fn manual_source_advances() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let source = ManualTimeSource::new(start);

        source.advance(Duration::seconds(90));

        assert_eq!(source.utc_now().minute(), 1);
        assert_eq!(source.utc_now().second(), 30);
    }
}
