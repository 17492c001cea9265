use std::sync::Arc;

use crate::clock::{ClockConfig, ClockDisplayUnit, ClockError};
use crate::time_source::TimeSource;

/// The fixed, ordered set of clocks shown on screen.
///
/// Built once at startup; the only mutation afterwards is [`ClockPanel::tick`].
#[derive(Debug)]
pub struct ClockPanel {
    units: Vec<ClockDisplayUnit>,
}

impl ClockPanel {
    /// Builds one unit per config entry, preserving order.
    ///
    /// Fails on the first entry with an unknown timezone, or if `configs`
    /// is empty.
    pub fn new(configs: &[ClockConfig], source: Arc<dyn TimeSource>) -> Result<Self, ClockError> {
        if configs.is_empty() {
            return Err(ClockError::NoClocks);
        }
        let units = configs
            .iter()
            .cloned()
            .map(|config| ClockDisplayUnit::new(config, source.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { units })
    }

    /// Refreshes every clock.
    pub fn tick(&mut self) {
        for unit in &mut self.units {
            unit.tick();
        }
    }

    pub fn units(&self) -> &[ClockDisplayUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::time_source::ManualTimeSource;

    fn source() -> Arc<ManualTimeSource> {
        Arc::new(ManualTimeSource::new(
            Utc.with_ymd_and_hms(2024, 7, 1, 20, 15, 30).unwrap(),
        ))
    }

    fn cities(panel: &ClockPanel) -> Vec<&str> {
        panel.units().iter().map(ClockDisplayUnit::city).collect()
    }

    #[test]
    fn preserves_config_order() {
        // Arrange: Tokyo is "ahead" of San Francisco but must still come second.
        let configs = [
            ClockConfig::new("San Francisco", "America/Los_Angeles"),
            ClockConfig::new("Tokyo", "Asia/Tokyo"),
        ];

        // Act
        let panel = ClockPanel::new(&configs, source()).unwrap();

        // Assert
        assert_eq!(cities(&panel), ["San Francisco", "Tokyo"]);
        assert_eq!(panel.units()[0].text(), "13:15:30");
        assert_eq!(panel.units()[1].text(), "05:15:30");
    }

    #[test]
    fn reversed_configs_reverse_the_panel() {
        let configs = [
            ClockConfig::new("Tokyo", "Asia/Tokyo"),
            ClockConfig::new("San Francisco", "America/Los_Angeles"),
        ];

        let panel = ClockPanel::new(&configs, source()).unwrap();

        assert_eq!(cities(&panel), ["Tokyo", "San Francisco"]);
    }

    #[test]
    fn each_unit_uses_its_own_timezone() {
        let configs = [
            ClockConfig::new("A", "UTC"),
            ClockConfig::new("B", "Asia/Kolkata"),
            ClockConfig::new("C", "UTC"),
        ];

        let panel = ClockPanel::new(&configs, source()).unwrap();

        let texts: Vec<_> = panel.units().iter().map(ClockDisplayUnit::text).collect();
        assert_eq!(texts, ["20:15:30", "01:45:30", "20:15:30"]);
    }

    #[test]
    fn one_bad_timezone_aborts_assembly() {
        let configs = [
            ClockConfig::new("Tokyo", "Asia/Tokyo"),
            ClockConfig::new("Atlantis", "Atlantic/Atlantis"),
        ];

        let err = ClockPanel::new(&configs, source()).unwrap_err();

        assert_eq!(
            err,
            ClockError::InvalidTimezone {
                city: Some("Atlantis".into()),
                timezone: "Atlantic/Atlantis".into()
            }
        );
    }

    #[test]
    fn empty_config_is_rejected() {
        let err = ClockPanel::new(&[], source()).unwrap_err();

        assert_eq!(err, ClockError::NoClocks);
    }

    #[test]
    fn tick_refreshes_all_units() {
        let source = source();
        let configs = [
            ClockConfig::new("San Francisco", "America/Los_Angeles"),
            ClockConfig::new("Tokyo", "Asia/Tokyo"),
        ];
        let mut panel = ClockPanel::new(&configs, source.clone()).unwrap();

        source.advance(Duration::seconds(45));
        panel.tick();

        assert_eq!(panel.units()[0].text(), "13:16:15");
        assert_eq!(panel.units()[1].text(), "05:16:15");
        assert_eq!(panel.len(), 2);
    }
}
