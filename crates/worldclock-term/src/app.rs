//! The clock application: startup sequencing and the tick loop.

use std::io::Write;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use worldclock_core::config::Config;
use worldclock_core::{ClockError, ClockPanel, TimeSource, log_debug, log_error, log_info};

use crate::startup_sync::{self, SyncTask};
use crate::terminal::{Attach, Screen};

/// A boxed error type for the application shell.
pub type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Everything one running clock window needs.
///
/// Passed around explicitly instead of living in a global, so several
/// independent instances can exist side by side (as they do in tests).
pub struct App {
    config: Config,
    source: Arc<dyn TimeSource>,
    attach: Attach,
}

impl App {
    pub fn new(config: Config, source: Arc<dyn TimeSource>) -> Self {
        Self {
            config,
            source,
            attach: Attach::default(),
        }
    }

    /// Sets how the screen attaches to the output passed to [`App::run`].
    pub fn attach(mut self, attach: Attach) -> Self {
        self.attach = attach;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Builds the clock panel, validating every timezone.
    pub fn build_panel(&self) -> Result<ClockPanel, ClockError> {
        ClockPanel::new(&self.config.clocks, self.source.clone())
    }

    /// Shows the clocks on `out` until `stop` fires or disconnects.
    ///
    /// Configuration errors are returned before the terminal is touched.
    /// The first frame is drawn before the startup sync is started, and
    /// the sync never blocks a tick.
    pub fn run<W: Write>(&self, out: W, stop: &Receiver<()>) -> AppResult<()> {
        let mut panel = self.build_panel().inspect_err(|e| log_error!("{e}"))?;
        log_info!(
            "Showing {} clock(s): {}",
            panel.len(),
            panel
                .units()
                .iter()
                .map(|u| format!("{} ({})", u.city(), u.timezone()))
                .collect::<Vec<_>>()
                .join(", ")
        );

        let mut screen = Screen::enter(out, self.attach)?;
        screen.draw(&panel, &self.config.display)?;

        let sync = self.start_sync();

        loop {
            match stop.recv_timeout(until_next_second(self.source.utc_now())) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
            panel.tick();
            screen.draw(&panel, &self.config.display)?;
        }

        drop(screen);
        log_info!("Stopping");
        if let Some(task) = sync {
            self.finish_sync(task);
        }
        Ok(())
    }

    fn start_sync(&self) -> Option<SyncTask> {
        if !self.config.sync.enabled {
            log_debug!("Time sync disabled");
            return None;
        }
        match startup_sync::spawn_startup_sync(&self.config.sync) {
            Ok(task) => Some(task),
            Err(e) => {
                log_error!("Could not start time sync thread: {e}");
                None
            }
        }
    }

    /// Gives an unfinished sync a short grace period, then lets it go.
    fn finish_sync(&self, mut task: SyncTask) {
        let grace = Duration::from_millis(self.config.sync.shutdown_grace_ms);
        if task.wait_timeout(grace).is_some() {
            log_debug!("Time sync finished before exit");
        } else {
            log_info!("Abandoning unfinished time sync");
            task.abandon();
        }
    }
}

/// Time left until the next whole second of `now`.
pub fn until_next_second(now: DateTime<Utc>) -> Duration {
    // Leap seconds report more than 1e9 nanoseconds.
    let nanos = now.timestamp_subsec_nanos().min(999_999_999);
    Duration::from_nanos(u64::from(1_000_000_000 - nanos))
}

#[cfg(test)]
mod tests {
    use std::net::UdpSocket;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Instant;

    use chrono::TimeZone;
    use worldclock_core::{ClockConfig, ManualTimeSource, SystemTimeSource};

    use super::*;

    fn offline_config() -> Config {
        let mut config = Config::default();
        config.sync.enabled = false;
        config.display.big_digits = false;
        config
    }

    #[test]
    fn waits_until_the_next_whole_second() {
        let now = Utc.timestamp_opt(1_700_000_000, 250_000_000).unwrap();

        assert_eq!(until_next_second(now), Duration::from_millis(750));
    }

    #[test]
    fn on_a_boundary_waits_a_full_second() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();

        assert_eq!(until_next_second(now), Duration::from_secs(1));
    }

    #[test]
    fn invalid_timezone_fails_before_drawing() {
        // Arrange
        let mut config = offline_config();
        config.clocks = vec![ClockConfig::new("Nowhere", "Nowhere/Special")];
        let app = App::new(config, Arc::new(SystemTimeSource));
        let (_tx, rx) = mpsc::channel();
        let mut out = Vec::new();

        // Act
        let err = app.run(&mut out, &rx).unwrap_err();

        // Assert
        assert!(err.to_string().contains("Nowhere/Special"));
        assert!(out.is_empty());
    }

    #[test]
    fn draws_first_frame_and_restores_terminal() {
        let source = Arc::new(ManualTimeSource::new(
            Utc.with_ymd_and_hms(2024, 7, 1, 20, 15, 30).unwrap(),
        ));
        let app = App::new(offline_config(), source);
        let (tx, rx) = mpsc::channel();
        drop(tx);
        let mut out = Vec::new();

        app.run(&mut out, &rx).unwrap();

        let out = String::from_utf8(out).unwrap();
        let first_sf = out.find("San Francisco").unwrap();
        let first_tokyo = out.find("Tokyo").unwrap();
        assert!(first_sf < first_tokyo);
        assert!(out.contains("13:15:30"));
        assert!(out.contains("05:15:30"));
        assert!(out.ends_with("\x1b[?1049l"));
    }

    #[test]
    fn ticks_until_stopped() {
        let app = App::new(offline_config(), Arc::new(SystemTimeSource));
        let (tx, rx) = mpsc::channel();
        let stopper = thread::spawn(move || {
            thread::sleep(Duration::from_millis(2300));
            let _ = tx.send(());
        });
        let mut out = Vec::new();

        app.run(&mut out, &rx).unwrap();
        stopper.join().unwrap();

        let out = String::from_utf8(out).unwrap();
        let frames = out.matches("\x1b[J").count();
        assert!((3..=4).contains(&frames), "{frames} frames");
    }

    #[test]
    fn hanging_sync_does_not_delay_display_or_exit() {
        // Arrange: a server that never answers, with a long timeout.
        let silent = UdpSocket::bind("127.0.0.1:0").unwrap();
        let mut config = offline_config();
        config.sync.enabled = true;
        config.sync.server = "127.0.0.1".into();
        config.sync.port = silent.local_addr().unwrap().port();
        config.sync.timeout_ms = 10_000;
        config.sync.shutdown_grace_ms = 0;
        let app = App::new(config, Arc::new(SystemTimeSource));
        let (tx, rx) = mpsc::channel();
        let stopper = thread::spawn(move || {
            thread::sleep(Duration::from_millis(1200));
            let _ = tx.send(());
        });
        let mut out = Vec::new();
        let started = Instant::now();

        // Act
        app.run(&mut out, &rx).unwrap();

        // Assert
        assert!(started.elapsed() < Duration::from_secs(3));
        let out = String::from_utf8(out).unwrap();
        assert!(out.matches("\x1b[J").count() >= 2);
        stopper.join().unwrap();
        drop(silent);
    }

    #[test]
    fn independent_apps_do_not_share_state() {
        let source = Arc::new(ManualTimeSource::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ));
        let mut london = offline_config();
        london.clocks = vec![ClockConfig::new("London", "Europe/London")];
        let mut sydney = offline_config();
        sydney.clocks = vec![ClockConfig::new("Sydney", "Australia/Sydney")];

        let a = App::new(london, source.clone()).build_panel().unwrap();
        let b = App::new(sydney, source).build_panel().unwrap();

        assert_eq!(a.units()[0].text(), "00:00:00");
        assert_eq!(b.units()[0].text(), "11:00:00");
    }
}
