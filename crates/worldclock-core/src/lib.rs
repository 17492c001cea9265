pub mod clock;
pub mod config;
pub mod log;
pub mod panel;
pub mod sync;
pub mod task;
pub mod time_source;

pub use clock::{ClockConfig, ClockDisplayUnit, ClockError};
pub use panel::ClockPanel;
pub use sync::{NtpSample, SyncError, TimeSyncResult};
pub use task::BackgroundTask;
pub use time_source::{ManualTimeSource, SystemTimeSource, TimeSource};
