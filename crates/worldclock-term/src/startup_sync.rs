//! The one network time query made at startup.
//!
//! Runs on its own thread so a slow or unreachable server never
//! delays the first frame. The result is logged and the offset handed
//! to the no-op [`worldclock_core::sync::apply_offset`] hook.

use worldclock_core::config::SyncConfig;
use worldclock_core::sync;
use worldclock_core::{BackgroundTask, TimeSyncResult, log_info, log_warn};

use crate::sntp::SntpClient;

/// Handle to the running startup sync.
pub type SyncTask = BackgroundTask<TimeSyncResult>;

/// Starts the sync in the background and returns immediately.
pub fn spawn_startup_sync(config: &SyncConfig) -> std::io::Result<SyncTask> {
    let client = SntpClient::from_config(config);
    BackgroundTask::spawn("worldclock-sync", move || run_sync(&client))
}

/// Queries the server and reports the outcome.
pub fn run_sync(client: &SntpClient) -> TimeSyncResult {
    log_info!("Time sync: querying {}", client.target());
    let result = client.sync();
    report(&result);
    result
}

fn report(result: &TimeSyncResult) {
    if result.succeeded {
        log_info!("Time sync: {result}");
        sync::apply_offset(result.offset_seconds);
    } else {
        log_warn!("Time sync: {result}");
    }
}
