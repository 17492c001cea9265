pub mod app;
pub mod ctrl_c;
pub mod digits;
pub mod keys;
pub mod render;
pub mod sntp;
pub mod startup_sync;
pub mod terminal;

pub use app::{App, AppResult};
pub use sntp::SntpClient;
pub use startup_sync::{SyncTask, spawn_startup_sync};
pub use terminal::Attach;
