use worldclock_core::config::{self, Config};
use worldclock_term::SntpClient;
use worldclock_term::startup_sync::run_sync;

use crate::SyncArgs;

const OK: &str = "\x1b[32m[ok]\x1b[0m";
const FAIL: &str = "\x1b[31m[fail]\x1b[0m";

/// Runs one time sync in the foreground and prints the outcome.
///
/// Exits with status 1 when the sync fails.
pub fn execute(args: &SyncArgs) {
    let config = with_overrides(config::load(), args);
    worldclock_core::log::init(&config.logging);

    let client = SntpClient::from_config(&config.sync);

    let result = run_sync(&client);

    if args.json {
        println!("{}", result.to_json());
    } else if result.succeeded {
        println!("  {OK} {result}");
        println!("       The system clock was not changed.");
    } else {
        println!("  {FAIL} {result}");
    }

    if !result.succeeded {
        std::process::exit(1);
    }
}

/// Applies command-line overrides, then clamps them like file values.
fn with_overrides(mut config: Config, args: &SyncArgs) -> Config {
    if let Some(server) = &args.server {
        config.sync.server = server.clone();
    }
    if let Some(port) = args.port {
        config.sync.port = port;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.sync.timeout_ms = timeout_ms;
    }
    config.validate();
    config
}
