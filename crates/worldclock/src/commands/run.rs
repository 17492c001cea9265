use std::io::IsTerminal;
use std::sync::{Arc, mpsc};

use worldclock_core::config::{self, Config};
use worldclock_core::{SystemTimeSource, log_info};
use worldclock_term::{App, Attach, ctrl_c, keys};

use crate::RunArgs;

/// Shows the clocks until Ctrl+C, `q` or Esc.
///
/// Exits with status 1 on configuration errors (unknown timezone,
/// empty clock list, unreadable `--config` file).
pub fn execute(args: &RunArgs) {
    let mut config = match load_config(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    if args.no_sync {
        config.sync.enabled = false;
    }

    worldclock_core::log::init(&config.logging);
    log_info!(
        "worldclock {} started (PID: {})",
        env!("CARGO_PKG_VERSION"),
        std::process::id()
    );

    let (tx, rx) = mpsc::channel();
    if let Err(e) = ctrl_c::set_handler(tx.clone()) {
        eprintln!("Warning: could not install Ctrl+C handler: {e}");
    }

    let stdout = std::io::stdout();
    let attach = if stdout.is_terminal() {
        if let Err(e) = keys::spawn_listener(tx.clone()) {
            eprintln!("Warning: could not start key listener: {e}");
        }
        Attach::Terminal
    } else {
        Attach::Detached
    };

    let app = App::new(config, Arc::new(SystemTimeSource)).attach(attach);
    let result = app.run(stdout, &rx);
    drop(tx);

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// An explicit `--config` path must exist and parse; the default path
/// falls back to built-in defaults.
fn load_config(args: &RunArgs) -> Result<Config, String> {
    match &args.config {
        Some(path) => config::try_load_from(path),
        None => Ok(config::load()),
    }
}
