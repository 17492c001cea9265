use std::net::ToSocketAddrs;

use worldclock_core::config::{self, Config};
use worldclock_core::time_source::resolve_timezone;

/// ANSI escape helpers for doctor output.
const OK: &str = "\x1b[32m[ok]\x1b[0m";
const WARN: &str = "\x1b[33m[warn]\x1b[0m";
const FAIL: &str = "\x1b[31m[fail]\x1b[0m";
const FIXED: &str = "\x1b[36m[fixed]\x1b[0m";

pub fn execute() {
    super::banner::print_logo();
    println!();
    check_config_dir();
    let config = check_config_file();
    check_clocks(&config);
    check_sync_server(&config);
    check_log_file(&config);
    println!();
}

fn check_config_dir() {
    match config::config_dir() {
        Some(dir) if dir.is_dir() => {
            println!("  {OK} Config directory exists ({})", dir.display());
        }
        Some(dir) => match std::fs::create_dir_all(&dir) {
            Ok(()) => {
                println!("  {FIXED} Created config directory ({})", dir.display());
            }
            Err(e) => {
                println!("  {FAIL} Config directory missing and could not create it: {e}");
            }
        },
        None => {
            println!("  {FAIL} Could not determine home directory");
        }
    }
}

/// Returns the config the clocks would actually run with.
fn check_config_file() -> Config {
    let Some(path) = config::config_path() else {
        println!("  {FAIL} Could not determine config path");
        return Config::default();
    };
    if !path.exists() {
        println!("  {WARN} config.toml not found (using defaults, run 'worldclock init')");
        return Config::default();
    }
    match config::try_load() {
        Ok(config) => {
            println!("  {OK} config.toml is valid");
            config
        }
        Err(e) => {
            println!("  {FAIL} config.toml: {e}");
            Config::default()
        }
    }
}

fn check_clocks(config: &Config) {
    if config.clocks.is_empty() {
        println!("  {FAIL} No clocks configured");
        return;
    }
    let bad: Vec<String> = config
        .clocks
        .iter()
        .filter(|c| resolve_timezone(&c.timezone).is_err())
        .map(|c| format!("{} ({})", c.city, c.timezone))
        .collect();
    if bad.is_empty() {
        println!(
            "  {OK} All {} clock(s) use known timezones",
            config.clocks.len()
        );
    } else {
        println!(
            "  {FAIL} {} clock(s) have unknown timezones: {}",
            bad.len(),
            bad.join(", ")
        );
    }
}

fn check_sync_server(config: &Config) {
    if !config.sync.enabled {
        println!("  {WARN} Startup time sync is disabled");
        return;
    }
    let server = &config.sync.server;
    match (server.as_str(), config.sync.port).to_socket_addrs() {
        Ok(mut addrs) => match addrs.next() {
            Some(addr) => println!("  {OK} Time server {server} resolves ({addr})"),
            None => println!("  {WARN} Time server {server} has no addresses"),
        },
        Err(e) => println!("  {WARN} Time server {server} does not resolve: {e}"),
    }
}

fn check_log_file(config: &Config) {
    if !config.logging.enabled {
        println!("  {WARN} File logging is disabled");
        return;
    }
    match worldclock_core::log::log_path() {
        Some(path) => println!("  {OK} Logging to {}", path.display()),
        None => println!("  {FAIL} Could not determine log path"),
    }
}
