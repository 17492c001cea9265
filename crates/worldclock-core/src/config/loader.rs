use std::path::{Path, PathBuf};

use super::Config;

/// Returns the config directory: `~/.config/worldclock/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".config").join("worldclock"))
}

/// Returns the config file path: `~/.config/worldclock/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Tries to load and parse `config.toml`.
///
/// Returns `Ok(Config)` on success, or an error string describing
/// what went wrong (IO error, parse error, etc.).
pub fn try_load() -> Result<Config, String> {
    let path = config_path().ok_or("could not determine config path")?;
    try_load_from(&path)
}

/// Tries to load and parse the config file at `path`.
pub fn try_load_from(path: &Path) -> Result<Config, String> {
    let content = std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let mut config: Config =
        toml::from_str(&content).map_err(|e| format!("{}: {e}", path.display()))?;
    config.validate();
    Ok(config)
}

/// Loads the configuration from disk, falling back to defaults.
///
/// After loading, values are clamped to safe ranges via [`Config::validate`].
/// A missing file silently returns defaults; other errors are printed.
pub fn load() -> Config {
    match config_path() {
        Some(path) => load_from(&path),
        None => Config::default(),
    }
}

/// Same as [`load`] for an explicit path.
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }
    match try_load_from(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: {e}");
            Config::default()
        }
    }
}
