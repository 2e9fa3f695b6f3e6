use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then environment variables
/// (prefix `ALLEGRO__`) on top of it, and falls back to struct defaults.
impl Settings {
    /// Load settings from the optional config file at `path` (or the resolved
    /// default path) and the environment.
    pub fn load(path: Option<PathBuf>) -> Result<Self, ::config::ConfigError> {
        let config_path = path.or_else(resolve_config_path);

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("ALLEGRO")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.extract.timeout_ms == 0 {
            return Err("extract.timeout_ms must be >= 1".to_string());
        }
        if self.fetch.connect_timeout_ms == 0
            || self.fetch.read_timeout_ms == 0
            || self.fetch.total_timeout_ms == 0
        {
            return Err("fetch timeouts must be >= 1".to_string());
        }
        if !self
            .library
            .extensions
            .iter()
            .any(|e| !e.trim().trim_start_matches('.').is_empty())
        {
            return Err("library.extensions must name at least one extension".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `ALLEGRO_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("ALLEGRO_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/allegro/config.toml`
/// or `~/.config/allegro/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("allegro").join("config.toml"))
}

/// Directory for runtime state (preferences, log file):
/// `$XDG_STATE_HOME/allegro` or `~/.local/state/allegro`.
pub fn state_dir() -> Option<PathBuf> {
    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("state"))
    };

    state_home.map(|d| d.join("allegro"))
}
