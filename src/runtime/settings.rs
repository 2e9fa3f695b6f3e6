use std::path::PathBuf;

use tracing::warn;

use crate::config;

pub fn load_settings(path: Option<PathBuf>) -> config::Settings {
    match config::Settings::load(path) {
        Ok(s) => {
            if let Err(msg) = s.validate() {
                warn!(reason = %msg, "invalid config, using defaults");
                config::Settings::default()
            } else {
                s
            }
        }
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            warn!(error = %e, "failed to load config, using defaults");
            config::Settings::default()
        }
    }
}
