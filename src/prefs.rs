//! Persisted user preferences.
//!
//! Preferences live in a small TOML file in the state directory, separate
//! from the (read-only) config file. Currently only the color theme is kept.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::state_dir;

const PREFS_FILE: &str = "prefs.toml";

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid preferences file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Prefs {
    pub theme: Theme,
}

impl Prefs {
    /// `prefs.toml` inside the state directory, if one can be determined.
    pub fn default_path() -> Option<PathBuf> {
        state_dir().map(|d| d.join(PREFS_FILE))
    }

    /// Read preferences from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, PrefsError> {
        let text = match fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(PrefsError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Ok(toml::from_str(&text)?)
    }

    /// Like `load_from`, but any failure is logged and replaced by defaults.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match Self::load_from(path) {
            Ok(p) => p,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable preferences");
                Self::default()
            }
        }
    }

    /// Write preferences to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), PrefsError> {
        let io_err = |source| PrefsError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = toml::to_string(self)?;
        fs::write(path, text).map_err(io_err)?;
        debug!(path = %path.display(), theme = ?self.theme, "saved preferences");
        Ok(())
    }
}
