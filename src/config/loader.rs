//! Layered settings loading
//!
//! Settings come from three layers, later ones winning: built-in defaults,
//! an optional TOML file, then environment variables. The merged result is
//! validated before it is handed out.

use crate::{Result, config::Settings};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Directory name used under the platform config directory
const CONFIG_DIR_NAME: &str = "humble-client";

const CONFIG_FILE_NAME: &str = "config.toml";

/// Builds [`Settings`] from defaults, a config file and the environment
#[derive(Debug, Default)]
pub struct ConfigLoader {
    base: Settings,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from `base` instead of the built-in defaults
    pub fn with_base(base: Settings) -> Self {
        Self { base }
    }

    /// Merge the layers and validate
    ///
    /// A missing file is not an error: the client works with defaults alone.
    /// A file that exists but does not parse is.
    pub fn load(&self, config_file: Option<&Path>) -> Result<Settings> {
        let from_file = match config_file {
            Some(path) if path.exists() => {
                info!("Reading settings from {}", path.display());
                Settings::from_file(path)?
            }
            Some(path) => {
                warn!("No settings file at {}, keeping defaults", path.display());
                self.base.clone()
            }
            None => self.base.clone(),
        };

        let settings = from_file.merge_with_env()?;
        settings.validate()?;
        debug!("Effective settings: {:?}", settings);

        Ok(settings)
    }

    /// Load with the platform default file location
    pub fn load_default(&self) -> Result<Settings> {
        self.load(default_config_path().as_deref())
    }
}

/// Platform default location of the configuration file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
