//! Local state layout.
//!
//! Everything goo persists lives under one root (`~/.goo` unless `GOO_HOME`
//! says otherwise): the TOML config and the per-request vote records.

use crate::core::error::GooError;
use std::path::PathBuf;

pub const HOME_ENV: &str = "GOO_HOME";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const VOTES_DIR_NAME: &str = "votes";

/// Handle on the goo state root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    /// Absolute path to the state root directory
    pub root: PathBuf,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Store { root: root.into() }
    }

    /// Resolve the root from `GOO_HOME`, falling back to `~/.goo`.
    pub fn resolve() -> Result<Self, GooError> {
        if let Ok(dir) = std::env::var(HOME_ENV) {
            if !dir.trim().is_empty() {
                return Ok(Store::new(dir));
            }
        }
        let home = dirs::home_dir().ok_or(GooError::HomeDirectoryNotFound)?;
        Ok(Store::new(home.join(".goo")))
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    pub fn votes_dir(&self) -> PathBuf {
        self.root.join(VOTES_DIR_NAME)
    }
}
