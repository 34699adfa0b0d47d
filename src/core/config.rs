//! CLI configuration (`config.toml` under the state root).

use crate::core::error::GooError;
use crate::core::store::Store;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub keyname: String,
    pub realm_path: String,
    pub chain_id: String,
    pub remote: String,
    pub gas_fee: String,
    pub gas_wanted: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            keyname: "mykey".to_string(),
            realm_path: "gno.land/r/intermarch3/goo".to_string(),
            chain_id: "dev".to_string(),
            remote: "tcp://127.0.0.1:26657".to_string(),
            gas_fee: "1000000ugnot".to_string(),
            gas_wanted: 20_000_000,
            google_api_key: None,
        }
    }
}

impl Config {
    /// Load from the store, falling back to defaults on any problem.
    pub fn load(store: &Store) -> Config {
        Self::load_from(&store.config_path())
    }

    pub fn load_from(path: &Path) -> Config {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Config::default();
        }
        match Self::try_load_from(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read config, using defaults");
                Config::default()
            }
        }
    }

    pub fn try_load_from(path: &Path) -> Result<Config, GooError> {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        Ok(cfg)
    }

    pub fn with_key_override(mut self, key: Option<&str>) -> Config {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.keyname = key.to_string();
        }
        self
    }

    pub fn save(&self, store: &Store) -> Result<(), GooError> {
        self.save_to(&store.config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), GooError> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Write a fresh config; refuses to overwrite an existing file.
    pub fn init(store: &Store, cfg: &Config) -> Result<(), GooError> {
        let path = store.config_path();
        if path.exists() {
            return Err(GooError::ConfigError(format!(
                "config file already exists at {}",
                path.display()
            )));
        }
        cfg.save_to(&path)
    }

    pub fn masked_api_key(&self) -> String {
        match self.google_api_key.as_deref() {
            Some(key) if !key.is_empty() => {
                if key.chars().count() > 8 {
                    format!("{}...", key.chars().take(8).collect::<String>())
                } else {
                    key.to_string()
                }
            }
            _ => "(not configured)".to_string(),
        }
    }
}
