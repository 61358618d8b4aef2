//! # psync-config
//!
//! Layered configuration loading for pointsync using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`PSYNC_*` prefix, `__` as separator)
//! 2. Project-level `.pointsync/config.toml`
//! 3. User-level `~/.config/pointsync/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `PSYNC_PLATFORM__API_TOKEN` -> `platform.api_token`,
//! `PSYNC_SYNC__MAX_ATTEMPTS` -> `sync.max_attempts`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use psync_config::PsyncConfig;
//!
//! let config = PsyncConfig::load_with_dotenv().expect("config");
//! if config.platform.is_configured() {
//!     println!("platform: {}", config.platform.base_url);
//! }
//! ```

mod actions;
mod error;
mod platform;
mod store;
mod sync;

pub use actions::ActionsConfig;
pub use error::ConfigError;
pub use platform::PlatformConfig;
pub use store::StoreConfig;
pub use sync::SyncConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PsyncConfig {
    #[serde(default)]
    pub platform: PlatformConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub actions: ActionsConfig,
}

impl PsyncConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a source cannot be parsed or the `sync`
    /// section holds unusable values.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration after reading a `.env` file from the current
    /// directory, if one exists.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and validate from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.sync.validate()?;
        config.actions.action_table()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".pointsync/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("PSYNC_").split("__"))
    }

    /// Bearer token for the collection service, falling back to the platform token.
    #[must_use]
    pub fn store_token(&self) -> &str {
        if self.store.api_token.is_empty() {
            &self.platform.api_token
        } else {
            &self.store.api_token
        }
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pointsync").join("config.toml"))
    }
}
