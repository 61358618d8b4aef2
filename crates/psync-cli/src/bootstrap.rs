use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use psync_config::{ConfigError, PsyncConfig};
use psync_store::HttpStore;
use psync_sync::{Credentials, PlatformClient};

use crate::cli::GlobalFlags;

pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<PsyncConfig> {
    load_dotenv(flags.env_file.as_deref())?;
    PsyncConfig::load().context("failed to load pointsync configuration")
}

fn load_dotenv(explicit: Option<&Path>) -> anyhow::Result<()> {
    if let Some(path) = explicit {
        dotenvy::from_path(path)
            .with_context(|| format!("failed to load dotenv file at {}", path.display()))?;
        return Ok(());
    }

    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let env_path: PathBuf = cwd.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }
    Ok(())
}

pub fn platform_client(config: &PsyncConfig) -> anyhow::Result<PlatformClient> {
    if !config.platform.is_configured() {
        return Err(not_configured("platform"))
            .context("set PSYNC_PLATFORM__BASE_URL and PSYNC_PLATFORM__API_TOKEN");
    }
    PlatformClient::new(&config.platform).context("failed to build platform client")
}

pub fn credentials(config: &PsyncConfig) -> Credentials {
    Credentials::bearer(config.platform.api_token.clone())
}

pub fn snapshot_store(config: &PsyncConfig) -> anyhow::Result<HttpStore> {
    if !config.store.is_configured() {
        return Err(not_configured("store")).context("set PSYNC_STORE__BASE_URL");
    }
    if config.store_token().is_empty() {
        return Err(not_configured("store"))
            .context("set PSYNC_STORE__API_TOKEN or PSYNC_PLATFORM__API_TOKEN");
    }
    HttpStore::new(
        &config.store.base_url,
        &config.store.collection,
        config.store_token(),
        Duration::from_secs(config.platform.request_timeout_secs),
    )
    .context("failed to build snapshot store client")
}

fn not_configured(section: &str) -> ConfigError {
    ConfigError::NotConfigured {
        section: section.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_platform_is_rejected_with_hint() {
        let err = platform_client(&PsyncConfig::default()).expect_err("should fail");
        let rendered = format!("{err:#}");
        assert!(rendered.contains("PSYNC_PLATFORM__BASE_URL"));
        assert!(rendered.contains("'platform' is not configured"));
    }

    #[test]
    fn store_requires_some_token() {
        let mut config = PsyncConfig::default();
        config.store.base_url = "https://store.example.com".into();
        let err = snapshot_store(&config).expect_err("should fail");
        assert!(format!("{err:#}").contains("PSYNC_STORE__API_TOKEN"));

        config.platform.api_token = "shared".into();
        assert!(snapshot_store(&config).is_ok());
    }

    #[test]
    fn configured_platform_builds_a_client() {
        let mut config = PsyncConfig::default();
        config.platform.base_url = "https://platform.example.com".into();
        config.platform.api_token = "tok".into();
        assert!(platform_client(&config).is_ok());
        assert_eq!(credentials(&config).token(), "tok");
    }

    #[test]
    fn missing_explicit_dotenv_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("absent.env");
        assert!(load_dotenv(Some(&missing)).is_err());
    }
}
