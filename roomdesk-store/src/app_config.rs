use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    #[serde(default = "default_session_path")]
    pub path: PathBuf,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: default_session_path(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl SessionConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LookupConfig {
    #[serde(default = "default_users_page_size")]
    pub users_page_size: u32,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            users_page_size: default_users_page_size(),
        }
    }
}

fn default_timeout_seconds() -> u64 { 15 }
fn default_session_path() -> PathBuf { PathBuf::from(".roomdesk/session.json") }
fn default_poll_interval_ms() -> u64 { 2000 }
fn default_users_page_size() -> u32 { 10 }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(Path::new("config"))
    }

    /// Layered load: `default`, then `{RUN_MODE}` and `local` if present,
    /// then `ROOMDESK__*` environment variables.
    pub fn load_from(dir: &Path) -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let file = |name: &str| dir.join(name).to_string_lossy().into_owned();

        let s = config::Config::builder()
            .add_source(config::File::with_name(&file("default")))
            .add_source(config::File::with_name(&file(&run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name(&file("local")).required(false))
            .add_source(config::Environment::with_prefix("ROOMDESK").separator("__"))
            .build()?;

        let config: Self = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.session.poll_interval_ms == 0 {
            return Err(config::ConfigError::Message(
                "session.poll_interval_ms must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_layers_local_over_default() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[api]\nbase_url = \"http://localhost:3000\"\n\n[lookup]\nusers_page_size = 25\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("local.toml"),
            "[api]\nbase_url = \"http://hotel.internal:8080\"\ntimeout_seconds = 3\n",
        )
        .unwrap();

        let config = Config::load_from(dir.path()).unwrap();
        assert_eq!(config.api.base_url, "http://hotel.internal:8080");
        assert_eq!(config.api.timeout(), Duration::from_secs(3));
        assert_eq!(config.lookup.users_page_size, 25);
        assert_eq!(config.session.poll_interval(), Duration::from_millis(2000));
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[api]\nbase_url = \"http://localhost:3000\"\n\n[session]\npoll_interval_ms = 0\n",
        )
        .unwrap();

        let err = Config::load_from(dir.path()).unwrap_err();
        assert!(err.to_string().contains("poll_interval_ms"));
    }

    #[test]
    fn test_missing_default_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from(dir.path()).is_err());
    }
}
