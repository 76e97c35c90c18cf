pub mod error;

pub use error::*;

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_ENDPOINT: &str = "https://api.softlayer.com/rest/v3";

pub const ENV_USERNAME: &str = "SL_USERNAME";
pub const ENV_API_KEY: &str = "SL_API_KEY";
pub const ENV_ENDPOINT: &str = "SL_ENDPOINT_URL";
pub const ENV_CONFIG_PATH: &str = "SL_CONFIG_PATH";

const CANDIDATES: [&str; 2] = ["softlayer.yaml", ".softlayer.yaml"];

/// Account credentials and API endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub api_key: String,
    pub endpoint: String,
}

/// Poll timing overrides, in seconds. Unset values keep the SDK defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PollSettings {
    pub timeout_secs: Option<u64>,
    pub interval_secs: Option<u64>,
    pub initial_delay_secs: Option<u64>,
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftLayerConfig {
    pub credentials: Credentials,
    pub poll: PollSettings,
}

/// On-disk format of a credentials file
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    username: Option<String>,
    api_key: Option<String>,
    endpoint: Option<String>,
    #[serde(default)]
    poll: PollSettings,
}

impl SoftLayerConfig {
    /// Load configuration.
    ///
    /// Environment variables win over file values:
    /// 1. `SL_USERNAME`, `SL_API_KEY`, `SL_ENDPOINT_URL`
    /// 2. the first file found by [`find_config_file`]
    pub fn load() -> Result<Self> {
        let file = match find_config_file() {
            Ok(path) => {
                tracing::debug!("Loading SoftLayer settings from {}", path.display());
                Some((read_config_file(&path)?, path))
            }
            Err(ConfigError::CredentialsNotFound) => None,
            Err(e) => return Err(e),
        };

        let (file, source_name) = match file {
            Some((file, path)) => (file, path.display().to_string()),
            None => (ConfigFile::default(), "environment".to_string()),
        };

        let username = env_var(ENV_USERNAME).or(file.username);
        let api_key = env_var(ENV_API_KEY).or(file.api_key);
        if username.is_none() && api_key.is_none() {
            return Err(ConfigError::CredentialsNotFound);
        }

        let credentials = Credentials {
            username: username.ok_or_else(|| missing("username", &source_name))?,
            api_key: api_key.ok_or_else(|| missing("api_key", &source_name))?,
            endpoint: env_var(ENV_ENDPOINT)
                .or(file.endpoint)
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        };

        Ok(Self {
            credentials,
            poll: file.poll,
        })
    }

    /// Load configuration from a single file, ignoring the environment
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = read_config_file(path)?;
        let source_name = path.display().to_string();

        Ok(Self {
            credentials: Credentials {
                username: file.username.ok_or_else(|| missing("username", &source_name))?,
                api_key: file.api_key.ok_or_else(|| missing("api_key", &source_name))?,
                endpoint: file
                    .endpoint
                    .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            },
            poll: file.poll,
        })
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn missing(field: &str, source_name: &str) -> ConfigError {
    ConfigError::MissingField {
        field: field.to_string(),
        source_name: source_name.to_string(),
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// `~/.config/softlayer`
pub fn config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("softlayer"))
}

/// Locate a credentials file.
///
/// Search order:
/// 1. `SL_CONFIG_PATH`
/// 2. current directory: `softlayer.yaml`, `.softlayer.yaml`
/// 3. `~/.config/softlayer/credentials.yaml`
pub fn find_config_file() -> Result<PathBuf> {
    if let Some(config_path) = env_var(ENV_CONFIG_PATH) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
        tracing::warn!("{} points at missing file {}", ENV_CONFIG_PATH, path.display());
    }

    let current_dir = std::env::current_dir()?;
    for filename in &CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    if let Ok(dir) = config_dir() {
        let global = dir.join("credentials.yaml");
        if global.exists() {
            return Ok(global);
        }
    }

    Err(ConfigError::CredentialsNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    fn clear_env() {
        unsafe {
            std::env::remove_var(ENV_USERNAME);
            std::env::remove_var(ENV_API_KEY);
            std::env::remove_var(ENV_ENDPOINT);
            std::env::remove_var(ENV_CONFIG_PATH);
        }
    }

    #[test]
    fn test_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("credentials.yaml");
        fs::write(
            &path,
            "username: alice\napi_key: secret\npoll:\n  timeout_secs: 30\n  interval_secs: 10\n",
        )
        .unwrap();

        let config = SoftLayerConfig::from_file(&path).unwrap();
        assert_eq!(config.credentials.username, "alice");
        assert_eq!(config.credentials.api_key, "secret");
        assert_eq!(config.credentials.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.poll.timeout_secs, Some(30));
        assert_eq!(config.poll.interval_secs, Some(10));
        assert_eq!(config.poll.initial_delay_secs, None);
    }

    #[test]
    fn test_from_file_missing_api_key() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("credentials.yaml");
        fs::write(&path, "username: alice\n").unwrap();

        match SoftLayerConfig::from_file(&path) {
            Err(ConfigError::MissingField { field, .. }) => assert_eq!(field, "api_key"),
            other => panic!("Expected MissingField error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_file_invalid_yaml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("credentials.yaml");
        fs::write(&path, "username: [unclosed\n").unwrap();

        assert!(matches!(
            SoftLayerConfig::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    #[serial]
    fn test_load_from_env() {
        clear_env();
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        unsafe {
            std::env::set_var(ENV_USERNAME, "bob");
            std::env::set_var(ENV_API_KEY, "key");
            std::env::set_var(ENV_ENDPOINT, "https://api.service.softlayer.com/rest/v3");
        }

        let config = SoftLayerConfig::load().unwrap();
        assert_eq!(config.credentials.username, "bob");
        assert_eq!(config.credentials.api_key, "key");
        assert_eq!(
            config.credentials.endpoint,
            "https://api.service.softlayer.com/rest/v3"
        );

        clear_env();
        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        clear_env();
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("custom.yaml");
        fs::write(&path, "username: alice\napi_key: file-key\n").unwrap();

        unsafe {
            std::env::set_var(ENV_CONFIG_PATH, path.to_str().unwrap());
            std::env::set_var(ENV_API_KEY, "env-key");
        }

        let config = SoftLayerConfig::load().unwrap();
        assert_eq!(config.credentials.username, "alice");
        assert_eq!(config.credentials.api_key, "env-key");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_find_config_file_in_current_dir() {
        clear_env();
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        fs::write(temp_dir.path().join(".softlayer.yaml"), "username: a\n").unwrap();
        fs::write(temp_dir.path().join("softlayer.yaml"), "username: b\n").unwrap();

        std::env::set_current_dir(&temp_dir).unwrap();

        let result = find_config_file().unwrap();
        // the visible file wins over the hidden one
        assert!(result.ends_with("softlayer.yaml"));
        assert!(!result.ends_with(".softlayer.yaml"));

        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_config_path_env_var() {
        clear_env();
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("elsewhere.yaml");
        fs::write(&config_path, "username: a\napi_key: b\n").unwrap();

        unsafe {
            std::env::set_var(ENV_CONFIG_PATH, config_path.to_str().unwrap());
        }

        let result = find_config_file().unwrap();
        assert_eq!(result, config_path);

        clear_env();
    }
}
