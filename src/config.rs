//! Application configuration.

use crate::environment::Environment;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Environment variable naming the environment used when no URL is configured.
pub const ENVIRONMENT_ENV: &str = "BILLING_MONITOR_ENVIRONMENT";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the billing API, e.g. `https://billing.example.com/api`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl Config {
    pub fn new(api_url: Option<String>) -> Self {
        Config { api_url }
    }

    /// Loads configuration from a JSON file at the given path.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if reading from file fails or JSON is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let buf = fs::read(path)?;
        let config: Config = serde_json::from_slice(&buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(config)
    }

    /// Loads the configuration if the file exists, otherwise returns the default.
    pub fn load_or_default(path: &Path) -> Result<Self, std::io::Error> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Saves the configuration to a JSON file at the given path.
    ///
    /// Directories will be created if they don't exist. This method overwrites existing files.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if writing to file fails or serialization fails.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Removes the configuration file. A missing file is not an error.
    pub fn clear(path: &Path) -> Result<(), std::io::Error> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Path of the configuration file, `~/.billing-monitor/config.json`.
pub fn get_config_path() -> Result<PathBuf, std::io::Error> {
    let home_path = home::home_dir().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "Home directory not found")
    })?;
    Ok(home_path.join(".billing-monitor").join("config.json"))
}

/// Picks the backend to talk to.
///
/// Precedence: the `--api-url` value (flag, or `BILLING_MONITOR_API_URL` through clap), then
/// the config file, then the named environment from `BILLING_MONITOR_ENVIRONMENT`, then
/// [`Environment::Local`].
pub fn resolve_environment(
    cli_url: Option<&str>,
    config: &Config,
    env_name: Option<&str>,
) -> Result<Environment, String> {
    let candidate = [cli_url, config.api_url.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|url| !url.is_empty());

    if let Some(url) = candidate {
        return parse_api_url(url);
    }

    match env_name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => name
            .parse::<Environment>()
            .map_err(|_| format!("Unknown environment '{}'", name)),
        None => Ok(Environment::default()),
    }
}

/// Validates a user-supplied base URL.
pub fn parse_api_url(url: &str) -> Result<Environment, String> {
    match url.parse::<Environment>() {
        Ok(env @ Environment::Custom { .. }) => Ok(env),
        _ => Err(format!(
            "Invalid API URL '{}': expected an http:// or https:// address",
            url
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn custom(url: &str) -> Environment {
        Environment::Custom {
            api_url: url.to_string(),
        }
    }

    #[test]
    // Loading a saved configuration file should return the same configuration.
    fn test_load_recovers_saved_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = Config::new(Some("https://billing.example.com/api".to_string()));
        config.save(&path).unwrap();

        let loaded_config = Config::load_from_file(&path).unwrap();
        assert_eq!(config, loaded_config);
    }

    #[test]
    // Saving a configuration should create directories if they don't exist.
    fn test_save_creates_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nonexistent_dir").join("config.json");

        let config = Config::new(Some("http://localhost:5000/api".to_string()));
        let result = config.save(&path);

        assert!(result.is_ok(), "Failed to save config");
        assert!(
            path.parent().unwrap().exists(),
            "Parent directory does not exist"
        );
    }

    #[test]
    // Loading an invalid JSON file should return an error.
    fn test_load_rejects_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid_config.json");

        let mut file = File::create(&path).unwrap();
        writeln!(file, "invalid json").unwrap();

        let result = Config::load_from_file(&path);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_and_clear() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        assert_eq!(Config::load_or_default(&path).unwrap(), Config::default());

        Config::new(Some("http://10.0.0.5/api".to_string()))
            .save(&path)
            .unwrap();
        Config::clear(&path).unwrap();
        assert!(!path.exists());
        // Clearing twice is fine.
        Config::clear(&path).unwrap();
    }

    #[test]
    fn test_resolve_environment_precedence() {
        let config = Config::new(Some("http://from-config/api".to_string()));

        let env = resolve_environment(Some("http://from-flag/api"), &config, Some("local"));
        assert_eq!(env, Ok(custom("http://from-flag/api")));

        let env = resolve_environment(Some("  "), &config, None);
        assert_eq!(env, Ok(custom("http://from-config/api")));

        let env = resolve_environment(None, &Config::default(), Some("local"));
        assert_eq!(env, Ok(Environment::Local));

        let env = resolve_environment(None, &Config::default(), None);
        assert_eq!(env, Ok(Environment::Local));
    }

    #[test]
    fn test_resolve_environment_rejects_bad_values() {
        assert!(resolve_environment(Some("ftp://nope"), &Config::default(), None).is_err());
        assert!(resolve_environment(None, &Config::default(), Some("staging")).is_err());
        assert!(parse_api_url("local").is_err());
    }
}
