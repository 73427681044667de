//! Store configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/citegraph/config.toml)
//! 3. Environment variables (CITEGRAPH_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix
const ENV_PREFIX: &str = "CITEGRAPH";

/// Number of results returned by a nearest-location query unless configured
pub const DEFAULT_NEAREST_COUNT: usize = 3;

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Reject citation links that would make a document its own ancestor
    #[serde(default)]
    pub cycle_guard: bool,

    /// How many locations `Store::closest_locations` returns
    #[serde(default = "default_nearest_count")]
    pub nearest_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cycle_guard: false,
            nearest_count: DEFAULT_NEAREST_COUNT,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (CITEGRAPH_CYCLE_GUARD, CITEGRAPH_NEAREST_COUNT)
    /// 2. Config file (~/.config/citegraph/config.toml or CITEGRAPH_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        // CITEGRAPH_CYCLE_GUARD
        if let Ok(val) = std::env::var(format!("{}_CYCLE_GUARD", ENV_PREFIX)) {
            self.cycle_guard = val.eq_ignore_ascii_case("true") || val == "1";
        }

        // CITEGRAPH_NEAREST_COUNT
        if let Ok(val) = std::env::var(format!("{}_NEAREST_COUNT", ENV_PREFIX)) {
            self.nearest_count = val
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}_NEAREST_COUNT: {:?}", ENV_PREFIX, val))?;
        }

        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with CITEGRAPH_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("citegraph")
            .join("config.toml")
    }
}

fn default_nearest_count() -> usize {
    DEFAULT_NEAREST_COUNT
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "CITEGRAPH_CYCLE_GUARD",
        "CITEGRAPH_NEAREST_COUNT",
        "CITEGRAPH_CONFIG",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.cycle_guard);
        assert_eq!(config.nearest_count, 3);
    }

    #[test]
    fn test_config_file_path_override() {
        let _guard = EnvGuard::new(ENV_VARS);

        assert!(Config::config_file_path().ends_with("citegraph/config.toml"));

        env::set_var("CITEGRAPH_CONFIG", "/tmp/citegraph-test.toml");
        assert_eq!(
            Config::config_file_path(),
            PathBuf::from("/tmp/citegraph-test.toml")
        );
    }

    #[test]
    fn test_env_override_cycle_guard() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("CITEGRAPH_CYCLE_GUARD", "true");
        config.apply_env_overrides().unwrap();
        assert!(config.cycle_guard);

        env::set_var("CITEGRAPH_CYCLE_GUARD", "1");
        config.cycle_guard = false;
        config.apply_env_overrides().unwrap();
        assert!(config.cycle_guard);

        env::set_var("CITEGRAPH_CYCLE_GUARD", "false");
        config.apply_env_overrides().unwrap();
        assert!(!config.cycle_guard);
    }

    #[test]
    fn test_env_override_nearest_count() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("CITEGRAPH_NEAREST_COUNT", "5");
        config.apply_env_overrides().unwrap();
        assert_eq!(config.nearest_count, 5);

        env::set_var("CITEGRAPH_NEAREST_COUNT", "many");
        assert!(config.apply_env_overrides().is_err());
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            cycle_guard = true
            nearest_count = 10
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert!(config.cycle_guard);
        assert_eq!(config.nearest_count, 10);
    }

    #[test]
    fn test_load_from_str_fills_defaults() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config::load_from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_path() {
        let _guard = EnvGuard::new(ENV_VARS);

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "cycle_guard = true\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert!(config.cycle_guard);
        assert_eq!(config.nearest_count, DEFAULT_NEAREST_COUNT);
    }

    #[test]
    fn test_load_from_path_invalid_toml() {
        let _guard = EnvGuard::new(ENV_VARS);

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "nearest_count = \"three\"").unwrap();

        let err = Config::load_from_path(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let path = PathBuf::from("/nonexistent/config.toml");
        let config = Config::load_from_path(&path).unwrap();
        assert!(!config.cycle_guard);
        assert_eq!(config.nearest_count, DEFAULT_NEAREST_COUNT);
    }

    #[test]
    fn test_serialization() {
        let config = Config {
            cycle_guard: true,
            nearest_count: 4,
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("cycle_guard"));
        assert!(toml_str.contains("nearest_count"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }
}
