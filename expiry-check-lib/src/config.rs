//! Configuration file parsing and management.
//!
//! Settings come from TOML files, `EC_*` environment variables and the
//! command line. This module handles the first two; the CLI layers its own
//! flags on top.

use crate::error::ExpiryCheckError;
use crate::types::OutputFormat;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration loaded from TOML files.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Default values for CLI options
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

/// Default configuration values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DefaultsConfig {
    /// Default output format ("text" or "json")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// HTTP timeout (as string, e.g., "5s", "30s", "2m")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Alternative RDAP bootstrap registry location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootstrap_url: Option<String>,
}

/// Configuration discovery and loading functionality.
///
/// Discovery looks in `$XDG_CONFIG_HOME/expiry-check/`, the home directory
/// and the working directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    home_dir: Option<PathBuf>,
    xdg_config_dir: Option<PathBuf>,
    working_dir: PathBuf,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Search directories taken from `HOME`, `XDG_CONFIG_HOME` and `.`.
    pub fn new() -> Self {
        Self::with_search_dirs(
            env::var_os("HOME").map(PathBuf::from),
            env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
            PathBuf::from("."),
        )
    }

    /// Explicit search directories. Without `xdg_config_dir`, XDG discovery
    /// falls back to `<home_dir>/.config`.
    pub fn with_search_dirs(
        home_dir: Option<PathBuf>,
        xdg_config_dir: Option<PathBuf>,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            home_dir,
            xdg_config_dir,
            working_dir: working_dir.into(),
        }
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns a `FileError` if the file is missing or unreadable and a
    /// `ConfigError` if it is not valid TOML or carries invalid values.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, ExpiryCheckError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ExpiryCheckError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            ExpiryCheckError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content).map_err(|e| {
            ExpiryCheckError::config(format!("Failed to parse TOML configuration: {}", e))
        })?;

        self.validate_config(&config)?;

        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// XDG config is applied first, then the home directory file, then the
    /// file in the current directory. Later files override earlier ones
    /// field by field. Files that fail to load are skipped.
    pub fn discover_and_load(&self) -> FileConfig {
        let mut merged_config = FileConfig::default();

        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        for path in candidates.into_iter().flatten() {
            match self.load_file(&path) {
                Ok(config) => {
                    tracing::debug!(path = %path.display(), "loaded config file");
                    merged_config = self.merge_configs(merged_config, config);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring config file");
                }
            }
        }

        merged_config
    }

    /// Looks for configuration files in the working directory.
    fn get_local_config_path(&self) -> Option<PathBuf> {
        ["expiry-check.toml", ".expiry-check.toml"]
            .iter()
            .map(|candidate| self.working_dir.join(candidate))
            .find(|path| path.exists())
    }

    /// Looks for configuration files in the user's home directory.
    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = self.home_dir.as_ref()?;

        [".expiry-check.toml", "expiry-check.toml"]
            .iter()
            .map(|candidate| home.join(candidate))
            .find(|path| path.exists())
    }

    /// Follows the XDG Base Directory Specification.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = self
            .xdg_config_dir
            .clone()
            .or_else(|| self.home_dir.as_ref().map(|home| home.join(".config")))?;

        let path = config_dir.join("expiry-check").join("config.toml");
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Merge two configurations; values from `higher` win.
    fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            defaults: match (lower.defaults, higher.defaults) {
                (Some(mut lower_defaults), Some(higher_defaults)) => {
                    if higher_defaults.output.is_some() {
                        lower_defaults.output = higher_defaults.output;
                    }
                    if higher_defaults.timeout.is_some() {
                        lower_defaults.timeout = higher_defaults.timeout;
                    }
                    if higher_defaults.bootstrap_url.is_some() {
                        lower_defaults.bootstrap_url = higher_defaults.bootstrap_url;
                    }
                    Some(lower_defaults)
                }
                (lower_defaults, higher_defaults) => higher_defaults.or(lower_defaults),
            },
        }
    }

    fn validate_config(&self, config: &FileConfig) -> Result<(), ExpiryCheckError> {
        let Some(defaults) = &config.defaults else {
            return Ok(());
        };

        if let Some(output) = &defaults.output {
            output
                .parse::<OutputFormat>()
                .map_err(ExpiryCheckError::config)?;
        }

        if let Some(timeout_str) = &defaults.timeout {
            if !matches!(parse_timeout_string(timeout_str), Some(secs) if secs > 0) {
                return Err(ExpiryCheckError::config(format!(
                    "Invalid timeout '{}'. Use a non-zero duration like '5s', '30s', '2m'",
                    timeout_str
                )));
            }
        }

        if let Some(url) = &defaults.bootstrap_url {
            if url.trim().is_empty() {
                return Err(ExpiryCheckError::config("bootstrap_url cannot be empty"));
            }
        }

        Ok(())
    }
}

/// Values read from `EC_*` environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub output: Option<OutputFormat>,
    pub timeout: Option<u64>,
    pub bootstrap_url: Option<String>,
    pub config: Option<String>,
}

/// Load configuration from environment variables.
///
/// Invalid values are logged as warnings and ignored.
pub fn load_env_config() -> EnvConfig {
    let mut env_config = EnvConfig::default();

    // EC_OUTPUT - output format
    if let Ok(val) = env::var("EC_OUTPUT") {
        match val.parse::<OutputFormat>() {
            Ok(output) => {
                tracing::debug!("Using EC_OUTPUT={}", output);
                env_config.output = Some(output);
            }
            Err(e) => tracing::warn!("Invalid EC_OUTPUT='{}': {}", val, e),
        }
    }

    // EC_TIMEOUT - HTTP timeout
    if let Ok(val) = env::var("EC_TIMEOUT") {
        match parse_timeout_string(&val) {
            Some(secs) if secs > 0 => {
                tracing::debug!("Using EC_TIMEOUT={}", val);
                env_config.timeout = Some(secs);
            }
            _ => tracing::warn!("Invalid EC_TIMEOUT='{}', use format like '5s' or '2m'", val),
        }
    }

    // EC_BOOTSTRAP_URL - alternative bootstrap registry
    if let Ok(url) = env::var("EC_BOOTSTRAP_URL") {
        if !url.trim().is_empty() {
            tracing::debug!("Using EC_BOOTSTRAP_URL={}", url);
            env_config.bootstrap_url = Some(url);
        }
    }

    // EC_CONFIG - explicit config file
    if let Ok(path) = env::var("EC_CONFIG") {
        if !path.trim().is_empty() {
            env_config.config = Some(path);
        }
    }

    env_config
}

/// Parse a timeout string like "5s", "30s", "2m" into seconds.
///
/// A bare number is taken as seconds.
pub fn parse_timeout_string(timeout_str: &str) -> Option<u64> {
    let timeout_str = timeout_str.trim().to_lowercase();

    if let Some(secs) = timeout_str.strip_suffix('s') {
        secs.parse::<u64>().ok()
    } else if let Some(mins) = timeout_str.strip_suffix('m') {
        mins.parse::<u64>().ok().and_then(|m| m.checked_mul(60))
    } else {
        timeout_str.parse::<u64>().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    #[test]
    fn test_parse_timeout_string() {
        assert_eq!(parse_timeout_string("5s"), Some(5));
        assert_eq!(parse_timeout_string("30S"), Some(30));
        assert_eq!(parse_timeout_string("2m"), Some(120));
        assert_eq!(parse_timeout_string("5"), Some(5));
        assert_eq!(parse_timeout_string("invalid"), None);
    }

    #[test]
    fn test_parse_timeout_string_minutes_overflow() {
        assert_eq!(parse_timeout_string("307445734561825862m"), None);
        assert_eq!(parse_timeout_string("307445734561825860m"), Some(18446744073709551600));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let manager = ConfigManager::default();
        for timeout in ["0s", "0", "0m"] {
            let temp_file = write_config(&format!("[defaults]\ntimeout = \"{}\"\n", timeout));
            let err = manager.load_file(temp_file.path()).unwrap_err();
            assert!(matches!(err, ExpiryCheckError::ConfigError { .. }), "{}", timeout);
        }
    }

    #[test]
    fn test_discover_and_load_precedence() {
        let root = tempfile::TempDir::new().unwrap();
        let home = root.path().join("home");
        let xdg = root.path().join("xdg");
        let work = root.path().join("work");
        fs::create_dir_all(xdg.join("expiry-check")).unwrap();
        fs::create_dir_all(&home).unwrap();
        fs::create_dir_all(&work).unwrap();

        fs::write(
            xdg.join("expiry-check").join("config.toml"),
            "[defaults]\noutput = \"json\"\ntimeout = \"10s\"\nbootstrap_url = \"https://xdg.example/dns.json\"\n",
        )
        .unwrap();
        fs::write(
            home.join(".expiry-check.toml"),
            "[defaults]\ntimeout = \"20s\"\nbootstrap_url = \"https://home.example/dns.json\"\n",
        )
        .unwrap();
        fs::write(
            work.join("expiry-check.toml"),
            "[defaults]\nbootstrap_url = \"https://local.example/dns.json\"\n",
        )
        .unwrap();

        let manager = ConfigManager::with_search_dirs(Some(home), Some(xdg), &work);
        let defaults = manager.discover_and_load().defaults.unwrap();

        assert_eq!(defaults.output.as_deref(), Some("json")); // XDG only
        assert_eq!(defaults.timeout.as_deref(), Some("20s")); // home over XDG
        assert_eq!(
            defaults.bootstrap_url.as_deref(),
            Some("https://local.example/dns.json") // local over both
        );
    }

    #[test]
    fn test_discover_and_load_skips_invalid_and_uses_home_config_dir() {
        let root = tempfile::TempDir::new().unwrap();
        let home = root.path().join("home");
        let work = root.path().join("work");
        fs::create_dir_all(home.join(".config").join("expiry-check")).unwrap();
        fs::create_dir_all(&work).unwrap();

        fs::write(
            home.join(".config").join("expiry-check").join("config.toml"),
            "[defaults]\noutput = \"json\"\n",
        )
        .unwrap();
        fs::write(work.join(".expiry-check.toml"), "[defaults]\ntimeout = \"0s\"\n").unwrap();

        let manager = ConfigManager::with_search_dirs(Some(home), None, &work);
        let defaults = manager.discover_and_load().defaults.unwrap();

        assert_eq!(defaults.output.as_deref(), Some("json"));
        assert!(defaults.timeout.is_none());
    }

    #[test]
    fn test_discover_and_load_without_files() {
        let root = tempfile::TempDir::new().unwrap();
        let manager = ConfigManager::with_search_dirs(None, None, root.path());
        assert!(manager.discover_and_load().defaults.is_none());
    }

    // The only test in this crate that touches EC_* variables.
    #[test]
    fn test_load_env_config_ignores_invalid_values() {
        env::set_var("EC_OUTPUT", "csv");
        env::set_var("EC_TIMEOUT", "0");
        env::set_var("EC_BOOTSTRAP_URL", "  ");
        env::remove_var("EC_CONFIG");

        let env_config = load_env_config();
        assert!(env_config.output.is_none());
        assert!(env_config.timeout.is_none());
        assert!(env_config.bootstrap_url.is_none());
        assert!(env_config.config.is_none());

        env::set_var("EC_OUTPUT", "JSON");
        env::set_var("EC_TIMEOUT", "2m");
        env::set_var("EC_BOOTSTRAP_URL", "https://env.example/dns.json");

        let env_config = load_env_config();
        assert_eq!(env_config.output, Some(OutputFormat::Json));
        assert_eq!(env_config.timeout, Some(120));
        assert_eq!(
            env_config.bootstrap_url.as_deref(),
            Some("https://env.example/dns.json")
        );

        for var in ["EC_OUTPUT", "EC_TIMEOUT", "EC_BOOTSTRAP_URL"] {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_valid_config() {
        let temp_file = write_config(
            r#"
[defaults]
output = "json"
timeout = "20s"
bootstrap_url = "https://mirror.example/rdap/dns.json"
"#,
        );

        let manager = ConfigManager::default();
        let config = manager.load_file(temp_file.path()).unwrap();
        let defaults = config.defaults.unwrap();

        assert_eq!(defaults.output.as_deref(), Some("json"));
        assert_eq!(defaults.timeout.as_deref(), Some("20s"));
        assert_eq!(
            defaults.bootstrap_url.as_deref(),
            Some("https://mirror.example/rdap/dns.json")
        );
    }

    #[test]
    fn test_invalid_output_rejected() {
        let temp_file = write_config("[defaults]\noutput = \"csv\"\n");
        let manager = ConfigManager::default();
        let err = manager.load_file(temp_file.path()).unwrap_err();
        assert!(matches!(err, ExpiryCheckError::ConfigError { .. }));
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        let temp_file = write_config("[defaults]\ntimeout = \"soon\"\n");
        let manager = ConfigManager::default();
        assert!(manager.load_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let manager = ConfigManager::default();
        let err = manager
            .load_file("/definitely/not/here/expiry-check.toml")
            .unwrap_err();
        assert!(matches!(err, ExpiryCheckError::FileError { .. }));
    }

    #[test]
    fn test_merge_configs() {
        let manager = ConfigManager::default();

        let lower = FileConfig {
            defaults: Some(DefaultsConfig {
                output: Some("json".to_string()),
                timeout: Some("5s".to_string()),
                ..Default::default()
            }),
        };

        let higher = FileConfig {
            defaults: Some(DefaultsConfig {
                timeout: Some("30s".to_string()),
                ..Default::default()
            }),
        };

        let merged = manager.merge_configs(lower, higher);
        let defaults = merged.defaults.unwrap();

        assert_eq!(defaults.output.as_deref(), Some("json")); // Lower preserved
        assert_eq!(defaults.timeout.as_deref(), Some("30s")); // Higher wins
        assert!(defaults.bootstrap_url.is_none());
    }
}
