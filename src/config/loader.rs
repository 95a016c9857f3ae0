//! Configuration loader with file resolution and environment override support.

use super::error::{ConfigError, ConfigResult};
use super::schema::Config;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable prefix for overrides
const ENV_PREFIX: &str = "VDT_SEND";

/// Config file name in the current directory
const LOCAL_CONFIG_FILE_NAME: &str = "vdt-send.toml";

/// Config file name inside the per-user config directory
const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable for explicit config path
const CONFIG_PATH_ENV: &str = "VDT_SEND_CONFIG";

/// Configuration loader with resolution and override logic.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Resolved config file path (if any)
    pub config_path: Option<PathBuf>,
    /// The loaded configuration
    pub config: Config,
}

impl ConfigLoader {
    /// Load configuration using standard resolution order.
    ///
    /// Environment variables override any config file values.
    pub fn load() -> ConfigResult<Self> {
        let config_path = resolve_config_path();

        let mut config = if let Some(ref path) = config_path {
            load_from_file(path)?
        } else {
            Config::default()
        };

        apply_env_overrides(&mut config)?;
        config.validate()?;

        Ok(Self { config_path, config })
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }

        let mut config = load_from_file(&path)?;
        apply_env_overrides(&mut config)?;
        config.validate()?;

        Ok(Self {
            config_path: Some(path),
            config,
        })
    }

    /// Create a loader with default configuration (no file, no environment).
    pub fn with_defaults() -> Self {
        Self {
            config_path: None,
            config: Config::default(),
        }
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> Config {
        self.config
    }
}

/// Resolve the configuration file path using standard locations.
pub fn resolve_config_path() -> Option<PathBuf> {
    // 1. Explicit environment variable
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
        debug!("{} points at missing file {}", CONFIG_PATH_ENV, path.display());
    }

    // 2. Current directory
    let cwd_config = PathBuf::from(LOCAL_CONFIG_FILE_NAME);
    if cwd_config.exists() {
        return Some(cwd_config);
    }

    // 3. XDG config directory (Linux/macOS) or APPDATA (Windows)
    if let Some(config_dir) = get_config_dir() {
        let app_config = config_dir.join("vdt-send").join(CONFIG_FILE_NAME);
        if app_config.exists() {
            return Some(app_config);
        }
    }

    None
}

/// Get the platform-specific config directory.
fn get_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA").ok().map(PathBuf::from)
    }

    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|h| PathBuf::from(h).join(".config"))
            })
    }
}

/// Load configuration from a file.
fn load_from_file(path: &Path) -> ConfigResult<Config> {
    debug!("Loading configuration from {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(ConfigError::ParseError)
}

/// Apply process environment overrides to the configuration.
fn apply_env_overrides(config: &mut Config) -> ConfigResult<()> {
    apply_overrides_from(config, |var| std::env::var(var).ok())
}

/// Apply overrides looked up through `lookup`.
///
/// Variables follow the pattern `VDT_SEND_<SECTION>_<KEY>`:
/// - `VDT_SEND_SERIAL_DEVICE`
/// - `VDT_SEND_SERIAL_PROFILE`
/// - `VDT_SEND_TRANSMIT_WRITE_MODE`
/// - `VDT_SEND_LOG_LEVEL`
fn apply_overrides_from<F>(config: &mut Config, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| format!("{}_{}", ENV_PREFIX, key);

    if let Some(val) = lookup(&var("SERIAL_DEVICE")) {
        config.serial.device = val;
    }
    if let Some(val) = lookup(&var("SERIAL_PROFILE")) {
        config.serial.profile = val
            .parse()
            .map_err(|e: String| ConfigError::env_parse(var("SERIAL_PROFILE"), e))?;
    }
    if let Some(val) = lookup(&var("TRANSMIT_WRITE_MODE")) {
        config.transmit.write_mode = val
            .parse()
            .map_err(|e: String| ConfigError::env_parse(var("TRANSMIT_WRITE_MODE"), e))?;
    }
    if let Some(val) = lookup(&var("LOG_LEVEL")) {
        config.logging.level = val;
    }

    Ok(())
}
