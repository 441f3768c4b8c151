//! # cloak-config
//!
//! Configuration management for the cloak daemon.
//!
//! Loads configuration from:
//! 1. `~/.cloak/config.toml` (global)
//! 2. Environment variables (highest priority)

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::RwLock;
use tracing::debug;

pub mod logging;

/// Global config instance
static CONFIG: Lazy<RwLock<Config>> = Lazy::new(|| RwLock::new(Config::load().unwrap_or_default()));

/// Get global config (read-only)
pub fn config() -> std::sync::RwLockReadGuard<'static, Config> {
    CONFIG.read().unwrap()
}

/// Reload config from disk
pub fn reload() -> Result<(), ConfigError> {
    let new_config = Config::load()?;
    *CONFIG.write().unwrap() = new_config;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub daemon: DaemonConfig,
    pub storage: StorageConfig,
    pub platform: PlatformConfig,
    pub matching: MatchConfig,
}

impl Config {
    /// Load config from the standard location plus env overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                debug!("Loading global config from {:?}", global_path);
                let contents = std::fs::read_to_string(&global_path)?;
                config = toml::from_str(&contents)?;
            }
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Global config path: ~/.cloak/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".cloak/config.toml"))
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("CLOAK_SOCKET") {
            self.daemon.socket = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("CLOAK_DB") {
            self.storage.database = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("CLOAK_PACKAGE_REGISTRY") {
            self.platform.package_registry = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("CLOAK_APP_DATA_DIR") {
            self.platform.app_data_dir = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("CLOAK_PROC_ROOT") {
            self.platform.proc_root = PathBuf::from(path);
        }
        if let Ok(pkg) = std::env::var("CLOAK_MANAGER_PACKAGE") {
            self.platform.manager_package = Some(pkg);
        }
        if let Ok(level) = std::env::var("CLOAK_SDK_LEVEL") {
            if let Ok(n) = level.parse() {
                self.platform.sdk_level = n;
            }
        }
    }

    /// Generate default config TOML string
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Config::default()).unwrap()
    }
}

/// Daemon configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Unix socket path
    pub socket: PathBuf,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            socket: PathBuf::from("/run/cloak/cloakd.sock"),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the sqlite database holding hide entries and settings
    pub database: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from("/data/adb/cloak.db"),
        }
    }
}

/// Host platform layout the engine consumes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// System package registry file, stat'd for inode fingerprinting
    pub package_registry: PathBuf,
    /// Per-user app-data directory tree (user dirs, then one dir per package)
    pub app_data_dir: PathBuf,
    /// Root of the process table
    pub proc_root: PathBuf,
    /// Package name of the manager app trusted to edit the hide list
    pub manager_package: Option<String>,
    /// Platform SDK level; gates the worker-pool sweep on enable
    pub sdk_level: u32,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            package_registry: PathBuf::from("/data/system/packages.xml"),
            app_data_dir: PathBuf::from("/data/user_de"),
            proc_root: PathBuf::from("/proc"),
            manager_package: None,
            sdk_level: 30,
        }
    }
}

/// Matching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Length both a stored pattern and a captured process name must exceed
    /// before a truncated command-line read is accepted as a prefix match
    pub max_prefix_len: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self { max_prefix_len: 16 }
    }
}
