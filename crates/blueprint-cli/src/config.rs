//! TOML configuration for the `blueprint` command.
//!
//! Read from the `--config` path when given, otherwise from the
//! platform-appropriate config file:
//! - Windows:  `%APPDATA%\BlueprintCodec\config.toml`
//! - Linux:    `$XDG_CONFIG_HOME/blueprint-codec/config.toml` (or `~/.config/...`)
//! - macOS:    `~/Library/Application Support/BlueprintCodec/config.toml`
//!
//! ```toml
//! log_level = "warn"
//!
//! [codec]
//! compression_level = 9
//!
//! [[codec.icons]]
//! index = 1
//! signal = { type = "item", name = "electronic-circuit" }
//!
//! [output]
//! pretty = false
//! ```
//!
//! Every field has a serde default, so an empty or partial file is valid and
//! a missing platform file means "all defaults".

use std::path::{Path, PathBuf};

use blueprint_core::{CompressionLevel, Icon};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CliConfig {
    /// `tracing` level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub codec: CodecConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Defaults applied when encoding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CodecConfig {
    /// zlib level 0-9; larger values are clamped to 9.
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,
    /// Icons used when `--icon` is not given.  Absent means the codec's
    /// built-in default icon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icons: Option<Vec<Icon>>,
}

/// How decoded JSON is printed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl CodecConfig {
    pub fn level(&self) -> CompressionLevel {
        CompressionLevel::new(self.compression_level)
    }
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "warn".to_string()
}
fn default_compression_level() -> u32 {
    CompressionLevel::default().get()
}
fn default_true() -> bool {
    true
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            codec: CodecConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            compression_level: default_compression_level(),
            icons: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: default_true(),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the full path to the platform config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined from the environment.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads the configuration.
///
/// With an explicit `path` the file must exist.  Without one, the platform
/// file is used and a missing file (or an undeterminable config directory)
/// yields [`CliConfig::default()`].
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors and
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: Option<&Path>) -> Result<CliConfig, ConfigError> {
    if let Some(path) = path {
        return read_config(path);
    }

    let Ok(path) = config_file_path() else {
        return Ok(CliConfig::default());
    };
    match read_config(&path) {
        Err(ConfigError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            Ok(CliConfig::default())
        }
        other => other,
    }
}

/// Persists `config` to `path`, or to the platform config file.
///
/// Creates the config directory if it does not exist.  Returns the path
/// written.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures,
/// [`ConfigError::Serialize`] if serialization fails, or
/// [`ConfigError::NoPlatformConfigDir`] when no path can be resolved.
pub fn save_config(config: &CliConfig, path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_file_path()?,
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(&path, content).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

fn read_config(path: &Path) -> Result<CliConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config directory including the application
/// subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("BlueprintCodec"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("BlueprintCodec")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("blueprint-codec"))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
