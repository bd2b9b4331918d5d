//! Runtime configuration
//!
//! Manages settings shared by all sequence operations:
//! - Suffix used for the temporary file during in-place reversal
//! - Allowed directories for destructive operations (whitelist)

use log::{debug, info};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{Result, SequenceError};

pub const DEFAULT_SWAP_SUFFIX: &str = "_TEMP";

/// Sequence operation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    /// Appended to a frame path to build the swap file for in-place reversal
    pub swap_suffix: String,
    /// Whitelist of directories destructive operations may touch
    /// Empty list = unrestricted
    pub allowed_directories: Vec<PathBuf>,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            swap_suffix: DEFAULT_SWAP_SUFFIX.to_string(),
            allowed_directories: Vec::new(),
        }
    }
}

impl SequenceConfig {
    /// Read a JSON configuration file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| SequenceError::io(path, e))?;
        let config: SequenceConfig =
            serde_json::from_str(&contents).map_err(|e| SequenceError::Config {
                message: format!("{}: {}", path.display(), e),
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.swap_suffix.is_empty() {
            return Err(SequenceError::Config {
                message: "swap_suffix cannot be empty".to_string(),
            });
        }
        if self.swap_suffix.contains(['/', '\\']) {
            return Err(SequenceError::Config {
                message: format!("swap_suffix '{}' cannot contain a path separator", self.swap_suffix),
            });
        }
        Ok(())
    }

    /// Check whether a path falls under one of the allowed directories
    pub fn is_allowed(&self, path: &Path) -> bool {
        if self.allowed_directories.is_empty() {
            return true;
        }

        let candidate = resolve(path);
        self.allowed_directories
            .iter()
            .any(|allowed| candidate.starts_with(resolve(allowed)))
    }
}

/// Canonicalize when the path exists on disk (resolves symlinks, `..`),
/// otherwise keep it as given. Destinations usually don't exist yet, so
/// their parent is canonicalized instead.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => match parent.canonicalize() {
            Ok(canonical_parent) => canonical_parent.join(name),
            Err(_) => path.to_path_buf(),
        },
        _ => path.to_path_buf(),
    }
}

/// Global configuration instance
static CONFIG: Lazy<RwLock<SequenceConfig>> = Lazy::new(|| RwLock::new(SequenceConfig::default()));

/// Default location of the configuration file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("frameseq").join("config.json"))
}

/// Snapshot of the current configuration
pub fn get_config() -> Result<SequenceConfig> {
    let config = CONFIG.read().map_err(|e| SequenceError::Config {
        message: format!("Config lock error: {}", e),
    })?;
    Ok(config.clone())
}

/// Replace the current configuration
pub fn set_config(new_config: SequenceConfig) -> Result<()> {
    new_config.validate()?;
    let mut config = CONFIG.write().map_err(|e| SequenceError::Config {
        message: format!("Config lock error: {}", e),
    })?;
    debug!("Replacing configuration: {:?}", new_config);
    *config = new_config;
    Ok(())
}

/// Load a configuration file and make it current
pub fn load_config(path: &Path) -> Result<()> {
    let loaded = SequenceConfig::from_file(path)?;
    info!(
        "Loaded configuration from {:?} ({} allowed directories)",
        path,
        loaded.allowed_directories.len()
    );
    set_config(loaded)
}

/// Validate that a path may be modified under the current configuration
pub fn validate_path(path: &Path) -> Result<()> {
    let config = CONFIG.read().map_err(|e| SequenceError::Config {
        message: format!("Config lock error: {}", e),
    })?;

    if config.is_allowed(path) {
        Ok(())
    } else {
        Err(SequenceError::AccessDenied {
            path: path.display().to_string(),
        })
    }
}
