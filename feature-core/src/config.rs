use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{DEFAULT_FEATURE_NAME, DEFAULT_FEATURE_PRIORITY};

/// Environment variable overriding the settings file location
pub const CONFIG_PATH_ENV: &str = "FM_CONFIG_PATH";

/// User settings for the feature manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Folder holding the feature list files
    pub default_folder: PathBuf,
    /// Wildcard pattern selecting list files in the folder
    pub file_pattern: String,
    /// Stem used when creating a new list file
    pub new_file_stem: String,
    /// Name given to features created with "add"
    pub new_feature_name: String,
    /// Priority given to features created with "add"
    pub new_feature_priority: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_folder: PathBuf::from("Listen"),
            file_pattern: "*.json".to_string(),
            new_file_stem: "NeueDatei".to_string(),
            new_feature_name: DEFAULT_FEATURE_NAME.to_string(),
            new_feature_priority: DEFAULT_FEATURE_PRIORITY,
        }
    }
}

impl Settings {
    /// Loads settings from the provided path, falling back to defaults when
    /// the file does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {:?}", path))?;

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {:?}", path))
    }

    /// Save the settings to the specified path
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(&self)?;

        // Ensure parent directories exist
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write settings to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Creates a default settings file if it doesn't exist
    pub fn create_default<P: AsRef<Path>>(path: P) -> Result<()> {
        if path.as_ref().exists() {
            return Ok(());
        }
        Self::default().save(path)
    }
}

/// Gets the path to the settings file
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }

    let config_dir = dirs::config_dir().context("Failed to determine config directory")?;

    Ok(config_dir.join("feature-manager").join("config.yaml"))
}
