use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::AthleteSettings;

/// Configuration format version
const CONFIG_VERSION: &str = "1.0";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRsConfig {
    /// Configuration metadata
    pub metadata: ConfigMetadata,

    /// Athlete thresholds and preferences
    pub athlete: AthleteSettings,
}

/// Configuration metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Default for RunRsConfig {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            metadata: ConfigMetadata {
                version: CONFIG_VERSION.to_string(),
                created_at: now,
                updated_at: now,
            },
            athlete: AthleteSettings::default(),
        }
    }
}

impl RunRsConfig {
    /// Default configuration file location under the platform config dir
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("could not determine config directory")?;
        Ok(config_dir.join("runrs").join("config.toml"))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Load from the given path, or from the default location, falling
    /// back to defaults when no config file exists yet
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let resolved = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };

        if resolved.exists() {
            Self::load(&resolved)
        } else {
            Ok(Self::default())
        }
    }

    /// Persist the configuration, touching the modification timestamp
    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create config directory {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("failed to serialize configuration")?;
        fs::write(path, content)
            .with_context(|| format!("failed to write config file {}", path.display()))
    }
}
