use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DayplanConfig {
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub remote: RemoteSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StorageSection {
    /// Local snapshot path
    pub path: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RemoteSection {
    /// Remote authority base URL
    pub url: Option<String>,
    /// Access token (prefer DAYPLAN_TOKEN over storing this)
    pub token: Option<String>,
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let base = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Cannot determine the config directory"))?;
    Ok(base.join("dayplan").join("config.toml"))
}

pub fn default_snapshot_path() -> anyhow::Result<PathBuf> {
    let base =
        dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine the data directory"))?;
    Ok(base.join("dayplan").join("templates.json"))
}

pub fn read_config(path: &Path) -> anyhow::Result<DayplanConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&raw).map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))
}

/// Load the config, tolerating a missing default file.
pub fn load_config(override_path: Option<&str>) -> anyhow::Result<DayplanConfig> {
    match override_path {
        Some(path) => read_config(Path::new(path)),
        None => {
            let path = default_config_path()?;
            if path.exists() {
                read_config(&path)
            } else {
                Ok(DayplanConfig::default())
            }
        }
    }
}
