use crate::{AppConfig, ExcelDiffError};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "exceldiff.toml";

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub path: PathBuf,
    pub exists: bool,
}

/// Load the configuration from the platform config directory
pub fn load_config() -> Result<LoadedConfig, ExcelDiffError> {
    let path = default_config_path()?;
    load_config_from(&path)
}

/// Load the configuration from an explicit path; a missing file yields defaults
pub fn load_config_from(path: &Path) -> Result<LoadedConfig, ExcelDiffError> {
    let exists = path.exists();

    let config = if exists {
        let data = fs::read_to_string(path)?;
        parse_config(&data)?
    } else {
        AppConfig::default()
    };

    Ok(LoadedConfig {
        config,
        path: path.to_path_buf(),
        exists,
    })
}

pub fn save_config(path: &Path, config: &AppConfig) -> Result<(), ExcelDiffError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let data = toml::to_string_pretty(config)
        .map_err(|e| ExcelDiffError::Serialization(e.to_string()))?;
    fs::write(path, data)?;
    Ok(())
}

pub fn default_config_path() -> Result<PathBuf, ExcelDiffError> {
    let dirs = ProjectDirs::from("", "exceldiff", "exceldiff").ok_or_else(|| {
        ExcelDiffError::Config("Unable to determine config directory".to_string())
    })?;
    Ok(dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn parse_config(data: &str) -> Result<AppConfig, ExcelDiffError> {
    let config: AppConfig =
        toml::from_str(data).map_err(|e| ExcelDiffError::Serialization(e.to_string()))?;

    if !(0.0..=1.0).contains(&config.match_threshold) {
        return Err(ExcelDiffError::Config(format!(
            "match_threshold must be between 0 and 1, got {}",
            config.match_threshold
        )));
    }

    Ok(config)
}
