use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Last-used paths and options, remembered across runs so `icsmerge merge`
/// works without arguments once set up.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Previous snapshot .ics file
    pub previous: Option<PathBuf>,
    /// New snapshot .ics file
    pub new: Option<PathBuf>,
    /// Exclusion pattern file
    pub exclusions: Option<PathBuf>,
    /// Convert output events to all-day by default
    #[serde(default)]
    pub all_day: bool,
}

/// Get the config directory path (~/.config/icsmerge)
pub fn config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Could not determine config directory")?
        .join("icsmerge");
    Ok(config_dir)
}

/// Get the config file path (~/.config/icsmerge/config.toml)
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Load config; a missing file means defaults, not an error.
pub fn load_config() -> Result<Config> {
    let path = config_path()?;

    if !path.exists() {
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

    Ok(config)
}

/// Save config to ~/.config/icsmerge/config.toml
pub fn save_config(config: &Config) -> Result<()> {
    let path = config_path()?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create config directory at {}", parent.display())
        })?;
    }

    let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;

    std::fs::write(&path, contents)
        .with_context(|| format!("Failed to write config file at {}", path.display()))?;

    Ok(())
}

/// Default location for the merged calendar (<data dir>/icsmerge/out.ics)
pub fn default_output_path() -> Result<PathBuf> {
    let out_dir = dirs::data_dir()
        .context("Could not determine data directory")?
        .join("icsmerge");
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory at {}", out_dir.display()))?;
    Ok(out_dir.join("out.ics"))
}
