//! Standard locations for DigVid configuration files

use std::path::PathBuf;

/// Directory holding DigVid settings
///
/// Returns: `{config_dir}/digvid` (e.g. `~/.config/digvid` on Linux)
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("digvid")
}

/// Default config file path: `{config_dir}/digvid/config.yaml`
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.yaml")
}
