//! Reading and writing `config.yaml`

use super::{default_config_path, DigvidConfig};
use anyhow::{Context, Result};
use std::path::Path;

impl DigvidConfig {
    /// Load settings from `path` and clamp them into range
    ///
    /// A missing file yields the defaults. An unreadable or malformed file is
    /// logged and also yields the defaults. Every value `validate()` had to
    /// adjust is logged by key.
    pub fn load(path: &Path) -> Self {
        log::info!("load: Loading config from {:?}", path);

        let parsed = match read_yaml(path) {
            Ok(Some(config)) => config,
            Ok(None) => {
                log::info!("load: No config at {:?}, using defaults", path);
                return Self::default();
            }
            Err(e) => {
                log::warn!("load: {:#}, using defaults", e);
                return Self::default();
            }
        };

        let mut config = parsed.clone();
        config.validate();
        for key in adjusted_keys(&parsed, &config) {
            log::warn!("load: '{}' out of range in {:?}, clamped", key, path);
        }
        config
    }

    /// [`DigvidConfig::load`] from the platform config directory
    pub fn load_default() -> Self {
        Self::load(&default_config_path())
    }

    /// Write settings to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        log::info!("save: Saving config to {:?}", path);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config to YAML")?;
        std::fs::write(path, yaml).with_context(|| format!("Failed to write config file: {:?}", path))
    }
}

fn read_yaml(path: &Path) -> Result<Option<DigvidConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read config file: {:?}", path))?;
    let config = serde_yaml::from_str(&contents).with_context(|| format!("Failed to parse config: {:?}", path))?;
    Ok(Some(config))
}

/// Keys whose value differs between the parsed and the validated config
fn adjusted_keys(parsed: &DigvidConfig, validated: &DigvidConfig) -> Vec<&'static str> {
    let mut keys = Vec::new();
    if parsed.selection.default_length_secs != validated.selection.default_length_secs {
        keys.push("selection.default_length_secs");
    }
    // bit compare so a NaN that was replaced still counts
    let float_pairs = [
        (
            "waveform.handle_tolerance_px",
            parsed.waveform.handle_tolerance_px,
            validated.waveform.handle_tolerance_px,
        ),
        (
            "waveform.bar_height_fill",
            parsed.waveform.bar_height_fill,
            validated.waveform.bar_height_fill,
        ),
        (
            "waveform.min_bar_opacity",
            parsed.waveform.min_bar_opacity,
            validated.waveform.min_bar_opacity,
        ),
    ];
    for (key, before, after) in float_pairs {
        if before.to_bits() != after.to_bits() {
            keys.push(key);
        }
    }
    if parsed.batch.max_items != validated.batch.max_items {
        keys.push("batch.max_items");
    }
    if parsed.batch.folder_prefix != validated.batch.folder_prefix {
        keys.push("batch.folder_prefix");
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_nonexistent_returns_default() {
        let config = DigvidConfig::load(Path::new("/nonexistent/digvid/config.yaml"));
        assert_eq!(config, DigvidConfig::default());
    }

    #[test]
    fn test_save_then_load_preserves_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let mut config = DigvidConfig::default();
        config.batch.folder_prefix = "Mixtape".to_string();
        config.selection.default_length_secs = 45;
        config.save(&path).unwrap();

        assert_eq!(DigvidConfig::load(&path), config);
    }

    #[test]
    fn test_load_clamps_out_of_range_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "selection:\n  default_length_secs: 0\nwaveform:\n  bar_height_fill: 4.0\nbatch:\n  max_items: 500\n",
        )
        .unwrap();

        let config = DigvidConfig::load(&path);
        assert_eq!(config.selection.default_length_secs, 1);
        assert_eq!(config.waveform.bar_height_fill, 1.0);
        assert_eq!(config.batch.max_items, 100);
        assert_eq!(config.batch.folder_prefix, "Playlist");
    }

    #[test]
    fn test_invalid_yaml_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "selection: [not, a, map").unwrap();

        assert_eq!(DigvidConfig::load(&path), DigvidConfig::default());
    }

    #[test]
    fn test_adjusted_keys_names_each_clamped_value() {
        let mut parsed = DigvidConfig::default();
        parsed.waveform.min_bar_opacity = f32::NAN;
        parsed.batch.max_items = 0;
        let mut validated = parsed.clone();
        validated.validate();

        assert_eq!(
            adjusted_keys(&parsed, &validated),
            vec!["waveform.min_bar_opacity", "batch.max_items"]
        );
        assert!(adjusted_keys(&validated, &validated).is_empty());
    }
}
