use mdsync_engine::{ContextLimits, HardBreakStyle, ParseOptions, SerializeOptions, SyncConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// How markdown is read and written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub preserve_line_breaks: bool,
    pub hard_break_style: HardBreakStyle,
}

/// Every section is optional; missing keys take the engine defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub editor: EditorSettings,
    pub sync: SyncConfig,
    pub context: ContextLimits,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Tiers are searched by size; keep them ascending whatever the file order
        config.sync.tiers.sort_by_key(|t| t.min_size);

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// Loads the user's config, or the defaults when there is none.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        Ok(Self::load()?.unwrap_or_default())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/mdsync");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            preserve_line_breaks: self.editor.preserve_line_breaks,
        }
    }

    pub fn serialize_options(&self) -> SerializeOptions {
        SerializeOptions {
            preserve_line_breaks: self.editor.preserve_line_breaks,
            hard_break_style: self.editor.hard_break_style,
        }
    }

    pub fn sync_config(&self) -> SyncConfig {
        self.sync.clone()
    }

    pub fn context_limits(&self) -> ContextLimits {
        self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdsync_engine::sync::DebounceTier;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/mdsync/config.toml"));
    }

    #[test]
    fn test_full_config_file() {
        let config_content = r#"
[editor]
preserve_line_breaks = true
hard_break_style = "backslash"

[sync]
frame_interval_ms = 8
yielding_threshold = 5000
yield_chunk_lines = 64

[[sync.tiers]]
min_size = 1000
delay_ms = 50

[context]
window_lines = 40
"#;
        let config: Config = toml::from_str(config_content).unwrap();

        assert_eq!(
            config.serialize_options(),
            SerializeOptions {
                preserve_line_breaks: true,
                hard_break_style: HardBreakStyle::Backslash,
            }
        );
        assert!(config.parse_options().preserve_line_breaks);
        let sync = config.sync_config();
        assert_eq!(sync.frame_interval_ms, 8);
        assert_eq!(sync.yielding_threshold, 5000);
        assert_eq!(sync.yield_chunk_lines, 64);
        assert_eq!(
            sync.tiers,
            vec![DebounceTier {
                min_size: 1000,
                delay_ms: 50
            }]
        );
        assert_eq!(config.context_limits().window_lines, 40);
    }

    #[test]
    fn test_missing_keys_take_engine_defaults() {
        let config: Config = toml::from_str("[editor]\nhard_break_style = \"spaces\"\n").unwrap();

        assert_eq!(config.editor.hard_break_style, HardBreakStyle::Spaces);
        assert!(!config.editor.preserve_line_breaks);
        assert_eq!(config.sync_config(), SyncConfig::default());
        assert_eq!(config.context_limits(), ContextLimits::default());

        let empty: Config = toml::from_str("").unwrap();
        assert_eq!(empty, Config::default());
    }

    #[test]
    fn test_unknown_break_style_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "[editor]\nhard_break_style = \"tabs\"\n").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_tiers_are_sorted_on_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_file,
            r#"
[[sync.tiers]]
min_size = 900
delay_ms = 90

[[sync.tiers]]
min_size = 100
delay_ms = 10
"#,
        )
        .unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();
        let sizes: Vec<usize> = config.sync.tiers.iter().map(|t| t.min_size).collect();

        assert_eq!(sizes, vec![100, 900]);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let mut test_config = Config::default();
        test_config.editor.hard_break_style = HardBreakStyle::Backslash;
        test_config.context.window_lines = 12;

        test_config.save_to_path(&config_file).unwrap();
        assert!(config_file.exists(), "Config file should exist");

        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }
}
