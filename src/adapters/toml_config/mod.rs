// TOML config adapter - Configuration layer loaded from a TOML file

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::config::ConfigOverlay;
use crate::domain::errors::ConfigError;

/// File looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "bgclip.toml";

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    bgclip: ConfigOverlay,
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse the `[bgclip]` table of a TOML document
    pub fn parse(content: &str, path: &Path) -> Result<ConfigOverlay, ConfigError> {
        let file: ConfigFile = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(file.bgclip)
    }

    /// Load a config file that must exist
    pub fn load(path: &Path) -> Result<ConfigOverlay, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        info!("Loading configuration from: {}", path.display());
        Self::parse(&content, path)
    }

    /// Load `explicit` if given, else the default file if it exists
    pub fn discover(explicit: Option<&Path>) -> Result<Option<ConfigOverlay>, ConfigError> {
        match explicit {
            Some(path) => Self::load(path).map(Some),
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::load(&default_path).map(Some)
                } else {
                    Ok(None)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{OverrunPolicy, SourceVariant};

    #[test]
    fn test_parse_bgclip_table() {
        let content = r#"
            [bgclip]
            source_url = "https://short.example/Xy12"
            variant = "short-link"
            fps = 24
            fallback_offsets = [1, 2, 3]
            overrun_policy = "clamp"
            transcoder = "/usr/local/bin/ffmpeg"
        "#;
        let overlay = TomlConfigAdapter::parse(content, Path::new("bgclip.toml")).unwrap();
        assert_eq!(overlay.variant, Some(SourceVariant::ShortLink));
        assert_eq!(overlay.fps, Some(24));
        assert_eq!(overlay.fallback_offsets, Some(vec![1, 2, 3]));
        assert_eq!(overlay.overrun_policy, Some(OverrunPolicy::Clamp));
        assert_eq!(overlay.transcoder.as_deref(), Some("/usr/local/bin/ffmpeg"));
        assert_eq!(overlay.width, None);
    }

    #[test]
    fn test_empty_file_is_empty_overlay() {
        let overlay = TomlConfigAdapter::parse("", Path::new("bgclip.toml")).unwrap();
        assert!(overlay.is_empty());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = TomlConfigAdapter::parse("[bgclip]\nframes = 3\n", Path::new("x.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = TomlConfigAdapter::load(Path::new("/nonexistent/bgclip.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[bgclip]\nclip_count = 3\n").unwrap();
        let overlay = TomlConfigAdapter::discover(Some(&path)).unwrap().unwrap();
        assert_eq!(overlay.clip_count, Some(3));
    }
}
