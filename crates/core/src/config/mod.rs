use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{algorithms::DEFAULT_ALGORITHM, audio::ToneConfig, render::Palette, Result, VisualiserError};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub session: SessionSettings,
    pub display: DisplayConfig,
    pub audio: ToneConfig,
}

impl AppConfig {
    /// Reads a JSON configuration file. Missing sections and fields keep
    /// their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// What to sort and how to generate it. Fixed for the whole session,
/// restarts reuse it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub algorithm: String,
    pub size: usize,
    /// Largest value an element may take; elements are drawn from `1..=max_value`.
    pub max_value: u32,
    /// Initial per-event delay in milliseconds.
    pub delay_ms: u32,
    /// Generate distinct elements only.
    pub unique: bool,
    /// Seed for reproducible arrays.
    pub seed: Option<u64>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            algorithm: DEFAULT_ALGORITHM.to_string(),
            size: 100,
            max_value: 500,
            delay_ms: 5,
            unique: false,
            seed: None,
        }
    }
}

impl SessionSettings {
    /// Rejects settings that cannot produce any array.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(VisualiserError::InvalidSettings(
                "array size must be a positive integer".into(),
            ));
        }
        if self.max_value == 0 {
            return Err(VisualiserError::InvalidSettings(
                "max element value must be a positive integer".into(),
            ));
        }
        Ok(())
    }
}

/// Settings for the frame renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub palette: Palette,
    /// Start in windowed mode instead of full screen.
    pub windowed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Rgb;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = AppConfig::from_json(
            r#"{ "session": { "algorithm": "heap_sort", "size": 20 },
                 "display": { "palette": { "highlight": [1, 2, 3] } } }"#,
        )
        .unwrap();

        assert_eq!(config.session.algorithm, "heap_sort");
        assert_eq!(config.session.size, 20);
        assert_eq!(config.session.max_value, 500);
        assert_eq!(config.display.palette.highlight, Rgb(1, 2, 3));
        assert_eq!(config.display.palette.moving, Palette::default().moving);
        assert_eq!(config.audio, ToneConfig::default());
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = AppConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, VisualiserError::Config(_)));
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let settings = SessionSettings {
            size: 0,
            ..SessionSettings::default()
        };
        assert!(settings.validate().is_err());

        let settings = SessionSettings {
            max_value: 0,
            ..SessionSettings::default()
        };
        assert!(settings.validate().is_err());
        assert!(SessionSettings::default().validate().is_ok());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = AppConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, VisualiserError::Io(_)));
    }
}
