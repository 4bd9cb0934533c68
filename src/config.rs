/// Runtime configuration
///
/// The calibration profile and the workflow policies live in a small JSON file
/// so that recalibrating against new reference samples does not require a
/// rebuild. Every field is optional; anything missing falls back to defaults.
///
/// Lookup order:
/// 1. The path in `DOC_ANALYZER_CONFIG`
/// 2. `<config dir>/doc-analyzer/config.json`
///    - Linux: ~/.config/doc-analyzer/config.json
///    - macOS: ~/Library/Application Support/doc-analyzer/config.json
///    - Windows: %APPDATA%\doc-analyzer\config.json

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Environment variable that overrides the config file location
pub const CONFIG_ENV: &str = "DOC_ANALYZER_CONFIG";

/// Constants relating the blue-channel absorbance proxy to estimated DOC
///
/// Fit by regression against lab-measured reference samples.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct CalibrationProfile {
    pub offset: f64,
    /// Must be finite and non-zero
    pub slope: f64,
}

impl Default for CalibrationProfile {
    fn default() -> Self {
        Self {
            offset: 199.92,
            slope: -41.45,
        }
    }
}

/// Size of the sampled rectangle, anchored at its top-left corner
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct PatchSize {
    pub width: u32,
    pub height: u32,
}

impl Default for PatchSize {
    fn default() -> Self {
        Self {
            width: 200,
            height: 200,
        }
    }
}

/// How folder listing compares file extensions
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionMatch {
    /// Only lowercase `.jpg`, `.jpeg` and `.png`
    CaseSensitive,
    /// `.JPG`, `.Png` etc. are picked up too
    #[default]
    CaseInsensitive,
}

/// What redo does with the record already produced for the image being redone
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RedoPolicy {
    /// Keep the old record; re-measuring appends a second row for the image
    #[default]
    AppendDuplicate,
    /// Drop the old record before the image is measured again
    Retract,
}

/// Complete application configuration
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub calibration: CalibrationProfile,
    pub patch: PatchSize,
    pub extensions: ExtensionMatch,
    pub redo: RedoPolicy,
}

impl Config {
    /// Parse from a JSON string
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Where the config file is expected, if a location can be determined
    pub fn default_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }

        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("doc-analyzer");
        path.push("config.json");
        Some(path)
    }

    /// Load and validate the config at `path`
    ///
    /// A missing file is not an error and yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config = Self::from_json(&json).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from the default location, falling back to defaults
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Reject values that would make every estimate meaningless
    pub fn validate(&self) -> Result<()> {
        let CalibrationProfile { offset, slope } = self.calibration;
        if !offset.is_finite() {
            return Err(Error::InvalidConfig(format!("offset must be finite, got {offset}")));
        }
        if !slope.is_finite() || slope == 0.0 {
            return Err(Error::InvalidConfig(format!(
                "slope must be finite and non-zero, got {slope}"
            )));
        }
        if self.patch.width == 0 || self.patch.height == 0 {
            return Err(Error::InvalidConfig(format!(
                "patch size must be positive, got {}x{}",
                self.patch.width, self.patch.height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.calibration.offset, 199.92);
        assert_eq!(config.calibration.slope, -41.45);
        assert_eq!(config.patch, PatchSize { width: 200, height: 200 });
        assert_eq!(config.extensions, ExtensionMatch::CaseInsensitive);
        assert_eq!(config.redo, RedoPolicy::AppendDuplicate);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_json(r#"{ "calibration": { "slope": -40.0 }, "redo": "retract" }"#)
            .unwrap();

        assert_eq!(config.calibration.offset, 199.92);
        assert_eq!(config.calibration.slope, -40.0);
        assert_eq!(config.redo, RedoPolicy::Retract);
        assert_eq!(config.patch.width, 200);
    }

    #[test]
    fn test_extension_policy_names() {
        let config = Config::from_json(r#"{ "extensions": "case_sensitive" }"#).unwrap();
        assert_eq!(config.extensions, ExtensionMatch::CaseSensitive);
    }

    #[test]
    fn test_validate_rejects_zero_slope() {
        let mut config = Config::default();
        config.calibration.slope = 0.0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_empty_patch() {
        let mut config = Config::default();
        config.patch.height = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = std::env::temp_dir().join("doc-analyzer-no-such-config.json");
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let path = std::env::temp_dir().join(format!(
            "doc-analyzer-bad-config-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "{ not json").unwrap();

        let result = Config::load_from(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
