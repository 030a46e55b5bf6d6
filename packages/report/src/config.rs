//! Parser configuration.
//!
//! Every field has a default, so an empty TOML document (or no file at all)
//! yields the stock configuration for the known report layouts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ReportError;

/// Tunable parser settings.
///
/// ```toml
/// incident_type = "Falls"
/// validation_sample = 5
/// room_wings = ["East", "West"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Label stamped on every entry's incident type.
    pub incident_type: String,
    /// Number of leading entries inspected by the document-level date-time
    /// check. `0` disables the check.
    pub validation_sample: usize,
    /// Wing names that begin a room suffix such as `West 100-1`.
    pub room_wings: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            incident_type: "Falls".to_string(),
            validation_sample: 5,
            room_wings: vec!["East".to_string(), "West".to_string()],
        }
    }
}

impl ParserConfig {
    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Config`] if the TOML is malformed and
    /// [`ReportError::InvalidConfig`] if a value is out of range.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ReportError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Io`] if the file cannot be read, otherwise as
    /// [`Self::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let text = std::fs::read_to_string(path)?;
        log::debug!("Loaded parser config from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Checks values that deserialize fine but cannot drive the parser.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidConfig`] describing the first problem.
    pub fn validate(&self) -> Result<(), ReportError> {
        if self.room_wings.is_empty() {
            return Err(ReportError::InvalidConfig {
                message: "room_wings must list at least one wing".to_string(),
            });
        }
        if let Some(wing) = self.room_wings.iter().find(|w| w.trim().is_empty()) {
            return Err(ReportError::InvalidConfig {
                message: format!("room_wings contains a blank wing name: {wing:?}"),
            });
        }
        Ok(())
    }
}
