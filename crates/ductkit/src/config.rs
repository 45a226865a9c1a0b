//! Run configuration, read from TOML.
//!
//! ```toml
//! debug = true
//! segments = 48
//! tolerance = 0.2
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CadError;
use crate::geometry::DebugMode;

/// Settings fixed for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Record operation ancestry so flagged operands can be recovered.
    pub debug: bool,
    /// Segment count for round primitives.
    pub segments: u32,
    /// Printing clearance in mm between mating parts.
    pub tolerance: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            segments: 32,
            tolerance: 0.2,
        }
    }
}

impl Config {
    /// Parse from a TOML string; missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, CadError> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CadError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Debug mode for every node built during this run.
    pub fn debug_mode(&self) -> DebugMode {
        if self.debug {
            DebugMode::On
        } else {
            DebugMode::Off
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_keys() {
        let config = Config::from_toml_str("debug = true").unwrap();
        assert!(config.debug);
        assert_eq!(config.segments, 32);
        assert_eq!(config.tolerance, 0.2);
        assert_eq!(config.debug_mode(), DebugMode::On);
    }

    #[test]
    fn test_empty_source_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
        assert_eq!(Config::default().debug_mode(), DebugMode::Off);
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let err = Config::from_toml_str("segments = \"many\"").unwrap_err();
        assert!(matches!(err, CadError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Config::load("/nonexistent/ductkit.toml").unwrap_err();
        assert!(matches!(err, CadError::Io(_)));
    }
}
