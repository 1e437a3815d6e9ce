// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor configuration.
//!
//! Settings are stored as RON. Missing fields fall back to their defaults so
//! a config file only needs to name what it changes.

use crate::playback::MAX_SESSION_DURATION;
use reelforge_timeline::OverlapPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// A value is outside its valid range
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// Why it was rejected
        reason: &'static str,
    },
}

/// Editing-session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Length of the editing session in seconds
    pub total_duration: f32,
    /// Clip length used when an asset has no natural duration
    pub default_clip_duration: f32,
    /// Overlap handling for clips on the same track
    pub overlap_policy: OverlapPolicy,
    /// Create the video/image/3D/audio starter tracks
    pub starter_tracks: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            total_duration: 60.0,
            default_clip_duration: 5.0,
            overlap_policy: OverlapPolicy::Permit,
            starter_tracks: true,
        }
    }
}

impl EditorConfig {
    /// Parse from RON and validate
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a RON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_ron(&source)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.total_duration.is_finite() && self.total_duration > 0.0) {
            return Err(ConfigError::Invalid {
                field: "total_duration",
                reason: "must be a positive number of seconds",
            });
        }
        if self.total_duration > MAX_SESSION_DURATION {
            return Err(ConfigError::Invalid {
                field: "total_duration",
                reason: "must not exceed 24 hours",
            });
        }
        if !(self.default_clip_duration.is_finite() && self.default_clip_duration > 0.0) {
            return Err(ConfigError::Invalid {
                field: "default_clip_duration",
                reason: "must be a positive number of seconds",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.total_duration, 60.0);
        assert_eq!(config.overlap_policy, OverlapPolicy::Permit);
        assert!(config.starter_tracks);
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let source = "(total_duration: 120.0, overlap_policy: Reject)";
        let config = EditorConfig::from_ron(source).unwrap();
        assert_eq!(config.total_duration, 120.0);
        assert_eq!(config.overlap_policy, OverlapPolicy::Reject);
        assert_eq!(config.default_clip_duration, 5.0);
    }

    #[test]
    fn test_invalid_duration_rejected() {
        let err = EditorConfig::from_ron("(total_duration: 0.0)").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "total_duration", .. }));

        let err = EditorConfig::from_ron("(total_duration: 2000000.0)").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "total_duration", .. }));
        assert!(EditorConfig::from_ron("(total_duration: 86400.0)").is_ok());
    }
}
