//! Site configuration
//!
//! Injected by the page shell as JSON. Every field is optional; missing
//! fields take the defaults below.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Framework settings for one page load
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    /// Use the history API and hijack links instead of full page loads
    pub soft_navigation: bool,
    /// Anchor attribute that opts a link out of hijacking
    pub opt_out_attribute: String,
    /// Value of `opt_out_attribute` that opts out
    pub opt_out_value: String,
    /// Id of the element showing frame statistics
    pub stats_element_id: String,
    /// `KeyboardEvent.key` that reveals the statistics element
    pub stats_reveal_key: String,
    /// Frames per statistics window
    pub stats_window: usize,
    /// Average frame time above which the statistics are emphasised
    pub slow_frame_ms: f64,
    /// Frame spacing used when the host has no animation-frame primitive
    pub fallback_frame_ms: f64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            soft_navigation: true,
            opt_out_attribute: "data-hj".to_string(),
            opt_out_value: "no".to_string(),
            stats_element_id: "fps".to_string(),
            stats_reveal_key: " ".to_string(),
            stats_window: 60,
            slow_frame_ms: 20.0,
            fallback_frame_ms: 16.0,
        }
    }
}

impl SiteConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SiteConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the scheduler cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stats_window == 0 {
            return Err(ConfigError::Invalid {
                field: "statsWindow",
                reason: "must be at least 1",
            });
        }
        if !(self.fallback_frame_ms > 0.0) {
            return Err(ConfigError::Invalid {
                field: "fallbackFrameMs",
                reason: "must be positive",
            });
        }
        if !(self.slow_frame_ms > 0.0) {
            return Err(ConfigError::Invalid {
                field: "slowFrameMs",
                reason: "must be positive",
            });
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Not valid JSON for a `SiteConfig`
    Parse(String),
    /// A field holds an unusable value
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "Invalid config JSON: {}", msg),
            ConfigError::Invalid { field, reason } => {
                write!(f, "Invalid config field {}: {}", field, reason)
            }
        }
    }
}
