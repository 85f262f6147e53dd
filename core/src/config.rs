//! Zone routing configuration
//!
//! The only tunable is the zone radius: the hop count up to which
//! destinations are routed proactively. It may come from code, from the
//! routing helper's attribute interface, or from a JSON document. Every
//! `u32` is a usable radius.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Radius used when nothing else is configured
pub const DEFAULT_ZONE_RADIUS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    /// Hop count separating intra-zone from inter-zone destinations
    pub zone_radius: u32,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            zone_radius: DEFAULT_ZONE_RADIUS,
        }
    }
}

impl ZoneConfig {
    pub fn with_radius(zone_radius: u32) -> Self {
        Self { zone_radius }
    }

    /// Parse e.g. `{"zone_radius": 3}`. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
