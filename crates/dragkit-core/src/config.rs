//! Resolver configuration.

use crate::error::ConfigError;
use crate::spec::{Presentation, Transition};
use serde::{Deserialize, Serialize};

/// Distance a new candidate must win by before a chaining node switches.
pub const DEFAULT_HYSTERESIS: f64 = 12.0;
/// Opacity the rendering layer should use for ghost previews.
pub const DEFAULT_GHOST_OPACITY: f64 = 0.35;

/// Tunables shared by every drag a [`Resolver`](crate::resolve::Resolver) runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Snap radius for nearest-of nodes that do not set their own.
    /// `None` means any distance commits.
    pub snap_radius: Option<f64>,
    /// Hysteresis margin used by chaining nearest-of nodes.
    pub hysteresis: f64,
    /// Opacity hint for ghost previews.
    pub ghost_opacity: f64,
    /// Presentation used where no spec node sets one.
    pub presentation: Presentation,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            snap_radius: None,
            hysteresis: DEFAULT_HYSTERESIS,
            ghost_opacity: DEFAULT_GHOST_OPACITY,
            presentation: Presentation {
                transition: Some(Transition::default()),
                ..Presentation::default()
            },
        }
    }
}

impl DragConfig {
    /// Parse and validate a config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check that radii and margins are non-negative and finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(radius) = self.snap_radius {
            if !(radius >= 0.0 && radius.is_finite()) {
                return Err(ConfigError::Invalid { field: "snap_radius", value: radius });
            }
        }
        if !(self.hysteresis >= 0.0 && self.hysteresis.is_finite()) {
            return Err(ConfigError::Invalid { field: "hysteresis", value: self.hysteresis });
        }
        if !(0.0..=1.0).contains(&self.ghost_opacity) {
            return Err(ConfigError::Invalid { field: "ghost_opacity", value: self.ghost_opacity });
        }
        Ok(())
    }

    pub fn with_snap_radius(mut self, radius: f64) -> Self {
        self.snap_radius = Some(radius);
        self
    }

    pub fn with_hysteresis(mut self, margin: f64) -> Self {
        self.hysteresis = margin;
        self
    }
}
