//! Rendering hints attached to spec nodes.
//!
//! The resolver carries these through to the preview; the rendering layer
//! decides what they look like.

use serde::{Deserialize, Serialize};

/// Default duration of the commit/cancel animation.
pub const DEFAULT_TRANSITION_MS: u32 = 150;

/// Easing curve for commit/cancel animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    EaseIn,
    #[default]
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Map linear progress `t` in `[0, 1]` onto the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t * t,
            Easing::EaseOut => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Animation played when a drag commits or is cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transition {
    pub duration_ms: u32,
    pub easing: Easing,
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_TRANSITION_MS,
            easing: Easing::default(),
        }
    }
}

/// How a resolved node should be shown while dragging.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Presentation {
    /// Render the dragged element detached from layout, following the
    /// pointer, over a backdrop of the previewed state.
    pub floating: bool,
    /// Show the other candidates as lower-opacity ghosts.
    pub ghosts: bool,
    /// Commit/cancel animation. `None` snaps instantly.
    pub transition: Option<Transition>,
}
