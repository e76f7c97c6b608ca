//! Per-scene fog settings.

use crate::math::Color;
use serde::{Deserialize, Serialize};

/// Distance fog parameters applied to models and the skybox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneSettings {
    /// Fog color blended in as fragments recede.
    pub fog_color: Color,
    /// Distance at which fog starts.
    pub fog_near: f32,
    /// Distance at which fog fully covers the fragment.
    pub fog_far: f32,
    /// Whether fog is applied at all.
    pub fog_enabled: bool,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            fog_color: Color::new(0.05, 0.05, 0.1),
            fog_near: 30.0,
            fog_far: 150.0,
            fog_enabled: true,
        }
    }
}
