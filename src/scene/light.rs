//! Phong light source.

use crate::math::Vector3;
use serde::{Deserialize, Serialize};

/// A point light with Phong shading terms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Light {
    /// Light position in world space.
    pub position: Vector3,
    /// Ambient reflectance.
    pub ambient: Vector3,
    /// Diffuse reflectance.
    pub diffuse: Vector3,
    /// Specular reflectance.
    pub specular: Vector3,
    /// Specular exponent.
    pub shininess: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Vector3::ZERO,
            ambient: Vector3::splat(0.2),
            diffuse: Vector3::splat(0.8),
            specular: Vector3::splat(0.05),
            shininess: 32.0,
        }
    }
}

impl Light {
    /// Create a light at the given position with default shading terms.
    pub fn at(position: Vector3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}
