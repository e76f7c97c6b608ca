//! Renderable model: mesh, transform, texture, and extra shader inputs.

use crate::geometry::Mesh;
use crate::math::{Matrix4, Vector2, Vector3};
use crate::texture::Texture2D;

/// A value for a model-specific shader input.
///
/// `Computed` variants are re-evaluated every frame with the scene's elapsed
/// time, which covers time-driven effects like surface shimmer.
pub enum UniformValue {
    /// A single float.
    Scalar(f32),
    /// A 2-component vector.
    Vec2(Vector2),
    /// A 3-component vector.
    Vec3(Vector3),
    /// A float recomputed each frame from the elapsed time in seconds.
    Computed(Box<dyn Fn(f32) -> f32>),
}

impl UniformValue {
    /// Resolve to a vec4-shaped slot, padding unused lanes with zero.
    pub fn resolve(&self, elapsed: f32) -> [f32; 4] {
        match self {
            Self::Scalar(v) => [*v, 0.0, 0.0, 0.0],
            Self::Vec2(v) => [v.x, v.y, 0.0, 0.0],
            Self::Vec3(v) => [v.x, v.y, v.z, 0.0],
            Self::Computed(f) => [f(elapsed), 0.0, 0.0, 0.0],
        }
    }
}

impl std::fmt::Debug for UniformValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalar(v) => f.debug_tuple("Scalar").field(v).finish(),
            Self::Vec2(v) => f.debug_tuple("Vec2").field(v).finish(),
            Self::Vec3(v) => f.debug_tuple("Vec3").field(v).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Maximum number of extra uniform slots a model can carry.
pub(crate) const MAX_EXTRA_UNIFORMS: usize = 4;

/// A model pairs a mesh with its transform, an optional texture, and any
/// extra shader inputs.
pub struct Model {
    /// The triangle mesh.
    pub mesh: Mesh,
    /// Optional albedo texture. Untextured models sample a 1x1 white
    /// fallback.
    pub texture: Option<Texture2D>,
    /// Local-to-world transform.
    pub model_matrix: Matrix4,
    /// Whether the model receives lighting. Emissive bodies like a sun
    /// render unlit at full brightness.
    pub lit: bool,
    /// Surface opacity in [0, 1]. Models below 1.0 are alpha-blended after
    /// the opaque pass, with depth writes off.
    pub opacity: f32,
    extra_uniforms: Vec<(String, UniformValue)>,
}

impl Model {
    /// Create a model from a mesh with an identity transform and no texture.
    pub fn new(mesh: Mesh) -> Self {
        Self {
            mesh,
            texture: None,
            model_matrix: Matrix4::IDENTITY,
            lit: true,
            opacity: 1.0,
            extra_uniforms: Vec::new(),
        }
    }

    /// Create an unlit model, rendered at full brightness.
    pub fn unlit(mesh: Mesh) -> Self {
        Self {
            lit: false,
            ..Self::new(mesh)
        }
    }

    /// Attach a texture.
    pub fn with_texture(mut self, texture: Texture2D) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Set the surface opacity, clamped to [0, 1].
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Whether the model needs the alpha-blended pass.
    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }

    /// Set or replace an extra shader input by name.
    ///
    /// At most [`MAX_EXTRA_UNIFORMS`] slots are available; further names are
    /// ignored with a warning.
    pub fn set_extra_uniform(&mut self, name: &str, value: UniformValue) {
        if let Some(slot) = self.extra_uniforms.iter_mut().find(|(n, _)| n == name) {
            slot.1 = value;
            return;
        }
        if self.extra_uniforms.len() >= MAX_EXTRA_UNIFORMS {
            log::warn!(
                "model extra uniform '{}' dropped, all {} slots in use",
                name,
                MAX_EXTRA_UNIFORMS
            );
            return;
        }
        self.extra_uniforms.push((name.to_string(), value));
    }

    /// Extra shader inputs in slot order.
    #[inline]
    pub fn extra_uniforms(&self) -> &[(String, UniformValue)] {
        &self.extra_uniforms
    }

    /// Resolve all extra uniform slots for the current frame.
    pub(crate) fn resolved_extras(&self, elapsed: f32) -> [[f32; 4]; MAX_EXTRA_UNIFORMS] {
        let mut out = [[0.0; 4]; MAX_EXTRA_UNIFORMS];
        for (slot, (_, value)) in out.iter_mut().zip(self.extra_uniforms.iter()) {
            *slot = value.resolve(elapsed);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_mesh() -> Mesh {
        Mesh::sphere(1.0, 4, 3)
    }

    #[test]
    fn test_extra_uniform_replaces_by_name() {
        let mut model = Model::new(quad_mesh());
        model.set_extra_uniform("glow", UniformValue::Scalar(1.0));
        model.set_extra_uniform("glow", UniformValue::Scalar(2.0));
        assert_eq!(model.extra_uniforms().len(), 1);
        assert_eq!(model.resolved_extras(0.0)[0], [2.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_extra_uniform_slots_are_bounded() {
        let mut model = Model::new(quad_mesh());
        for i in 0..6 {
            model.set_extra_uniform(&format!("u{}", i), UniformValue::Scalar(i as f32));
        }
        assert_eq!(model.extra_uniforms().len(), MAX_EXTRA_UNIFORMS);
    }

    #[test]
    fn test_computed_uniform_tracks_elapsed_time() {
        let mut model = Model::new(quad_mesh());
        model.set_extra_uniform("pulse", UniformValue::Computed(Box::new(|t| t * 2.0)));
        assert_eq!(model.resolved_extras(1.5)[0][0], 3.0);
    }

    #[test]
    fn test_models_default_opaque() {
        let model = Model::new(quad_mesh());
        assert_eq!(model.opacity, 1.0);
        assert!(!model.is_transparent());
    }

    #[test]
    fn test_with_opacity_marks_transparent_and_clamps() {
        let model = Model::new(quad_mesh()).with_opacity(0.4);
        assert!(model.is_transparent());
        assert_eq!(Model::new(quad_mesh()).with_opacity(1.7).opacity, 1.0);
        assert_eq!(Model::new(quad_mesh()).with_opacity(-0.5).opacity, 0.0);
    }
}
