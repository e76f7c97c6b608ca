//! Perspective camera with a cached projection matrix.

use crate::math::{consts, Matrix4, Vector3};

/// A perspective camera defined by an eye position, a look-at target, and an
/// up hint.
///
/// The projection matrix is cached and recomputed whenever one of its inputs
/// changes through the setters. The view matrix is derived from `position`,
/// `target`, and `up` on every call to [`view_matrix`](Self::view_matrix),
/// since those fields are public and freely animated each frame.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vector3,
    /// Point the camera looks at.
    pub target: Vector3,
    /// Up hint for the view basis.
    pub up: Vector3,
    /// Vertical field of view in radians.
    fov: f32,
    /// Aspect ratio (width / height).
    aspect: f32,
    /// Near clipping plane distance.
    near: f32,
    /// Far clipping plane distance.
    far: f32,
    /// Cached projection matrix.
    projection_matrix: Matrix4,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(consts::PI / 2.0, 1.0, 0.1, 100.0)
    }
}

impl Camera {
    /// Create a new camera. `fov` is the vertical field of view in radians.
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 5.0),
            target: Vector3::ZERO,
            up: Vector3::UP,
            fov,
            aspect,
            near,
            far,
            projection_matrix: Matrix4::perspective(fov, aspect, near, far),
        }
    }

    /// Vertical field of view in radians.
    #[inline]
    pub fn fov(&self) -> f32 {
        self.fov
    }

    /// Aspect ratio (width / height).
    #[inline]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Near clipping plane distance.
    #[inline]
    pub fn near(&self) -> f32 {
        self.near
    }

    /// Far clipping plane distance.
    #[inline]
    pub fn far(&self) -> f32 {
        self.far
    }

    /// Set the vertical field of view in radians and rebuild the projection.
    pub fn set_fov(&mut self, fov: f32) {
        self.fov = fov;
        self.update_projection();
    }

    /// Set the aspect ratio and rebuild the projection. Call on resize.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection();
    }

    /// Set the near plane distance and rebuild the projection.
    pub fn set_near(&mut self, near: f32) {
        self.near = near;
        self.update_projection();
    }

    /// Set the far plane distance and rebuild the projection.
    pub fn set_far(&mut self, far: f32) {
        self.far = far;
        self.update_projection();
    }

    /// Point the camera at a target.
    #[inline]
    pub fn look_at(&mut self, target: Vector3) {
        self.target = target;
    }

    /// Compute the view matrix from the current position, target, and up.
    pub fn view_matrix(&self) -> Matrix4 {
        Matrix4::look_at(&self.position, &self.target, &self.up)
    }

    /// The cached projection matrix.
    #[inline]
    pub fn projection_matrix(&self) -> &Matrix4 {
        &self.projection_matrix
    }

    /// Combined projection x view matrix.
    pub fn view_projection_matrix(&self) -> Matrix4 {
        self.projection_matrix.multiplied(&self.view_matrix())
    }

    /// Normalized direction from the eye to the target.
    pub fn forward(&self) -> Vector3 {
        (self.target - self.position).normalized()
    }

    /// Normalized right direction of the view basis.
    pub fn right(&self) -> Vector3 {
        self.forward().cross(&self.up).normalized()
    }

    /// Orbit around the target by spherical angle deltas, in radians.
    pub fn orbit(&mut self, delta_theta: f32, delta_phi: f32) {
        let offset = self.position - self.target;
        let radius = offset.length();
        if radius < consts::EPSILON {
            return;
        }

        let mut theta = offset.z.atan2(offset.x);
        let mut phi = (offset.y / radius).acos();

        theta += delta_theta;
        phi = (phi + delta_phi).clamp(0.01, consts::PI - 0.01);

        self.position = self.target
            + Vector3::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.cos(),
                radius * phi.sin() * theta.sin(),
            );
    }

    /// Move along the view direction. Positive distances move toward the
    /// target.
    pub fn dolly(&mut self, distance: f32) {
        let direction = self.forward();
        self.position = self.position + direction * distance;
    }

    fn update_projection(&mut self) {
        self.projection_matrix = Matrix4::perspective(self.fov, self.aspect, self.near, self.far);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::deg_to_rad;

    #[test]
    fn test_default_projection_matches_parameters() {
        let camera = Camera::default();
        let expected = Matrix4::perspective(consts::PI / 2.0, 1.0, 0.1, 100.0);
        assert!(camera.projection_matrix().approx_eq(&expected, 1e-6));
    }

    #[test]
    fn test_setters_rebuild_projection() {
        let mut camera = Camera::default();
        let fov = deg_to_rad(70.0);
        let aspect = 16.0 / 9.0;
        camera.set_fov(fov);
        camera.set_aspect(aspect);

        let f = 1.0 / (fov * 0.5).tan();
        assert!((camera.projection_matrix().elements[0] - f / aspect).abs() < 1e-5);
        assert!((camera.projection_matrix().elements[5] - f).abs() < 1e-5);
    }

    #[test]
    fn test_view_matrix_tracks_public_fields() {
        let mut camera = Camera::default();
        camera.position = Vector3::new(3.0, 4.0, 5.0);
        camera.target = Vector3::new(1.0, 0.0, -2.0);
        let expected = Matrix4::look_at(&camera.position, &camera.target, &camera.up);
        assert_eq!(camera.view_matrix().elements, expected.elements);
    }

    #[test]
    fn test_view_matrix_is_deterministic() {
        let camera = Camera::default();
        assert_eq!(
            camera.view_matrix().elements,
            camera.view_matrix().elements
        );
    }

    #[test]
    fn test_orbit_preserves_radius() {
        let mut camera = Camera::default();
        camera.position = Vector3::new(0.0, 0.0, 10.0);
        let radius = camera.position.distance_to(&camera.target);
        camera.orbit(0.5, 0.25);
        let after = camera.position.distance_to(&camera.target);
        assert!((radius - after).abs() < 1e-4);
    }

    #[test]
    fn test_dolly_moves_toward_target() {
        let mut camera = Camera::default();
        camera.position = Vector3::new(0.0, 0.0, 10.0);
        camera.dolly(3.0);
        assert!(camera.position.approx_eq(&Vector3::new(0.0, 0.0, 7.0), 1e-5));
    }
}
