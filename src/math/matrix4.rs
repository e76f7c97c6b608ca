//! 4x4 Matrix implementation.

use super::{consts, Matrix3, Vector3};
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// A 4x4 matrix stored in column-major order, matching the GPU-side layout.
///
/// Transform builders (`translate`, `scale`, `rotate_*`) mutate in place and
/// return `&mut Self` so transforms compose by chaining:
///
/// ```
/// use orrery::math::Matrix4;
/// let mut m = Matrix4::IDENTITY;
/// m.translate(1.0, 0.0, 0.0).rotate_y(0.5).scale_uniform(2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Matrix4 {
    /// Matrix elements in column-major order.
    pub elements: [f32; 16],
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix4 {
    /// Identity matrix.
    pub const IDENTITY: Self = Self {
        elements: [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    /// Zero matrix.
    pub const ZERO: Self = Self { elements: [0.0; 16] };

    /// Create a new Matrix4 from elements in row-major order.
    #[allow(clippy::too_many_arguments)]
    #[inline]
    pub const fn new(
        m00: f32, m01: f32, m02: f32, m03: f32,
        m10: f32, m11: f32, m12: f32, m13: f32,
        m20: f32, m21: f32, m22: f32, m23: f32,
        m30: f32, m31: f32, m32: f32, m33: f32,
    ) -> Self {
        Self {
            elements: [
                m00, m10, m20, m30,
                m01, m11, m21, m31,
                m02, m12, m22, m32,
                m03, m13, m23, m33,
            ],
        }
    }

    /// Create from a column-major array.
    #[inline]
    pub const fn from_cols_array(elements: [f32; 16]) -> Self {
        Self { elements }
    }

    /// Create from a row-major array.
    pub const fn from_rows_array(m: [f32; 16]) -> Self {
        Self::new(
            m[0], m[1], m[2], m[3],
            m[4], m[5], m[6], m[7],
            m[8], m[9], m[10], m[11],
            m[12], m[13], m[14], m[15],
        )
    }

    /// Set to the identity matrix.
    #[inline]
    pub fn set_identity(&mut self) -> &mut Self {
        self.elements = Self::IDENTITY.elements;
        self
    }

    /// Translation matrix.
    pub fn from_translation(v: &Vector3) -> Self {
        let mut m = Self::IDENTITY;
        m.elements[12] = v.x;
        m.elements[13] = v.y;
        m.elements[14] = v.z;
        m
    }

    /// Non-uniform scale matrix.
    pub fn from_scale(v: &Vector3) -> Self {
        let mut m = Self::IDENTITY;
        m.elements[0] = v.x;
        m.elements[5] = v.y;
        m.elements[10] = v.z;
        m
    }

    /// Rotation around the X axis, angle in radians.
    pub fn from_rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, c, -s, 0.0,
            0.0, s, c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rotation around the Y axis, angle in radians.
    pub fn from_rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(
            c, 0.0, s, 0.0,
            0.0, 1.0, 0.0, 0.0,
            -s, 0.0, c, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rotation around the Z axis, angle in radians.
    pub fn from_rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(
            c, -s, 0.0, 0.0,
            s, c, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Right-handed view matrix looking from `eye` toward `center`.
    ///
    /// When `up` is parallel to the view direction (or zero) an alternate
    /// axis is substituted so the basis stays orthonormal.
    pub fn look_at(eye: &Vector3, center: &Vector3, up: &Vector3) -> Self {
        let n = (*eye - *center).normalized();

        let mut u = up.cross(&n);
        if u.length_squared() < consts::EPSILON {
            // Degenerate up vector. Pick whichever world axis is least
            // aligned with the view direction.
            let alt = if n.x.abs() < 0.9 {
                Vector3::UNIT_X
            } else {
                Vector3::UNIT_Z
            };
            u = alt.cross(&n);
        }
        u.normalize();
        let v = n.cross(&u);

        Self::new(
            u.x, u.y, u.z, -u.dot(eye),
            v.x, v.y, v.z, -v.dot(eye),
            n.x, n.y, n.z, -n.dot(eye),
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Right-handed perspective projection mapping the view frustum to
    /// OpenGL clip space (z in [-1, 1] before the perspective divide).
    ///
    /// `fov` is the vertical field of view in radians.
    pub fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        debug_assert!(near > 0.0 && far > near, "perspective(): requires 0 < near < far");

        let f = 1.0 / (fov * 0.5).tan();
        let mut m = Self::ZERO;
        m.elements[0] = f / aspect;
        m.elements[5] = f;
        m.elements[10] = (far + near) / (near - far);
        m.elements[11] = -1.0;
        m.elements[14] = (2.0 * far * near) / (near - far);
        m
    }

    /// Multiply in place: self = self x other.
    pub fn multiply(&mut self, other: &Matrix4) -> &mut Self {
        *self = self.multiplied(other);
        self
    }

    /// Return self x other as a new matrix.
    pub fn multiplied(&self, other: &Matrix4) -> Self {
        let a = &self.elements;
        let b = &other.elements;
        let mut out = [0.0; 16];
        for col in 0..4 {
            let b0 = b[col * 4];
            let b1 = b[col * 4 + 1];
            let b2 = b[col * 4 + 2];
            let b3 = b[col * 4 + 3];
            out[col * 4] = a[0] * b0 + a[4] * b1 + a[8] * b2 + a[12] * b3;
            out[col * 4 + 1] = a[1] * b0 + a[5] * b1 + a[9] * b2 + a[13] * b3;
            out[col * 4 + 2] = a[2] * b0 + a[6] * b1 + a[10] * b2 + a[14] * b3;
            out[col * 4 + 3] = a[3] * b0 + a[7] * b1 + a[11] * b2 + a[15] * b3;
        }
        Self { elements: out }
    }

    /// Multiply every element by a scalar in place.
    pub fn multiply_scalar(&mut self, s: f32) -> &mut Self {
        for e in &mut self.elements {
            *e *= s;
        }
        self
    }

    /// Apply a translation: self = self x T(x, y, z).
    pub fn translate(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.multiply(&Self::from_translation(&Vector3::new(x, y, z)))
    }

    /// Apply a non-uniform scale: self = self x S(x, y, z).
    pub fn scale(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.multiply(&Self::from_scale(&Vector3::new(x, y, z)))
    }

    /// Apply a uniform scale.
    pub fn scale_uniform(&mut self, s: f32) -> &mut Self {
        self.scale(s, s, s)
    }

    /// Apply a rotation around the X axis, angle in radians.
    pub fn rotate_x(&mut self, angle: f32) -> &mut Self {
        self.multiply(&Self::from_rotation_x(angle))
    }

    /// Apply a rotation around the Y axis, angle in radians.
    pub fn rotate_y(&mut self, angle: f32) -> &mut Self {
        self.multiply(&Self::from_rotation_y(angle))
    }

    /// Apply a rotation around the Z axis, angle in radians.
    pub fn rotate_z(&mut self, angle: f32) -> &mut Self {
        self.multiply(&Self::from_rotation_z(angle))
    }

    /// Apply an Euler rotation in X-then-Y-then-Z order:
    /// self = self x Rx x Ry x Rz.
    pub fn rotate(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.rotate_x(x).rotate_y(y).rotate_z(z)
    }

    /// Transform a point (w = 1), dropping the resulting w component.
    pub fn transform_point(&self, p: &Vector3) -> Vector3 {
        let e = &self.elements;
        Vector3 {
            x: e[0] * p.x + e[4] * p.y + e[8] * p.z + e[12],
            y: e[1] * p.x + e[5] * p.y + e[9] * p.z + e[13],
            z: e[2] * p.x + e[6] * p.y + e[10] * p.z + e[14],
        }
    }

    /// Transform a direction (w = 0). Translation does not apply.
    pub fn transform_vector(&self, v: &Vector3) -> Vector3 {
        let e = &self.elements;
        Vector3 {
            x: e[0] * v.x + e[4] * v.y + e[8] * v.z,
            y: e[1] * v.x + e[5] * v.y + e[9] * v.z,
            z: e[2] * v.x + e[6] * v.y + e[10] * v.z,
        }
    }

    /// Transform a point (w = 1) and perform the perspective divide.
    /// Used to project a view-space point into normalized device coordinates.
    pub fn project_point(&self, p: &Vector3) -> Vector3 {
        let e = &self.elements;
        let x = e[0] * p.x + e[4] * p.y + e[8] * p.z + e[12];
        let y = e[1] * p.x + e[5] * p.y + e[9] * p.z + e[13];
        let z = e[2] * p.x + e[6] * p.y + e[10] * p.z + e[14];
        let w = e[3] * p.x + e[7] * p.y + e[11] * p.z + e[15];
        if w.abs() > consts::EPSILON {
            let inv_w = 1.0 / w;
            Vector3::new(x * inv_w, y * inv_w, z * inv_w)
        } else {
            Vector3::new(x, y, z)
        }
    }

    /// Transpose this matrix in place.
    pub fn transpose(&mut self) -> &mut Self {
        let e = &mut self.elements;
        e.swap(1, 4);
        e.swap(2, 8);
        e.swap(3, 12);
        e.swap(6, 9);
        e.swap(7, 13);
        e.swap(11, 14);
        self
    }

    /// Return the transpose of this matrix.
    pub fn transposed(&self) -> Self {
        let mut m = *self;
        m.transpose();
        m
    }

    /// Extract the translation column.
    #[inline]
    pub fn translation(&self) -> Vector3 {
        Vector3::new(self.elements[12], self.elements[13], self.elements[14])
    }

    /// Return a copy with the translation column zeroed.
    /// Used to keep a skybox centered on the camera.
    pub fn without_translation(&self) -> Self {
        let mut m = *self;
        m.elements[12] = 0.0;
        m.elements[13] = 0.0;
        m.elements[14] = 0.0;
        m
    }

    /// Derive the normal matrix: the inverse transpose of the upper-left
    /// 3x3 block. Returns `None` when that block is singular.
    pub fn normal_matrix(&self) -> Option<Matrix3> {
        Matrix3::from_matrix4(self).inverse().map(|inv| inv.transposed())
    }

    /// Check if approximately equal to another matrix.
    pub fn approx_eq(&self, other: &Matrix4, epsilon: f32) -> bool {
        self.elements
            .iter()
            .zip(other.elements.iter())
            .all(|(a, b)| (a - b).abs() < epsilon)
    }

    /// Convert to a column-major 2D array, the shape uniform buffers expect.
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        let e = &self.elements;
        [
            [e[0], e[1], e[2], e[3]],
            [e[4], e[5], e[6], e[7]],
            [e[8], e[9], e[10], e[11]],
            [e[12], e[13], e[14], e[15]],
        ]
    }
}

impl std::ops::Mul for Matrix4 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        self.multiplied(&rhs)
    }
}

impl From<glam::Mat4> for Matrix4 {
    fn from(m: glam::Mat4) -> Self {
        Self {
            elements: m.to_cols_array(),
        }
    }
}

impl From<Matrix4> for glam::Mat4 {
    fn from(m: Matrix4) -> Self {
        glam::Mat4::from_cols_array(&m.elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::consts::PI;

    #[test]
    fn test_identity_multiplication() {
        let mut m = Matrix4::IDENTITY;
        m.translate(1.0, 2.0, 3.0).rotate_y(0.7).scale_uniform(2.0);
        assert!(Matrix4::IDENTITY.multiplied(&m).approx_eq(&m, 1e-6));
        assert!(m.multiplied(&Matrix4::IDENTITY).approx_eq(&m, 1e-6));
    }

    #[test]
    fn test_translate_then_transform_point() {
        let m = Matrix4::from_translation(&Vector3::new(1.0, -2.0, 3.0));
        let p = m.transform_point(&Vector3::new(10.0, 10.0, 10.0));
        assert!(p.approx_eq(&Vector3::new(11.0, 8.0, 13.0), 1e-6));
    }

    #[test]
    fn test_transform_vector_ignores_translation() {
        let mut m = Matrix4::IDENTITY;
        m.translate(5.0, 5.0, 5.0).scale(2.0, 3.0, 4.0);
        let v = m.transform_vector(&Vector3::new(1.0, 1.0, 1.0));
        assert!(v.approx_eq(&Vector3::new(2.0, 3.0, 4.0), 1e-6));
    }

    #[test]
    fn test_rotate_y_quarter_turn() {
        let m = Matrix4::from_rotation_y(PI / 2.0);
        // +Z rotates to +X under a quarter turn about Y.
        let v = m.transform_vector(&Vector3::UNIT_Z);
        assert!(v.approx_eq(&Vector3::UNIT_X, 1e-6));
    }

    #[test]
    fn test_rotate_applies_x_then_y_then_z() {
        let mut chained = Matrix4::IDENTITY;
        chained.rotate_x(0.3).rotate_y(-0.8).rotate_z(1.1);
        let mut combined = Matrix4::IDENTITY;
        combined.rotate(0.3, -0.8, 1.1);
        assert!(combined.approx_eq(&chained, 1e-6));
    }

    #[test]
    fn test_look_at_maps_eye_to_origin() {
        let eye = Vector3::new(3.0, 4.0, 5.0);
        let view = Matrix4::look_at(&eye, &Vector3::ZERO, &Vector3::UP);
        let p = view.transform_point(&eye);
        assert!(p.approx_eq(&Vector3::ZERO, 1e-5));
    }

    #[test]
    fn test_look_at_center_lands_on_negative_z() {
        let eye = Vector3::new(0.0, 0.0, 5.0);
        let center = Vector3::new(0.0, 0.0, -1.0);
        let view = Matrix4::look_at(&eye, &center, &Vector3::UP);
        let p = view.transform_point(&center);
        assert!(p.x.abs() < 1e-5 && p.y.abs() < 1e-5);
        assert!(p.z < 0.0);
    }

    #[test]
    fn test_look_at_degenerate_up_stays_finite() {
        // Up parallel to the view direction.
        let eye = Vector3::new(0.0, 5.0, 0.0);
        let view = Matrix4::look_at(&eye, &Vector3::ZERO, &Vector3::UP);
        assert!(view.elements.iter().all(|e| e.is_finite()));
        // Eye still maps to the origin.
        assert!(view.transform_point(&eye).approx_eq(&Vector3::ZERO, 1e-5));
    }

    #[test]
    fn test_perspective_maps_near_and_far_planes() {
        let near = 0.1;
        let far = 100.0;
        let proj = Matrix4::perspective(PI / 2.0, 1.0, near, far);
        // Points on the near/far planes sit at -near/-far in view space.
        let on_near = proj.project_point(&Vector3::new(0.0, 0.0, -near));
        let on_far = proj.project_point(&Vector3::new(0.0, 0.0, -far));
        assert!((on_near.z - (-1.0)).abs() < 1e-4);
        assert!((on_far.z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_perspective_focal_length() {
        let fov = 70.0 * crate::math::consts::DEG2RAD;
        let aspect = 16.0 / 9.0;
        let proj = Matrix4::perspective(fov, aspect, 0.1, 100.0);
        let f = 1.0 / (fov * 0.5).tan();
        assert!((proj.elements[0] - f / aspect).abs() < 1e-5);
        assert!((proj.elements[5] - f).abs() < 1e-5);
        assert!((proj.elements[11] - (-1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_normal_matrix_of_uniform_scale() {
        let m = Matrix4::from_scale(&Vector3::splat(2.0));
        let n = m.normal_matrix().expect("uniform scale is invertible");
        // Inverse transpose of 2*I is 0.5*I.
        let mut expected = Matrix3::IDENTITY;
        expected.multiply_scalar(0.5);
        assert!(n.approx_eq(&expected, 1e-6));
    }

    #[test]
    fn test_normal_matrix_singular_returns_none() {
        let m = Matrix4::from_scale(&Vector3::new(1.0, 0.0, 1.0));
        assert!(m.normal_matrix().is_none());
    }

    #[test]
    fn test_without_translation_keeps_rotation() {
        let mut m = Matrix4::IDENTITY;
        m.translate(7.0, 8.0, 9.0).rotate_y(0.4);
        let stripped = m.without_translation();
        assert!(stripped.translation().approx_eq(&Vector3::ZERO, 1e-6));
        let v = Vector3::new(1.0, 2.0, 3.0);
        assert!(stripped
            .transform_vector(&v)
            .approx_eq(&m.transform_vector(&v), 1e-6));
    }

    #[test]
    fn test_look_at_matches_glam() {
        let eye = Vector3::new(3.0, 4.0, 5.0);
        let center = Vector3::new(-1.0, 0.5, 2.0);
        let view = Matrix4::look_at(&eye, &center, &Vector3::UP);
        let oracle: Matrix4 = glam::Mat4::look_at_rh(
            glam::Vec3::new(3.0, 4.0, 5.0),
            glam::Vec3::new(-1.0, 0.5, 2.0),
            glam::Vec3::Y,
        )
        .into();
        assert!(view.approx_eq(&oracle, 1e-5));
    }

    #[test]
    fn test_perspective_matches_glam() {
        let proj = Matrix4::perspective(PI / 3.0, 16.0 / 9.0, 0.1, 100.0);
        let oracle: Matrix4 =
            glam::Mat4::perspective_rh_gl(PI / 3.0, 16.0 / 9.0, 0.1, 100.0).into();
        assert!(proj.approx_eq(&oracle, 1e-5));
    }

    #[test]
    fn test_row_major_constructor_transposes() {
        let m = Matrix4::new(
            1.0, 2.0, 3.0, 4.0,
            5.0, 6.0, 7.0, 8.0,
            9.0, 10.0, 11.0, 12.0,
            13.0, 14.0, 15.0, 16.0,
        );
        // First stored column is the first row-major column (m00, m10, m20, m30).
        assert_eq!(&m.elements[0..4], &[1.0, 5.0, 9.0, 13.0]);
        assert_eq!(m.translation().to_array(), [4.0, 8.0, 12.0]);
    }
}
