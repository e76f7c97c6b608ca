//! 3x3 Matrix implementation.

use super::{consts, Matrix2, Matrix4, Vector3};
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// A 3x3 matrix stored in column-major order.
/// Used for normal-matrix derivation (inverse transpose of a model-view's
/// upper-left 3x3 block).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Matrix3 {
    /// Matrix elements in column-major order:
    /// [m00, m10, m20, m01, m11, m21, m02, m12, m22].
    pub elements: [f32; 9],
}

impl Default for Matrix3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix3 {
    /// Identity matrix.
    pub const IDENTITY: Self = Self {
        elements: [
            1.0, 0.0, 0.0,
            0.0, 1.0, 0.0,
            0.0, 0.0, 1.0,
        ],
    };

    /// Zero matrix.
    pub const ZERO: Self = Self { elements: [0.0; 9] };

    /// Create a new Matrix3 from elements in row-major order.
    #[inline]
    pub const fn new(
        m00: f32, m01: f32, m02: f32,
        m10: f32, m11: f32, m12: f32,
        m20: f32, m21: f32, m22: f32,
    ) -> Self {
        Self {
            elements: [
                m00, m10, m20,
                m01, m11, m21,
                m02, m12, m22,
            ],
        }
    }

    /// Create from a column-major array.
    #[inline]
    pub const fn from_cols_array(elements: [f32; 9]) -> Self {
        Self { elements }
    }

    /// Extract the upper-left 3x3 block of a Matrix4.
    pub fn from_matrix4(m: &Matrix4) -> Self {
        let me = &m.elements;
        Self {
            elements: [
                me[0], me[1], me[2],
                me[4], me[5], me[6],
                me[8], me[9], me[10],
            ],
        }
    }

    /// Set to the identity matrix.
    #[inline]
    pub fn set_identity(&mut self) -> &mut Self {
        self.elements = Self::IDENTITY.elements;
        self
    }

    /// Multiply every element by a scalar in place.
    pub fn multiply_scalar(&mut self, s: f32) -> &mut Self {
        for e in &mut self.elements {
            *e *= s;
        }
        self
    }

    /// Multiply in place: self = self x other.
    pub fn multiply(&mut self, other: &Matrix3) -> &mut Self {
        *self = self.multiplied(other);
        self
    }

    /// Return self x other as a new matrix.
    pub fn multiplied(&self, other: &Matrix3) -> Self {
        const N: usize = 3;
        let mut result = [0.0; N * N];
        for col in 0..N {
            for row in 0..N {
                let mut sum = 0.0;
                for i in 0..N {
                    sum += self.elements[row + i * N] * other.elements[i + col * N];
                }
                result[col * N + row] = sum;
            }
        }
        Self { elements: result }
    }

    /// Calculate the determinant.
    pub fn determinant(&self) -> f32 {
        let e = &self.elements;
        e[0] * (e[4] * e[8] - e[5] * e[7])
            - e[3] * (e[1] * e[8] - e[2] * e[7])
            + e[6] * (e[1] * e[5] - e[2] * e[4])
    }

    /// Transpose this matrix in place.
    pub fn transpose(&mut self) -> &mut Self {
        self.elements.swap(1, 3);
        self.elements.swap(2, 6);
        self.elements.swap(5, 7);
        self
    }

    /// Return the transpose of this matrix.
    pub fn transposed(&self) -> Self {
        let mut m = *self;
        m.transpose();
        m
    }

    /// Return the Matrix2 formed by deleting the given row and column.
    pub fn minor(&self, row: usize, col: usize) -> Matrix2 {
        debug_assert!(row < 3 && col < 3, "minor(): row and col must be < 3");

        const N: usize = 3;
        let mut out = [0.0; 4];
        let mut k = 0;
        for c in 0..N {
            if c == col {
                continue;
            }
            for r in 0..N {
                if r == row {
                    continue;
                }
                out[k] = self.elements[c * N + r];
                k += 1;
            }
        }
        Matrix2::from_cols_array(out)
    }

    /// Return the cofactor matrix (signed minors).
    pub fn cofactor(&self) -> Self {
        const N: usize = 3;
        let mut out = [0.0; N * N];
        for r in 0..N {
            for c in 0..N {
                let sign = if (r + c) % 2 == 0 { 1.0 } else { -1.0 };
                out[c * N + r] = sign * self.minor(r, c).determinant();
            }
        }
        Self { elements: out }
    }

    /// Return the adjugate (transpose of the cofactor matrix).
    pub fn adjugate(&self) -> Self {
        self.cofactor().transposed()
    }

    /// Check whether the matrix can be inverted, i.e. `|det| > epsilon`.
    #[inline]
    pub fn is_invertible(&self, epsilon: f32) -> bool {
        self.determinant().abs() > epsilon
    }

    /// Return the inverse of this matrix, computed as adjugate / determinant.
    /// Returns `None` when the matrix is singular
    /// (`|det| <= ` [`consts::SINGULAR_EPSILON`]).
    pub fn inverse(&self) -> Option<Self> {
        if !self.is_invertible(consts::SINGULAR_EPSILON) {
            return None;
        }
        let mut adjugate = self.adjugate();
        adjugate.multiply_scalar(1.0 / self.determinant());
        Some(adjugate)
    }

    /// Transform a Vector3 by this matrix.
    pub fn transform_vector(&self, v: &Vector3) -> Vector3 {
        let e = &self.elements;
        Vector3 {
            x: e[0] * v.x + e[3] * v.y + e[6] * v.z,
            y: e[1] * v.x + e[4] * v.y + e[7] * v.z,
            z: e[2] * v.x + e[5] * v.y + e[8] * v.z,
        }
    }

    /// Check if approximately equal to another matrix.
    pub fn approx_eq(&self, other: &Matrix3, epsilon: f32) -> bool {
        self.elements
            .iter()
            .zip(other.elements.iter())
            .all(|(a, b)| (a - b).abs() < epsilon)
    }
}

impl std::ops::Mul for Matrix3 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        self.multiplied(&rhs)
    }
}

impl std::ops::Mul<Vector3> for Matrix3 {
    type Output = Vector3;
    fn mul(self, rhs: Vector3) -> Vector3 {
        self.transform_vector(&rhs)
    }
}

impl From<glam::Mat3> for Matrix3 {
    fn from(m: glam::Mat3) -> Self {
        Self {
            elements: m.to_cols_array(),
        }
    }
}

impl From<Matrix3> for glam::Mat3 {
    fn from(m: Matrix3) -> Self {
        glam::Mat3::from_cols_array(&m.elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_multiplication() {
        let m = Matrix3::new(
            2.0, 0.0, 1.0,
            -1.0, 3.0, 0.5,
            0.0, 4.0, 1.0,
        );
        assert!(Matrix3::IDENTITY.multiplied(&m).approx_eq(&m, 1e-6));
        assert!(m.multiplied(&Matrix3::IDENTITY).approx_eq(&m, 1e-6));
    }

    #[test]
    fn test_minor_drops_row_and_col() {
        let m = Matrix3::new(
            1.0, 2.0, 3.0,
            4.0, 5.0, 6.0,
            7.0, 8.0, 9.0,
        );
        // Deleting row 0, col 0 leaves [[5,6],[8,9]].
        let minor = m.minor(0, 0);
        assert!(minor.approx_eq(&Matrix2::new(5.0, 6.0, 8.0, 9.0), 1e-6));
        // Deleting row 1, col 2 leaves [[1,2],[7,8]].
        let minor = m.minor(1, 2);
        assert!(minor.approx_eq(&Matrix2::new(1.0, 2.0, 7.0, 8.0), 1e-6));
    }

    #[test]
    fn test_inverse_times_original_is_identity() {
        let m = Matrix3::new(
            2.0, 0.0, 1.0,
            -1.0, 3.0, 0.5,
            0.0, 4.0, 1.0,
        );
        let inv = m.inverse().expect("matrix should be invertible");
        assert!(m.multiplied(&inv).approx_eq(&Matrix3::IDENTITY, 1e-5));
        assert!(inv.multiplied(&m).approx_eq(&Matrix3::IDENTITY, 1e-5));
    }

    #[test]
    fn test_singular_matrix_has_no_inverse() {
        // Second row is twice the first: determinant is zero.
        let m = Matrix3::new(
            1.0, 2.0, 3.0,
            2.0, 4.0, 6.0,
            0.0, 1.0, 0.0,
        );
        assert!(!m.is_invertible(1e-8));
        assert!(m.inverse().is_none());
    }

    #[test]
    fn test_transpose_round_trip() {
        let m = Matrix3::new(
            1.0, 2.0, 3.0,
            4.0, 5.0, 6.0,
            7.0, 8.0, 9.0,
        );
        assert!(m.transposed().transposed().approx_eq(&m, 1e-6));
        let mut n = m;
        n.transpose();
        assert!(n.approx_eq(&m.transposed(), 1e-6));
    }

    #[test]
    fn test_from_matrix4_takes_upper_left_block() {
        let m4 = Matrix4::from_translation(&Vector3::new(5.0, 6.0, 7.0));
        let m3 = Matrix3::from_matrix4(&m4);
        assert!(m3.approx_eq(&Matrix3::IDENTITY, 1e-6));
    }
}
