//! 2x2 Matrix implementation.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// A 2x2 matrix stored in column-major order.
/// Mainly used as the minor matrix when inverting a [`Matrix3`](super::Matrix3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct Matrix2 {
    /// Matrix elements in column-major order: [m00, m10, m01, m11].
    pub elements: [f32; 4],
}

impl Default for Matrix2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix2 {
    /// Identity matrix.
    pub const IDENTITY: Self = Self {
        elements: [1.0, 0.0, 0.0, 1.0],
    };

    /// Zero matrix.
    pub const ZERO: Self = Self { elements: [0.0; 4] };

    /// Create a new Matrix2 from elements in row-major order.
    #[inline]
    pub const fn new(m00: f32, m01: f32, m10: f32, m11: f32) -> Self {
        Self {
            elements: [m00, m10, m01, m11],
        }
    }

    /// Create from a column-major array.
    #[inline]
    pub const fn from_cols_array(elements: [f32; 4]) -> Self {
        Self { elements }
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
    pub fn multiply(&mut self, other: &Matrix2) -> &mut Self {
        *self = self.multiplied(other);
        self
    }

    /// Return self x other as a new matrix.
    pub fn multiplied(&self, other: &Matrix2) -> Self {
        const N: usize = 2;
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
    #[inline]
    pub fn determinant(&self) -> f32 {
        let e = &self.elements;
        e[0] * e[3] - e[1] * e[2]
    }

    /// Check if approximately equal to another matrix.
    pub fn approx_eq(&self, other: &Matrix2, epsilon: f32) -> bool {
        self.elements
            .iter()
            .zip(other.elements.iter())
            .all(|(a, b)| (a - b).abs() < epsilon)
    }
}

impl std::ops::Mul for Matrix2 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        self.multiplied(&rhs)
    }
}

impl From<glam::Mat2> for Matrix2 {
    fn from(m: glam::Mat2) -> Self {
        Self {
            elements: m.to_cols_array(),
        }
    }
}

impl From<Matrix2> for glam::Mat2 {
    fn from(m: Matrix2) -> Self {
        glam::Mat2::from_cols_array(&m.elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_identity() {
        assert!(Matrix2::default().approx_eq(&Matrix2::IDENTITY, 1e-6));
    }

    #[test]
    fn test_row_major_constructor_transposes() {
        let m = Matrix2::new(1.0, 2.0, 3.0, 4.0);
        // Column-major storage: first column is (m00, m10).
        assert_eq!(m.elements, [1.0, 3.0, 2.0, 4.0]);
    }

    #[test]
    fn test_identity_multiplication() {
        let m = Matrix2::new(1.0, 2.0, 3.0, 4.0);
        assert!(Matrix2::IDENTITY.multiplied(&m).approx_eq(&m, 1e-6));
        assert!(m.multiplied(&Matrix2::IDENTITY).approx_eq(&m, 1e-6));
    }

    #[test]
    fn test_determinant() {
        let m = Matrix2::new(1.0, 2.0, 3.0, 4.0);
        assert!((m.determinant() - (1.0 * 4.0 - 2.0 * 3.0)).abs() < 1e-6);
    }

    #[test]
    fn test_multiply_order() {
        // Row-major A = [[1,2],[3,4]], B = [[0,1],[1,0]] (swap columns).
        let a = Matrix2::new(1.0, 2.0, 3.0, 4.0);
        let b = Matrix2::new(0.0, 1.0, 1.0, 0.0);
        let ab = a.multiplied(&b);
        assert!(ab.approx_eq(&Matrix2::new(2.0, 1.0, 4.0, 3.0), 1e-6));
    }
}
