//! Triangle mesh built from interleaved vertex data.

use super::{Vertex, VERTEX_STRIDE_FLOATS};
use crate::math::consts::PI;
use wgpu::util::DeviceExt;

/// A non-indexed triangle mesh.
///
/// Vertex data is kept on the CPU until [`upload`](Self::upload) creates the
/// GPU buffer, so meshes can be constructed and inspected without a device.
pub struct Mesh {
    vertices: Vec<Vertex>,
    vertex_buffer: Option<wgpu::Buffer>,
}

impl Mesh {
    /// Create a mesh from a list of vertices. Every three vertices form one
    /// triangle.
    pub fn from_vertices(vertices: Vec<Vertex>) -> Self {
        debug_assert!(
            vertices.len() % 3 == 0,
            "from_vertices(): vertex count must be a multiple of 3"
        );
        Self {
            vertices,
            vertex_buffer: None,
        }
    }

    /// Create a mesh from raw interleaved floats
    /// (3 position, 2 uv, 3 normal per vertex).
    pub fn from_raw(data: &[f32]) -> Self {
        debug_assert!(
            data.len() % VERTEX_STRIDE_FLOATS == 0,
            "from_raw(): data length must be a multiple of {}",
            VERTEX_STRIDE_FLOATS
        );
        let vertices = data
            .chunks_exact(VERTEX_STRIDE_FLOATS)
            .map(|v| Vertex::new([v[0], v[1], v[2]], [v[3], v[4]], [v[5], v[6], v[7]]))
            .collect();
        Self::from_vertices(vertices)
    }

    /// Generate a UV sphere as a flat triangle list.
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);

        let vertex_at = |ix: u32, iy: u32| {
            let u = ix as f32 / width_segments as f32;
            let v = iy as f32 / height_segments as f32;
            let phi = u * 2.0 * PI;
            let theta = v * PI;

            let x = -radius * theta.sin() * phi.cos();
            let y = radius * theta.cos();
            let z = radius * theta.sin() * phi.sin();

            let len = (x * x + y * y + z * z).sqrt();
            let normal = if len > 0.0 {
                [x / len, y / len, z / len]
            } else {
                [0.0, 1.0, 0.0]
            };

            Vertex::new([x, y, z], [u, 1.0 - v], normal)
        };

        let mut vertices = Vec::new();
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = vertex_at(ix + 1, iy);
                let b = vertex_at(ix, iy);
                let c = vertex_at(ix, iy + 1);
                let d = vertex_at(ix + 1, iy + 1);

                // Skip degenerate triangles at the poles.
                if iy != 0 {
                    vertices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    vertices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self::from_vertices(vertices)
    }

    /// Number of vertices in the mesh.
    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// The CPU-side vertex data.
    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Create the GPU vertex buffer. Idempotent after the first call.
    pub fn upload(&mut self, device: &wgpu::Device) {
        if self.vertex_buffer.is_some() {
            return;
        }
        self.vertex_buffer = Some(device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(&self.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        ));
    }

    /// The GPU vertex buffer, if [`upload`](Self::upload) has been called.
    #[inline]
    pub fn vertex_buffer(&self) -> Option<&wgpu::Buffer> {
        self.vertex_buffer.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_unpacks_interleaved_layout() {
        let data = [
            0.0, 0.0, 0.0, 0.5, 0.5, 0.0, 1.0, 0.0,
            1.0, 0.0, 0.0, 1.0, 0.5, 0.0, 1.0, 0.0,
            0.0, 1.0, 0.0, 0.5, 1.0, 0.0, 1.0, 0.0,
        ];
        let mesh = Mesh::from_raw(&data);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.vertices()[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices()[1].uv, [1.0, 0.5]);
        assert_eq!(mesh.vertices()[2].normal, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_sphere_triangle_list() {
        let mesh = Mesh::sphere(1.0, 8, 6);
        assert!(mesh.vertex_count() > 0);
        assert_eq!(mesh.vertex_count() % 3, 0);
        // All positions lie on the sphere surface.
        for v in mesh.vertices() {
            let [x, y, z] = v.position;
            let r = (x * x + y * y + z * z).sqrt();
            assert!((r - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_sphere_normals_are_unit_length() {
        let mesh = Mesh::sphere(3.0, 8, 6);
        for v in mesh.vertices() {
            let [x, y, z] = v.normal;
            let len = (x * x + y * y + z * z).sqrt();
            assert!((len - 1.0).abs() < 1e-4);
        }
    }
}
