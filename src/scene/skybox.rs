//! Skybox cube with selectable cubemap textures.

use crate::geometry::PositionVertex;
use crate::texture::CubeTexture;
use wgpu::util::DeviceExt;

/// Cube positions for the skybox, 36 vertices as a flat triangle list.
/// Wound to face inward, since the camera sits inside the cube.
const CUBE_POSITIONS: [[f32; 3]; 36] = [
    [-10.0, 10.0, -10.0], [-10.0, -10.0, -10.0], [10.0, -10.0, -10.0],
    [10.0, -10.0, -10.0], [10.0, 10.0, -10.0], [-10.0, 10.0, -10.0],
    [-10.0, -10.0, 10.0], [-10.0, -10.0, -10.0], [-10.0, 10.0, -10.0],
    [-10.0, 10.0, -10.0], [-10.0, 10.0, 10.0], [-10.0, -10.0, 10.0],
    [10.0, -10.0, -10.0], [10.0, -10.0, 10.0], [10.0, 10.0, 10.0],
    [10.0, 10.0, 10.0], [10.0, 10.0, -10.0], [10.0, -10.0, -10.0],
    [-10.0, -10.0, 10.0], [-10.0, 10.0, 10.0], [10.0, 10.0, 10.0],
    [10.0, 10.0, 10.0], [10.0, -10.0, 10.0], [-10.0, -10.0, 10.0],
    [-10.0, 10.0, -10.0], [10.0, 10.0, -10.0], [10.0, 10.0, 10.0],
    [10.0, 10.0, 10.0], [-10.0, 10.0, 10.0], [-10.0, 10.0, -10.0],
    [-10.0, -10.0, -10.0], [-10.0, -10.0, 10.0], [10.0, -10.0, -10.0],
    [10.0, -10.0, -10.0], [-10.0, -10.0, 10.0], [10.0, -10.0, 10.0],
];

/// A skybox cube with up to three selectable cubemap textures.
pub struct SkyBox {
    textures: Vec<CubeTexture>,
    current: usize,
    vertex_buffer: wgpu::Buffer,
}

impl SkyBox {
    /// Number of vertices in the skybox cube.
    pub const VERTEX_COUNT: u32 = 36;

    /// Create a skybox with the given cubemap textures. The first texture
    /// starts selected.
    pub fn new(device: &wgpu::Device, textures: Vec<CubeTexture>) -> Self {
        debug_assert!(!textures.is_empty(), "SkyBox::new(): needs at least one texture");

        let vertices: Vec<PositionVertex> = CUBE_POSITIONS
            .iter()
            .map(|&p| PositionVertex::new(p))
            .collect();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Skybox Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            textures,
            current: 0,
            vertex_buffer,
        }
    }

    /// Select the active cubemap. Out-of-range indices fall back to the
    /// first texture.
    pub fn set_current_texture(&mut self, index: usize) {
        self.current = if index < self.textures.len() { index } else { 0 };
    }

    /// Index of the active cubemap.
    #[inline]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The active cubemap texture.
    #[inline]
    pub fn current_texture(&self) -> &CubeTexture {
        &self.textures[self.current]
    }

    /// Number of available cubemaps.
    #[inline]
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// The cube vertex buffer.
    #[inline]
    pub fn vertex_buffer(&self) -> &wgpu::Buffer {
        &self.vertex_buffer
    }
}
