//! Cube texture (cubemap) implementation for the skybox.

use super::TextureError;
use wgpu::util::DeviceExt;

/// A cubemap texture. Faces are stored in the order
/// +X, -X, +Y, -Y, +Z, -Z.
pub struct CubeTexture {
    size: u32,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    format: wgpu::TextureFormat,
}

impl CubeTexture {
    /// Create a cube texture from 6 RGBA8 face images.
    /// Each face must be `size x size` pixels with 4 bytes per pixel.
    pub fn from_faces(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        faces: [&[u8]; 6],
        size: u32,
        label: Option<&str>,
    ) -> Result<Self, TextureError> {
        let format = wgpu::TextureFormat::Rgba8UnormSrgb;
        let expected = (size * size * 4) as usize;

        let mut all_data = Vec::with_capacity(expected * 6);
        for (index, face) in faces.iter().enumerate() {
            if face.len() != expected {
                return Err(TextureError::FaceDataSize {
                    index,
                    actual: face.len(),
                    expected,
                });
            }
            all_data.extend_from_slice(face);
        }

        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label,
                size: wgpu::Extent3d {
                    width: size,
                    height: size,
                    depth_or_array_layers: 6,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &all_data,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Cube Texture View"),
            format: Some(format),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            aspect: wgpu::TextureAspect::All,
            base_mip_level: 0,
            mip_level_count: None,
            base_array_layer: 0,
            array_layer_count: Some(6),
        });

        Ok(Self {
            size,
            texture,
            view,
            format,
        })
    }

    /// Create a cube texture from 6 encoded image files (PNG, JPEG).
    pub fn from_face_bytes(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        faces: [&[u8]; 6],
        label: Option<&str>,
    ) -> Result<Self, TextureError> {
        let mut decoded: [Vec<u8>; 6] = Default::default();
        let mut size = 0u32;

        for (index, face_data) in faces.iter().enumerate() {
            let img = image::load_from_memory(face_data)?;
            let rgba = img.to_rgba8();
            let (w, h) = rgba.dimensions();
            if w != h {
                return Err(TextureError::FaceNotSquare {
                    index,
                    width: w,
                    height: h,
                });
            }
            if index == 0 {
                size = w;
            } else if w != size {
                return Err(TextureError::FaceSizeMismatch {
                    index,
                    size: w,
                    expected: size,
                });
            }
            decoded[index] = rgba.into_raw();
        }

        let face_refs: [&[u8]; 6] = [
            &decoded[0], &decoded[1], &decoded[2], &decoded[3], &decoded[4], &decoded[5],
        ];
        Self::from_faces(device, queue, face_refs, size, label)
    }

    /// Create a vertical-gradient sky cubemap, used when no face images are
    /// supplied.
    pub fn gradient_sky(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        size: u32,
        zenith: [u8; 3],
        horizon: [u8; 3],
    ) -> Result<Self, TextureError> {
        let lerp = |a: u8, b: u8, t: f32| ((a as f32) * (1.0 - t) + (b as f32) * t) as u8;

        let mut faces: [Vec<u8>; 6] = Default::default();
        for (face_idx, face) in faces.iter_mut().enumerate() {
            let mut data = Vec::with_capacity((size * size * 4) as usize);
            for y in 0..size {
                for x in 0..size {
                    let dy = Self::texel_up_component(face_idx, x, y, size);
                    // dy in [-1, 1]; 1 at the zenith.
                    let t = 1.0 - (dy * 0.5 + 0.5);
                    data.extend_from_slice(&[
                        lerp(zenith[0], horizon[0], t),
                        lerp(zenith[1], horizon[1], t),
                        lerp(zenith[2], horizon[2], t),
                        255,
                    ]);
                }
            }
            *face = data;
        }

        let face_refs: [&[u8]; 6] = [
            &faces[0], &faces[1], &faces[2], &faces[3], &faces[4], &faces[5],
        ];
        Self::from_faces(device, queue, face_refs, size, Some("Gradient Sky Cubemap"))
    }

    /// Y component of the normalized sampling direction for a texel.
    fn texel_up_component(face: usize, x: u32, y: u32, size: u32) -> f32 {
        let u = (x as f32 + 0.5) / size as f32 * 2.0 - 1.0;
        let v = (y as f32 + 0.5) / size as f32 * 2.0 - 1.0;

        let (dx, dy, dz) = match face {
            0 => (1.0, -v, -u),
            1 => (-1.0, -v, u),
            2 => (u, 1.0, v),
            3 => (u, -1.0, -v),
            4 => (u, -v, 1.0),
            _ => (-u, -v, -1.0),
        };

        dy / (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Face size in pixels (each face is size x size).
    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// The texture format.
    #[inline]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// The underlying wgpu texture.
    #[inline]
    pub fn wgpu_texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    /// The cube texture view for sampling.
    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}
