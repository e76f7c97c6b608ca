//! Texture module for 2D textures and cubemaps.

mod cube_texture;
mod texture2d;

pub use cube_texture::CubeTexture;
pub use texture2d::Texture2D;

/// Errors raised while decoding or assembling texture data.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    /// Image bytes could not be decoded.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// A cubemap face was not square.
    #[error("cubemap face {index} is not square: {width}x{height}")]
    FaceNotSquare {
        /// Face index (0-5).
        index: usize,
        /// Face width in pixels.
        width: u32,
        /// Face height in pixels.
        height: u32,
    },

    /// Cubemap faces had mismatched sizes.
    #[error("cubemap face {index} size {size} does not match face 0 size {expected}")]
    FaceSizeMismatch {
        /// Face index (0-5).
        index: usize,
        /// Size of the mismatched face.
        size: u32,
        /// Size of face 0.
        expected: u32,
    },

    /// Raw face data did not match the declared dimensions.
    #[error("cubemap face {index} has {actual} bytes, expected {expected}")]
    FaceDataSize {
        /// Face index (0-5).
        index: usize,
        /// Actual byte length.
        actual: usize,
        /// Expected byte length (size * size * 4).
        expected: usize,
    },
}
