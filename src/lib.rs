//! # Orrery - A Small wgpu Scene Renderer
//!
//! Orrery renders animated 3D scenes with a hand-rolled math library, a
//! perspective camera, fog, Phong lighting, a cubemap skybox, and a
//! multi-pass bloom pipeline for emissive objects.
//!
//! ## Example
//!
//! ```ignore
//! use orrery::prelude::*;
//!
//! let ctx = Context::new(window, 1280, 720, &RenderConfig::default()).await?;
//! let mut renderer = Renderer::new(&ctx);
//! let mut bloom = BloomRenderer::new(&ctx, BloomConfig::default());
//!
//! let mut scene = Scene::new(Camera::default());
//! let sun = Model::unlit(Mesh::sphere(2.0, 32, 32));
//! let index = scene.add_model(sun);
//! scene.add_animation(Animation::model(index, |model, dt| {
//!     model.model_matrix.rotate_y(dt * 0.1);
//! }));
//!
//! bloom.frame(&ctx, &mut renderer, &mut scene)?;
//! ```

#![warn(missing_docs)]

pub mod camera;
pub mod core;
pub mod geometry;
pub mod math;
pub mod postprocessing;
pub mod scene;
pub mod texture;

// Re-export commonly used types
pub mod prelude {
    //! Convenient re-exports of commonly used types.

    pub use crate::camera::Camera;
    pub use crate::core::{Context, ContextError, ModelFilter, RenderConfig, RenderInfo, Renderer};
    pub use crate::geometry::{Mesh, Vertex};
    pub use crate::math::{Color, Matrix2, Matrix3, Matrix4, Vector2, Vector3};
    pub use crate::postprocessing::{BloomConfig, BloomRenderer};
    pub use crate::scene::{
        Animation, Light, Model, Scene, SceneSettings, SkyBox, UniformValue,
    };
    pub use crate::texture::{CubeTexture, Texture2D, TextureError};
}

/// Set up panic hooks for readable errors in the browser console.
#[cfg(feature = "web")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Engine version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
