//! # Core Module
//!
//! wgpu context management, the scene renderer, and frame timing.

mod clock;
mod context;
mod renderer;

pub use clock::Clock;
pub use context::{Context, ContextError};
pub use renderer::{ModelFilter, RenderInfo, Renderer};

/// Render configuration options.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Enable alpha compositing of the surface.
    pub alpha: bool,
    /// Power preference for GPU selection.
    pub power_preference: wgpu::PowerPreference,
    /// Present mode (vsync).
    pub present_mode: wgpu::PresentMode,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            alpha: false,
            power_preference: wgpu::PowerPreference::HighPerformance,
            present_mode: wgpu::PresentMode::AutoVsync,
        }
    }
}
