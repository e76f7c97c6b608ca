//! # Post-processing Module
//!
//! Fullscreen-pass plumbing and the bloom pipeline.

mod bloom;
mod pass;

pub use bloom::{BloomConfig, BloomRenderer};
pub use pass::{FullscreenVertex, RenderTarget};
