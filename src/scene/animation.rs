//! Closure-driven animations over scene objects.

use super::{Light, Model};
use crate::camera::Camera;

/// An animation binds an update closure to one scene object.
///
/// Models and lights are addressed by the index returned from
/// [`Scene::add_model`](super::Scene::add_model) and
/// [`Scene::add_light`](super::Scene::add_light). The closure receives the
/// target and the frame delta time in seconds.
pub enum Animation {
    /// Drives the model at `index`.
    Model {
        /// Index into the scene's model list.
        index: usize,
        /// Per-frame update closure.
        update: Box<dyn FnMut(&mut Model, f32)>,
    },
    /// Drives the light at `index`.
    Light {
        /// Index into the scene's light list.
        index: usize,
        /// Per-frame update closure.
        update: Box<dyn FnMut(&mut Light, f32)>,
    },
    /// Drives the scene camera.
    Camera {
        /// Per-frame update closure.
        update: Box<dyn FnMut(&mut Camera, f32)>,
    },
}

impl Animation {
    /// Animate the model at `index`.
    pub fn model(index: usize, update: impl FnMut(&mut Model, f32) + 'static) -> Self {
        Self::Model {
            index,
            update: Box::new(update),
        }
    }

    /// Animate the light at `index`.
    pub fn light(index: usize, update: impl FnMut(&mut Light, f32) + 'static) -> Self {
        Self::Light {
            index,
            update: Box::new(update),
        }
    }

    /// Animate the scene camera.
    pub fn camera(update: impl FnMut(&mut Camera, f32) + 'static) -> Self {
        Self::Camera {
            update: Box::new(update),
        }
    }
}

impl std::fmt::Debug for Animation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Model { index, .. } => f.debug_struct("Animation::Model").field("index", index).finish(),
            Self::Light { index, .. } => f.debug_struct("Animation::Light").field("index", index).finish(),
            Self::Camera { .. } => f.debug_struct("Animation::Camera").finish(),
        }
    }
}
