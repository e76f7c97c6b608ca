//! Scene graph: models, lights, animations, and the camera.

mod animation;
mod light;
mod model;
mod settings;
mod skybox;

pub use animation::Animation;
pub use light::Light;
pub use model::{Model, UniformValue};
pub use settings::SceneSettings;
pub use skybox::SkyBox;

use crate::camera::Camera;
use crate::math::Color;

/// Container for everything that makes up a composition.
///
/// Models, lights, and animations are owned by the scene and addressed by the
/// index returned from the `add_*` methods. The renderer calls
/// [`update`](Self::update) once per frame to advance all animations.
pub struct Scene {
    models: Vec<Model>,
    lights: Vec<Light>,
    animations: Vec<Animation>,
    /// The scene camera.
    pub camera: Camera,
    /// Clear color for the frame.
    pub background: Color,
    /// Fog and skybox settings.
    pub settings: SceneSettings,
    /// Optional skybox drawn behind all models.
    pub skybox: Option<SkyBox>,
}

impl Scene {
    /// Create an empty scene with the given camera.
    pub fn new(camera: Camera) -> Self {
        Self {
            models: Vec::new(),
            lights: Vec::new(),
            animations: Vec::new(),
            camera,
            background: Color::BLACK,
            settings: SceneSettings::default(),
            skybox: None,
        }
    }

    /// Add a model and return its index.
    pub fn add_model(&mut self, model: Model) -> usize {
        self.models.push(model);
        self.models.len() - 1
    }

    /// Add a light and return its index.
    pub fn add_light(&mut self, light: Light) -> usize {
        self.lights.push(light);
        self.lights.len() - 1
    }

    /// Add an animation.
    pub fn add_animation(&mut self, animation: Animation) {
        self.animations.push(animation);
    }

    /// Remove all animations that drive the camera.
    pub fn remove_camera_animations(&mut self) {
        self.animations
            .retain(|anim| !matches!(anim, Animation::Camera { .. }));
    }

    /// All models in insertion order.
    #[inline]
    pub fn models(&self) -> &[Model] {
        &self.models
    }

    /// Mutable access to the models.
    #[inline]
    pub fn models_mut(&mut self) -> &mut [Model] {
        &mut self.models
    }

    /// All lights in insertion order.
    #[inline]
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Mutable access to the lights.
    #[inline]
    pub fn lights_mut(&mut self) -> &mut [Light] {
        &mut self.lights
    }

    /// Number of registered animations.
    #[inline]
    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    /// Advance all animations by `delta_time` seconds.
    ///
    /// Animations whose target index no longer resolves are skipped.
    pub fn update(&mut self, delta_time: f32) {
        let Self {
            models,
            lights,
            animations,
            camera,
            ..
        } = self;

        for animation in animations.iter_mut() {
            match animation {
                Animation::Model { index, update } => {
                    if let Some(model) = models.get_mut(*index) {
                        update(model, delta_time);
                    }
                }
                Animation::Light { index, update } => {
                    if let Some(light) = lights.get_mut(*index) {
                        update(light, delta_time);
                    }
                }
                Animation::Camera { update } => {
                    update(camera, delta_time);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Mesh;
    use crate::math::Vector3;

    fn triangle_model() -> Model {
        let data = [
            0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0,
            1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0,
            0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0,
        ];
        Model::new(Mesh::from_raw(&data))
    }

    #[test]
    fn test_update_drives_model_animation() {
        let mut scene = Scene::new(Camera::default());
        let index = scene.add_model(triangle_model());
        scene.add_animation(Animation::model(index, |model, dt| {
            model.model_matrix.translate(dt, 0.0, 0.0);
        }));

        scene.update(2.0);
        let translation = scene.models()[0].model_matrix.translation();
        assert!(translation.approx_eq(&Vector3::new(2.0, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn test_update_skips_stale_target_index() {
        let mut scene = Scene::new(Camera::default());
        scene.add_animation(Animation::light(5, |light, _| {
            light.shininess += 1.0;
        }));
        // No lights exist, the animation must be a no-op.
        scene.update(0.016);
        assert_eq!(scene.lights().len(), 0);
    }

    #[test]
    fn test_remove_camera_animations() {
        let mut scene = Scene::new(Camera::default());
        let index = scene.add_model(triangle_model());
        scene.add_animation(Animation::camera(|camera, dt| {
            camera.position.x += dt;
        }));
        scene.add_animation(Animation::model(index, |_, _| {}));

        scene.remove_camera_animations();
        assert_eq!(scene.animation_count(), 1);

        scene.update(1.0);
        assert!((scene.camera.position.x - 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_camera_animation_accumulates() {
        let mut scene = Scene::new(Camera::default());
        let mut elapsed = 0.0f32;
        scene.add_animation(Animation::camera(move |camera, dt| {
            elapsed += dt;
            camera.position.x = elapsed;
        }));

        scene.update(0.5);
        scene.update(0.5);
        assert!((scene.camera.position.x - 1.0).abs() < 1e-6);
    }
}
