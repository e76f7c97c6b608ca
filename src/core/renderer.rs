//! Scene renderer: forward-shaded models, skybox, fog, and two Phong lights.

use super::{Clock, Context};
use crate::math::{Color, Matrix3};
use crate::scene::Scene;
use crate::texture::Texture2D;
use bytemuck::Zeroable;
use wgpu::util::DeviceExt;

/// Render statistics for the current frame.
#[derive(Debug, Clone, Default)]
pub struct RenderInfo {
    /// Number of draw calls.
    pub draw_calls: u32,
    /// Number of triangles rendered.
    pub triangles: u32,
    /// Frame number.
    pub frame: u64,
}

impl RenderInfo {
    /// Reset the per-frame counters.
    pub fn reset(&mut self) {
        self.draw_calls = 0;
        self.triangles = 0;
    }
}

/// Which models a scene pass draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFilter {
    /// Draw every model and the skybox.
    All,
    /// Draw only unlit (emissive) models, without the skybox. Used to
    /// capture bloom sources.
    UnlitOnly,
}

/// Number of lights the shader consumes. Missing lights are padded with
/// zeroed terms.
const LIGHT_COUNT: usize = 2;

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct LightUniform {
    /// View-space position.
    position: [f32; 4],
    ambient: [f32; 4],
    diffuse: [f32; 4],
    /// rgb = specular color, w = shininess.
    specular: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct FrameUniforms {
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
    fog_color: [f32; 4],
    /// x = near, y = far, z = enabled, w = elapsed seconds.
    fog_params: [f32; 4],
    lights: [LightUniform; LIGHT_COUNT],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct ModelUniforms {
    model: [[f32; 4]; 4],
    /// Normal matrix of the model-view, padded to mat4.
    normal: [[f32; 4]; 4],
    extras: [[f32; 4]; 4],
    /// x = lit, y = opacity.
    flags: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct SkyUniforms {
    /// View matrix with the translation stripped.
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
    fog_color: [f32; 4],
    /// x = near, y = far, z = enabled.
    fog_params: [f32; 4],
}

/// Pack the skybox uniforms for the current frame. The skybox shares the
/// scene's linear fog.
fn sky_uniforms(scene: &Scene) -> SkyUniforms {
    let settings = &scene.settings;
    SkyUniforms {
        view: scene
            .camera
            .view_matrix()
            .without_translation()
            .to_cols_array_2d(),
        projection: scene.camera.projection_matrix().to_cols_array_2d(),
        fog_color: settings.fog_color.to_rgba_array(1.0),
        fog_params: [
            settings.fog_near,
            settings.fog_far,
            if settings.fog_enabled { 1.0 } else { 0.0 },
            0.0,
        ],
    }
}

struct ModelResources {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

struct SkyboxResources {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    /// Cubemap index the bind group was built against.
    texture_index: usize,
}

/// The scene renderer.
///
/// Call [`frame`](Self::frame) once per frame: it advances the scene's
/// animations, draws into the surface, and presents.
pub struct Renderer {
    clock: Clock,
    info: RenderInfo,
    depth_view: wgpu::TextureView,

    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    model_layout: wgpu::BindGroupLayout,
    model_pipeline: wgpu::RenderPipeline,
    transparent_pipeline: wgpu::RenderPipeline,
    skybox_layout: wgpu::BindGroupLayout,
    skybox_pipeline: wgpu::RenderPipeline,

    sampler: wgpu::Sampler,
    white_texture: Texture2D,

    model_resources: Vec<Option<ModelResources>>,
    skybox_resources: Option<SkyboxResources>,
}

impl Renderer {
    /// Create a renderer targeting the context's surface format.
    pub fn new(ctx: &Context) -> Self {
        let device = &ctx.device;

        let depth_texture = ctx.create_depth_texture();
        let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Scene Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let white_texture = Texture2D::white(device, &ctx.queue);

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame Uniform Buffer"),
            contents: bytemuck::cast_slice(&[FrameUniforms::zeroed()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let model_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Model Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let skybox_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Skybox Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::Cube,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let model_pipeline = Self::create_model_pipeline(
            device,
            "Model Pipeline",
            ctx.surface_format,
            ctx.depth_format,
            &frame_layout,
            &model_layout,
            None,
            true,
        );
        // Transparent models blend over the opaque pass without writing
        // depth, so bodies behind them stay visible.
        let transparent_pipeline = Self::create_model_pipeline(
            device,
            "Transparent Model Pipeline",
            ctx.surface_format,
            ctx.depth_format,
            &frame_layout,
            &model_layout,
            Some(wgpu::BlendState::ALPHA_BLENDING),
            false,
        );
        let skybox_pipeline = Self::create_skybox_pipeline(
            device,
            ctx.surface_format,
            ctx.depth_format,
            &skybox_layout,
        );

        Self {
            clock: Clock::new(),
            info: RenderInfo::default(),
            depth_view,
            frame_buffer,
            frame_bind_group,
            model_layout,
            model_pipeline,
            transparent_pipeline,
            skybox_layout,
            skybox_pipeline,
            sampler,
            white_texture,
            model_resources: Vec::new(),
            skybox_resources: None,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn create_model_pipeline(
        device: &wgpu::Device,
        label: &str,
        format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        frame_layout: &wgpu::BindGroupLayout,
        model_layout: &wgpu::BindGroupLayout,
        blend: Option<wgpu::BlendState>,
        depth_write: bool,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Model Shader"),
            source: wgpu::ShaderSource::Wgsl(MODEL_SHADER.into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts: &[frame_layout, model_layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[crate::geometry::Vertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_format,
                depth_write_enabled: depth_write,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    fn create_skybox_pipeline(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        skybox_layout: &wgpu::BindGroupLayout,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Skybox Shader"),
            source: wgpu::ShaderSource::Wgsl(SKYBOX_SHADER.into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Skybox Pipeline Layout"),
            bind_group_layouts: &[skybox_layout],
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Skybox Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[crate::geometry::PositionVertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_format,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    /// Render statistics.
    #[inline]
    pub fn info(&self) -> &RenderInfo {
        &self.info
    }

    /// Recreate size-dependent resources after a surface resize.
    pub fn resize(&mut self, ctx: &Context) {
        let depth_texture = ctx.create_depth_texture();
        self.depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());
    }

    /// Drop the GPU resources for a model so they are rebuilt on the next
    /// frame. Call after swapping a model's texture.
    pub fn invalidate_model(&mut self, index: usize) {
        if let Some(slot) = self.model_resources.get_mut(index) {
            *slot = None;
        }
    }

    /// Advance the clock and the scene's animations without drawing.
    /// Returns elapsed time in seconds. Post-processing pipelines call this
    /// once per frame before recording their own passes.
    pub fn advance(&mut self, scene: &mut Scene) -> f32 {
        let delta = self.clock.delta() as f32;
        scene.update(delta);

        self.info.reset();
        self.info.frame += 1;

        self.clock.elapsed() as f32
    }

    /// Advance animations, render the scene, and present.
    pub fn frame(&mut self, ctx: &Context, scene: &mut Scene) -> Result<(), wgpu::SurfaceError> {
        let elapsed = self.advance(scene);

        let output = ctx.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let background = scene.background;
        let mut encoder = ctx.create_command_encoder();
        self.draw(
            ctx,
            &mut encoder,
            &view,
            scene,
            elapsed,
            ModelFilter::All,
            Some(background),
        );
        ctx.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Record a scene pass into `color_view`.
    ///
    /// With `clear` set the pass clears color to that value, otherwise the
    /// existing contents are kept. The depth buffer is cleared either way.
    pub fn draw(
        &mut self,
        ctx: &Context,
        encoder: &mut wgpu::CommandEncoder,
        color_view: &wgpu::TextureView,
        scene: &mut Scene,
        elapsed: f32,
        filter: ModelFilter,
        clear: Option<Color>,
    ) {
        self.write_frame_uniforms(ctx, scene, elapsed);
        self.prepare_models(ctx, scene, elapsed);
        let draw_skybox = filter == ModelFilter::All && scene.skybox.is_some();
        if draw_skybox {
            self.prepare_skybox(ctx, scene);
        }

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: match clear {
                        Some(color) => wgpu::LoadOp::Clear(color.into()),
                        None => wgpu::LoadOp::Load,
                    },
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if draw_skybox {
            if let (Some(skybox), Some(resources)) =
                (scene.skybox.as_ref(), self.skybox_resources.as_ref())
            {
                pass.set_pipeline(&self.skybox_pipeline);
                pass.set_bind_group(0, &resources.bind_group, &[]);
                pass.set_vertex_buffer(0, skybox.vertex_buffer().slice(..));
                pass.draw(0..crate::scene::SkyBox::VERTEX_COUNT, 0..1);
                self.info.draw_calls += 1;
                self.info.triangles += crate::scene::SkyBox::VERTEX_COUNT / 3;
            }
        }

        pass.set_pipeline(&self.model_pipeline);
        pass.set_bind_group(0, &self.frame_bind_group, &[]);

        for (index, model) in scene.models().iter().enumerate() {
            if model.is_transparent() {
                continue;
            }
            if filter == ModelFilter::UnlitOnly && model.lit {
                continue;
            }
            let Some(resources) = self.model_resources.get(index).and_then(|r| r.as_ref()) else {
                continue;
            };
            let Some(vertex_buffer) = model.mesh.vertex_buffer() else {
                continue;
            };

            pass.set_bind_group(1, &resources.bind_group, &[]);
            pass.set_vertex_buffer(0, vertex_buffer.slice(..));
            pass.draw(0..model.mesh.vertex_count(), 0..1);
            self.info.draw_calls += 1;
            self.info.triangles += model.mesh.vertex_count() / 3;
        }

        // Transparent models last, blended over the opaque geometry.
        pass.set_pipeline(&self.transparent_pipeline);
        for (index, model) in scene.models().iter().enumerate() {
            if !model.is_transparent() {
                continue;
            }
            if filter == ModelFilter::UnlitOnly && model.lit {
                continue;
            }
            let Some(resources) = self.model_resources.get(index).and_then(|r| r.as_ref()) else {
                continue;
            };
            let Some(vertex_buffer) = model.mesh.vertex_buffer() else {
                continue;
            };

            pass.set_bind_group(1, &resources.bind_group, &[]);
            pass.set_vertex_buffer(0, vertex_buffer.slice(..));
            pass.draw(0..model.mesh.vertex_count(), 0..1);
            self.info.draw_calls += 1;
            self.info.triangles += model.mesh.vertex_count() / 3;
        }
    }

    fn write_frame_uniforms(&self, ctx: &Context, scene: &Scene, elapsed: f32) {
        let view = scene.camera.view_matrix();
        let settings = &scene.settings;

        let mut lights = [LightUniform::zeroed(); LIGHT_COUNT];
        for (uniform, light) in lights.iter_mut().zip(scene.lights().iter()) {
            let view_pos = view.transform_point(&light.position);
            uniform.position = [view_pos.x, view_pos.y, view_pos.z, 1.0];
            uniform.ambient = [light.ambient.x, light.ambient.y, light.ambient.z, 0.0];
            uniform.diffuse = [light.diffuse.x, light.diffuse.y, light.diffuse.z, 0.0];
            uniform.specular = [
                light.specular.x,
                light.specular.y,
                light.specular.z,
                light.shininess,
            ];
        }

        let uniforms = FrameUniforms {
            view: view.to_cols_array_2d(),
            projection: scene.camera.projection_matrix().to_cols_array_2d(),
            fog_color: settings.fog_color.to_rgba_array(1.0),
            fog_params: [
                settings.fog_near,
                settings.fog_far,
                if settings.fog_enabled { 1.0 } else { 0.0 },
                elapsed,
            ],
            lights,
        };

        ctx.queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }

    fn prepare_models(&mut self, ctx: &Context, scene: &mut Scene, elapsed: f32) {
        let view = scene.camera.view_matrix();

        if self.model_resources.len() < scene.models().len() {
            self.model_resources
                .resize_with(scene.models().len(), || None);
        }

        for (index, model) in scene.models_mut().iter_mut().enumerate() {
            model.mesh.upload(&ctx.device);

            if self.model_resources[index].is_none() {
                let buffer = ctx
                    .device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("Model Uniform Buffer"),
                        contents: bytemuck::cast_slice(&[ModelUniforms::zeroed()]),
                        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    });
                let texture_view = model
                    .texture
                    .as_ref()
                    .map(|t| t.view())
                    .unwrap_or_else(|| self.white_texture.view());
                let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Model Bind Group"),
                    layout: &self.model_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: buffer.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::TextureView(texture_view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2,
                            resource: wgpu::BindingResource::Sampler(&self.sampler),
                        },
                    ],
                });
                self.model_resources[index] = Some(ModelResources { buffer, bind_group });
            }

            let model_view = view.multiplied(&model.model_matrix);
            let normal = model_view
                .normal_matrix()
                .unwrap_or(Matrix3::IDENTITY);

            let uniforms = ModelUniforms {
                model: model.model_matrix.to_cols_array_2d(),
                normal: mat3_to_padded_mat4(&normal),
                extras: model.resolved_extras(elapsed),
                flags: [
                    if model.lit { 1.0 } else { 0.0 },
                    model.opacity,
                    0.0,
                    0.0,
                ],
            };

            let resources = self.model_resources[index].as_ref().unwrap();
            ctx.queue
                .write_buffer(&resources.buffer, 0, bytemuck::cast_slice(&[uniforms]));
        }
    }

    fn prepare_skybox(&mut self, ctx: &Context, scene: &Scene) {
        let Some(skybox) = scene.skybox.as_ref() else {
            return;
        };

        let rebuild = match self.skybox_resources.as_ref() {
            Some(resources) => resources.texture_index != skybox.current_index(),
            None => true,
        };

        if rebuild {
            let buffer = ctx
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Skybox Uniform Buffer"),
                    contents: bytemuck::cast_slice(&[SkyUniforms::zeroed()]),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });
            let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Skybox Bind Group"),
                layout: &self.skybox_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(
                            skybox.current_texture().view(),
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(&self.sampler),
                    },
                ],
            });
            self.skybox_resources = Some(SkyboxResources {
                buffer,
                bind_group,
                texture_index: skybox.current_index(),
            });
        }

        let uniforms = sky_uniforms(scene);
        let resources = self.skybox_resources.as_ref().unwrap();
        ctx.queue
            .write_buffer(&resources.buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }
}

/// Embed a Matrix3 into the upper-left block of a column-major mat4.
fn mat3_to_padded_mat4(m: &Matrix3) -> [[f32; 4]; 4] {
    let e = &m.elements;
    [
        [e[0], e[1], e[2], 0.0],
        [e[3], e[4], e[5], 0.0],
        [e[6], e[7], e[8], 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

const MODEL_SHADER: &str = r#"
struct Light {
    position: vec4<f32>,
    ambient: vec4<f32>,
    diffuse: vec4<f32>,
    specular: vec4<f32>,
}

struct FrameUniforms {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    fog_color: vec4<f32>,
    fog_params: vec4<f32>,
    lights: array<Light, 2>,
}

struct ModelUniforms {
    model: mat4x4<f32>,
    normal: mat4x4<f32>,
    extras: array<vec4<f32>, 4>,
    flags: vec4<f32>,
}

@group(0) @binding(0) var<uniform> frame: FrameUniforms;
@group(1) @binding(0) var<uniform> object: ModelUniforms;
@group(1) @binding(1) var albedo_texture: texture_2d<f32>;
@group(1) @binding(2) var albedo_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) normal: vec3<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) view_position: vec3<f32>,
    @location(2) view_normal: vec3<f32>,
}

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let view_pos = frame.view * object.model * vec4<f32>(in.position, 1.0);
    out.clip_position = frame.projection * view_pos;
    out.view_position = view_pos.xyz;
    out.view_normal = (object.normal * vec4<f32>(in.normal, 0.0)).xyz;
    out.uv = in.uv;
    return out;
}

fn phong(light: Light, normal: vec3<f32>, view_pos: vec3<f32>, albedo: vec3<f32>) -> vec3<f32> {
    let light_dir = normalize(light.position.xyz - view_pos);
    let ambient = light.ambient.rgb * albedo;
    let diffuse = light.diffuse.rgb * max(dot(normal, light_dir), 0.0) * albedo;
    let view_dir = normalize(-view_pos);
    let reflect_dir = reflect(-light_dir, normal);
    let spec = pow(max(dot(view_dir, reflect_dir), 0.0), max(light.specular.w, 1.0));
    let specular = light.specular.rgb * spec;
    return ambient + diffuse + specular;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let albedo = textureSample(albedo_texture, albedo_sampler, in.uv).rgb;
    var color = albedo;
    if (object.flags.x > 0.5) {
        let normal = normalize(in.view_normal);
        color = phong(frame.lights[0], normal, in.view_position, albedo)
            + phong(frame.lights[1], normal, in.view_position, albedo);
    }

    let dist = length(in.view_position);
    let fog_range = max(frame.fog_params.y - frame.fog_params.x, 0.0001);
    let fog = clamp((dist - frame.fog_params.x) / fog_range, 0.0, 1.0) * frame.fog_params.z;
    color = mix(color, frame.fog_color.rgb, fog);

    return vec4<f32>(color, object.flags.y);
}
"#;

const SKYBOX_SHADER: &str = r#"
struct SkyUniforms {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
    fog_color: vec4<f32>,
    fog_params: vec4<f32>,
}

@group(0) @binding(0) var<uniform> sky: SkyUniforms;
@group(0) @binding(1) var sky_texture: texture_cube<f32>;
@group(0) @binding(2) var sky_sampler: sampler;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) direction: vec3<f32>,
    @location(1) view_distance: f32,
}

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.direction = position;
    let view_pos = sky.view * vec4<f32>(position, 1.0);
    out.view_distance = length(view_pos.xyz);
    let pos = sky.projection * view_pos;
    // Pin depth to the far plane so the skybox sits behind everything.
    out.clip_position = pos.xyww;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let color = textureSample(sky_texture, sky_sampler, normalize(in.direction)).rgb;
    let fog_range = max(sky.fog_params.y - sky.fog_params.x, 0.0001);
    let fog = clamp((in.view_distance - sky.fog_params.x) / fog_range, 0.0, 1.0)
        * sky.fog_params.z;
    return vec4<f32>(mix(color, sky.fog_color.rgb, fog), 1.0);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;

    #[test]
    fn test_sky_uniforms_carry_fog() {
        let mut scene = Scene::new(Camera::default());
        scene.settings.fog_near = 12.0;
        scene.settings.fog_far = 48.0;
        scene.settings.fog_color = Color::new(0.2, 0.3, 0.4);

        let uniforms = sky_uniforms(&scene);
        assert_eq!(uniforms.fog_params[0], 12.0);
        assert_eq!(uniforms.fog_params[1], 48.0);
        assert_eq!(uniforms.fog_params[2], 1.0);
        assert_eq!(uniforms.fog_color, [0.2, 0.3, 0.4, 1.0]);
        // Translation is stripped so the box stays centered on the camera.
        assert_eq!(&uniforms.view[3][0..3], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_sky_uniforms_fog_toggle() {
        let mut scene = Scene::new(Camera::default());
        scene.settings.fog_enabled = false;
        assert_eq!(sky_uniforms(&scene).fog_params[2], 0.0);
    }

    #[test]
    fn test_skybox_shader_applies_fog() {
        assert!(SKYBOX_SHADER.contains("fog_color"));
        assert!(SKYBOX_SHADER.contains("mix(color, sky.fog_color.rgb, fog)"));
    }

    #[test]
    fn test_model_shader_outputs_opacity() {
        // The transparent pipeline blends with the fragment's alpha, which
        // carries the model's opacity flag.
        assert!(MODEL_SHADER.contains("return vec4<f32>(color, object.flags.y);"));
    }
}
