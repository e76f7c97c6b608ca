//! Multi-pass bloom: capture emissive models, extract bright regions,
//! separable Gaussian blur, additive combine over the scene.

use super::pass::{self, FullscreenVertex, RenderTarget};
use crate::core::{Context, ModelFilter, Renderer};
use crate::math::Color;
use crate::scene::Scene;
use wgpu::util::DeviceExt;

/// Bloom tuning parameters.
#[derive(Debug, Clone, Copy)]
pub struct BloomConfig {
    /// Luminance threshold for the bright-pass extraction.
    pub threshold: f32,
    /// Number of full blur iterations (each is one horizontal plus one
    /// vertical pass).
    pub blur_passes: u32,
    /// Multiplier applied to the blurred bloom before the additive combine.
    pub intensity: f32,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            blur_passes: 6,
            intensity: 5.0,
        }
    }
}

/// Axis of a separable blur pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlurDirection {
    Horizontal,
    Vertical,
}

/// Ping-pong schedule for `passes` blur iterations over two targets.
/// Returns (source, destination, direction) triples. The blurred result
/// always ends up in target 0.
fn blur_schedule(passes: u32) -> Vec<(usize, usize, BlurDirection)> {
    let mut schedule = Vec::with_capacity(passes as usize * 2);
    for _ in 0..passes {
        schedule.push((0, 1, BlurDirection::Horizontal));
        schedule.push((1, 0, BlurDirection::Vertical));
    }
    schedule
}

/// An offscreen target paired with a bind group for sampling it.
struct SampledTarget {
    target: RenderTarget,
    bind_group: wgpu::BindGroup,
}

impl SampledTarget {
    fn new(
        device: &wgpu::Device,
        label: &str,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
    ) -> Self {
        let target = RenderTarget::new(device, label, width, height, format);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(target.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });
        Self { target, bind_group }
    }
}

/// Renders a scene with a bloom halo around emissive (unlit) models.
///
/// Per frame: the emissive models are drawn alone to an offscreen target,
/// bright texels above the threshold are extracted, blurred with a
/// ping-pong separable Gaussian, and added on top of the normally rendered
/// scene.
pub struct BloomRenderer {
    config: BloomConfig,

    quad_buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,
    input_layout: wgpu::BindGroupLayout,
    params_layout: wgpu::BindGroupLayout,

    extract_pipeline: wgpu::RenderPipeline,
    blur_pipeline: wgpu::RenderPipeline,
    combine_pipeline: wgpu::RenderPipeline,

    threshold_buffer: wgpu::Buffer,
    threshold_bind_group: wgpu::BindGroup,
    intensity_buffer: wgpu::Buffer,
    intensity_bind_group: wgpu::BindGroup,
    // Direction uniforms are premade so no buffer is written twice per frame.
    dir_bind_groups: [wgpu::BindGroup; 2],

    scene_target: SampledTarget,
    bloom_targets: [SampledTarget; 2],
}

impl BloomRenderer {
    /// Create a bloom renderer sized to the context's surface.
    pub fn new(ctx: &Context, config: BloomConfig) -> Self {
        let device = &ctx.device;
        let format = ctx.surface_format;

        let quad_buffer = pass::create_quad_buffer(device);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Bloom Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let input_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Bloom Input Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let params_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Bloom Params Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let make_params_buffer = |label: &str, value: [f32; 4]| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(&[value]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            })
        };
        let make_params_bind_group = |label: &str, buffer: &wgpu::Buffer| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &params_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            })
        };

        let threshold_buffer =
            make_params_buffer("Bloom Threshold Buffer", [config.threshold, 0.0, 0.0, 0.0]);
        let threshold_bind_group =
            make_params_bind_group("Bloom Threshold Bind Group", &threshold_buffer);

        let intensity_buffer =
            make_params_buffer("Bloom Intensity Buffer", [config.intensity, 0.0, 0.0, 0.0]);
        let intensity_bind_group =
            make_params_bind_group("Bloom Intensity Bind Group", &intensity_buffer);

        let dir_h_buffer = make_params_buffer("Bloom Blur H Buffer", [1.0, 0.0, 0.0, 0.0]);
        let dir_v_buffer = make_params_buffer("Bloom Blur V Buffer", [0.0, 1.0, 0.0, 0.0]);
        let dir_bind_groups = [
            make_params_bind_group("Bloom Blur H Bind Group", &dir_h_buffer),
            make_params_bind_group("Bloom Blur V Bind Group", &dir_v_buffer),
        ];

        let extract_pipeline = Self::create_pipeline(
            device,
            "Bloom Extract Pipeline",
            EXTRACT_SHADER,
            format,
            &[&input_layout, &params_layout],
            None,
        );
        let blur_pipeline = Self::create_pipeline(
            device,
            "Bloom Blur Pipeline",
            BLUR_SHADER,
            format,
            &[&input_layout, &params_layout],
            None,
        );
        // The combine pass samples the captured scene and the blurred bloom,
        // adding their sum on top of the rendered frame.
        let combine_pipeline = Self::create_pipeline(
            device,
            "Bloom Combine Pipeline",
            COMBINE_SHADER,
            format,
            &[&input_layout, &input_layout, &params_layout],
            Some(wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::One,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent::REPLACE,
            }),
        );

        let scene_target = SampledTarget::new(
            device,
            "Bloom Scene Target",
            ctx.width,
            ctx.height,
            format,
            &input_layout,
            &sampler,
        );
        let bloom_targets = [
            SampledTarget::new(
                device,
                "Bloom Ping Target",
                ctx.width,
                ctx.height,
                format,
                &input_layout,
                &sampler,
            ),
            SampledTarget::new(
                device,
                "Bloom Pong Target",
                ctx.width,
                ctx.height,
                format,
                &input_layout,
                &sampler,
            ),
        ];

        Self {
            config,
            quad_buffer,
            sampler,
            input_layout,
            params_layout,
            extract_pipeline,
            blur_pipeline,
            combine_pipeline,
            threshold_buffer,
            threshold_bind_group,
            intensity_buffer,
            intensity_bind_group,
            dir_bind_groups,
            scene_target,
            bloom_targets,
        }
    }

    fn create_pipeline(
        device: &wgpu::Device,
        label: &str,
        shader_source: &str,
        format: wgpu::TextureFormat,
        bind_group_layouts: &[&wgpu::BindGroupLayout],
        blend: Option<wgpu::BlendState>,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts,
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[FullscreenVertex::layout()],
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
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    /// Current configuration.
    #[inline]
    pub fn config(&self) -> &BloomConfig {
        &self.config
    }

    /// Update the configuration. Threshold and intensity changes are
    /// uploaded immediately.
    pub fn set_config(&mut self, ctx: &Context, config: BloomConfig) {
        self.config = config;
        ctx.queue.write_buffer(
            &self.threshold_buffer,
            0,
            bytemuck::cast_slice(&[[config.threshold, 0.0f32, 0.0, 0.0]]),
        );
        ctx.queue.write_buffer(
            &self.intensity_buffer,
            0,
            bytemuck::cast_slice(&[[config.intensity, 0.0f32, 0.0, 0.0]]),
        );
    }

    /// Recreate the offscreen targets after a surface resize.
    pub fn resize(&mut self, ctx: &Context) {
        let format = ctx.surface_format;
        self.scene_target = SampledTarget::new(
            &ctx.device,
            "Bloom Scene Target",
            ctx.width,
            ctx.height,
            format,
            &self.input_layout,
            &self.sampler,
        );
        self.bloom_targets = [
            SampledTarget::new(
                &ctx.device,
                "Bloom Ping Target",
                ctx.width,
                ctx.height,
                format,
                &self.input_layout,
                &self.sampler,
            ),
            SampledTarget::new(
                &ctx.device,
                "Bloom Pong Target",
                ctx.width,
                ctx.height,
                format,
                &self.input_layout,
                &self.sampler,
            ),
        ];
    }

    /// Advance the scene and render one frame with bloom, then present.
    pub fn frame(
        &mut self,
        ctx: &Context,
        renderer: &mut Renderer,
        scene: &mut Scene,
    ) -> Result<(), wgpu::SurfaceError> {
        let elapsed = renderer.advance(scene);

        let output = ctx.get_current_texture()?;
        let surface_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = ctx.create_command_encoder();

        // 1. Emissive models alone, on black.
        renderer.draw(
            ctx,
            &mut encoder,
            self.scene_target.target.view(),
            scene,
            elapsed,
            ModelFilter::UnlitOnly,
            Some(Color::BLACK),
        );

        // 2. Bright-pass into the first ping-pong target.
        self.fullscreen_pass(
            &mut encoder,
            "Bloom Extract Pass",
            &self.extract_pipeline,
            &[&self.scene_target.bind_group, &self.threshold_bind_group],
            self.bloom_targets[0].target.view(),
            wgpu::LoadOp::Clear(wgpu::Color::BLACK),
        );

        // 3. Separable Gaussian blur, ping-ponging between the two targets.
        for (src, dst, direction) in blur_schedule(self.config.blur_passes) {
            let dir_bind_group = match direction {
                BlurDirection::Horizontal => &self.dir_bind_groups[0],
                BlurDirection::Vertical => &self.dir_bind_groups[1],
            };
            self.fullscreen_pass(
                &mut encoder,
                "Bloom Blur Pass",
                &self.blur_pipeline,
                &[&self.bloom_targets[src].bind_group, dir_bind_group],
                self.bloom_targets[dst].target.view(),
                wgpu::LoadOp::Clear(wgpu::Color::BLACK),
            );
        }

        // 4. The full scene to the surface.
        let background = scene.background;
        renderer.draw(
            ctx,
            &mut encoder,
            &surface_view,
            scene,
            elapsed,
            ModelFilter::All,
            Some(background),
        );

        // 5. Additive combine: captured scene plus scaled bloom, over the
        // rendered frame.
        self.fullscreen_pass(
            &mut encoder,
            "Bloom Combine Pass",
            &self.combine_pipeline,
            &[
                &self.scene_target.bind_group,
                &self.bloom_targets[0].bind_group,
                &self.intensity_bind_group,
            ],
            &surface_view,
            wgpu::LoadOp::Load,
        );

        ctx.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn fullscreen_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        label: &str,
        pipeline: &wgpu::RenderPipeline,
        bind_groups: &[&wgpu::BindGroup],
        target: &wgpu::TextureView,
        load: wgpu::LoadOp<wgpu::Color>,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(pipeline);
        for (index, group) in bind_groups.iter().enumerate() {
            pass.set_bind_group(index as u32, *group, &[]);
        }
        pass.set_vertex_buffer(0, self.quad_buffer.slice(..));
        pass.draw(0..pass::FULLSCREEN_QUAD.len() as u32, 0..1);
    }
}

const EXTRACT_SHADER: &str = r#"
struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) uv: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = vec4<f32>(in.position, 0.0, 1.0);
    out.uv = in.uv;
    return out;
}

@group(0) @binding(0) var source: texture_2d<f32>;
@group(0) @binding(1) var source_sampler: sampler;
@group(1) @binding(0) var<uniform> params: vec4<f32>;

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let color = textureSample(source, source_sampler, in.uv).rgb;
    let brightness = dot(color, vec3<f32>(0.2126, 0.7152, 0.0722));
    if (brightness > params.x) {
        return vec4<f32>(color, 1.0);
    }
    return vec4<f32>(0.0, 0.0, 0.0, 1.0);
}
"#;

const BLUR_SHADER: &str = r#"
struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) uv: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = vec4<f32>(in.position, 0.0, 1.0);
    out.uv = in.uv;
    return out;
}

@group(0) @binding(0) var source: texture_2d<f32>;
@group(0) @binding(1) var source_sampler: sampler;
@group(1) @binding(0) var<uniform> direction: vec4<f32>;

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    var weights = array<f32, 5>(0.227027, 0.1945946, 0.1216216, 0.054054, 0.016216);
    let texel = direction.xy / vec2<f32>(textureDimensions(source));

    var result = textureSample(source, source_sampler, in.uv).rgb * weights[0];
    for (var i = 1; i < 5; i = i + 1) {
        let offset = texel * f32(i);
        result += textureSample(source, source_sampler, in.uv + offset).rgb * weights[i];
        result += textureSample(source, source_sampler, in.uv - offset).rgb * weights[i];
    }
    return vec4<f32>(result, 1.0);
}
"#;

const COMBINE_SHADER: &str = r#"
struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) uv: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = vec4<f32>(in.position, 0.0, 1.0);
    out.uv = in.uv;
    return out;
}

@group(0) @binding(0) var scene: texture_2d<f32>;
@group(0) @binding(1) var scene_sampler: sampler;
@group(1) @binding(0) var bloom: texture_2d<f32>;
@group(1) @binding(1) var bloom_sampler: sampler;
@group(2) @binding(0) var<uniform> params: vec4<f32>;

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let base = textureSample(scene, scene_sampler, in.uv).rgb;
    let glow = textureSample(bloom, bloom_sampler, in.uv).rgb * params.x;
    return vec4<f32>(base + glow, 1.0);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BloomConfig::default();
        assert_eq!(config.threshold, 0.5);
        assert_eq!(config.blur_passes, 6);
        assert_eq!(config.intensity, 5.0);
    }

    #[test]
    fn test_blur_schedule_alternates_and_ends_in_first_target() {
        let schedule = blur_schedule(6);
        assert_eq!(schedule.len(), 12);
        for (i, (src, dst, direction)) in schedule.iter().enumerate() {
            assert_ne!(src, dst);
            if i % 2 == 0 {
                assert_eq!(*direction, BlurDirection::Horizontal);
            } else {
                assert_eq!(*direction, BlurDirection::Vertical);
            }
        }
        assert_eq!(schedule.last().unwrap().1, 0);
    }

    #[test]
    fn test_blur_schedule_zero_passes_is_empty() {
        assert!(blur_schedule(0).is_empty());
    }

    #[test]
    fn test_combine_shader_samples_scene_and_bloom() {
        // The combine pass re-adds the captured scene alongside the blurred
        // bloom, so the shader must declare both texture inputs.
        assert_eq!(COMBINE_SHADER.matches("texture_2d<f32>").count(), 2);
        assert!(COMBINE_SHADER.contains("textureSample(scene,"));
        assert!(COMBINE_SHADER.contains("textureSample(bloom,"));
    }
}
