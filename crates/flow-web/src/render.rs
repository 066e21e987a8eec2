use flow_core::{pack_lines, pack_signals, Camera, FlowScene, LineVertex, SceneConfig};
use web_sys as web;
use wgpu;

mod helpers;
mod lines;
mod post;
mod targets;

use lines::{LineResources, LineUniforms};
use post::{BloomParams, PostBindGroups, PostResources};
use targets::RenderTargets;

// ===================== WebGPU state =====================

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    lines: LineResources,
    targets: RenderTargets,
    linear_sampler: wgpu::Sampler,
    post: PostResources,
    post_groups: PostBindGroups,

    // draw layout, fixed at creation from the scene config
    lane_count: u32,
    segment_count: u32,
    signal_count: u32,
    trail_draw_count: u32,

    // dirty tracking against the scene's write generations
    uploaded_lines: Option<u64>,
    uploaded_signals: Option<u64>,
    line_scratch: Vec<LineVertex>,
    signal_scratch: Vec<LineVertex>,

    width: u32,
    height: u32,
    clear_color: wgpu::Color,
    fog: [f32; 4],
}

impl GpuState {
    pub async fn new(canvas: &web::HtmlCanvasElement, cfg: &SceneConfig) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        // Browser WebGPU when navigator.gpu works, otherwise the WebGL2 backend
        let instance =
            wgpu::util::new_instance_with_webgpu_detection(&wgpu::InstanceDescriptor::default())
                .await;
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("no WebGPU or WebGL2 adapter"))?;
        let backend = adapter.get_info().backend;
        let required_limits = if backend == wgpu::Backend::Gl {
            wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits())
        } else {
            // Use default limits on web to avoid passing unknown fields to older WebGPU impls
            wgpu::Limits::default()
        };
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits,
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: Some("flow_device"),
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            // browsers expose only non-sRGB canvas formats; composite encodes for those
            .or_else(|| {
                caps.formats.iter().copied().find(|f| {
                    matches!(
                        f,
                        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Rgba8Unorm
                    )
                })
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let scene_format = targets::scene_format(&adapter);
        let wanted_samples = if cfg.antialias {
            crate::constants::MSAA_SAMPLES
        } else {
            1
        };
        let sample_count = targets::sample_count(&adapter, scene_format, wanted_samples);
        let targets = RenderTargets::new(&device, width, height, scene_format, sample_count);

        let draw_count = cfg.trail_draw_count();
        let lines = lines::create_line_resources(
            &device,
            scene_format,
            sample_count,
            cfg.line_count * cfg.segment_count,
            cfg.signal_count * draw_count,
        );

        let post_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::shaders::POST_WGSL.into()),
        });
        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let post = post::create_post_resources(
            &device,
            &post_shader,
            scene_format,
            format,
            BloomParams {
                strength: cfg.bloom_strength,
                radius: cfg.bloom_radius,
                threshold: cfg.bloom_threshold,
            },
        );
        post.write_uniforms(&queue, width, height);
        let post_groups = post.bind_groups(&device, &targets, &linear_sampler);

        let bg = cfg.color_bg;
        log::info!(
            "[gpu] ready {:?} {}x{} surface={:?} scene={:?} msaa={} srgb_encode={}",
            backend,
            width,
            height,
            format,
            scene_format,
            sample_count,
            post.encode_srgb
        );
        Ok(Self {
            surface,
            device,
            queue,
            config,
            lines,
            targets,
            linear_sampler,
            post,
            post_groups,
            lane_count: cfg.line_count as u32,
            segment_count: cfg.segment_count as u32,
            signal_count: cfg.signal_count as u32,
            trail_draw_count: draw_count as u32,
            uploaded_lines: None,
            uploaded_signals: None,
            line_scratch: Vec::with_capacity(cfg.line_count * cfg.segment_count),
            signal_scratch: Vec::with_capacity(cfg.signal_count * draw_count),
            width,
            height,
            clear_color: wgpu::Color {
                r: bg.x as f64,
                g: bg.y as f64,
                b: bg.z as f64,
                a: 1.0,
            },
            fog: [bg.x, bg.y, bg.z, cfg.fog_density],
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.configure_surface();

            // Recreate offscreen render targets and dependent bind groups
            self.targets.recreate(&self.device, width, height);
            self.post.write_uniforms(&self.queue, width, height);
            self.post_groups = self
                .post
                .bind_groups(&self.device, &self.targets, &self.linear_sampler);
            log::debug!("[gpu] resized {}x{}", width, height);
        }
    }

    pub fn configure_surface(&mut self) {
        self.config.width = self.width;
        self.config.height = self.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Upload line and signal vertices whose arenas changed since the last
    /// upload.
    pub fn sync_scene(&mut self, scene: &FlowScene) {
        let lines = scene.lines();
        if self.uploaded_lines != Some(lines.generation()) {
            pack_lines(lines, scene.config().color_line, &mut self.line_scratch);
            self.queue.write_buffer(
                &self.lines.line_vb,
                0,
                bytemuck::cast_slice(&self.line_scratch),
            );
            self.uploaded_lines = Some(lines.generation());
        }
        let signals = scene.signals();
        if self.uploaded_signals != Some(signals.generation()) {
            pack_signals(signals, &mut self.signal_scratch);
            self.queue.write_buffer(
                &self.lines.signal_vb,
                0,
                bytemuck::cast_slice(&self.signal_scratch),
            );
            self.uploaded_signals = Some(signals.generation());
        }
    }

    pub fn render(&mut self, camera: &Camera) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let uniforms = LineUniforms {
            view_proj: camera.view_proj().to_cols_array_2d(),
            fog: self.fog,
        };
        self.queue.write_buffer(
            &self.lines.uniform_buffer,
            0,
            bytemuck::bytes_of(&uniforms),
        );

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let (target, resolve_target) = self.targets.scene_attachment();
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.lines.bind_group, &[]);

            // background lanes first, then additive signal trails on top
            rpass.set_pipeline(&self.lines.line_pipeline);
            rpass.set_vertex_buffer(0, self.lines.line_vb.slice(..));
            let seg = self.segment_count;
            for lane in 0..self.lane_count {
                rpass.draw(lane * seg..(lane + 1) * seg, 0..1);
            }

            rpass.set_pipeline(&self.lines.signal_pipeline);
            rpass.set_vertex_buffer(0, self.lines.signal_vb.slice(..));
            let n = self.trail_draw_count;
            for s in 0..self.signal_count {
                rpass.draw(s * n..(s + 1) * n, 0..1);
            }
        }

        self.post.run(
            &mut encoder,
            &self.targets,
            &self.post_groups,
            &view,
            self.clear_color,
        );

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Release every GPU resource owned by this state.
    pub fn destroy(self) {
        self.lines.destroy();
        self.post.destroy();
        self.targets.destroy();
        self.device.destroy();
        log::info!("[gpu] released");
    }
}
