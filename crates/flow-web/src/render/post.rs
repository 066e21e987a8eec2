use super::helpers;
use super::targets::{bloom_size, RenderTargets};
use wgpu;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PostUniforms {
    pub(crate) resolution: [f32; 2],
    pub(crate) blur_dir: [f32; 2],
    pub(crate) bloom_strength: f32,
    pub(crate) bloom_radius: f32,
    pub(crate) threshold: f32,
    pub(crate) encode_srgb: f32,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct BloomParams {
    pub(crate) strength: f32,
    pub(crate) radius: f32,
    pub(crate) threshold: f32,
}

pub(crate) struct PostResources {
    pub(crate) bgl0: wgpu::BindGroupLayout, // tex+sampler+uniform
    pub(crate) bgl1: wgpu::BindGroupLayout, // tex+sampler
    // queue writes all apply before the submit, so each pass reads its own buffer
    pub(crate) base_uniforms: wgpu::Buffer,
    pub(crate) blur_h_uniforms: wgpu::Buffer,
    pub(crate) blur_v_uniforms: wgpu::Buffer,
    pub(crate) bright_pipeline: wgpu::RenderPipeline,
    pub(crate) blur_pipeline: wgpu::RenderPipeline,
    pub(crate) composite_pipeline: wgpu::RenderPipeline,
    pub(crate) params: BloomParams,
    /// Swap format stores raw values, so composite applies the sRGB curve.
    pub(crate) encode_srgb: bool,
}

/// Bind groups that reference the size-dependent render targets.
pub(crate) struct PostBindGroups {
    pub(crate) from_hdr: wgpu::BindGroup,
    pub(crate) from_bloom_a_h: wgpu::BindGroup,
    pub(crate) from_bloom_b_v: wgpu::BindGroup,
    pub(crate) bloom_a_only: wgpu::BindGroup,
}

fn uniform_buffer(device: &wgpu::Device, label: &str) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: std::mem::size_of::<PostUniforms>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

pub(crate) fn create_post_resources(
    device: &wgpu::Device,
    post_shader: &wgpu::ShaderModule,
    scene_format: wgpu::TextureFormat,
    swap_format: wgpu::TextureFormat,
    params: BloomParams,
) -> PostResources {
    let bgl0 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("post_bgl0"),
        entries: &[
            helpers::texture_layout_entry(0),
            helpers::sampler_layout_entry(1),
            helpers::uniform_layout_entry(2, wgpu::ShaderStages::FRAGMENT),
        ],
    });
    let bgl1 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("post_bgl1"),
        entries: &[helpers::texture_layout_entry(0), helpers::sampler_layout_entry(1)],
    });
    let pl_bright_blur = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pl_post_0"),
        bind_group_layouts: &[&bgl0],
        push_constant_ranges: &[],
    });
    let pl_composite = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pl_post_comp"),
        bind_group_layouts: &[&bgl0, &bgl1],
        push_constant_ranges: &[],
    });
    let bright_pipeline = helpers::make_post_pipeline(
        device,
        "bright_pipeline",
        &pl_bright_blur,
        post_shader,
        "fs_bright",
        scene_format,
        None,
    );
    let blur_pipeline = helpers::make_post_pipeline(
        device,
        "blur_pipeline",
        &pl_bright_blur,
        post_shader,
        "fs_blur",
        scene_format,
        None,
    );
    let composite_pipeline = helpers::make_post_pipeline(
        device,
        "composite_pipeline",
        &pl_composite,
        post_shader,
        "fs_composite",
        swap_format,
        Some(wgpu::BlendState::REPLACE),
    );

    PostResources {
        bgl0,
        bgl1,
        base_uniforms: uniform_buffer(device, "post_uniforms"),
        blur_h_uniforms: uniform_buffer(device, "post_uniforms_blur_h"),
        blur_v_uniforms: uniform_buffer(device, "post_uniforms_blur_v"),
        bright_pipeline,
        blur_pipeline,
        composite_pipeline,
        params,
        encode_srgb: !swap_format.is_srgb(),
    }
}

impl PostResources {
    /// Upload per-pass uniforms for the current surface size.
    pub(crate) fn write_uniforms(&self, queue: &wgpu::Queue, width: u32, height: u32) {
        let (bw, bh) = bloom_size(width, height);
        let base = PostUniforms {
            resolution: [bw as f32, bh as f32],
            blur_dir: [0.0, 0.0],
            bloom_strength: self.params.strength,
            bloom_radius: self.params.radius,
            threshold: self.params.threshold,
            encode_srgb: if self.encode_srgb { 1.0 } else { 0.0 },
        };
        queue.write_buffer(&self.base_uniforms, 0, bytemuck::bytes_of(&base));
        let h = PostUniforms {
            blur_dir: [1.0, 0.0],
            ..base
        };
        queue.write_buffer(&self.blur_h_uniforms, 0, bytemuck::bytes_of(&h));
        let v = PostUniforms {
            blur_dir: [0.0, 1.0],
            ..base
        };
        queue.write_buffer(&self.blur_v_uniforms, 0, bytemuck::bytes_of(&v));
    }

    pub(crate) fn bind_groups(
        &self,
        device: &wgpu::Device,
        targets: &RenderTargets,
        sampler: &wgpu::Sampler,
    ) -> PostBindGroups {
        let with_uniforms = |label: &str, view: &wgpu::TextureView, uniforms: &wgpu::Buffer| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &self.bgl0,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: uniforms.as_entire_binding(),
                    },
                ],
            })
        };
        let from_hdr = with_uniforms("bg_hdr", &targets.hdr_view, &self.base_uniforms);
        let from_bloom_a_h =
            with_uniforms("bg_from_bloom_a", &targets.bloom_a_view, &self.blur_h_uniforms);
        let from_bloom_b_v =
            with_uniforms("bg_from_bloom_b", &targets.bloom_b_view, &self.blur_v_uniforms);
        let bloom_a_only = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bg_bloom_a_only"),
            layout: &self.bgl1,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&targets.bloom_a_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });
        PostBindGroups {
            from_hdr,
            from_bloom_a_h,
            from_bloom_b_v,
            bloom_a_only,
        }
    }

    /// Bright pass, separable blur, then composite onto `output`.
    pub(crate) fn run(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        targets: &RenderTargets,
        groups: &PostBindGroups,
        output: &wgpu::TextureView,
        clear: wgpu::Color,
    ) {
        blit(
            encoder,
            "bright_pass",
            &targets.bloom_a_view,
            wgpu::Color::BLACK,
            &self.bright_pipeline,
            &groups.from_hdr,
            None,
        );
        blit(
            encoder,
            "blur_h",
            &targets.bloom_b_view,
            wgpu::Color::BLACK,
            &self.blur_pipeline,
            &groups.from_bloom_a_h,
            None,
        );
        blit(
            encoder,
            "blur_v",
            &targets.bloom_a_view,
            wgpu::Color::BLACK,
            &self.blur_pipeline,
            &groups.from_bloom_b_v,
            None,
        );
        blit(
            encoder,
            "composite",
            output,
            clear,
            &self.composite_pipeline,
            &groups.from_hdr,
            Some(&groups.bloom_a_only),
        );
    }

    pub(crate) fn destroy(&self) {
        self.base_uniforms.destroy();
        self.blur_h_uniforms.destroy();
        self.blur_v_uniforms.destroy();
    }
}

pub(crate) fn blit(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    clear: wgpu::Color,
    pipeline: &wgpu::RenderPipeline,
    bg0: &wgpu::BindGroup,
    bg1: Option<&wgpu::BindGroup>,
) {
    let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(clear),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    r.set_pipeline(pipeline);
    r.set_bind_group(0, bg0, &[]);
    if let Some(g1) = bg1 {
        r.set_bind_group(1, g1, &[]);
    }
    r.draw(0..3, 0..1);
    drop(r);
}
