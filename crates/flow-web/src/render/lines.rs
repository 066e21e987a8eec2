use super::helpers;
use flow_core::LineVertex;
use wgpu;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct LineUniforms {
    pub(crate) view_proj: [[f32; 4]; 4],
    pub(crate) fog: [f32; 4], // rgb + density
}

pub(crate) struct LineResources {
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
    pub(crate) line_pipeline: wgpu::RenderPipeline,
    pub(crate) signal_pipeline: wgpu::RenderPipeline,
    pub(crate) line_vb: wgpu::Buffer,
    pub(crate) signal_vb: wgpu::Buffer,
}

const ADDITIVE: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent::OVER,
};

fn vertex_buffer(device: &wgpu::Device, label: &str, vertices: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (std::mem::size_of::<LineVertex>() * vertices.max(1)) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

pub(crate) fn create_line_resources(
    device: &wgpu::Device,
    scene_format: wgpu::TextureFormat,
    sample_count: u32,
    line_vertices: usize,
    signal_vertices: usize,
) -> LineResources {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("lines_shader"),
        source: wgpu::ShaderSource::Wgsl(crate::shaders::LINES_WGSL.into()),
    });
    let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("lines_bgl"),
        entries: &[helpers::uniform_layout_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT)],
    });
    let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("lines_uniforms"),
        size: std::mem::size_of::<LineUniforms>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("lines_bg"),
        layout: &bgl,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniform_buffer.as_entire_binding(),
        }],
    });
    let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("lines_pl"),
        bind_group_layouts: &[&bgl],
        push_constant_ranges: &[],
    });

    let attributes = [
        wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x3,
            offset: 0,
            shader_location: 0,
        },
        wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Float32x4,
            offset: 12,
            shader_location: 1,
        },
    ];
    let vertex_layout = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<LineVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &attributes,
    };

    let make = |label: &str, frag_entry: &str, blend: wgpu::BlendState| {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&pl),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[vertex_layout.clone()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineStrip,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: sample_count,
                ..Default::default()
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(frag_entry),
                targets: &[Some(wgpu::ColorTargetState {
                    format: scene_format,
                    blend: Some(blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        })
    };
    let line_pipeline = make("line_pipeline", "fs_lines", wgpu::BlendState::ALPHA_BLENDING);
    let signal_pipeline = make("signal_pipeline", "fs_signals", ADDITIVE);

    LineResources {
        uniform_buffer,
        bind_group,
        line_pipeline,
        signal_pipeline,
        line_vb: vertex_buffer(device, "line_vb", line_vertices),
        signal_vb: vertex_buffer(device, "signal_vb", signal_vertices),
    }
}

impl LineResources {
    pub(crate) fn destroy(&self) {
        self.uniform_buffer.destroy();
        self.line_vb.destroy();
        self.signal_vb.destroy();
    }
}
