use crate::data::types::{CloudGpu, PointUniformStd140 as PointUniform};
use wgpu::util::DeviceExt;

/// Screen-space square sprites, one instance per point.
const POINTS_WGSL: &str = r#"
struct PointUniform {
    view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
    viewport_size: vec2<f32>,
    point_size_px: f32,
    _pad0: f32,
}

@group(0) @binding(0) var<uniform> u: PointUniform;

struct VSOut {
    @builtin(position) clip: vec4<f32>,
    @location(0)        color: vec3<f32>,
}

@vertex
fn vs_main(
    @location(0) corner: vec2<f32>,
    @location(1) pos: vec3<f32>,
    @location(2) color: vec3<f32>,
) -> VSOut {
    var out: VSOut;
    let center = u.view_proj * u.model * vec4<f32>(pos, 1.0);
    // Corners are +-1, so the quad spans point_size_px on screen.
    let ofs = corner * u.point_size_px / u.viewport_size * center.w;
    out.clip = vec4<f32>(center.xy + ofs, center.z, center.w);
    out.color = color;
    return out;
}

@fragment
fn fs_main(in: VSOut) -> @location(0) vec4<f32> {
    // Over-bright colours saturate here.
    return vec4<f32>(clamp(in.color, vec3<f32>(0.0), vec3<f32>(1.0)), 1.0);
}
"#;

pub struct PointsPipeline {
    pub pipeline: wgpu::RenderPipeline,
    ubo: wgpu::Buffer,
    bind: wgpu::BindGroup,
    quad_vb: wgpu::Buffer,
}

impl PointsPipeline {
    pub fn new(
        device: &wgpu::Device,
        color_fmt: wgpu::TextureFormat,
        depth_fmt: wgpu::TextureFormat,
    ) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Point UBO Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<PointUniform>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Point UBO"),
            size: std::mem::size_of::<PointUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Point BindGroup"),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Point Sprite WGSL"),
            source: wgpu::ShaderSource::Wgsl(POINTS_WGSL.into()),
        });

        let quad_corners: [[f32; 2]; 6] = [
            [-1.0, -1.0],
            [1.0, -1.0],
            [1.0, 1.0],
            [-1.0, -1.0],
            [1.0, 1.0],
            [-1.0, 1.0],
        ];

        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Point Quad VB"),
            contents: bytemuck::cast_slice(&quad_corners),
            usage: wgpu::BufferUsages::VERTEX,
        });

        // Quad corners + two per-instance streams (positions, colours)
        let vbuf_layouts = [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 2]>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &[wgpu::VertexAttribute {
                    shader_location: 0,
                    offset: 0,
                    format: wgpu::VertexFormat::Float32x2,
                }],
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[wgpu::VertexAttribute {
                    shader_location: 1,
                    offset: 0,
                    format: wgpu::VertexFormat::Float32x3,
                }],
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &[wgpu::VertexAttribute {
                    shader_location: 2,
                    offset: 0,
                    format: wgpu::VertexFormat::Float32x3,
                }],
            },
        ];

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Point PipelineLayout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Point Cloud Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &vbuf_layouts,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_fmt,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_fmt,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        Self {
            pipeline,
            ubo,
            bind,
            quad_vb,
        }
    }

    pub fn write_uniform(&self, queue: &wgpu::Queue, uniform: &PointUniform) {
        queue.write_buffer(&self.ubo, 0, bytemuck::bytes_of(uniform));
    }

    pub fn draw<'a>(&'a self, rpass: &mut wgpu::RenderPass<'a>, cloud: &'a CloudGpu) {
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind, &[]);
        rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
        rpass.set_vertex_buffer(1, cloud.positions.slice(..));
        rpass.set_vertex_buffer(2, cloud.colors.slice(..));
        rpass.draw(0..6, 0..cloud.instances_len);
    }
}
