use std::mem::size_of;

use bytemuck::{bytes_of, cast_slice, Pod, Zeroable};
use glam::{const_vec3, vec4, Mat4, Vec3, Vec4};
use wgpu::util::DeviceExt;

use crate::{
    entity::Scene,
    frame::Frame,
    sparkles::{clock_seed, SparkleField},
};

use super::View;

const QUAD_VERTICES: [Vec3; 4] = [
    const_vec3!([-0.5, -0.5, 0.]),
    const_vec3!([-0.5, 0.5, 0.]),
    const_vec3!([0.5, -0.5, 0.]),
    const_vec3!([0.5, 0.5, 0.]),
];
const QUAD_INDICES: [u16; 6] = [0, 2, 1, 1, 2, 3];

/// On-screen size factor applied to the emitter's particle size.
const POINT_SCALE: f32 = 25.;

#[derive(Debug, Copy, Clone, Default, Pod, Zeroable)]
#[repr(C)]
struct Uniforms {
    v_mat: Mat4,
    p_mat: Mat4,
    color: Vec4,
    /// x: size in pixels at unit depth, y: unused, zw: viewport size in pixels
    params: Vec4,
}

impl Uniforms {
    fn new(scene: &Scene, view: &View) -> Self {
        let emitter = &scene.mesh.emitter;
        Self {
            v_mat: view.v_mat,
            p_mat: view.p_mat,
            color: emitter.color.to_linear().extend(1.),
            params: vec4(
                emitter.size * POINT_SCALE * view.scale_factor,
                0.,
                view.size.width as f32,
                view.size.height as f32,
            ),
        }
    }
}

pub struct SparklesRenderer {
    field: SparkleField,
    positions: Vec<Vec3>,
    uniform_buffer: wgpu::Buffer,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    render_pipeline: wgpu::RenderPipeline,
}

impl SparklesRenderer {
    pub fn update(&mut self, queue: &wgpu::Queue, scene: &Scene, view: &View, frame: &Frame) {
        self.positions.clear();
        self.positions.extend(
            self.field
                .positions_at(frame.elapsed.as_secs_f32(), scene.mesh.model_matrix()),
        );
        if !self.positions.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, cast_slice(&self.positions));
        }
        queue.write_buffer(&self.uniform_buffer, 0, bytes_of(&Uniforms::new(scene, view)));
    }

    pub fn draw<'rpass>(&'rpass self, rpass: &mut impl wgpu::util::RenderEncoder<'rpass>) {
        if self.field.is_empty() {
            return;
        }
        rpass.set_pipeline(&self.render_pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        rpass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..(QUAD_INDICES.len() as _), 0, 0..(self.field.len() as _));
    }
}

pub struct SparklesRendererBuilder<'a> {
    scene: &'a Scene,
    color_format: Option<wgpu::TextureFormat>,
    depth_format: Option<wgpu::TextureFormat>,
}

impl<'a> SparklesRendererBuilder<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self {
            scene,
            color_format: None,
            depth_format: None,
        }
    }

    pub fn color_target_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.color_format = Some(format);
        self
    }

    pub fn depth_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.depth_format = Some(format);
        self
    }

    pub fn build(self, device: &wgpu::Device) -> anyhow::Result<SparklesRenderer> {
        let color_format = self
            .color_format
            .ok_or_else(|| anyhow::anyhow!("No color format provided"))?;
        let depth_format = self
            .depth_format
            .ok_or_else(|| anyhow::anyhow!("No depth format provided"))?;
        let field = SparkleField::new(self.scene.mesh.emitter, clock_seed());
        let positions = field
            .positions_at(0., self.scene.mesh.model_matrix())
            .collect::<Vec<_>>();

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sparkles Vertex Buffer"),
            contents: bytes_of(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sparkles Index Buffer"),
            contents: bytes_of(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });
        // wgpu rejects zero-sized vertex buffers
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Sparkles Instance Buffer"),
            size: (size_of::<Vec3>() * positions.len().max(1)) as _,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Sparkles Uniform Buffer"),
            size: size_of::<Uniforms>() as _,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Sparkles Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(size_of::<Uniforms>() as _),
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Sparkles Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let shader_module = device.create_shader_module(&wgpu::include_wgsl!("sparkles.wgsl"));

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sparkles Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Sparkles Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: "vs_main",
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: size_of::<Vec3>() as _,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x3],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: size_of::<Vec3>() as _,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![1 => Float32x3],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: "fs_main",
                targets: &[wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                }],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_format,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        Ok(SparklesRenderer {
            field,
            positions,
            uniform_buffer,
            vertex_buffer,
            index_buffer,
            instance_buffer,
            bind_group,
            render_pipeline,
        })
    }
}
