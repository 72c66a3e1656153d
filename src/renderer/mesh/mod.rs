use std::mem::size_of;

use bytemuck::{bytes_of, cast_slice, Pod, Zeroable};
use glam::{Mat4, Vec4};
use wgpu::util::DeviceExt;

use crate::{
    entity::Scene,
    geometry::{MeshData, Vertex},
};

use super::View;

#[derive(Debug, Copy, Clone, Default, Pod, Zeroable)]
#[repr(C)]
struct Uniforms {
    m_mat: Mat4,
    vp_mat: Mat4,
    normal_mat: Mat4,
    color: Vec4,
    emissive: Vec4,
    light_dir: Vec4,
    light_color: Vec4,
}

impl Uniforms {
    fn new(scene: &Scene, view: &View) -> Self {
        let Scene { mesh, light, .. } = scene;

        let m_mat = mesh.model_matrix();

        Self {
            m_mat,
            vp_mat: view.p_mat * view.v_mat,
            normal_mat: m_mat.inverse().transpose(),
            color: mesh.material.color.to_linear().extend(1.),
            emissive: mesh.material.emissive.to_linear().extend(1.),
            light_dir: light.direction_to_light().extend(0.),
            light_color: (light.color.to_linear() * light.intensity).extend(1.),
        }
    }
}

pub struct MeshRenderer {
    uniform_buffer: wgpu::Buffer,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    bind_group: wgpu::BindGroup,
    render_pipeline: wgpu::RenderPipeline,
}

impl MeshRenderer {
    pub fn update(&self, queue: &wgpu::Queue, scene: &Scene, view: &View) {
        queue.write_buffer(&self.uniform_buffer, 0, bytes_of(&Uniforms::new(scene, view)));
    }

    pub fn draw<'rpass>(&'rpass self, rpass: &mut impl wgpu::util::RenderEncoder<'rpass>) {
        rpass.set_pipeline(&self.render_pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

pub struct MeshRendererBuilder<'a> {
    scene: &'a Scene,
    color_format: Option<wgpu::TextureFormat>,
    depth_format: Option<wgpu::TextureFormat>,
}

impl<'a> MeshRendererBuilder<'a> {
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

    pub fn build(self, device: &wgpu::Device) -> anyhow::Result<MeshRenderer> {
        let color_format = self
            .color_format
            .ok_or_else(|| anyhow::anyhow!("No color format provided"))?;
        let depth_format = self
            .depth_format
            .ok_or_else(|| anyhow::anyhow!("No depth format provided"))?;

        let mesh = MeshData::from(&self.scene.mesh.geometry);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Mesh Uniform Buffer"),
            size: size_of::<Uniforms>() as _,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Mesh Bind Group Layout"),
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
            label: Some("Mesh Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let shader_module = device.create_shader_module(&wgpu::include_wgsl!("mesh.wgsl"));

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Mesh Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: "vs_main",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: size_of::<Vertex>() as _,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: "fs_main",
                targets: &[color_format.into()],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        Ok(MeshRenderer {
            uniform_buffer,
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as _,
            bind_group,
            render_pipeline,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniforms_have_no_implicit_padding() {
        assert_eq!(size_of::<Uniforms>(), 3 * 64 + 4 * 16);
    }

    #[test]
    fn uniforms_follow_mesh_rotation() {
        let mut scene = Scene::new();
        let mut scheduler = crate::frame::FrameScheduler::new();
        let view = View::default();

        let rest = Uniforms::new(&scene, &view);
        assert_eq!(rest.m_mat, Mat4::IDENTITY);

        scene.mount(&mut scheduler);
        for _ in 0..10 {
            scheduler.tick(&mut scene);
        }
        let turned = Uniforms::new(&scene, &view);
        assert_ne!(turned.m_mat, Mat4::IDENTITY);
        assert_eq!(turned.color, turned.emissive);
        assert_eq!(turned.light_dir.w, 0.);
    }
}
