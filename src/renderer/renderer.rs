use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};

use crate::{
    controls::Orbit,
    entity::Scene,
    frame::Frame,
    renderer::{
        depth::{DepthTarget, DEPTH_TEXTURE_FORMAT},
        mesh::{MeshRenderer, MeshRendererBuilder},
        sparkles::{SparklesRenderer, SparklesRendererBuilder},
        View,
    },
    window::{Size, Window},
};

pub struct Renderer {
    surface: wgpu::Surface,
    surface_format: wgpu::TextureFormat,
    device: wgpu::Device,
    queue: wgpu::Queue,
    size: Size,
    scale_factor: f32,
    depth: DepthTarget,
    mesh_renderer: MeshRenderer,
    sparkles_renderer: SparklesRenderer,
}

impl Renderer {
    pub async fn new(window: &impl Window, scene: &Scene) -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::Backends::PRIMARY);
        let surface = unsafe { instance.create_surface(window) };

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No adapter found")?;
        info!("Using adapter {:?}", adapter.get_info());

        let surface_format = surface
            .get_preferred_format(&adapter)
            .context("No preferred format found")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default(), None)
            .await
            .context("No device found")?;

        let size = scene.viewport.resolve(window.size());
        Self::configure_surface(&surface, &device, surface_format, size);

        let depth = DepthTarget::new(&device, size);

        let mesh_renderer = MeshRendererBuilder::new(scene)
            .color_target_format(surface_format)
            .depth_format(DEPTH_TEXTURE_FORMAT)
            .build(&device)?;

        let sparkles_renderer = SparklesRendererBuilder::new(scene)
            .color_target_format(surface_format)
            .depth_format(DEPTH_TEXTURE_FORMAT)
            .build(&device)?;

        Ok(Self {
            surface,
            surface_format,
            device,
            queue,
            size,
            scale_factor: window.scale_factor() as f32,
            depth,
            mesh_renderer,
            sparkles_renderer,
        })
    }

    fn configure_surface(
        surface: &wgpu::Surface,
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: Size,
    ) {
        if size.is_empty() {
            return;
        }
        surface.configure(
            device,
            &wgpu::SurfaceConfiguration {
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                format,
                width: size.width,
                height: size.height,
                present_mode: wgpu::PresentMode::Fifo,
            },
        )
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn resize(&mut self, size: Size, scale_factor: f32) {
        debug!("Resizing surface to {:?} @{}x", size, scale_factor);
        self.size = size;
        self.scale_factor = scale_factor;
        Self::configure_surface(&self.surface, &self.device, self.surface_format, size);
        if self.depth.size() != size {
            self.depth = DepthTarget::new(&self.device, size);
        }
    }

    pub fn render(&mut self, scene: &Scene, orbit: &Orbit, frame: &Frame) -> Result<()> {
        if self.size.is_empty() {
            return Ok(());
        }

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost or outdated, reconfiguring");
                Self::configure_surface(&self.surface, &self.device, self.surface_format, self.size);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Timed out acquiring surface texture, skipping frame {}", frame.index);
                return Ok(());
            }
            Err(e) => return Err(anyhow!("Failed to acquire surface texture: {:?}", e)),
        };

        let view = View::new(scene, orbit, self.size, self.scale_factor);
        self.mesh_renderer.update(&self.queue, scene, &view);
        self.sparkles_renderer
            .update(&self.queue, scene, &view, frame);

        let surface_texture_view = surface_texture.texture.create_view(&Default::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Command Encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(scene.background.into()),
                        store: true,
                    },
                }],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.texture_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: false,
                    }),
                    stencil_ops: None,
                }),
            });
            self.mesh_renderer.draw(&mut rpass);
            self.sparkles_renderer.draw(&mut rpass);
        }

        self.queue.submit(Some(encoder.finish()));

        surface_texture.present();

        Ok(())
    }
}
