use anyhow::Result;
use log::{debug, info};
use winit::{
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, MouseButton, MouseScrollDelta},
    window::Window,
};

use crate::{
    controls::{Drag, Orbit},
    entity::Scene,
    frame::FrameScheduler,
    renderer::Renderer,
    window::{HasSize, Size},
};

/// Pixels of trackpad scroll that count as one wheel notch.
const PIXELS_PER_NOTCH: f32 = 60.;

pub struct App {
    window: Window,
    scene: Scene,
    scheduler: FrameScheduler<Scene>,
    orbit: Orbit,
    renderer: Renderer,
    cursor: Option<PhysicalPosition<f64>>,
    drag: Option<Drag>,
}

impl App {
    pub async fn new(window: Window) -> Result<Self> {
        let mut scene = Scene::new();
        scene.resize(window.size());
        info!("{:#?}", scene.describe());

        let renderer = Renderer::new(&window, &scene).await?;

        let mut scheduler = FrameScheduler::new();
        scene.mount(&mut scheduler);

        Ok(Self {
            window,
            scene,
            scheduler,
            orbit: Orbit::default(),
            renderer,
            cursor: None,
            drag: None,
        })
    }

    pub fn on_resize(&mut self, size: PhysicalSize<u32>) {
        let size = Size::from(size);
        self.scene.resize(size);
        self.renderer.resize(
            self.scene.viewport.resolve(size),
            self.window.scale_factor() as f32,
        );
    }

    pub fn on_mouse_input(&mut self, state: ElementState, button: MouseButton) {
        self.drag = match (state, button) {
            (ElementState::Pressed, MouseButton::Left) => Some(Drag::Rotate),
            (ElementState::Pressed, MouseButton::Right) => Some(Drag::Pan),
            (ElementState::Released, _) => None,
            _ => self.drag,
        };
    }

    pub fn on_cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        if let (Some(last), Some(gesture)) = (self.cursor, self.drag) {
            let delta = ((position.x - last.x) as f32, (position.y - last.y) as f32);
            self.orbit.drag(
                &self.scene.controls,
                &self.scene.camera,
                gesture,
                delta,
                self.renderer.size(),
            );
        }
        self.cursor = Some(position);
    }

    pub fn on_cursor_left(&mut self) {
        self.cursor = None;
    }

    pub fn on_mouse_scroll(&mut self, delta: MouseScrollDelta) {
        let notches = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => y as f32 / PIXELS_PER_NOTCH,
        };
        self.orbit.zoom(&self.scene.controls, notches);
    }

    pub fn render(&mut self) -> Result<()> {
        let frame = self.scheduler.tick(&mut self.scene);
        debug!(
            "frame {} ({:?}): {:?}",
            frame.index,
            frame.delta,
            self.scene.mesh.orientation()
        );
        self.renderer.render(&self.scene, &self.orbit, &frame)
    }

    pub fn shutdown(&mut self) {
        self.scene.unmount(&mut self.scheduler);
    }
}
