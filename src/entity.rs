use glam::{vec3, EulerRot, Mat4, Quat};
use log::{debug, info};

use crate::{
    color::Color,
    component::{
        Camera, CylinderGeometry, DirectionalLight, Emitter, LambertMaterial, OrbitControls,
        Viewport,
    },
    frame::{Frame, FrameScheduler, SubscriptionHandle},
    window::Size,
};

pub const ROTATION_STEP: f32 = 0.01;

const MESH_COLOR: Color = Color::from_hex(0x468585);
const BACKGROUND_COLOR: Color = Color::from_hex(0xf0f0f0);
const LIGHT_COLOR: Color = Color::from_hex(0x9cdba6);
const SPARKLE_COLOR: Color = Color::from_hex(0xffa500);

/// Euler angles in radians. Never clamped or wrapped.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Orientation {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug)]
pub struct AnimatedMesh {
    pub geometry: CylinderGeometry,
    pub material: LambertMaterial,
    pub emitter: Emitter,
    orientation: Option<Orientation>,
    subscription: Option<SubscriptionHandle>,
}

impl AnimatedMesh {
    pub fn new() -> Self {
        Self {
            geometry: CylinderGeometry::new(1., 1., 1.),
            material: LambertMaterial {
                color: MESH_COLOR,
                emissive: MESH_COLOR,
            },
            emitter: Emitter {
                count: 100,
                scale: 1.,
                size: 6.,
                speed: 0.002,
                noise: 0.2,
                color: SPARKLE_COLOR,
            },
            orientation: None,
            subscription: None,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.orientation.is_some()
    }

    pub fn orientation(&self) -> Option<Orientation> {
        self.orientation
    }

    fn attach(&mut self, subscription: SubscriptionHandle) {
        self.orientation = Some(Orientation::default());
        self.subscription = Some(subscription);
    }

    fn detach(&mut self) -> Option<SubscriptionHandle> {
        self.orientation = None;
        self.subscription.take()
    }

    pub fn on_frame(&mut self, _frame: &Frame) {
        if let Some(orientation) = self.orientation.as_mut() {
            orientation.y += ROTATION_STEP;
            orientation.x += ROTATION_STEP;
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        let Orientation { x, y } = self.orientation.unwrap_or_default();
        Mat4::from_quat(Quat::from_euler(EulerRot::XYZ, x, y, 0.))
    }
}

impl Default for AnimatedMesh {
    fn default() -> Self {
        Self::new()
    }
}

/// The root of the drawable tree. Holds exactly one mesh.
#[derive(Debug)]
pub struct Scene {
    pub viewport: Viewport,
    pub controls: OrbitControls,
    pub light: DirectionalLight,
    pub background: Color,
    pub camera: Camera,
    pub mesh: AnimatedMesh,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            viewport: Viewport::FILL,
            controls: OrbitControls {
                enable_zoom: true,
                enable_pan: true,
                enable_rotate: true,
            },
            light: DirectionalLight {
                position: vec3(1., 1., 1.),
                intensity: 10.,
                color: LIGHT_COLOR,
            },
            background: BACKGROUND_COLOR,
            camera: Camera::default(),
            mesh: AnimatedMesh::new(),
        }
    }

    /// Attaches the mesh to the live tree. Mounting a mounted mesh does nothing.
    pub fn mount(&mut self, scheduler: &mut FrameScheduler<Scene>) {
        if self.mesh.is_mounted() {
            return;
        }
        let subscription =
            scheduler.register_frame_listener(|scene: &mut Scene, frame| scene.mesh.on_frame(frame));
        self.mesh.attach(subscription);
        info!("Mesh mounted");
    }

    pub fn unmount(&mut self, scheduler: &mut FrameScheduler<Scene>) {
        if let Some(subscription) = self.mesh.detach() {
            scheduler.cancel(subscription);
            info!("Mesh unmounted");
        }
    }

    pub fn resize(&mut self, size: Size) {
        let size = self.viewport.resolve(size);
        if size.is_empty() {
            debug!("Ignoring degenerate viewport {:?}", size);
            return;
        }
        self.camera.aspect_ratio = size.width as f32 / size.height as f32;
    }

    /// The declarative node tree this scene stands for.
    pub fn describe(&self) -> Node {
        Node::Canvas {
            viewport: self.viewport,
            children: vec![
                Node::OrbitControls(self.controls),
                Node::DirectionalLight(self.light),
                Node::Background(self.background),
                Node::Mesh {
                    geometry: self.mesh.geometry,
                    material: self.mesh.material,
                    children: vec![Node::Sparkles(self.mesh.emitter)],
                },
            ],
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Canvas {
        viewport: Viewport,
        children: Vec<Node>,
    },
    OrbitControls(OrbitControls),
    DirectionalLight(DirectionalLight),
    Background(Color),
    Mesh {
        geometry: CylinderGeometry,
        material: LambertMaterial,
        children: Vec<Node>,
    },
    Sparkles(Emitter),
}

impl Node {
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Canvas { children, .. } | Node::Mesh { children, .. } => children,
            _ => &[],
        }
    }

    /// Number of nodes in this subtree, including itself, that match `pred`.
    pub fn count(&self, pred: &impl Fn(&Node) -> bool) -> usize {
        let own = usize::from(pred(self));
        own + self.children().iter().map(|c| c.count(pred)).sum::<usize>()
    }
}
