//! A rotating cylinder wrapped in a sparkle halo, drawn with wgpu.
//!
//! [`entity::Scene`] is the whole scene declaration. [`frame::FrameScheduler`]
//! drives the per-frame update of its mesh, and [`renderer::Renderer`]
//! rasterizes it.

pub mod app;
pub mod color;
pub mod component;
pub mod controls;
pub mod entity;
pub mod frame;
pub mod geometry;
pub mod renderer;
pub mod sparkles;
pub mod window;
