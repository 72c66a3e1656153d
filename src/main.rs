use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{debug, error};
use pollster::FutureExt as _;
use winit::{
    dpi::LogicalSize,
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::WindowBuilder,
};

use teal_lantern::app::App;

fn main() -> Result<()> {
    env_logger::init();

    let event_loop = EventLoop::new();

    let window = WindowBuilder::new()
        .with_title("teal-lantern")
        .with_inner_size(LogicalSize::<u32> {
            width: 1280,
            height: 720,
        })
        .with_maximized(true)
        .build(&event_loop)
        .context("Failed to build window")?;

    let mut last_render_inst = Instant::now();

    let mut app = App::new(window).block_on()?;

    event_loop.run(move |e, _, control_flow| {
        match e {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    app.shutdown();
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => app.on_resize(size),
                WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                    app.on_resize(*new_inner_size)
                }
                WindowEvent::MouseInput { state, button, .. } => app.on_mouse_input(state, button),
                WindowEvent::CursorMoved { position, .. } => app.on_cursor_moved(position),
                WindowEvent::CursorLeft { .. } => app.on_cursor_left(),
                WindowEvent::MouseWheel { delta, .. } => app.on_mouse_scroll(delta),
                _ => (),
            },
            Event::MainEventsCleared => {
                let target_frame_interval = Duration::from_secs_f64(1.0 / 60.0);
                let elapsed_from_last_draw = last_render_inst.elapsed();
                if target_frame_interval > elapsed_from_last_draw {
                    let wait = target_frame_interval - elapsed_from_last_draw;
                    *control_flow = ControlFlow::WaitUntil(Instant::now() + wait);
                    return;
                }

                if let Err(e) = app.render() {
                    error!("{:?}", e);
                    app.shutdown();
                    *control_flow = ControlFlow::Exit;
                    return;
                }

                last_render_inst = Instant::now();
            }
            Event::LoopDestroyed => debug!("Event loop destroyed"),
            _ => (),
        }
    });
}
