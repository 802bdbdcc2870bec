//! Entry point for the webcam point cloud viewer.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use webcam_cloud_viewer::{app::App, config::Config};
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

fn main() -> Result<()> {
    // Initialize logging; default to "info" if RUST_LOG is unset.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();

    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Webcam Point Cloud")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
            .build(&event_loop)?,
    );

    let mut app = Some(pollster::block_on(App::new(window.clone(), &config))?);

    event_loop.run(move |event, elwt| {
        elwt.set_control_flow(ControlFlow::Poll);

        match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => {
                let Some(app) = app.as_mut() else {
                    return;
                };
                if !app.handle_event(&window, &event) {
                    match event {
                        WindowEvent::CloseRequested => {
                            app.stop();
                            elwt.exit();
                        }
                        WindowEvent::KeyboardInput { event, .. } => {
                            if event.physical_key == PhysicalKey::Code(KeyCode::Escape) {
                                app.stop();
                                elwt.exit();
                            }
                        }
                        WindowEvent::RedrawRequested => match app.render(&window) {
                            Ok(_) => {}
                            Err(wgpu::SurfaceError::Lost) => {
                                app.resize(app.renderer.gfx.size);
                            }
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                log::error!("WGPU out of memory, exiting.");
                                app.stop();
                                elwt.exit();
                            }
                            Err(e) => log::error!("Render error: {:?}", e),
                        },
                        _ => {}
                    }
                }
            }
            Event::AboutToWait => {
                if app.as_ref().is_some_and(App::is_running) {
                    window.request_redraw();
                }
            }
            Event::LoopExiting => {
                if let Some(app) = app.take() {
                    app.shutdown();
                }
            }
            _ => {}
        }
    })?;

    Ok(())
}
