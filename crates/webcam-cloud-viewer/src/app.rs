use crate::{
    config::Config,
    input::InputTranslator,
    renderer::{Renderer, UiOverlay},
    ui, video,
};
use anyhow::Result;
use pixcloud::{FrameLoop, InputEvent, TickOutcome, VisualizationParams};
use std::sync::Arc;
use winit::{
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

pub struct App {
    pub renderer: Renderer,
    pub frame_loop: FrameLoop,
    pub params: VisualizationParams,
    pub input: InputTranslator,
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,
    pub show_panel: bool,
}

impl App {
    pub async fn new(window: Arc<Window>, config: &Config) -> Result<Self> {
        let renderer = Renderer::new(window.clone()).await?;
        let size = renderer.gfx.size;

        let params = config.initial_params();
        let source = video::open_source(config);
        let frame_loop = FrameLoop::new(source, &params, (size.width, size.height));

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &*window,
            None,
            None,
        );

        Ok(Self {
            renderer,
            frame_loop,
            params,
            input: InputTranslator::new(),
            egui_ctx,
            egui_state,
            show_panel: !config.hide_panel,
        })
    }

    /// Reconfigures the surface right away, e.g. after it was lost.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.renderer.resize(new_size);
        self.frame_loop.handle_input(
            InputEvent::Resize {
                width: new_size.width,
                height: new_size.height,
            },
            &self.params,
        );
    }

    /// Returns `true` when egui consumed the event.
    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let response = self.egui_state.on_window_event(window, event);

        // Cursor tracking and resizes are never swallowed by the UI.
        let passthrough = matches!(
            event,
            WindowEvent::CursorMoved { .. } | WindowEvent::Resized(_)
        );
        if response.consumed && !passthrough {
            // A drag that ends over the panel must still end.
            if let WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Released,
                ..
            } = event
            {
                self.frame_loop
                    .handle_input(InputEvent::PointerUp, &self.params);
            }
            return true;
        }

        if let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key: PhysicalKey::Code(KeyCode::Tab),
                    state: ElementState::Pressed,
                    repeat: false,
                    ..
                },
            ..
        } = event
        {
            self.show_panel = !self.show_panel;
        }

        if let Some(input) = self.input.translate(event) {
            self.frame_loop.handle_input(input, &self.params);
        }

        false
    }

    pub fn render(&mut self, window: &Window) -> Result<TickOutcome, wgpu::SurfaceError> {
        let egui_input = self.egui_state.take_egui_input(window);
        self.egui_ctx.begin_frame(egui_input);

        let buffers = self.frame_loop.buffers().buffers();
        ui::draw_hud(
            &self.egui_ctx,
            &ui::HudStats {
                points: buffers.point_count(),
                resolution: buffers.resolution(),
                source: self.frame_loop.source().describe(),
                video_live: self.frame_loop.video_live(),
                z_distance: self.frame_loop.zoom().z_distance(),
            },
        );

        if self.show_panel {
            ui::draw_parameter_panel(&self.egui_ctx, &mut self.params);
        }

        let egui_output = self.egui_ctx.end_frame();
        self.egui_state
            .handle_platform_output(window, egui_output.platform_output);
        let pixels_per_point = self.egui_ctx.pixels_per_point();
        let primitives = self
            .egui_ctx
            .tessellate(egui_output.shapes, pixels_per_point);

        self.renderer.set_overlay(UiOverlay {
            primitives,
            textures_delta: egui_output.textures_delta,
            pixels_per_point,
        });

        self.frame_loop.tick(&self.params, &mut self.renderer)
    }

    pub fn is_running(&self) -> bool {
        self.frame_loop.is_running()
    }

    pub fn stop(&self) {
        self.frame_loop.stop_handle().stop();
    }

    /// Stops the frame loop and frees the video source and GPU buffers.
    pub fn shutdown(self) {
        let Self {
            mut renderer,
            frame_loop,
            ..
        } = self;
        frame_loop.shutdown();
        renderer.release_cloud();
    }
}
