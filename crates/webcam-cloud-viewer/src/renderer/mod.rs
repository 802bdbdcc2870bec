//! The rendering orchestrator. Owns the GPU context, the depth target, the
//! point pipeline and the egui overlay renderer, and implements
//! [`pixcloud::RenderSurface`] on top of them.

pub mod context;
pub mod pipelines;
pub mod targets;

use self::{context::GfxContext, pipelines::points::PointsPipeline, targets::Targets};
use crate::data::{point_cloud, types::CloudGpu};
use pixcloud::{FramePacket, RenderSurface};
use std::sync::Arc;
use winit::window::Window;

/// Tessellated egui output waiting to be drawn over the next frame.
pub struct UiOverlay {
    pub primitives: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

/// Owns all rendering-related state.
pub struct Renderer {
    pub gfx: GfxContext,
    pub targets: Targets,
    pub points: PointsPipeline,
    pub egui_renderer: egui_wgpu::Renderer,
    cloud: Option<CloudGpu>,
    overlay: Option<UiOverlay>,
}

impl Renderer {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let gfx = GfxContext::new(window).await?;
        let targets = Targets::new(&gfx.device, gfx.size);
        let points = PointsPipeline::new(&gfx.device, gfx.config.format, targets.depth_fmt);

        // Single-sample overlay with no depth attachment.
        let egui_renderer =
            egui_wgpu::Renderer::new(&gfx.device, gfx.config.format, None, 1);

        Ok(Self {
            gfx,
            targets,
            points,
            egui_renderer,
            cloud: None,
            overlay: None,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.gfx.resize(new_size);
            self.targets.resize(&self.gfx.device, new_size);
        }
    }

    /// Queues UI output to be composited over the next presented frame.
    ///
    /// If the previous overlay never made it to the screen, its texture
    /// updates are carried over so egui's font atlas is not lost.
    pub fn set_overlay(&mut self, mut overlay: UiOverlay) {
        if let Some(stale) = self.overlay.take() {
            let mut delta = stale.textures_delta;
            delta.append(overlay.textures_delta);
            overlay.textures_delta = delta;
        }
        self.overlay = Some(overlay);
    }

    /// Releases the GPU point buffers.
    pub fn release_cloud(&mut self) {
        if let Some(cloud) = self.cloud.take() {
            log::debug!("Releasing GPU buffers for generation {}", cloud.generation);
        }
    }
}

impl RenderSurface for Renderer {
    type Error = wgpu::SurfaceError;

    fn resize(&mut self, width: u32, height: u32) {
        Renderer::resize(self, winit::dpi::PhysicalSize::new(width, height));
    }

    fn present(&mut self, packet: &FramePacket<'_>) -> Result<(), Self::Error> {
        point_cloud::sync_cloud(&self.gfx.device, &self.gfx.queue, &mut self.cloud, packet);

        let uniform = point_cloud::make_uniform(packet, self.gfx.viewport_size());
        self.points.write_uniform(&self.gfx.queue, &uniform);

        let frame = self.gfx.surface.get_current_texture()?;
        let swap_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let overlay = self.overlay.take();

        let mut encoder = self
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gfx.config.width, self.gfx.config.height],
            pixels_per_point: overlay.as_ref().map_or(1.0, |o| o.pixels_per_point),
        };

        let mut command_buffers = Vec::new();
        if let Some(ui) = &overlay {
            for (id, delta) in &ui.textures_delta.set {
                self.egui_renderer
                    .update_texture(&self.gfx.device, &self.gfx.queue, *id, delta);
            }
            command_buffers = self.egui_renderer.update_buffers(
                &self.gfx.device,
                &self.gfx.queue,
                &mut encoder,
                &ui.primitives,
                &screen_descriptor,
            );
        }

        // Pass 1: points
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Point Cloud Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &swap_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(cloud) = &self.cloud {
                self.points.draw(&mut pass, cloud);
            }
        }

        // Pass 2: UI overlay
        if let Some(ui) = &overlay {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("EGUI Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &swap_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.egui_renderer
                .render(&mut pass, &ui.primitives, &screen_descriptor);
        }

        if let Some(ui) = &overlay {
            for id in &ui.textures_delta.free {
                self.egui_renderer.free_texture(id);
            }
        }

        command_buffers.push(encoder.finish());
        self.gfx.queue.submit(command_buffers);
        frame.present();

        Ok(())
    }
}
