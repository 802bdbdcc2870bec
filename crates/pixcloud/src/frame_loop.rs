//! Per-refresh coordination: sample, colorize, rotate, present.

use crate::{
    buffers::ResolutionBufferManager,
    camera::ZoomController,
    colorize::colorize,
    params::{Resolution, VisualizationParams},
    rotation::RotationController,
    sampler::FrameSampler,
    video::VideoSource,
};
use glam::Mat4;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Discrete input delivered by the host window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    /// Browser-style wheel delta in pixels; positive moves the camera away.
    Wheel { delta_y: f32 },
    /// New viewport size in physical pixels.
    Resize { width: u32, height: u32 },
}

/// Everything a render surface needs to draw one frame.
#[derive(Debug)]
pub struct FramePacket<'a> {
    /// Flat `[x, y, z]` triples.
    pub positions: &'a [f32],
    /// Flat `[r, g, b]` triples; may exceed 1 in normal mode.
    pub colors: &'a [f32],
    /// Changes whenever the buffers were replaced wholesale.
    pub generation: u64,
    pub resolution: Resolution,
    /// `true` if positions/colours were rewritten this tick.
    pub geometry_updated: bool,
    pub point_size: f32,
    /// Point cloud orientation.
    pub model: Mat4,
    pub view_proj: Mat4,
}

impl FramePacket<'_> {
    #[inline]
    pub fn point_count(&self) -> usize {
        self.positions.len() / 3
    }
}

/// Rasterizing backend fed once per tick.
pub trait RenderSurface {
    type Error;

    /// Viewport changed; recompute swapchain/targets.
    fn resize(&mut self, width: u32, height: u32);

    fn present(&mut self, packet: &FramePacket<'_>) -> Result<(), Self::Error>;
}

/// Cancels a [`FrameLoop`]; cloneable so the host can hold one.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// A frame was handed to the surface. `sampled` is false when the video
    /// was not ready and the previous geometry was reused.
    Presented { sampled: bool },
    /// The loop was stopped; nothing was drawn and no further ticks should be scheduled.
    Stopped,
}

pub struct FrameLoop {
    buffers: ResolutionBufferManager,
    sampler: FrameSampler,
    rotation: RotationController,
    zoom: ZoomController,
    source: Box<dyn VideoSource>,
    stop: StopHandle,
    pending_viewport: Option<(u32, u32)>,
    video_live: bool,
    ticks: u64,
}

impl FrameLoop {
    pub fn new(
        source: Box<dyn VideoSource>,
        params: &VisualizationParams,
        viewport: (u32, u32),
    ) -> Self {
        log::info!(
            "Frame loop starting: source={}, resolution={}, viewport={}x{}",
            source.describe(),
            params.resolution,
            viewport.0,
            viewport.1
        );

        Self {
            buffers: ResolutionBufferManager::new(params.resolution),
            sampler: FrameSampler::new(),
            rotation: RotationController::new(),
            zoom: ZoomController::new(viewport.0, viewport.1),
            source,
            stop: StopHandle::default(),
            pending_viewport: None,
            video_live: false,
            ticks: 0,
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.stop.is_stopped()
    }

    pub fn buffers(&self) -> &ResolutionBufferManager {
        &self.buffers
    }

    pub fn rotation(&self) -> &RotationController {
        &self.rotation
    }

    pub fn zoom(&self) -> &ZoomController {
        &self.zoom
    }

    pub fn source(&self) -> &dyn VideoSource {
        self.source.as_ref()
    }

    /// Whether the last tick sampled a fresh video frame.
    pub fn video_live(&self) -> bool {
        self.video_live
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Applies one input event immediately to the controllers.
    pub fn handle_input(&mut self, event: InputEvent, params: &VisualizationParams) {
        match event {
            InputEvent::PointerDown { x, y } => self.rotation.on_pointer_down(x, y, params),
            InputEvent::PointerMove { x, y } => self.rotation.on_pointer_move(x, y, params),
            InputEvent::PointerUp => self.rotation.on_pointer_up(),
            InputEvent::Wheel { delta_y } => {
                self.zoom.on_wheel(delta_y);
            }
            InputEvent::Resize { width, height } => {
                if width > 0 && height > 0 {
                    self.zoom.set_viewport(width, height);
                    self.pending_viewport = Some((width, height));
                }
            }
        }
    }

    /// Runs one frame against `surface`.
    pub fn tick<S: RenderSurface>(
        &mut self,
        params: &VisualizationParams,
        surface: &mut S,
    ) -> Result<TickOutcome, S::Error> {
        if self.stop.is_stopped() {
            return Ok(TickOutcome::Stopped);
        }
        self.ticks += 1;

        // Panel edits take effect on the next tick.
        let wanted = params.resolution;
        self.buffers.set_resolution(wanted.width, wanted.height);
        let Resolution { width, height } = self.buffers.resolution();

        self.source.refresh();
        let sampled = match self.sampler.sample(self.source.as_ref(), width, height) {
            Some(rgba) => {
                let (positions, colors) = self.buffers.buffers_mut().split_mut();
                colorize(rgba, params, positions, colors);
                true
            }
            None => false,
        };
        if sampled != self.video_live {
            if sampled {
                log::info!("Video frames arriving from {}", self.source.describe());
            } else {
                log::warn!("Video not ready; holding last geometry");
            }
            self.video_live = sampled;
        }

        self.rotation.advance(params);

        if let Some((w, h)) = self.pending_viewport.take() {
            surface.resize(w, h);
        }

        let buffers = self.buffers.buffers();
        let packet = FramePacket {
            positions: buffers.positions(),
            colors: buffers.colors(),
            generation: buffers.generation(),
            resolution: buffers.resolution(),
            geometry_updated: sampled,
            point_size: params.point_size,
            model: self.rotation.orientation(),
            view_proj: self.zoom.view_proj(),
        };
        surface.present(&packet)?;

        Ok(TickOutcome::Presented { sampled })
    }

    /// Stops the loop and releases the video source and point buffers.
    pub fn shutdown(self) {
        self.stop.stop();
        log::info!(
            "Frame loop shut down after {} ticks (source: {})",
            self.ticks,
            self.source.describe()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::NoSignal;

    #[derive(Default)]
    struct CountingSurface {
        presents: usize,
        resizes: Vec<(u32, u32)>,
    }

    impl RenderSurface for CountingSurface {
        type Error = std::convert::Infallible;

        fn resize(&mut self, width: u32, height: u32) {
            self.resizes.push((width, height));
        }

        fn present(&mut self, _packet: &FramePacket<'_>) -> Result<(), Self::Error> {
            self.presents += 1;
            Ok(())
        }
    }

    #[test]
    fn stop_handle_halts_ticks() {
        let params = VisualizationParams::default();
        let mut fl = FrameLoop::new(Box::new(NoSignal), &params, (800, 600));
        let mut surface = CountingSurface::default();

        assert_eq!(fl.tick(&params, &mut surface).unwrap(), TickOutcome::Presented { sampled: false });
        fl.stop_handle().stop();
        assert!(!fl.is_running());
        assert_eq!(fl.tick(&params, &mut surface).unwrap(), TickOutcome::Stopped);
        assert_eq!(surface.presents, 1);
        assert_eq!(fl.ticks(), 1);
    }

    #[test]
    fn resize_is_forwarded_once_on_next_tick() {
        let params = VisualizationParams::default();
        let mut fl = FrameLoop::new(Box::new(NoSignal), &params, (800, 600));
        let mut surface = CountingSurface::default();

        fl.handle_input(InputEvent::Resize { width: 0, height: 0 }, &params);
        fl.handle_input(InputEvent::Resize { width: 1024, height: 512 }, &params);
        assert_eq!(fl.zoom().aspect(), 2.0);

        fl.tick(&params, &mut surface).unwrap();
        fl.tick(&params, &mut surface).unwrap();
        assert_eq!(surface.resizes, vec![(1024, 512)]);
    }

    #[test]
    fn wheel_and_drag_reach_controllers() {
        let params = VisualizationParams::default();
        let mut fl = FrameLoop::new(Box::new(NoSignal), &params, (800, 600));

        fl.handle_input(InputEvent::Wheel { delta_y: 300.0 }, &params);
        assert_eq!(fl.zoom().z_distance(), 1300.0);

        fl.handle_input(InputEvent::PointerDown { x: 0.0, y: 0.0 }, &params);
        fl.handle_input(InputEvent::PointerMove { x: 10.0, y: 0.0 }, &params);
        fl.handle_input(InputEvent::PointerUp, &params);
        assert!(fl.rotation().target().y > 0.0);
        assert!(!fl.rotation().is_dragging());
    }
}
