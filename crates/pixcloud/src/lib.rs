//! PIXCLOUD: turns live video frames into a brightness-displaced 3D point cloud.
//!
//! - Every pixel of the sampled frame becomes one point on a centered grid.
//! - Point depth is `brightness * depth_scale * 100`, independent of the colour mode.
//! - Colour comes from one of three visualization modes (normal, depth, gradient).
//! - Rotation blends pointer drags and auto-rotation through first-order damping.
//! - Zoom is a clamped camera distance along +Z.
//!
//! The crate has no GPU or windowing code. Video input and rasterization are
//! reached through the [`VideoSource`] and [`RenderSurface`] traits, driven
//! once per display refresh by [`FrameLoop`].

pub mod buffers;
pub mod camera;
pub mod colorize;
pub mod error;
pub mod frame_loop;
pub mod params;
pub mod rotation;
pub mod sampler;
pub mod video;

pub use buffers::{PointCloudBuffers, ResolutionBufferManager};
pub use camera::ZoomController;
pub use colorize::{colorize, shade};
pub use error::{Error, Result};
pub use frame_loop::{FrameLoop, FramePacket, InputEvent, RenderSurface, StopHandle, TickOutcome};
pub use params::{Resolution, VisualizationMode, VisualizationParams};
pub use rotation::{Rotation, RotationController};
pub use sampler::FrameSampler;
pub use video::{NoSignal, TestPattern, VideoSource};
