//! Live webcam point cloud viewer.
//!
//! Wires the [`pixcloud`] frame loop to a winit window, a wgpu point
//! renderer and an egui parameter panel.

pub mod app;
pub mod config;
pub mod data;
pub mod input;
pub mod renderer;
pub mod ui;
pub mod video;
