// src/data/mod.rs
//! GPU data handling for the point cloud.
//!
//! - Uploads the core's position/colour buffers to vertex buffers.
//! - Defines the uniform layout shared with the point shader.

pub mod point_cloud;
pub mod types;

pub use self::types::{CloudGpu, PointUniformStd140};
