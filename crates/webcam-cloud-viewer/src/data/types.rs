//! GPU-side data layouts for the point cloud.

use glam::Mat4;

/// Per-frame uniform block, std140 layout.
/// Must match `PointUniform` in the point shader.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct PointUniformStd140 {
    /// Camera view-projection.
    pub view_proj: Mat4,
    /// Point cloud orientation.
    pub model: Mat4,
    /// Size of the viewport in physical pixels.
    pub viewport_size: [f32; 2],
    /// Point sprite edge length in pixels.
    pub point_size_px: f32,
    pub _pad0: f32,
}

// Buffer size must match the WGSL-reflected size.
const _: [(); 144] = [(); core::mem::size_of::<PointUniformStd140>()];

/// GPU copies of one generation of the point buffers.
#[derive(Debug)]
pub struct CloudGpu {
    /// Generation of the CPU buffers these were created from.
    pub generation: u64,
    pub instances_len: u32,

    /// `[f32; 3]` positions, one per instance.
    pub positions: wgpu::Buffer,
    /// `[f32; 3]` colours, one per instance.
    pub colors: wgpu::Buffer,
}
