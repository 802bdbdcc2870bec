//! Position/colour storage for the point grid, sized to the active resolution.

use crate::params::Resolution;
use rayon::prelude::*;

/// One complete position + colour buffer pair.
///
/// Point `i` lives at `positions[3i..3i + 3]` / `colors[3i..3i + 3]` and maps to
/// pixel `(i % width, i / width)` in row-major order. `x`/`y` are fixed at
/// creation; only `z` and the colours change per frame.
#[derive(Debug, Clone)]
pub struct PointCloudBuffers {
    resolution: Resolution,
    generation: u64,
    positions: Vec<f32>,
    colors: Vec<f32>,
}

impl PointCloudBuffers {
    /// Allocates a centered grid for `resolution` with zero depth and black colours.
    pub fn new(resolution: Resolution, generation: u64) -> Self {
        let width = resolution.width as usize;
        let half_w = resolution.width as f32 / 2.0;
        let half_h = resolution.height as f32 / 2.0;

        let mut positions = vec![0.0f32; resolution.point_count() * 3];
        positions
            .par_chunks_exact_mut(3)
            .enumerate()
            .for_each(|(i, p)| {
                let x = (i % width) as f32;
                let y = (i / width) as f32;
                p[0] = x - half_w;
                p[1] = -(y - half_h);
            });

        Self {
            resolution,
            generation,
            positions,
            colors: vec![0.0f32; resolution.point_count() * 3],
        }
    }

    #[inline]
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Identifies this allocation; bumps every time the pair is replaced.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.resolution.point_count()
    }

    /// Flat `[x, y, z]` triples.
    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Flat `[r, g, b]` triples, not clamped.
    #[inline]
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Mutable views of both arrays for the colorization pass.
    #[inline]
    pub fn split_mut(&mut self) -> (&mut [f32], &mut [f32]) {
        (&mut self.positions, &mut self.colors)
    }
}

/// Owns the live [`PointCloudBuffers`] and replaces them on resolution change.
#[derive(Debug)]
pub struct ResolutionBufferManager {
    buffers: PointCloudBuffers,
}

impl ResolutionBufferManager {
    pub fn new(resolution: Resolution) -> Self {
        let resolution = resolution.clamped();
        log::debug!("Allocating point buffers at {} ({} points)", resolution, resolution.point_count());
        Self {
            buffers: PointCloudBuffers::new(resolution, 0),
        }
    }

    #[inline]
    pub fn resolution(&self) -> Resolution {
        self.buffers.resolution
    }

    #[inline]
    pub fn buffers(&self) -> &PointCloudBuffers {
        &self.buffers
    }

    #[inline]
    pub fn buffers_mut(&mut self) -> &mut PointCloudBuffers {
        &mut self.buffers
    }

    /// Rebuilds the buffers for `width x height`, clamped into the accepted ranges.
    ///
    /// Zero dimensions are rejected and the resolution already in effect is
    /// kept as-is. Otherwise a fresh pair is built off to the side and swapped
    /// in by assignment, so readers only ever observe a complete pair.
    /// Returns `true` when the buffers were replaced.
    pub fn set_resolution(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            log::warn!("Ignoring resolution request {}x{}", width, height);
            return false;
        }

        let resolution = Resolution::new(width, height).clamped();
        if resolution == self.buffers.resolution {
            return false;
        }

        let next = PointCloudBuffers::new(resolution, self.buffers.generation + 1);
        let prev = std::mem::replace(&mut self.buffers, next);

        log::debug!(
            "Point buffers rebuilt: {} -> {} ({} points, generation {})",
            prev.resolution,
            resolution,
            resolution.point_count(),
            self.buffers.generation
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{HEIGHT_RANGE, HEIGHT_STEP, WIDTH_RANGE, WIDTH_STEP};

    fn assert_grid(buffers: &PointCloudBuffers) {
        let Resolution { width, height } = buffers.resolution();
        assert_eq!(buffers.positions().len(), (width * height * 3) as usize);
        assert_eq!(buffers.colors().len(), (width * height * 3) as usize);

        for (i, p) in buffers.positions().chunks_exact(3).enumerate() {
            let x = (i as u32 % width) as f32;
            let y = (i as u32 / width) as f32;
            assert_eq!(p[0], x - width as f32 / 2.0);
            assert_eq!(p[1], -(y - height as f32 / 2.0));
            assert_eq!(p[2], 0.0);
        }
        assert!(buffers.colors().iter().all(|&c| c == 0.0));
    }

    #[test]
    fn every_slider_resolution_gets_an_exact_grid() {
        let mut manager = ResolutionBufferManager::new(Resolution::default());
        for width in WIDTH_RANGE.step_by(WIDTH_STEP as usize) {
            for height in HEIGHT_RANGE.step_by(HEIGHT_STEP as usize) {
                manager.set_resolution(width, height);
                assert_eq!(manager.resolution(), Resolution::new(width, height));
                assert_grid(manager.buffers());
            }
        }
    }

    #[test]
    fn odd_sizes_are_centered_on_half_pixels() {
        let buffers = PointCloudBuffers::new(Resolution::new(3, 1), 0);
        assert_eq!(buffers.positions(), &[-1.5, 0.5, 0.0, -0.5, 0.5, 0.0, 0.5, 0.5, 0.0]);
    }

    #[test]
    fn out_of_range_requests_are_clamped() {
        let mut manager = ResolutionBufferManager::new(Resolution::default());
        assert!(manager.set_resolution(5000, 10));
        assert_eq!(manager.resolution(), Resolution::new(1280, 240));
        assert_grid(manager.buffers());
    }

    #[test]
    fn zero_dimensions_are_a_no_op() {
        let mut manager = ResolutionBufferManager::new(Resolution::default());
        let generation = manager.buffers().generation();
        assert!(!manager.set_resolution(0, 480));
        assert!(!manager.set_resolution(640, 0));
        assert_eq!(manager.resolution(), Resolution::new(640, 480));
        assert_eq!(manager.buffers().generation(), generation);
    }

    #[test]
    fn rebuild_replaces_colors_and_bumps_generation() {
        let mut manager = ResolutionBufferManager::new(Resolution::default());
        manager.buffers_mut().split_mut().1.fill(0.7);

        assert!(!manager.set_resolution(640, 480), "same size must not rebuild");
        assert_eq!(manager.buffers().colors()[0], 0.7);

        assert!(manager.set_resolution(320, 240));
        assert_eq!(manager.buffers().generation(), 1);
        assert_grid(manager.buffers());
    }
}
