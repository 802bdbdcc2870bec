//! Per-pixel depth and colour derivation.

use crate::params::{VisualizationMode, VisualizationParams};
use rayon::prelude::*;

/// Depth units per unit of brightness at `depth_scale == 1`.
pub const DEPTH_UNITS: f32 = 100.0;

/// Maps one pixel to `(z, [r, g, b])`.
///
/// Channels are normalized bytes; brightness is their mean. Depth always
/// follows brightness. `Normal` colours are not clamped and may exceed 1.
#[inline]
pub fn shade(rgb: [u8; 3], params: &VisualizationParams) -> (f32, [f32; 3]) {
    let r = rgb[0] as f32 / 255.0;
    let g = rgb[1] as f32 / 255.0;
    let b = rgb[2] as f32 / 255.0;
    let brightness = (r + g + b) / 3.0;

    let z = brightness * params.depth_scale * DEPTH_UNITS;

    let color = match params.visualization_mode {
        VisualizationMode::Normal => [
            r * params.color_intensity * params.red_multiplier,
            g * params.color_intensity * params.green_multiplier,
            b * params.color_intensity * params.blue_multiplier,
        ],
        VisualizationMode::Depth => [brightness; 3],
        VisualizationMode::Gradient => [brightness, 0.5, 1.0 - brightness],
    };

    (z, color)
}

/// Rewrites `z` and colour of every point from an RGBA pixel buffer.
///
/// `rgba` must hold one pixel per point (`positions.len() / 3 * 4` bytes);
/// the sampler guarantees this, so it is only checked in debug builds.
pub fn colorize(
    rgba: &[u8],
    params: &VisualizationParams,
    positions: &mut [f32],
    colors: &mut [f32],
) {
    debug_assert_eq!(positions.len(), colors.len());
    debug_assert_eq!(rgba.len() / 4 * 3, positions.len());

    positions
        .par_chunks_exact_mut(3)
        .zip(colors.par_chunks_exact_mut(3))
        .zip(rgba.par_chunks_exact(4))
        .for_each(|((pos, col), px)| {
            let (z, c) = shade([px[0], px[1], px[2]], params);
            pos[2] = z;
            col.copy_from_slice(&c);
        });
}
