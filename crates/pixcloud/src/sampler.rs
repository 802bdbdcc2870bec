//! Pulls the current video frame and scales it to the point grid resolution.

use crate::video::VideoSource;
use image::imageops::{self, FilterType};

/// Reusable RGBA scratch buffer filled from the video source each tick.
#[derive(Debug, Default)]
pub struct FrameSampler {
    rgba: Vec<u8>,
}

impl FrameSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples the source's current frame at `width x height`.
    ///
    /// Returns `None` when the source has no frame ready; the caller keeps
    /// its previous geometry in that case. Otherwise returns exactly
    /// `width * height * 4` bytes in R,G,B,A order with opaque alpha.
    pub fn sample(
        &mut self,
        source: &dyn VideoSource,
        width: u32,
        height: u32,
    ) -> Option<&[u8]> {
        if !source.is_ready() || width == 0 || height == 0 {
            return None;
        }
        let frame = source.current_frame()?;
        if frame.width() == 0 || frame.height() == 0 {
            return None;
        }

        let len = width as usize * height as usize * 4;
        self.rgba.resize(len, 255);

        if frame.dimensions() == (width, height) {
            expand_rgb(frame.as_raw(), &mut self.rgba);
        } else {
            let scaled = imageops::resize(frame, width, height, FilterType::Triangle);
            expand_rgb(scaled.as_raw(), &mut self.rgba);
        }

        Some(&self.rgba)
    }
}

/// Copies packed RGB into packed RGBA, forcing alpha to 255.
fn expand_rgb(rgb: &[u8], rgba: &mut [u8]) {
    for (src, dst) in rgb.chunks_exact(3).zip(rgba.chunks_exact_mut(4)) {
        dst[..3].copy_from_slice(src);
        dst[3] = 255;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::{NoSignal, TestPattern};
    use image::{Rgb, RgbImage};

    #[test]
    fn not_ready_source_is_skipped() {
        let mut sampler = FrameSampler::new();
        assert!(sampler.sample(&NoSignal, 640, 480).is_none());
    }

    #[test]
    fn same_size_frame_is_copied_verbatim() {
        let frame = RgbImage::from_fn(4, 2, |x, y| Rgb([x as u8 * 10, y as u8 * 20, 7]));
        let mut sampler = FrameSampler::new();
        let rgba = sampler.sample(&frame, 4, 2).unwrap();

        assert_eq!(rgba.len(), 4 * 2 * 4);
        // pixel (3, 1)
        assert_eq!(&rgba[(1 * 4 + 3) * 4..][..4], &[30, 20, 7, 255]);
    }

    #[test]
    fn scaled_output_has_exact_length_and_opaque_alpha() {
        let source = TestPattern::new(1280, 720);
        let mut sampler = FrameSampler::new();

        for (w, h) in [(320, 240), (640, 480), (1280, 720)] {
            let rgba = sampler.sample(&source, w, h).unwrap();
            assert_eq!(rgba.len(), (w * h * 4) as usize);
            assert!(rgba.chunks_exact(4).all(|p| p[3] == 255));
        }
    }

    #[test]
    fn uniform_frame_stays_uniform_after_scaling() {
        let frame = RgbImage::from_pixel(1280, 720, Rgb([200, 100, 50]));
        let mut sampler = FrameSampler::new();
        let rgba = sampler.sample(&frame, 320, 240).unwrap();
        for p in rgba.chunks_exact(4) {
            assert!(p[0].abs_diff(200) <= 1 && p[1].abs_diff(100) <= 1 && p[2].abs_diff(50) <= 1);
            assert_eq!(p[3], 255);
        }
    }
}
