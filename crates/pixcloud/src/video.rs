//! Video input seam and the built-in sources that need no capture hardware.

use image::{Rgb, RgbImage};

/// A polled supplier of decoded RGB frames.
///
/// The frame loop calls [`refresh`](VideoSource::refresh) once per tick and
/// then reads the latest frame, if any. Sources never block the caller.
pub trait VideoSource {
    /// Picks up a newer frame if one has arrived since the last call.
    fn refresh(&mut self) {}

    /// `true` once at least one decoded frame is available.
    fn is_ready(&self) -> bool;

    /// Dimensions of the current frame, if any.
    fn frame_size(&self) -> Option<(u32, u32)> {
        self.current_frame().map(|f| f.dimensions())
    }

    /// The most recent decoded frame.
    fn current_frame(&self) -> Option<&RgbImage>;

    /// Short human-readable label for logs and the HUD.
    fn describe(&self) -> String;
}

/// A source that never produces frames; the point cloud stays static.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSignal;

impl VideoSource for NoSignal {
    fn is_ready(&self) -> bool {
        false
    }

    fn current_frame(&self) -> Option<&RgbImage> {
        None
    }

    fn describe(&self) -> String {
        "no signal".to_string()
    }
}

/// Synthetic animated frames: a diagonal colour sweep with a bright moving disc.
#[derive(Debug, Clone)]
pub struct TestPattern {
    frame: RgbImage,
    tick: u64,
}

impl TestPattern {
    pub fn new(width: u32, height: u32) -> Self {
        let mut pattern = Self {
            frame: RgbImage::new(width.max(1), height.max(1)),
            tick: 0,
        };
        pattern.render();
        pattern
    }

    /// Frames produced so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    fn render(&mut self) {
        let (w, h) = self.frame.dimensions();
        let phase = self.tick as f32 * 0.03;
        let (cx, cy) = (
            w as f32 * (0.5 + 0.3 * phase.cos()),
            h as f32 * (0.5 + 0.3 * (phase * 1.3).sin()),
        );
        let radius = w.min(h) as f32 * 0.2;

        for (x, y, px) in self.frame.enumerate_pixels_mut() {
            let u = x as f32 / w as f32;
            let v = y as f32 / h as f32;
            let (dx, dy) = (x as f32 - cx, y as f32 - cy);
            let disc = (1.0 - (dx * dx + dy * dy).sqrt() / radius).clamp(0.0, 1.0);

            let r = 0.5 + 0.5 * (u * 6.0 + phase).sin();
            let g = 0.5 + 0.5 * (v * 6.0 - phase).sin();
            let b = 1.0 - u * v;
            *px = Rgb([
                to_byte(r * 0.6 + disc),
                to_byte(g * 0.6 + disc),
                to_byte(b * 0.6 + disc),
            ]);
        }
    }
}

#[inline]
fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl VideoSource for TestPattern {
    fn refresh(&mut self) {
        self.tick += 1;
        self.render();
    }

    fn is_ready(&self) -> bool {
        true
    }

    fn current_frame(&self) -> Option<&RgbImage> {
        Some(&self.frame)
    }

    fn describe(&self) -> String {
        let (w, h) = self.frame.dimensions();
        format!("test pattern {}x{}", w, h)
    }
}

/// A fixed frame, always ready. Handy for stills and tests.
impl VideoSource for RgbImage {
    fn is_ready(&self) -> bool {
        true
    }

    fn current_frame(&self) -> Option<&RgbImage> {
        Some(self)
    }

    fn describe(&self) -> String {
        format!("still {}x{}", self.width(), self.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_signal_is_never_ready() {
        let mut src = NoSignal;
        src.refresh();
        assert!(!src.is_ready());
        assert_eq!(src.frame_size(), None);
    }

    #[test]
    fn test_pattern_animates() {
        let mut src = TestPattern::new(64, 48);
        assert!(src.is_ready());
        assert_eq!(src.frame_size(), Some((64, 48)));

        let before = src.current_frame().unwrap().clone();
        src.refresh();
        assert_eq!(src.tick(), 1);
        assert_ne!(&before, src.current_frame().unwrap());
    }
}
