//! User-tunable visualization parameters.
//!
//! The parameter panel owns a [`VisualizationParams`] and mutates it between
//! frames; every core component reads it by reference on each call, so all
//! fields are effectively hot-reloaded.

use crate::error::Error;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Accepted sampling widths, in pixels.
pub const WIDTH_RANGE: RangeInclusive<u32> = 320..=1280;
/// Accepted sampling heights, in pixels.
pub const HEIGHT_RANGE: RangeInclusive<u32> = 240..=720;
/// Slider quantization of the width control.
pub const WIDTH_STEP: u32 = 160;
/// Slider quantization of the height control.
pub const HEIGHT_STEP: u32 = 120;

pub const POINT_SIZE_RANGE: RangeInclusive<f32> = 1.0..=5.0;
pub const DEPTH_SCALE_RANGE: RangeInclusive<f32> = 0.5..=5.0;
pub const ROTATION_SPEED_RANGE: RangeInclusive<f32> = 0.01..=0.5;
pub const COLOR_INTENSITY_RANGE: RangeInclusive<f32> = 0.1..=2.0;
pub const CHANNEL_MULTIPLIER_RANGE: RangeInclusive<f32> = 0.0..=2.0;
pub const AUTO_ROTATE_SPEED_RANGE: RangeInclusive<f32> = 0.001..=0.05;

/// Sampling resolution of the point grid: one point per sampled pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of points (and sampled pixels) at this resolution.
    #[inline]
    pub fn point_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Resolution for a new width, keeping the 4:3 aspect (height = round(width * 3/4)).
    pub fn from_width(width: u32) -> Self {
        let height = (width as f64 * 0.75).round() as u32;
        Self { width, height }.clamped()
    }

    /// Resolution for a new height, keeping the 4:3 aspect (width = round(height * 4/3)).
    pub fn from_height(height: u32) -> Self {
        let width = (height as f64 * 4.0 / 3.0).round() as u32;
        Self { width, height }.clamped()
    }

    /// Clamps both dimensions into [`WIDTH_RANGE`] and [`HEIGHT_RANGE`].
    pub fn clamped(self) -> Self {
        Self {
            width: self.width.clamp(*WIDTH_RANGE.start(), *WIDTH_RANGE.end()),
            height: self.height.clamp(*HEIGHT_RANGE.start(), *HEIGHT_RANGE.end()),
        }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::new(640, 480)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// How per-point colour is derived from the sampled pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VisualizationMode {
    /// Camera colour scaled by intensity and per-channel multipliers.
    #[default]
    Normal,
    /// Grayscale brightness.
    Depth,
    /// Red rises and blue falls with brightness; green fixed at 0.5.
    Gradient,
}

impl VisualizationMode {
    pub const ALL: [VisualizationMode; 3] = [Self::Normal, Self::Depth, Self::Gradient];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Depth => "depth",
            Self::Gradient => "gradient",
        }
    }
}

impl fmt::Display for VisualizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VisualizationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownMode(s.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualizationParams {
    /// Rendered point sprite size in pixels.
    pub point_size: f32,
    /// Multiplier on the brightness-derived depth (`z = b * depth_scale * 100`).
    pub depth_scale: f32,
    /// Damping factor in (0, 1]; fraction of the remaining rotation applied per frame.
    pub rotation_speed: f32,
    pub color_intensity: f32,
    pub red_multiplier: f32,
    pub green_multiplier: f32,
    pub blue_multiplier: f32,

    pub auto_rotate: bool,
    /// Radians added to the target Y rotation each frame while auto-rotating.
    pub auto_rotate_speed: f32,
    /// Freezes rotation: drags, auto-rotation and damping are all suppressed.
    pub lock_rotation: bool,

    pub visualization_mode: VisualizationMode,
    pub resolution: Resolution,
}

impl Default for VisualizationParams {
    fn default() -> Self {
        Self {
            point_size: 2.0,
            depth_scale: 1.0,
            rotation_speed: 0.1,
            color_intensity: 1.0,
            red_multiplier: 1.0,
            green_multiplier: 1.0,
            blue_multiplier: 1.0,

            auto_rotate: false,
            auto_rotate_speed: 0.01,
            lock_rotation: false,

            visualization_mode: VisualizationMode::Normal,
            resolution: Resolution::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_change_keeps_four_by_three() {
        assert_eq!(Resolution::from_width(800), Resolution::new(800, 600));
        assert_eq!(Resolution::from_width(320), Resolution::new(320, 240));
        assert_eq!(Resolution::from_width(960), Resolution::new(960, 720));
    }

    #[test]
    fn height_change_keeps_four_by_three() {
        assert_eq!(Resolution::from_height(360), Resolution::new(480, 360));
        assert_eq!(Resolution::from_height(720), Resolution::new(960, 720));
    }

    #[test]
    fn linked_dimension_is_clamped() {
        // 1280 * 3/4 = 960 exceeds the height range.
        assert_eq!(Resolution::from_width(1280), Resolution::new(1280, 720));
    }

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("Depth".parse::<VisualizationMode>().unwrap(), VisualizationMode::Depth);
        assert_eq!(" gradient ".parse::<VisualizationMode>().unwrap(), VisualizationMode::Gradient);
        assert!(matches!(
            "thermal".parse::<VisualizationMode>(),
            Err(Error::UnknownMode(m)) if m == "thermal"
        ));
    }

    #[test]
    fn defaults_match_panel_startup_values() {
        let p = VisualizationParams::default();
        assert_eq!(p.resolution, Resolution::new(640, 480));
        assert_eq!(p.visualization_mode, VisualizationMode::Normal);
        assert!(!p.auto_rotate && !p.lock_rotation);
        assert_eq!(p.point_size, 2.0);
    }
}
