use clap::{Parser, ValueEnum};
use pixcloud::params::{DEPTH_SCALE_RANGE, POINT_SIZE_RANGE};
use pixcloud::{Resolution, VisualizationMode, VisualizationParams};

/// Where frames come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// A capture device (requires the `webcam` build feature).
    Webcam,
    /// A synthetic animated test pattern.
    Pattern,
}

/// `webcam-cloud` - renders a live video feed as a rotatable 3D point cloud.
///
/// Each sampled pixel becomes a point whose depth follows its brightness.
/// The options below seed the parameter panel; everything can be changed
/// live from the panel afterwards.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Frame source.
    #[arg(long, value_enum, default_value_t = SourceKind::Webcam, env = "CLOUD_SOURCE")]
    pub source: SourceKind,

    /// Index of the capture device to open.
    #[arg(long, default_value_t = 0, env = "CLOUD_CAMERA_INDEX")]
    pub camera_index: u32,

    /// Initial sampling width in pixels; the height follows at 4:3.
    #[arg(long, default_value_t = 640, value_parser = clap::value_parser!(u32).range(320..=1280))]
    pub width: u32,

    /// Initial colour mode: normal, depth or gradient.
    #[arg(long, default_value = "normal")]
    pub mode: VisualizationMode,

    /// Initial point size in pixels.
    #[arg(long, default_value_t = 2.0)]
    pub point_size: f32,

    /// Initial depth scale.
    #[arg(long, default_value_t = 1.0)]
    pub depth_scale: f32,

    /// Start with auto-rotation enabled.
    #[arg(long)]
    pub auto_rotate: bool,

    /// Start with the parameter panel hidden (toggle with Tab).
    #[arg(long)]
    pub hide_panel: bool,
}

impl Config {
    /// Panel parameters at startup.
    pub fn initial_params(&self) -> VisualizationParams {
        VisualizationParams {
            point_size: self
                .point_size
                .clamp(*POINT_SIZE_RANGE.start(), *POINT_SIZE_RANGE.end()),
            depth_scale: self
                .depth_scale
                .clamp(*DEPTH_SCALE_RANGE.start(), *DEPTH_SCALE_RANGE.end()),
            auto_rotate: self.auto_rotate,
            visualization_mode: self.mode,
            resolution: Resolution::from_width(self.width),
            ..Default::default()
        }
    }
}
