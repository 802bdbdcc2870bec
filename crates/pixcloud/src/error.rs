//! Error types for the point cloud core.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// No capture device could be opened (missing device, permission denied, ...).
    #[error("video source unavailable: {0}")]
    VideoUnavailable(String),

    #[error("capture failed: {0}")]
    Capture(String),

    #[error("unknown visualization mode '{0}' (expected normal, depth or gradient)")]
    UnknownMode(String),
}

pub type Result<T> = std::result::Result<T, Error>;
