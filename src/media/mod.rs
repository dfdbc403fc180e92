/// Video handling module
///
/// This module handles:
/// - Probing video metadata with ffprobe (probe.rs)
/// - The scoped playable reference for one video (source.rs)
/// - Scrub previews and full-resolution frame capture (frame.rs)

pub mod frame;
pub mod probe;
pub mod source;

pub use frame::{CaptureError, CapturedFrame, PreviewFrame};
pub use probe::{ProbeError, VideoMetadata};
pub use source::VideoSource;

use std::path::PathBuf;

/// Locations of the external ffmpeg tools
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTools {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl Default for MediaTools {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
        }
    }
}
