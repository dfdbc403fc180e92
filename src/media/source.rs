//! Playable reference to a chosen video
//!
//! A `VideoSource` is the desktop counterpart of a browser object URL:
//! it exists for as long as one video asset is loaded, owns a scratch
//! directory where scrub previews are cached, and releases that directory
//! when dropped. Holding it behind an `Arc` lets in-flight preview and
//! capture tasks keep it alive until they finish.

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};

use super::probe::{self, ProbeError, VideoMetadata};
use super::MediaTools;
use crate::state::data::VideoAsset;

/// Application folder under the user cache directory
const CACHE_FOLDER: &str = "cricket-coach";

pub struct VideoSource {
    asset: VideoAsset,
    metadata: VideoMetadata,
    scratch: TempDir,
}

impl VideoSource {
    /// Probe the asset and create its scratch directory
    pub async fn open(asset: VideoAsset, tools: &MediaTools) -> Result<Self, ProbeError> {
        let metadata = probe::probe(&tools.ffprobe, &asset.path).await?;
        let source = Self::new(asset, metadata)?;

        info!(
            "📼 Opened {} ({}x{}, {:.1}s)",
            source.asset.file_name, metadata.width, metadata.height, metadata.duration
        );
        Ok(source)
    }

    /// Wrap already-known metadata
    pub fn new(asset: VideoAsset, metadata: VideoMetadata) -> Result<Self, ProbeError> {
        let scratch = create_scratch_dir().map_err(|e| ProbeError::Scratch(e.to_string()))?;
        debug!("Preview cache for {} at {}", asset.file_name, scratch.path().display());

        Ok(Self { asset, metadata, scratch })
    }

    pub fn asset(&self) -> &VideoAsset {
        &self.asset
    }

    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    pub fn path(&self) -> &Path {
        &self.asset.path
    }

    /// Directory holding cached previews; deleted when the source is dropped
    pub fn scratch_dir(&self) -> &Path {
        self.scratch.path()
    }

    /// Where the preview for a frame index is cached
    pub fn preview_path(&self, frame_index: u64) -> PathBuf {
        self.scratch.path().join(format!("preview-{frame_index}.jpg"))
    }

    /// Last valid playback position in seconds
    pub fn max_position(&self) -> f64 {
        let last_frame = self.metadata.frame_count().saturating_sub(1);
        last_frame as f64 * self.metadata.frame_duration()
    }

    /// Keep a position inside the playable range
    pub fn clamp_position(&self, position: f64) -> f64 {
        if !position.is_finite() {
            return 0.0;
        }
        position.clamp(0.0, self.max_position())
    }

    /// Frame shown at a playback position
    pub fn frame_index(&self, position: f64) -> u64 {
        let position = self.clamp_position(position);
        // Nudge to absorb float error at exact frame boundaries
        ((position * self.metadata.fps) + 1e-6).floor() as u64
    }

    /// Start time of a frame, clamped to the video
    pub fn frame_position(&self, frame_index: u64) -> f64 {
        self.clamp_position(frame_index as f64 * self.metadata.frame_duration())
    }
}

impl Drop for VideoSource {
    fn drop(&mut self) {
        info!("🧹 Released {}", self.asset.file_name);
    }
}

impl std::fmt::Debug for VideoSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoSource")
            .field("file_name", &self.asset.file_name)
            .field("metadata", &self.metadata)
            .field("scratch", &self.scratch.path())
            .finish()
    }
}

/// Create a per-session directory under the user cache dir,
/// falling back to the system temp dir
fn create_scratch_dir() -> std::io::Result<TempDir> {
    if let Some(mut base) = dirs::cache_dir() {
        base.push(CACHE_FOLDER);
        match std::fs::create_dir_all(&base)
            .and_then(|_| tempfile::Builder::new().prefix("session-").tempdir_in(&base))
        {
            Ok(dir) => return Ok(dir),
            Err(e) => warn!("⚠️  Cache dir {} unavailable: {}", base.display(), e),
        }
    }

    tempfile::Builder::new().prefix("cricket-coach-").tempdir()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_source() -> VideoSource {
        let metadata = VideoMetadata { width: 1280, height: 720, duration: 2.0, fps: 25.0 };
        VideoSource::new(VideoAsset::from_path("/clips/swing.mp4"), metadata).unwrap()
    }

    #[test]
    fn test_scratch_dir_released_on_drop() {
        let source = sample_source();
        let scratch = source.scratch_dir().to_path_buf();
        assert!(scratch.exists());

        std::fs::write(source.preview_path(3), b"jpeg").unwrap();
        drop(source);

        assert!(!scratch.exists());
    }

    #[test]
    fn test_frame_math() {
        let source = sample_source();
        assert_eq!(source.frame_index(0.0), 0);
        assert_eq!(source.frame_index(0.04), 1);
        assert_eq!(source.frame_index(1.0), 25);
        // 50 frames, last one starts at 1.96s
        assert!((source.max_position() - 1.96).abs() < 1e-9);
        assert_eq!(source.frame_index(10.0), 49);
        assert!((source.frame_position(49) - 1.96).abs() < 1e-9);
        assert_eq!(source.clamp_position(-3.0), 0.0);
        assert_eq!(source.clamp_position(f64::NAN), 0.0);
    }

    #[test]
    fn test_preview_paths_are_per_frame() {
        let source = sample_source();
        assert_ne!(source.preview_path(1), source.preview_path(2));
        assert!(source.preview_path(1).starts_with(source.scratch_dir()));
    }
}
