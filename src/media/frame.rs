//! Frame extraction: scrub previews and full-resolution captures
//!
//! Both paths shell out to ffmpeg. Previews are small JPEGs cached in the
//! source's scratch directory; captures decode one frame at native size to
//! raw RGB, which is then encoded as a JPEG and base64'd for the analysis
//! request.
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

use super::source::VideoSource;
use super::MediaTools;

/// JPEG quality used for captured frames
pub const CAPTURE_JPEG_QUALITY: u8 = 90;

/// Previews are scaled down to at most this width
const PREVIEW_MAX_WIDTH: u32 = 960;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Could not capture frame from video.")]
    NotReady,

    #[error("Could not capture frame from video: {0}")]
    Ffmpeg(String),

    #[error("Could not capture frame from video: expected {expected} bytes, got {actual}")]
    FrameSize { expected: usize, actual: usize },

    #[error("Could not encode frame: {0}")]
    Encode(String),

    #[error("Could not read frame: {0}")]
    Io(String),
}

/// A still frame ready for submission
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedFrame {
    pub width: u32,
    pub height: u32,
    /// Base64 JPEG payload, without any `data:` prefix
    pub jpeg_base64: String,
}

impl CapturedFrame {
    pub const MIME_TYPE: &'static str = "image/jpeg";
}

/// A decoded scrub preview
#[derive(Clone)]
pub struct PreviewFrame {
    pub frame_index: u64,
    pub width: u32,
    pub height: u32,
    /// RGBA8 pixels, row-major
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for PreviewFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewFrame")
            .field("frame_index", &self.frame_index)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Capture the frame at `position` at the video's native resolution
pub async fn capture_frame(
    source: Arc<VideoSource>,
    tools: MediaTools,
    position: f64,
) -> Result<CapturedFrame, CaptureError> {
    let meta = *source.metadata();
    let position = source.clamp_position(position);
    let scale = format!("scale={}:{}", meta.width, meta.height);

    let output = Command::new(&tools.ffmpeg)
        .args(["-hide_banner", "-loglevel", "error", "-ss"])
        .arg(format!("{position:.3}"))
        .arg("-i")
        .arg(source.path())
        .args(["-frames:v", "1", "-vf", scale.as_str(), "-f", "rawvideo", "-pix_fmt", "rgb24", "-"])
        .output()
        .await
        .map_err(|e| CaptureError::Ffmpeg(e.to_string()))?;

    if !output.status.success() {
        return Err(CaptureError::Ffmpeg(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    debug!("Captured {}x{} frame at {:.3}s", meta.width, meta.height, position);

    // JPEG encoding is CPU-bound
    tokio::task::spawn_blocking(move || encode_jpeg(meta.width, meta.height, output.stdout))
        .await
        .map_err(|e| CaptureError::Encode(format!("Task join error: {e}")))?
}

/// Encode a raw RGB24 buffer of exactly `width * height * 3` bytes
pub fn encode_jpeg(width: u32, height: u32, rgb: Vec<u8>) -> Result<CapturedFrame, CaptureError> {
    let expected = width as usize * height as usize * 3;
    if rgb.len() != expected || expected == 0 {
        return Err(CaptureError::FrameSize { expected, actual: rgb.len() });
    }

    let raster = RgbImage::from_raw(width, height, rgb)
        .ok_or(CaptureError::FrameSize { expected, actual: 0 })?;

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, CAPTURE_JPEG_QUALITY)
        .encode_image(&raster)
        .map_err(|e| CaptureError::Encode(e.to_string()))?;

    Ok(CapturedFrame {
        width,
        height,
        jpeg_base64: base64::engine::general_purpose::STANDARD.encode(&jpeg),
    })
}

/// Load (or reuse) the scrub preview for a frame
pub async fn load_preview(
    source: Arc<VideoSource>,
    tools: MediaTools,
    frame_index: u64,
) -> Result<PreviewFrame, CaptureError> {
    let path = source.preview_path(frame_index);

    if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
        let position = source.frame_position(frame_index);
        extract_preview(&tools.ffmpeg, source.path(), position, &path).await?;
    }

    let decoded = match tokio::fs::read(&path).await {
        Ok(bytes) => tokio::task::spawn_blocking(move || decode_preview(frame_index, &bytes))
            .await
            .map_err(|e| CaptureError::Io(format!("Task join error: {e}")))?,
        Err(e) => Err(CaptureError::Io(e.to_string())),
    };

    // A truncated or empty cache entry would otherwise fail forever
    if decoded.is_err() {
        if let Err(e) = tokio::fs::remove_file(&path).await {
            debug!("Could not drop preview {}: {}", path.display(), e);
        }
    }
    decoded
}

async fn extract_preview(
    ffmpeg: &Path,
    video: &Path,
    position: f64,
    target: &Path,
) -> Result<(), CaptureError> {
    let scale = format!("scale='min({PREVIEW_MAX_WIDTH},iw)':-2");
    // Only a finished file ever appears under the cached name
    let partial = target.with_extension("part.jpg");

    let written = async {
        let output = Command::new(ffmpeg)
            .args(["-hide_banner", "-loglevel", "error", "-ss"])
            .arg(format!("{position:.3}"))
            .arg("-i")
            .arg(video)
            .args(["-frames:v", "1", "-vf", scale.as_str(), "-q:v", "3", "-y"])
            .arg(&partial)
            .output()
            .await
            .map_err(|e| CaptureError::Ffmpeg(e.to_string()))?;

        if !output.status.success() {
            return Err(CaptureError::Ffmpeg(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        tokio::fs::rename(&partial, target)
            .await
            .map_err(|e| CaptureError::Io(e.to_string()))
    }
    .await;

    if written.is_err() {
        let _ = tokio::fs::remove_file(&partial).await;
    }
    written
}

fn decode_preview(frame_index: u64, jpeg: &[u8]) -> Result<PreviewFrame, CaptureError> {
    let decoded = image::load_from_memory_with_format(jpeg, image::ImageFormat::Jpeg)
        .map_err(|e| CaptureError::Io(e.to_string()))?
        .to_rgba8();

    Ok(PreviewFrame {
        frame_index,
        width: decoded.width(),
        height: decoded.height(),
        rgba: decoded.into_raw(),
    })
}
