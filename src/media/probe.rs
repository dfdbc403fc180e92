//! Video metadata probing via ffprobe
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// Used when a container reports no usable frame rate
const FALLBACK_FPS: f64 = 30.0;

#[derive(Error, Debug, Clone)]
pub enum ProbeError {
    #[error("Failed to run ffprobe: {0}")]
    Spawn(String),

    #[error("ffprobe could not read the video: {0}")]
    Failed(String),

    #[error("Unexpected ffprobe output: {0}")]
    Parse(String),

    #[error("The file has no video stream")]
    NoVideoStream,

    #[error("Failed to prepare preview cache: {0}")]
    Scratch(String),
}

/// Native properties of the first video stream
///
/// Width and height are as displayed: a clip recorded with a quarter-turn
/// display matrix reports them swapped, matching what ffmpeg's autorotate
/// decodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoMetadata {
    /// Displayed frame width in pixels
    pub width: u32,
    /// Displayed frame height in pixels
    pub height: u32,
    /// Duration in seconds (0.0 when the container does not say)
    pub duration: f64,
    /// Frames per second
    pub fps: f64,
}

impl VideoMetadata {
    /// Length of one frame in seconds
    pub fn frame_duration(&self) -> f64 {
        1.0 / self.fps
    }

    /// Total number of frames, at least one
    pub fn frame_count(&self) -> u64 {
        ((self.duration * self.fps).floor() as u64).max(1)
    }
}

#[derive(Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

#[derive(Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    avg_frame_rate: Option<String>,
    r_frame_rate: Option<String>,
    duration: Option<String>,
    #[serde(default)]
    tags: Option<StreamTags>,
    #[serde(default)]
    side_data_list: Vec<SideData>,
}

#[derive(Deserialize)]
struct StreamTags {
    rotate: Option<String>,
}

#[derive(Deserialize)]
struct SideData {
    rotation: Option<f64>,
}

impl ProbeStream {
    /// Display rotation in degrees; the display matrix wins over the legacy tag
    fn rotation(&self) -> f64 {
        self.side_data_list
            .iter()
            .find_map(|side| side.rotation)
            .or_else(|| {
                self.tags
                    .as_ref()
                    .and_then(|t| t.rotate.as_deref())
                    .and_then(|r| r.trim().parse().ok())
            })
            .unwrap_or(0.0)
    }
}

#[derive(Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

/// Run ffprobe against a file and read its first video stream
pub async fn probe(ffprobe: &Path, video: &Path) -> Result<VideoMetadata, ProbeError> {
    let output = Command::new(ffprobe)
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,avg_frame_rate,r_frame_rate,duration:stream_tags=rotate:stream_side_data=rotation:format=duration",
            "-of",
            "json",
        ])
        .arg(video)
        .output()
        .await
        .map_err(|e| ProbeError::Spawn(e.to_string()))?;

    if !output.status.success() {
        return Err(ProbeError::Failed(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    let metadata = parse_probe_output(&output.stdout)?;
    debug!(
        "Probed {}: {}x{} @ {:.2} fps, {:.2}s",
        video.display(),
        metadata.width,
        metadata.height,
        metadata.fps,
        metadata.duration
    );
    Ok(metadata)
}

/// Parse ffprobe's JSON report
pub fn parse_probe_output(stdout: &[u8]) -> Result<VideoMetadata, ProbeError> {
    let report: ProbeOutput =
        serde_json::from_slice(stdout).map_err(|e| ProbeError::Parse(e.to_string()))?;

    let stream = report.streams.first().ok_or(ProbeError::NoVideoStream)?;
    let (mut width, mut height) = match (stream.width, stream.height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => return Err(ProbeError::NoVideoStream),
    };
    if (stream.rotation().round() as i64).rem_euclid(180) == 90 {
        std::mem::swap(&mut width, &mut height);
    }

    // avg_frame_rate is "0/0" for some streams; r_frame_rate is the backup
    let fps = [&stream.avg_frame_rate, &stream.r_frame_rate]
        .into_iter()
        .flatten()
        .find_map(|rate| parse_rate(rate))
        .unwrap_or(FALLBACK_FPS);

    // Some containers leave format.duration out or "N/A"; the stream may still know
    let duration = [
        report.format.as_ref().and_then(|f| f.duration.as_deref()),
        stream.duration.as_deref(),
    ]
    .into_iter()
    .flatten()
    .find_map(parse_duration)
    .unwrap_or(0.0);

    Ok(VideoMetadata { width, height, duration, fps })
}

fn parse_duration(duration: &str) -> Option<f64> {
    duration
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d >= 0.0)
}

/// Parse an ffprobe rational such as "30000/1001"
fn parse_rate(rate: &str) -> Option<f64> {
    let (num, den) = rate.split_once('/')?;
    let num: f64 = num.trim().parse().ok()?;
    let den: f64 = den.trim().parse().ok()?;
    if den == 0.0 || num <= 0.0 {
        return None;
    }
    Some(num / den)
}
