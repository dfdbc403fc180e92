//! Session state machine
//!
//! Everything the UI shows is derived from a `Session`: which screen is up,
//! whether the video is open, the scrub position, and where the current
//! analysis attempt stands. The iced `update` loop drives it through the
//! methods below and turns the values they return into background tasks.
//!
//! Background work is matched back to the session with monotonically
//! increasing ids, so results that arrive after a reset (or after a newer
//! request) are dropped instead of applied.

use chrono::{DateTime, Local};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use super::data::{AnalysisCategory, AnalysisResult, VideoAsset};
use crate::client::AnalysisError;
use crate::media::{CaptureError, ProbeError, VideoSource};

/// Playback never ticks faster than 30 frames per second
const MIN_PLAYBACK_INTERVAL: f64 = 1.0 / 30.0;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please upload a valid video file.")]
    NotAVideo,
}

/// Coarse session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoSelection,
    PendingAnalysis,
    ResultAvailable,
    Error,
}

/// Where the playable reference for the selection stands
#[derive(Debug)]
pub enum Playback {
    Opening,
    Ready(Arc<VideoSource>),
    Failed(ProbeError),
}

/// Progress of the current analysis attempt
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisPhase {
    Idle,
    Loading { ticket: u64 },
    Succeeded { result: AnalysisResult, finished_at: DateTime<Local> },
    Failed(AnalysisError),
}

/// The chosen video and technique
#[derive(Debug)]
pub struct Selection {
    pub id: u64,
    pub asset: VideoAsset,
    pub category: AnalysisCategory,
    pub playback: Playback,
    /// Scrub position in seconds
    pub position: f64,
    /// Play/Pause toggle state
    pub playing: bool,
}

/// Everything a capture task needs
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub ticket: u64,
    pub category: AnalysisCategory,
    pub source: Arc<VideoSource>,
    pub position: f64,
}

#[derive(Debug)]
pub struct Session {
    /// Technique picked on the upload screen, waiting for a file
    pending_category: Option<AnalysisCategory>,
    upload_error: Option<ValidationError>,
    selection: Option<Selection>,
    phase: AnalysisPhase,
    capture_error: Option<CaptureError>,
    next_selection_id: u64,
    next_ticket: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            pending_category: None,
            upload_error: None,
            selection: None,
            phase: AnalysisPhase::Idle,
            capture_error: None,
            next_selection_id: 1,
            next_ticket: 1,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        match (&self.selection, &self.phase) {
            (None, _) => SessionState::NoSelection,
            (Some(_), AnalysisPhase::Succeeded { .. }) => SessionState::ResultAvailable,
            (Some(_), AnalysisPhase::Failed(_)) => SessionState::Error,
            (Some(_), _) => SessionState::PendingAnalysis,
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn phase(&self) -> &AnalysisPhase {
        &self.phase
    }

    pub fn upload_error(&self) -> Option<&ValidationError> {
        self.upload_error.as_ref()
    }

    pub fn capture_error(&self) -> Option<&CaptureError> {
        self.capture_error.as_ref()
    }

    pub fn pending_category(&self) -> Option<AnalysisCategory> {
        self.pending_category
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, AnalysisPhase::Loading { .. })
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.phase {
            AnalysisPhase::Succeeded { result, .. } => Some(result),
            _ => None,
        }
    }

    /// The open video, once probing has finished
    pub fn source(&self) -> Option<&Arc<VideoSource>> {
        match self.selection.as_ref().map(|s| &s.playback) {
            Some(Playback::Ready(source)) => Some(source),
            _ => None,
        }
    }

    /// A technique card was clicked; the file dialog comes next
    pub fn choose_category(&mut self, category: AnalysisCategory) {
        self.pending_category = Some(category);
        self.upload_error = None;
    }

    /// The file dialog closed.
    ///
    /// The pending category is consumed whatever the outcome, so every
    /// pick starts from a fresh card click. Returns the id of the new
    /// selection when the session advanced.
    pub fn choose_file(
        &mut self,
        picked: Option<VideoAsset>,
    ) -> Result<Option<u64>, ValidationError> {
        let category = self.pending_category.take();
        let (Some(asset), Some(category)) = (picked, category) else {
            return Ok(None);
        };

        if !asset.is_video() {
            info!("🚫 Rejected {} ({})", asset.file_name, asset.mime_type);
            self.upload_error = Some(ValidationError::NotAVideo);
            return Err(ValidationError::NotAVideo);
        }

        let id = self.next_selection_id;
        self.next_selection_id += 1;

        info!("🎬 Selected {} for {} analysis", asset.file_name, category);
        self.upload_error = None;
        self.capture_error = None;
        self.phase = AnalysisPhase::Idle;
        self.selection = Some(Selection {
            id,
            asset,
            category,
            playback: Playback::Opening,
            position: 0.0,
            playing: false,
        });

        Ok(Some(id))
    }

    /// Probing finished for selection `id`.
    ///
    /// Returns false (and drops the source, releasing it) when the
    /// selection has moved on.
    pub fn video_opened(&mut self, id: u64, opened: Result<Arc<VideoSource>, ProbeError>) -> bool {
        let Some(selection) = self.selection.as_mut().filter(|s| s.id == id) else {
            debug!("Discarding video opened for stale selection {}", id);
            return false;
        };

        selection.playback = match opened {
            Ok(source) => Playback::Ready(source),
            Err(e) => Playback::Failed(e),
        };
        true
    }

    /// Move the scrub position; returns the frame index to preview.
    /// Dragging pauses playback.
    pub fn seek(&mut self, position: f64) -> Option<u64> {
        let source = self.source()?.clone();
        let selection = self.selection.as_mut()?;

        selection.playing = false;
        selection.position = source.clamp_position(position);
        Some(source.frame_index(selection.position))
    }

    /// Step by whole frames; returns the frame index to preview
    pub fn step(&mut self, frames: i64) -> Option<u64> {
        let source = self.source()?.clone();
        let selection = self.selection.as_mut()?;

        selection.playing = false;
        let current = source.frame_index(selection.position) as i64;
        let target = (current + frames).max(0) as u64;
        selection.position = source.frame_position(target);
        Some(source.frame_index(selection.position))
    }

    pub fn is_playing(&self) -> bool {
        self.selection.as_ref().is_some_and(|s| s.playing)
    }

    /// Play/Pause. Playing from the last frame starts over from the top.
    /// Returns whether the video is now playing.
    pub fn toggle_playback(&mut self) -> bool {
        let Some(source) = self.source().cloned() else {
            return false;
        };
        let Some(selection) = self.selection.as_mut() else {
            return false;
        };

        if !selection.playing && selection.position >= source.max_position() {
            selection.position = 0.0;
        }
        selection.playing = !selection.playing;
        selection.playing
    }

    /// Seconds between playback frames while playing
    pub fn playback_interval(&self) -> Option<f64> {
        if !self.is_playing() {
            return None;
        }
        let step = self.source()?.metadata().frame_duration();
        Some(step.max(MIN_PLAYBACK_INTERVAL))
    }

    /// Move playback forward by `seconds`, pausing on the last frame.
    /// Returns the frame index to preview.
    pub fn advance(&mut self, seconds: f64) -> Option<u64> {
        let source = self.source()?.clone();
        let selection = self.selection.as_mut().filter(|s| s.playing)?;

        let target = selection.position + seconds;
        selection.position = source.clamp_position(target);
        if target >= source.max_position() {
            selection.playing = false;
        }
        Some(source.frame_index(selection.position))
    }

    /// Frame index under the current scrub position
    pub fn current_frame(&self) -> Option<u64> {
        let source = self.source()?;
        Some(source.frame_index(self.selection.as_ref()?.position))
    }

    /// "Analyze Current Frame" was pressed.
    ///
    /// A no-op while a request is in flight. If the video is not open yet
    /// the capture error is recorded and nothing starts. Otherwise any
    /// previous result or error is cleared and loading begins.
    pub fn begin_analysis(&mut self) -> Option<AnalysisRequest> {
        if self.is_loading() {
            return None;
        }
        let selection = self.selection.as_ref()?;

        let Playback::Ready(source) = &selection.playback else {
            self.capture_error = Some(CaptureError::NotReady);
            return None;
        };

        let request = AnalysisRequest {
            ticket: self.next_ticket,
            category: selection.category,
            source: Arc::clone(source),
            position: selection.position,
        };
        self.next_ticket += 1;

        // The frame on screen is the frame sent
        if let Some(selection) = self.selection.as_mut() {
            selection.playing = false;
        }

        self.capture_error = None;
        self.phase = AnalysisPhase::Loading { ticket: request.ticket };
        Some(request)
    }

    /// True while `ticket` is the request in flight
    pub fn is_current(&self, ticket: u64) -> bool {
        matches!(self.phase, AnalysisPhase::Loading { ticket: t } if t == ticket)
    }

    /// Frame capture failed; no request was sent
    pub fn capture_failed(&mut self, ticket: u64, error: CaptureError) {
        if self.is_current(ticket) {
            self.phase = AnalysisPhase::Idle;
            self.capture_error = Some(error);
        }
    }

    /// The analysis request settled
    pub fn finish_analysis(
        &mut self,
        ticket: u64,
        outcome: Result<AnalysisResult, AnalysisError>,
        finished_at: DateTime<Local>,
    ) -> bool {
        if !self.is_current(ticket) {
            debug!("Discarding outcome of superseded request {}", ticket);
            return false;
        }

        self.phase = match outcome {
            Ok(result) => {
                info!(
                    "✅ Analysis complete: {} observations, {} tips",
                    result.key_observations.len(),
                    result.improvement_tips.len()
                );
                AnalysisPhase::Succeeded { result, finished_at }
            }
            Err(e) => {
                info!("⚠️  Analysis failed: {}", e);
                AnalysisPhase::Failed(e)
            }
        };
        true
    }

    /// "Start Over": drop the video and any result
    pub fn reset(&mut self) {
        if let Some(selection) = self.selection.take() {
            info!("↩️  Reset session for {}", selection.asset.file_name);
        }
        self.pending_category = None;
        self.upload_error = None;
        self.capture_error = None;
        self.phase = AnalysisPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::VideoMetadata;
    use crate::state::data::{ImprovementTip, KeyObservation};

    fn open_source(asset: &VideoAsset) -> Arc<VideoSource> {
        let metadata = VideoMetadata { width: 1280, height: 720, duration: 4.0, fps: 30.0 };
        Arc::new(VideoSource::new(asset.clone(), metadata).unwrap())
    }

    /// Session on the analysis screen with `file` open
    fn ready_session(file: &str, category: AnalysisCategory) -> Session {
        let mut session = Session::new();
        session.choose_category(category);
        let asset = VideoAsset::from_path(file);
        let id = session.choose_file(Some(asset.clone())).unwrap().unwrap();
        assert!(session.video_opened(id, Ok(open_source(&asset))));
        session
    }

    fn bowling_result() -> AnalysisResult {
        AnalysisResult {
            overall_summary: "Good follow-through".into(),
            key_observations: vec![KeyObservation {
                area: "Arm Position".into(),
                feedback: "Elbow is too low at release".into(),
                is_positive: false,
            }],
            improvement_tips: vec![ImprovementTip {
                title: "Wall Drill".into(),
                description: "Practice arm rotation against a wall".into(),
            }],
        }
    }

    #[test]
    fn test_non_video_never_advances() {
        for file in ["notes.txt", "photo.jpg", "README", "clip.mp3"] {
            let mut session = Session::new();
            session.choose_category(AnalysisCategory::Batting);

            let outcome = session.choose_file(Some(VideoAsset::from_path(file)));
            assert_eq!(outcome, Err(ValidationError::NotAVideo));
            assert_eq!(session.state(), SessionState::NoSelection);
            assert_eq!(
                session.upload_error().map(|e| e.to_string()).as_deref(),
                Some("Please upload a valid video file.")
            );
        }
    }

    #[test]
    fn test_valid_video_advances_with_category() {
        for category in AnalysisCategory::ALL {
            let mut session = Session::new();
            session.choose_category(category);
            let id = session.choose_file(Some(VideoAsset::from_path("swing.mp4"))).unwrap();

            assert!(id.is_some());
            assert_eq!(session.state(), SessionState::PendingAnalysis);
            assert_eq!(session.selection().unwrap().category, category);
        }
        let session = ready_session("swing.mp4", AnalysisCategory::Bowling);
        assert_eq!(session.selection().unwrap().category.screen_title(), "Bowling Analysis");
    }

    #[test]
    fn test_category_is_consumed_by_each_pick() {
        let mut session = Session::new();
        session.choose_category(AnalysisCategory::Batting);
        assert_eq!(session.choose_file(None), Ok(None));
        assert_eq!(session.pending_category(), None);

        // Without a fresh card click the same file does nothing
        assert_eq!(session.choose_file(Some(VideoAsset::from_path("swing.mp4"))), Ok(None));
        assert_eq!(session.state(), SessionState::NoSelection);
    }

    #[test]
    fn test_new_category_clears_validation_error() {
        let mut session = Session::new();
        session.choose_category(AnalysisCategory::Batting);
        let _ = session.choose_file(Some(VideoAsset::from_path("notes.txt")));
        assert!(session.upload_error().is_some());

        session.choose_category(AnalysisCategory::Bowling);
        assert!(session.upload_error().is_none());
    }

    #[test]
    fn test_analyze_before_video_opens_is_capture_error() {
        let mut session = Session::new();
        session.choose_category(AnalysisCategory::Batting);
        session.choose_file(Some(VideoAsset::from_path("swing.mp4"))).unwrap();

        assert!(session.begin_analysis().is_none());
        assert!(!session.is_loading());
        assert_eq!(session.capture_error(), Some(&CaptureError::NotReady));
    }

    #[test]
    fn test_analyze_while_loading_is_noop() {
        let mut session = ready_session("swing.mp4", AnalysisCategory::Batting);
        let first = session.begin_analysis().unwrap();
        assert!(session.is_loading());

        assert!(session.begin_analysis().is_none());
        assert!(session.is_current(first.ticket));
    }

    #[test]
    fn test_new_analysis_clears_previous_result() {
        let mut session = ready_session("swing.mp4", AnalysisCategory::Bowling);
        let first = session.begin_analysis().unwrap();
        session.finish_analysis(first.ticket, Ok(bowling_result()), Local::now());
        assert_eq!(session.state(), SessionState::ResultAvailable);

        let second = session.begin_analysis().unwrap();
        assert!(session.result().is_none());
        assert!(session.is_loading());

        session.finish_analysis(
            second.ticket,
            Err(AnalysisError::Rejected("model timeout".into())),
            Local::now(),
        );
        assert_eq!(session.state(), SessionState::Error);
        assert!(session.result().is_none());
    }

    #[test]
    fn test_error_is_recoverable_by_retry() {
        let mut session = ready_session("swing.mp4", AnalysisCategory::Batting);
        let first = session.begin_analysis().unwrap();
        session.finish_analysis(first.ticket, Err(AnalysisError::Unreachable), Local::now());
        assert_eq!(session.state(), SessionState::Error);

        let retry = session.begin_analysis().unwrap();
        assert_ne!(retry.ticket, first.ticket);
        session.finish_analysis(retry.ticket, Ok(bowling_result()), Local::now());
        assert_eq!(session.state(), SessionState::ResultAvailable);
    }

    #[test]
    fn test_capture_failure_ends_loading_without_result() {
        let mut session = ready_session("swing.mp4", AnalysisCategory::Batting);
        let request = session.begin_analysis().unwrap();

        session.capture_failed(request.ticket, CaptureError::Ffmpeg("decode error".into()));
        assert!(!session.is_loading());
        assert_eq!(session.state(), SessionState::PendingAnalysis);
        assert!(session.capture_error().is_some());
    }

    #[test]
    fn test_request_carries_scrub_position() {
        let mut session = ready_session("swing.mp4", AnalysisCategory::Bowling);
        assert_eq!(session.seek(1.5), Some(45));
        assert_eq!(session.step(2), Some(47));
        assert_eq!(session.step(-100), Some(0));
        session.seek(2.0);

        let request = session.begin_analysis().unwrap();
        assert_eq!(request.category, AnalysisCategory::Bowling);
        assert!((request.position - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_playback_advances_and_stops_at_end() {
        let mut session = ready_session("swing.mp4", AnalysisCategory::Batting);
        assert!(session.playback_interval().is_none());
        assert!(session.advance(1.0).is_none());

        assert!(session.toggle_playback());
        assert!((session.playback_interval().unwrap() - 1.0 / 30.0).abs() < 1e-9);
        assert_eq!(session.advance(1.0), Some(30));

        // 4s at 30 fps: last frame starts at 119/30 s
        assert_eq!(session.advance(10.0), Some(119));
        assert!(!session.is_playing());

        // Play again from the end rewinds
        assert!(session.toggle_playback());
        assert_eq!(session.current_frame(), Some(0));
    }

    #[test]
    fn test_scrubbing_and_analysis_pause_playback() {
        let mut session = ready_session("swing.mp4", AnalysisCategory::Bowling);
        session.toggle_playback();
        session.seek(1.0);
        assert!(!session.is_playing());

        session.toggle_playback();
        session.step(1);
        assert!(!session.is_playing());

        session.toggle_playback();
        session.advance(0.5);
        let request = session.begin_analysis().unwrap();
        assert!(!session.is_playing());
        assert!((request.position - 1.0 / 30.0 - 1.0 - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_playback_needs_open_video() {
        let mut session = Session::new();
        session.choose_category(AnalysisCategory::Batting);
        session.choose_file(Some(VideoAsset::from_path("swing.mp4"))).unwrap();
        assert!(!session.toggle_playback());
        assert!(!session.is_playing());
    }

    #[test]
    fn test_reset_releases_video_and_result() {
        let mut session = ready_session("swing.mp4", AnalysisCategory::Bowling);
        let scratch = session.source().unwrap().scratch_dir().to_path_buf();

        let request = session.begin_analysis().unwrap();
        let ticket = request.ticket;
        // The capture task finished and let go of its handle
        drop(request);
        session.finish_analysis(ticket, Ok(bowling_result()), Local::now());
        assert!(scratch.exists());

        session.reset();
        assert_eq!(session.state(), SessionState::NoSelection);
        assert!(session.selection().is_none());
        assert!(session.result().is_none());
        assert!(session.upload_error().is_none());
        assert!(session.capture_error().is_none());
        assert!(!scratch.exists());
    }

    #[test]
    fn test_late_outcome_after_reset_is_ignored() {
        let mut session = ready_session("swing.mp4", AnalysisCategory::Batting);
        let request = session.begin_analysis().unwrap();
        session.reset();

        assert!(!session.finish_analysis(request.ticket, Ok(bowling_result()), Local::now()));
        assert_eq!(session.state(), SessionState::NoSelection);
    }

    #[test]
    fn test_stale_open_is_dropped() {
        let mut session = Session::new();
        session.choose_category(AnalysisCategory::Batting);
        let asset = VideoAsset::from_path("first.mp4");
        let stale_id = session.choose_file(Some(asset.clone())).unwrap().unwrap();
        session.reset();

        let source = open_source(&asset);
        let scratch = source.scratch_dir().to_path_buf();
        assert!(!session.video_opened(stale_id, Ok(source)));
        assert!(!scratch.exists());
    }
}
