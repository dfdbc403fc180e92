use chrono::Local;
use iced::time;
use iced::widget::{column, container, scrollable};
use iced::{Element, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod client;
mod config;
mod media;
mod state;
mod ui;

use client::{AnalysisClient, AnalysisError};
use config::AppConfig;
use media::{CaptureError, CapturedFrame, MediaTools, PreviewFrame, ProbeError, VideoSource};
use state::data::{AnalysisCategory, AnalysisResult, VideoAsset, VIDEO_MIME_TYPES};
use state::preview::{PlayerFrame, Preview};
use state::session::{Playback, Session};
use ui::spinner::Spinner;

/// Main application state
struct CricketCoach {
    tools: MediaTools,
    /// Analysis backend chosen at startup
    client: Arc<dyn AnalysisClient>,
    session: Session,
    /// Scrub previews for the open selection
    preview: Option<Preview>,
    spinner_rotation: f32,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// A technique card was clicked
    CategorySelected(AnalysisCategory),
    /// ffprobe finished for a selection
    VideoOpened(u64, Result<Arc<VideoSource>, ProbeError>),
    /// Slider dragged to a position in seconds
    Seek(f64),
    SeekReleased,
    StepFrame(i64),
    TogglePlayback,
    /// Next playback frame is due
    PlaybackTick,
    /// Selection id, frame index, decoded preview
    PreviewLoaded(u64, u64, Result<PreviewFrame, CaptureError>),
    /// "Analyze Current Frame" pressed
    AnalyzeFrame,
    FrameCaptured(u64, AnalysisCategory, Result<CapturedFrame, CaptureError>),
    AnalysisComplete(u64, Result<AnalysisResult, AnalysisError>),
    StartOver,
    /// Spinner animation frame
    Tick,
}

impl CricketCoach {
    fn new(config: AppConfig) -> (Self, Task<Message>) {
        let app = Self::with_client(config.media_tools(), client::build_client(&config));
        info!("🏏 AI Cricket Coach ready");
        (app, Task::none())
    }

    fn with_client(tools: MediaTools, client: Arc<dyn AnalysisClient>) -> Self {
        CricketCoach {
            tools,
            client,
            session: Session::new(),
            preview: None,
            spinner_rotation: 0.0,
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::CategorySelected(category) => {
                self.session.choose_category(category);

                let picked = pick_video_file(category).map(VideoAsset::from_path);
                let asset = picked.clone();

                match self.session.choose_file(picked) {
                    Ok(Some(id)) => {
                        self.preview = None;
                        let Some(asset) = asset else {
                            return Task::none();
                        };
                        let tools = self.tools.clone();
                        Task::perform(open_video(asset, tools), move |opened| {
                            Message::VideoOpened(id, opened)
                        })
                    }
                    Ok(None) => {
                        debug!("File dialog dismissed");
                        Task::none()
                    }
                    Err(_) => Task::none(),
                }
            }
            Message::VideoOpened(id, opened) => {
                if let Err(e) = &opened {
                    warn!("⚠️  Could not open video: {}", e);
                }
                if self.session.video_opened(id, opened) {
                    self.preview = Some(Preview::new(id));
                    return self.request_preview();
                }
                Task::none()
            }
            Message::Seek(position) => {
                self.session.seek(position);
                self.request_preview()
            }
            Message::SeekReleased => self.request_preview(),
            Message::StepFrame(frames) => {
                self.session.step(frames);
                self.request_preview()
            }
            Message::TogglePlayback => {
                let playing = self.session.toggle_playback();
                debug!("Playback {}", if playing { "started" } else { "paused" });
                self.request_preview()
            }
            Message::PlaybackTick => {
                let Some(interval) = self.session.playback_interval() else {
                    return Task::none();
                };
                self.session.advance(interval);
                self.request_preview()
            }
            Message::PreviewLoaded(id, frame_index, loaded) => {
                let Some(preview) = self.preview.as_mut().filter(|p| p.selection() == id) else {
                    return Task::none();
                };
                if let Err(e) = &loaded {
                    warn!("⚠️  Preview of frame {} failed: {}", frame_index, e);
                }
                preview.loaded(frame_index, loaded);

                // Catch up with wherever the scrubber went meanwhile
                self.request_preview()
            }
            Message::AnalyzeFrame => {
                let Some(request) = self.session.begin_analysis() else {
                    return Task::none();
                };
                info!(
                    "📸 Capturing frame at {:.3}s for {} analysis",
                    request.position, request.category
                );

                let ticket = request.ticket;
                let category = request.category;
                Task::perform(
                    media::frame::capture_frame(request.source, self.tools.clone(), request.position),
                    move |captured| Message::FrameCaptured(ticket, category, captured),
                )
            }
            Message::FrameCaptured(ticket, category, captured) => {
                if !self.session.is_current(ticket) {
                    return Task::none();
                }
                match captured {
                    Ok(frame) => {
                        let client = Arc::clone(&self.client);
                        Task::perform(
                            async move { client.analyze(&frame, category).await },
                            move |outcome| Message::AnalysisComplete(ticket, outcome),
                        )
                    }
                    Err(e) => {
                        // Details go to the log; the user sees the generic message
                        warn!("⚠️  Frame capture failed: {}", e);
                        self.session.capture_failed(ticket, CaptureError::NotReady);
                        Task::none()
                    }
                }
            }
            Message::AnalysisComplete(ticket, outcome) => {
                self.session.finish_analysis(ticket, outcome, Local::now());
                Task::none()
            }
            Message::StartOver => {
                self.session.reset();
                self.preview = None;
                Task::none()
            }
            Message::Tick => {
                self.spinner_rotation = Spinner::advance(self.spinner_rotation);
                Task::none()
            }
        }
    }

    /// Start decoding the current frame unless a decode is already running
    fn request_preview(&mut self) -> Task<Message> {
        let Some(selection) = self.session.selection() else {
            return Task::none();
        };
        let Playback::Ready(source) = &selection.playback else {
            return Task::none();
        };
        let Some(frame_index) = self.session.current_frame() else {
            return Task::none();
        };

        let id = selection.id;
        let preview = self.preview.get_or_insert_with(|| Preview::new(id));
        if preview.selection() != id {
            *preview = Preview::new(id);
        }
        if !preview.request(frame_index) {
            return Task::none();
        }

        Task::perform(
            media::frame::load_preview(Arc::clone(source), self.tools.clone(), frame_index),
            move |loaded| Message::PreviewLoaded(id, frame_index, loaded),
        )
    }

    /// What the player shows for the current frame
    fn player_frame(&self) -> PlayerFrame<'_> {
        let id = self.session.selection().map(|s| s.id);
        match (&self.preview, self.session.current_frame()) {
            (Some(preview), Some(current)) if Some(preview.selection()) == id => {
                preview.frame(current)
            }
            _ => PlayerFrame::Pending,
        }
    }

    /// True while a spinner is on screen
    fn is_animating(&self) -> bool {
        if self.session.is_loading() {
            return true;
        }
        match self.session.selection().map(|s| &s.playback) {
            Some(Playback::Opening) => true,
            Some(Playback::Ready(_)) => !matches!(
                self.player_frame(),
                PlayerFrame::Exact(_) | PlayerFrame::Failed(_)
            ),
            _ => false,
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let body = match self.session.selection() {
            None => ui::upload::view(self.session.upload_error()),
            Some(selection) => ui::analysis::view(
                &self.session,
                selection,
                self.player_frame(),
                self.spinner_rotation,
            ),
        };

        let page = container(body).padding(32).center_x(Length::Fill);

        column![ui::header::view(), scrollable(page).height(Length::Fill)].into()
    }

    fn theme(&self) -> Theme {
        ui::theme()
    }

    fn subscription(&self) -> Subscription<Message> {
        let spinner = if self.is_animating() {
            time::every(Duration::from_millis(16)).map(|_| Message::Tick)
        } else {
            Subscription::none()
        };

        let playback = match self.session.playback_interval() {
            Some(interval) => {
                time::every(Duration::from_secs_f64(interval)).map(|_| Message::PlaybackTick)
            }
            None => Subscription::none(),
        };

        Subscription::batch([spinner, playback])
    }
}

fn main() -> iced::Result {
    // Set up logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "cricket_coach=debug,info".into()))
        .with(fmt::layer())
        .init();

    let config = AppConfig::from_env();
    match serde_json::to_string(&config) {
        Ok(json) => debug!("Configuration: {}", json),
        Err(e) => warn!("Could not serialize configuration: {}", e),
    }

    iced::application("AI Cricket Coach", CricketCoach::update, CricketCoach::view)
        .theme(CricketCoach::theme)
        .subscription(CricketCoach::subscription)
        .centered()
        .run_with(move || CricketCoach::new(config))
}

/// Show the native file picker
fn pick_video_file(category: AnalysisCategory) -> Option<std::path::PathBuf> {
    let extensions: Vec<&str> = VIDEO_MIME_TYPES.iter().map(|(ext, _)| *ext).collect();

    FileDialog::new()
        .set_title(format!("Select a {} video", category.as_str()))
        .add_filter("Video files", &extensions)
        .add_filter("All files", &["*"])
        .pick_file()
}

/// Probe the file and set up its scratch space
async fn open_video(asset: VideoAsset, tools: MediaTools) -> Result<Arc<VideoSource>, ProbeError> {
    VideoSource::open(asset, &tools).await.map(Arc::new)
}
