//! Feedback panel
use chrono::{DateTime, Local};
use iced::widget::{column, container, row, text, Column};
use iced::{Alignment, Color, Element, Length};

use super::icons::{icon, Icon};
use super::spinner::spinner;
use super::{card, error_card, palette, BOLD, SEMIBOLD};
use crate::client::AnalysisError;
use crate::state::data::{AnalysisResult, KeyObservation};
use crate::state::session::AnalysisPhase;
use crate::Message;

/// Which of the four mutually exclusive renders to show
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Panel<'a> {
    Loading,
    Failed(&'a AnalysisError),
    Awaiting,
    Report {
        result: &'a AnalysisResult,
        finished_at: &'a DateTime<Local>,
    },
}

impl<'a> Panel<'a> {
    pub fn from_phase(phase: &'a AnalysisPhase) -> Self {
        match phase {
            AnalysisPhase::Idle => Panel::Awaiting,
            AnalysisPhase::Loading { .. } => Panel::Loading,
            AnalysisPhase::Failed(error) => Panel::Failed(error),
            AnalysisPhase::Succeeded {
                result,
                finished_at,
            } => Panel::Report {
                result,
                finished_at,
            },
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            Panel::Loading => "Generating AI Feedback...",
            Panel::Failed(_) => "Analysis Failed",
            Panel::Awaiting => "Awaiting Analysis",
            Panel::Report { .. } => "Overall Summary",
        }
    }
}

/// Green check for strengths, amber alert for everything else
pub fn observation_icon(observation: &KeyObservation) -> (Icon, Color) {
    if observation.is_positive {
        (Icon::CheckCircle, palette::SUCCESS)
    } else {
        (Icon::AlertCircle, palette::WARNING)
    }
}

/// `Analyzed at HH:MM:SS`
pub fn analyzed_at(finished_at: &DateTime<Local>) -> String {
    format!("Analyzed at {}", finished_at.format("%H:%M:%S"))
}

pub fn view<'a>(phase: &'a AnalysisPhase, spinner_rotation: f32) -> Element<'a, Message> {
    let panel = Panel::from_phase(phase);
    match panel {
        Panel::Loading => centered(
            column![
                spinner(spinner_rotation, 48.0),
                text(panel.heading()).size(18).font(SEMIBOLD).color(palette::SLATE_700),
                text("The AI coach is reviewing your frame.")
                    .size(14)
                    .color(palette::SLATE_500),
            ]
            .spacing(16)
            .align_x(Alignment::Center),
        ),
        Panel::Failed(error) => container(
            column![
                row![
                    icon(Icon::AlertCircle, 24.0, palette::DANGER),
                    text(panel.heading()).size(18).font(BOLD),
                ]
                .spacing(10)
                .align_y(Alignment::Center),
                text(error.to_string()).size(14),
            ]
            .spacing(12),
        )
        .padding(24)
        .width(Length::Fill)
        .style(error_card)
        .into(),
        Panel::Awaiting => centered(
            column![
                icon(Icon::Document, 48.0, palette::SLATE_400),
                text(panel.heading()).size(18).font(SEMIBOLD).color(palette::SLATE_700),
                text("Your detailed technique analysis will appear here.")
                    .size(14)
                    .color(palette::SLATE_500),
            ]
            .spacing(16)
            .align_x(Alignment::Center),
        ),
        Panel::Report {
            result,
            finished_at,
        } => report(panel.heading(), result, finished_at),
    }
}

fn centered<'a>(content: Column<'a, Message>) -> Element<'a, Message> {
    container(content)
        .padding(32)
        .center_x(Length::Fill)
        .center_y(Length::Fixed(420.0))
        .style(card)
        .into()
}

fn section_title<'a>(title: &'a str) -> Element<'a, Message> {
    text(title).size(18).font(BOLD).color(palette::INK).into()
}

fn report<'a>(
    heading: &'a str,
    result: &'a AnalysisResult,
    finished_at: &DateTime<Local>,
) -> Element<'a, Message> {
    let observations: Column<'a, Message> = Column::with_children(result.key_observations.iter().map(|observation| {
        let (glyph, color) = observation_icon(observation);
        row![
            icon(glyph, 20.0, color),
            column![
                text(&observation.area).size(15).font(SEMIBOLD).color(palette::SLATE_700),
                text(&observation.feedback).size(14).color(palette::SLATE_600),
            ]
            .spacing(2),
        ]
        .spacing(12)
        .into()
    }))
    .spacing(14);

    let drills: Column<'a, Message> = Column::with_children(result.improvement_tips.iter().map(|tip| {
        row![
            icon(Icon::Lightbulb, 20.0, palette::BRAND),
            column![
                text(&tip.title).size(15).font(SEMIBOLD).color(palette::SLATE_700),
                text(&tip.description).size(14).color(palette::SLATE_600),
            ]
            .spacing(2),
        ]
        .spacing(12)
        .into()
    }))
    .spacing(14);

    container(
        column![
            section_title(heading),
            text(&result.overall_summary).size(15).color(palette::SLATE_600),
            section_title("Key Observations"),
            observations,
            section_title("Improvement Drills"),
            drills,
            text(analyzed_at(finished_at)).size(12).color(palette::SLATE_400),
        ]
        .spacing(16),
    )
    .padding(24)
    .width(Length::Fill)
    .style(card)
    .into()
}
