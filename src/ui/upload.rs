//! Upload screen: pick a technique, then a video file
use iced::widget::{button, column, container, row, text};
use iced::{Alignment, Background, Border, Color, Element, Length};
use iced_aw::Wrap;

use super::icons::{icon, Icon};
use super::{card, palette, BOLD, CARD_RADIUS, SEMIBOLD};
use crate::state::data::AnalysisCategory;
use crate::state::session::ValidationError;
use crate::Message;

const TECHNIQUE_CARD_WIDTH: f32 = 380.0;

/// Card copy for each technique
pub fn card_copy(category: AnalysisCategory) -> (Icon, &'static str, &'static str) {
    match category {
        AnalysisCategory::Batting => (
            Icon::Bat,
            "Batting Technique",
            "Analyze your stance, backlift, and shot execution.",
        ),
        AnalysisCategory::Bowling => (
            Icon::Ball,
            "Bowling Action",
            "Break down your run-up, load-up, and release.",
        ),
    }
}

pub fn view<'a>(error: Option<&ValidationError>) -> Element<'a, Message> {
    let cards = Wrap::with_elements(
        AnalysisCategory::ALL
            .into_iter()
            .map(technique_card)
            .collect(),
    )
    .spacing(24.0)
    .line_spacing(24.0);

    let mut content = column![
        text("Analyze Your Technique").size(30).font(BOLD).color(palette::SLATE_700),
        text(
            "Choose your skill, upload a video of your performance, and get instant, \
             AI-powered feedback to elevate your game."
        )
        .size(16)
        .color(palette::SLATE_600),
        cards,
    ]
    .spacing(24)
    .align_x(Alignment::Center);

    if let Some(error) = error {
        content = content.push(text(error.to_string()).color(palette::DANGER));
    }

    content = content.push(
        row![
            icon(Icon::Upload, 16.0, palette::SLATE_500),
            text("Click a card to select and upload your video.")
                .size(14)
                .color(palette::SLATE_500),
        ]
        .spacing(8)
        .align_y(Alignment::Center),
    );

    container(content)
        .padding(32)
        .max_width(900)
        .style(card)
        .into()
}

fn technique_card<'a>(category: AnalysisCategory) -> Element<'a, Message> {
    let (glyph, title, description) = card_copy(category);

    let body = column![
        icon(glyph, 48.0, palette::BRAND),
        text(title).size(20).font(SEMIBOLD).color(palette::SLATE_700),
        text(description).size(15).color(palette::SLATE_500),
    ]
    .spacing(12)
    .align_x(Alignment::Center)
    .width(Length::Fill);

    button(body)
        .width(Length::Fixed(TECHNIQUE_CARD_WIDTH))
        .padding(32)
        .on_press(Message::CategorySelected(category))
        .style(|_theme, status| {
            let hovered = matches!(status, button::Status::Hovered | button::Status::Pressed);
            button::Style {
                background: Some(Background::Color(if hovered {
                    Color::from_rgb8(0xef, 0xf6, 0xff)
                } else {
                    Color::WHITE
                })),
                text_color: palette::SLATE_700,
                border: Border {
                    radius: CARD_RADIUS.into(),
                    width: 2.0,
                    color: if hovered { palette::BRAND } else { palette::SLATE_300 },
                },
                ..button::Style::default()
            }
        })
        .into()
}
