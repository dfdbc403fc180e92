//! Analysis screen: scrub to a moment, capture it, read the feedback
use iced::widget::{button, column, container, horizontal_space, image, row, slider, stack, text};
use iced::{Alignment, Background, Border, Color, ContentFit, Element, Length};
use std::sync::Arc;

use super::icons::{icon, Icon};
use super::spinner::{spinner, spinner_on_brand};
use super::{card, feedback, format_timestamp, palette, BOLD, SEMIBOLD};
use crate::media::VideoSource;
use crate::state::preview::PlayerFrame;
use crate::state::session::{Playback, Selection, Session};
use crate::Message;

const PLAYER_HEIGHT: f32 = 420.0;

pub fn view<'a>(
    session: &'a Session,
    selection: &'a Selection,
    frame: PlayerFrame<'a>,
    spinner_rotation: f32,
) -> Element<'a, Message> {
    let title_bar = row![
        text(selection.category.screen_title())
            .size(28)
            .font(BOLD)
            .color(palette::SLATE_700),
        horizontal_space(),
        button(
            row![
                icon(Icon::Back, 18.0, palette::SLATE_600),
                text("Start Over").font(SEMIBOLD),
            ]
            .spacing(6)
            .align_y(Alignment::Center),
        )
        .on_press(Message::StartOver)
        .style(button::text),
    ]
    .align_y(Alignment::Center);

    let mut video_column = column![
        player(&selection.playback, frame, spinner_rotation),
        text(&selection.asset.file_name).size(13).color(palette::SLATE_500),
    ]
    .spacing(12);

    if let Playback::Ready(source) = &selection.playback {
        video_column = video_column.push(scrubber(source, selection.position, selection.playing));
    }

    video_column = video_column.push(analyze_button(session.is_loading(), spinner_rotation));
    video_column = video_column.push(
        text("Pause the video at a key moment (e.g., ball release or impact) for the best analysis.")
            .size(13)
            .color(palette::SLATE_500),
    );

    if let Some(error) = session.capture_error() {
        video_column = video_column.push(text(error.to_string()).color(palette::DANGER));
    }

    let video_card = container(video_column)
        .padding(20)
        .width(Length::FillPortion(3))
        .style(card);

    let feedback_column = container(feedback::view(session.phase(), spinner_rotation))
        .width(Length::FillPortion(2));

    column![
        title_bar,
        row![video_card, feedback_column].spacing(24),
    ]
    .spacing(24)
    .max_width(1200)
    .into()
}

fn player<'a>(
    playback: &'a Playback,
    frame: PlayerFrame<'a>,
    spinner_rotation: f32,
) -> Element<'a, Message> {
    let content: Element<'a, Message> = match (playback, frame) {
        (Playback::Opening, _) => loading(spinner_rotation, "Loading video…"),
        (Playback::Failed(error), _) => failure(error.to_string()),
        (Playback::Ready(_), PlayerFrame::Exact(handle)) => still(handle),
        (Playback::Ready(_), PlayerFrame::Stale(handle)) => stack![
            still(handle),
            container(spinner(spinner_rotation, 36.0))
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .style(|_theme| container::Style {
                    background: Some(Background::Color(Color::from_rgba(0.0, 0.0, 0.0, 0.55))),
                    ..container::Style::default()
                }),
        ]
        .into(),
        (Playback::Ready(_), PlayerFrame::Pending) => loading(spinner_rotation, "Loading frame…"),
        (Playback::Ready(_), PlayerFrame::Failed(_)) => {
            failure("Could not load preview for this frame.".to_string())
        }
    };

    container(content)
        .center_x(Length::Fill)
        .center_y(Length::Fixed(PLAYER_HEIGHT))
        .style(|_theme| container::Style {
            background: Some(Background::Color(Color::BLACK)),
            border: Border {
                radius: 12.0.into(),
                ..Border::default()
            },
            ..container::Style::default()
        })
        .into()
}

fn still<'a>(handle: &image::Handle) -> Element<'a, Message> {
    image(handle.clone())
        .content_fit(ContentFit::Contain)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn loading<'a>(spinner_rotation: f32, label: &'a str) -> Element<'a, Message> {
    column![spinner(spinner_rotation, 36.0), text(label).color(palette::SLATE_300)]
        .spacing(12)
        .align_x(Alignment::Center)
        .into()
}

fn failure<'a>(message: String) -> Element<'a, Message> {
    column![
        icon(Icon::AlertCircle, 32.0, palette::DANGER),
        text(message).color(palette::SLATE_200),
    ]
    .spacing(12)
    .align_x(Alignment::Center)
    .into()
}

fn scrubber<'a>(source: &Arc<VideoSource>, position: f64, playing: bool) -> Element<'a, Message> {
    let metadata = source.metadata();
    let step = metadata.frame_duration();
    let (toggle, toggle_label) = if playing {
        (Icon::Pause, "Pause")
    } else {
        (Icon::Play, "Play")
    };

    row![
        button(
            row![icon(toggle, 16.0, Color::WHITE), text(toggle_label).font(SEMIBOLD)]
                .spacing(6)
                .align_y(Alignment::Center),
        )
        .on_press(Message::TogglePlayback)
        .style(button::primary),
        button(icon(Icon::StepBack, 16.0, palette::SLATE_600))
            .on_press(Message::StepFrame(-1))
            .style(button::text),
        slider(0.0..=source.max_position(), position, Message::Seek)
            .step(step)
            .on_release(Message::SeekReleased),
        button(icon(Icon::StepForward, 16.0, palette::SLATE_600))
            .on_press(Message::StepFrame(1))
            .style(button::text),
        text(format!(
            "{} / {}",
            format_timestamp(position),
            format_timestamp(metadata.duration)
        ))
        .size(13)
        .color(palette::SLATE_600),
    ]
    .spacing(10)
    .align_y(Alignment::Center)
    .into()
}

fn analyze_button<'a>(loading: bool, spinner_rotation: f32) -> Element<'a, Message> {
    let label: Element<'a, Message> = if loading {
        row![
            spinner_on_brand(spinner_rotation, 20.0),
            text("Analyzing...").font(SEMIBOLD),
        ]
        .spacing(10)
        .align_y(Alignment::Center)
        .into()
    } else {
        row![
            icon(Icon::Analyze, 20.0, Color::WHITE),
            text("Analyze Current Frame").font(SEMIBOLD),
        ]
        .spacing(10)
        .align_y(Alignment::Center)
        .into()
    };

    button(container(label).center_x(Length::Fill))
        .width(Length::Fill)
        .padding([14, 20])
        .on_press_maybe((!loading).then_some(Message::AnalyzeFrame))
        .style(|_theme, status| {
            let background = match status {
                button::Status::Disabled => palette::SLATE_400,
                button::Status::Hovered | button::Status::Pressed => {
                    Color::from_rgb8(0x17, 0x7c, 0xc7)
                }
                button::Status::Active => palette::BRAND,
            };
            button::Style {
                background: Some(Background::Color(background)),
                text_color: Color::WHITE,
                border: Border {
                    radius: 12.0.into(),
                    ..Border::default()
                },
                ..button::Style::default()
            }
        })
        .into()
}
