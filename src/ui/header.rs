use iced::widget::{container, row, text};
use iced::{Alignment, Background, Color, Element, Length, Shadow, Vector};

use super::icons::{icon, Icon};
use super::{palette, BOLD};
use crate::Message;

/// Top bar with the app mark
pub fn view<'a>() -> Element<'a, Message> {
    let brand = row![
        icon(Icon::Cricket, 32.0, palette::BRAND),
        text("AI Cricket Coach").size(24).font(BOLD).color(palette::INK),
    ]
    .spacing(16)
    .align_y(Alignment::Center);

    container(brand)
        .width(Length::Fill)
        .padding([16, 32])
        .style(|_theme| container::Style {
            background: Some(Background::Color(Color::WHITE)),
            shadow: Shadow {
                color: Color::from_rgba(0.0, 0.0, 0.0, 0.1),
                offset: Vector::new(0.0, 2.0),
                blur_radius: 8.0,
            },
            ..container::Style::default()
        })
        .into()
}
