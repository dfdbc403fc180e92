//! Indeterminate loading spinner
use iced::mouse::Cursor;
use iced::widget::canvas::{self, path, LineCap, Path, Program, Stroke};
use iced::widget::Canvas;
use iced::{Color, Element, Length, Radians, Rectangle, Renderer, Theme};
use std::f32::consts::PI;

use super::palette;
use crate::Message;

/// Radians advanced per animation tick
pub const SPEED: f32 = 0.12;

/// A rotating quarter arc over a faint track
#[derive(Debug, Clone, Copy)]
pub struct Spinner {
    /// Current arc start angle
    pub rotation: f32,
    pub color: Color,
}

impl Spinner {
    /// Next animation frame
    pub fn advance(rotation: f32) -> f32 {
        (rotation + SPEED) % (2.0 * PI)
    }
}

impl Program<Message> for Spinner {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        let stroke_width = (bounds.width.min(bounds.height) / 8.0).max(2.0);
        let radius = bounds.width.min(bounds.height) / 2.0 - stroke_width;
        if radius <= 0.0 {
            return vec![frame.into_geometry()];
        }
        let center = frame.center();

        frame.stroke(
            &Path::circle(center, radius),
            Stroke::default()
                .with_color(Color { a: 0.25, ..self.color })
                .with_width(stroke_width),
        );

        let arc = Path::new(|builder| {
            builder.arc(path::Arc {
                center,
                radius,
                start_angle: Radians(self.rotation),
                end_angle: Radians(self.rotation + PI / 2.0),
            });
        });
        frame.stroke(
            &arc,
            Stroke::default()
                .with_color(self.color)
                .with_width(stroke_width)
                .with_line_cap(LineCap::Round),
        );

        vec![frame.into_geometry()]
    }
}

/// Spinner widget of `size` pixels
pub fn spinner<'a>(rotation: f32, size: f32) -> Element<'a, Message> {
    Canvas::new(Spinner { rotation, color: palette::BRAND })
        .width(Length::Fixed(size))
        .height(Length::Fixed(size))
        .into()
}

/// White variant for use on filled buttons
pub fn spinner_on_brand<'a>(rotation: f32, size: f32) -> Element<'a, Message> {
    Canvas::new(Spinner { rotation, color: Color::WHITE })
        .width(Length::Fixed(size))
        .height(Length::Fixed(size))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_wraps() {
        let mut rotation = 0.0;
        for _ in 0..1000 {
            rotation = Spinner::advance(rotation);
            assert!((0.0..2.0 * PI).contains(&rotation));
        }
    }
}
