/// User interface module
///
/// Presentational pieces only; all decisions live in `state::session`.
/// - Header bar (header.rs)
/// - Technique picker / upload screen (upload.rs)
/// - Analysis screen with scrubber and analyze action (analysis.rs)
/// - Feedback panel (feedback.rs)
/// - Loading spinner drawn on a canvas (spinner.rs)
/// - SVG glyphs (icons.rs)

pub mod analysis;
pub mod feedback;
pub mod header;
pub mod icons;
pub mod spinner;
pub mod upload;

use iced::theme::Palette;
use iced::widget::container;
use iced::{Background, Border, Color, Font, Shadow, Theme, Vector};

/// Brand colours
pub mod palette {
    use iced::Color;

    const fn rgb8(r: u8, g: u8, b: u8) -> Color {
        Color {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    pub const BRAND: Color = rgb8(0x20, 0x94, 0xe8);
    pub const INK: Color = rgb8(0x0f, 0x17, 0x2a);
    pub const SUCCESS: Color = rgb8(0x18, 0xb5, 0x69);
    pub const WARNING: Color = rgb8(0xf4, 0xb8, 0x29);
    pub const DANGER: Color = rgb8(0xdc, 0x26, 0x26);
    pub const DANGER_TEXT: Color = rgb8(0x99, 0x1b, 0x1b);
    pub const DANGER_BG: Color = rgb8(0xfe, 0xf2, 0xf2);
    pub const SLATE_100: Color = rgb8(0xf1, 0xf5, 0xf9);
    pub const SLATE_200: Color = rgb8(0xe2, 0xe8, 0xf0);
    pub const SLATE_300: Color = rgb8(0xcb, 0xd5, 0xe1);
    pub const SLATE_400: Color = rgb8(0x94, 0xa3, 0xb8);
    pub const SLATE_500: Color = rgb8(0x64, 0x74, 0x8b);
    pub const SLATE_600: Color = rgb8(0x47, 0x55, 0x69);
    pub const SLATE_700: Color = rgb8(0x33, 0x41, 0x55);
}

pub const CARD_RADIUS: f32 = 20.0;

pub const BOLD: Font = Font {
    weight: iced::font::Weight::Bold,
    ..Font::DEFAULT
};

pub const SEMIBOLD: Font = Font {
    weight: iced::font::Weight::Semibold,
    ..Font::DEFAULT
};

/// Light theme built on the brand palette
pub fn theme() -> Theme {
    Theme::custom(
        "Cricket Coach".to_string(),
        Palette {
            background: palette::SLATE_100,
            text: palette::INK,
            primary: palette::BRAND,
            success: palette::SUCCESS,
            danger: palette::DANGER,
        },
    )
}

/// White rounded panel with a soft shadow
pub fn card(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(Color::WHITE)),
        border: Border {
            radius: CARD_RADIUS.into(),
            ..Border::default()
        },
        shadow: Shadow {
            color: Color::from_rgba(0.0, 0.0, 0.0, 0.08),
            offset: Vector::new(0.0, 4.0),
            blur_radius: 16.0,
        },
        ..container::Style::default()
    }
}

/// Red-tinted panel for failures
pub fn error_card(_theme: &Theme) -> container::Style {
    container::Style {
        background: Some(Background::Color(palette::DANGER_BG)),
        text_color: Some(palette::DANGER_TEXT),
        border: Border {
            radius: CARD_RADIUS.into(),
            width: 1.0,
            color: Color::from_rgb8(0xfe, 0xca, 0xca),
        },
        ..container::Style::default()
    }
}

/// Format seconds as `m:ss.cc`
pub fn format_timestamp(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let minutes = (seconds / 60.0).floor() as u64;
    let rest = seconds - minutes as f64 * 60.0;
    format!("{minutes}:{rest:05.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "0:00.00");
        assert_eq!(format_timestamp(7.5), "0:07.50");
        assert_eq!(format_timestamp(83.25), "1:23.25");
        assert_eq!(format_timestamp(-1.0), "0:00.00");
    }
}
