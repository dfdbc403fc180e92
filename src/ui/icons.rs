//! Static SVG glyphs
//!
//! All glyphs are 24x24 stroke outlines; the colour is applied at render
//! time through the svg style, so the sources stay monochrome.

use iced::widget::svg;
use iced::{Color, Element, Length};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Cricket,
    Bat,
    Ball,
    Upload,
    Analyze,
    Back,
    CheckCircle,
    AlertCircle,
    Lightbulb,
    Document,
    StepBack,
    StepForward,
    Play,
    Pause,
}

const OPEN: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="black" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">"#;

impl Icon {
    fn body(self) -> &'static str {
        match self {
            Icon::Cricket => {
                r#"<circle cx="12" cy="12" r="10"/><path d="M2 12h20"/><path d="M12 2v20"/>"#
            }
            Icon::Bat => {
                r#"<path d="M4 20l3.5-3.5"/><rect x="9.2" y="3.5" width="4.5" height="13" rx="1.5" transform="rotate(45 11.45 10)"/>"#
            }
            Icon::Ball => {
                r#"<circle cx="12" cy="12" r="10"/><path d="M7 4.5c2.5 2 3.5 4.6 3.5 7.5s-1 5.5-3.5 7.5"/><path d="M17 4.5c-2.5 2-3.5 4.6-3.5 7.5s1 5.5 3.5 7.5"/>"#
            }
            Icon::Upload => {
                r#"<path d="M21 15v4a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2v-4"/><path d="M17 8l-5-5-5 5"/><path d="M12 3v12"/>"#
            }
            Icon::Analyze => {
                r#"<circle cx="11" cy="11" r="7"/><path d="M21 21l-5-5"/><path d="M8 11h6"/><path d="M11 8v6"/>"#
            }
            Icon::Back => r#"<path d="M15 18l-6-6 6-6"/>"#,
            Icon::CheckCircle => {
                r#"<circle cx="12" cy="12" r="10"/><path d="M8 12.5l2.5 2.5L16 9.5"/>"#
            }
            Icon::AlertCircle => {
                r#"<circle cx="12" cy="12" r="10"/><path d="M12 7v6"/><path d="M12 16.5v.5"/>"#
            }
            Icon::Lightbulb => {
                r#"<path d="M9 18h6"/><path d="M10 21h4"/><path d="M12 3a6 6 0 0 0-3.5 10.9c.6.5 1 1.2 1 2.1h5c0-.9.4-1.6 1-2.1A6 6 0 0 0 12 3z"/>"#
            }
            Icon::Document => {
                r#"<path d="M14 2H6a2 2 0 0 0-2 2v16a2 2 0 0 0 2 2h12a2 2 0 0 0 2-2V8z"/><path d="M14 2v6h6"/><path d="M8 13h8"/><path d="M8 17h8"/>"#
            }
            Icon::StepBack => r#"<path d="M19 20L9 12l10-8z"/><path d="M5 19V5"/>"#,
            Icon::StepForward => r#"<path d="M5 4l10 8-10 8z"/><path d="M19 5v14"/>"#,
            Icon::Play => r#"<path d="M6 4l14 8-14 8z"/>"#,
            Icon::Pause => r#"<path d="M7 4v16"/><path d="M17 4v16"/>"#,
        }
    }

    /// Complete SVG document for this glyph
    pub fn source(self) -> String {
        format!("{OPEN}{}</svg>", self.body())
    }

    pub fn handle(self) -> svg::Handle {
        svg::Handle::from_memory(self.source().into_bytes())
    }
}

/// Render a glyph at `size` pixels, tinted with `color`
pub fn icon<'a, Message: 'a>(glyph: Icon, size: f32, color: Color) -> Element<'a, Message> {
    svg(glyph.handle())
        .width(Length::Fixed(size))
        .height(Length::Fixed(size))
        .style(move |_theme, _status| svg::Style { color: Some(color) })
        .into()
}
