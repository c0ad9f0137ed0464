use data::chart::Emphasis;

use iced::theme::palette::Extended;
use iced::widget::canvas::{LineDash, Stroke};
use iced::{Color, Font};

pub const MONO: Font = Font::MONOSPACE;

/// Opacity of confidence bands over the side color.
pub const BAND_ALPHA: f32 = 0.18;
/// Opacity of lines left out of the current selection.
pub const DIMMED_ALPHA: f32 = 0.25;
const HIGHLIGHT_WIDTH_SCALE: f32 = 1.75;

pub fn dashed_line(palette: &Extended) -> Stroke<'static> {
    Stroke {
        width: 1.0,
        line_dash: LineDash {
            segments: &[4.0, 4.0],
            offset: 8,
        },
        ..Default::default()
    }
    .with_color(palette.secondary.strong.color.scale_alpha(0.6))
}

pub fn emphasized(color: Color, emphasis: Emphasis) -> Color {
    match emphasis {
        Emphasis::Dimmed => color.scale_alpha(DIMMED_ALPHA),
        Emphasis::Normal | Emphasis::Highlighted => color,
    }
}

fn line_width(width: f32, emphasis: Emphasis) -> f32 {
    match emphasis {
        Emphasis::Highlighted => width * HIGHLIGHT_WIDTH_SCALE,
        Emphasis::Normal | Emphasis::Dimmed => width,
    }
}

pub fn actual_line(color: Color, emphasis: Emphasis) -> Stroke<'static> {
    Stroke::default()
        .with_color(emphasized(color, emphasis))
        .with_width(line_width(2.0, emphasis))
}

pub fn projected_line(color: Color, emphasis: Emphasis) -> Stroke<'static> {
    Stroke {
        width: line_width(1.0, emphasis),
        line_dash: LineDash {
            segments: &[6.0, 4.0],
            offset: 0,
        },
        ..Default::default()
    }
    .with_color(emphasized(color, emphasis))
}

pub fn band_fill(color: Color, emphasis: Emphasis) -> Color {
    emphasized(color, emphasis).scale_alpha(BAND_ALPHA)
}
