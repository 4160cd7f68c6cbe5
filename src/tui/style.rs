//! Color constants for the TUI.

use ratatui::style::Color;

use crate::sim::event::SegmentKind;

/// Off and resume threshold line color.
pub const THRESHOLD_COLOR: Color = Color::DarkGray;
/// Dotted marker at each midnight.
pub const MIDNIGHT_COLOR: Color = Color::Gray;
/// Time labels beside chart points.
pub const ANNOTATION_COLOR: Color = Color::White;
/// Gauge color when above the resume threshold.
pub const LEVEL_HIGH: Color = Color::Green;
/// Gauge color between the off and resume thresholds.
pub const LEVEL_MID: Color = Color::Yellow;
/// Gauge color at or below the off threshold.
pub const LEVEL_LOW: Color = Color::Red;
/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::DarkGray;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;

/// Line color for a status segment.
pub fn segment_color(kind: SegmentKind) -> Color {
    match kind {
        SegmentKind::On => Color::Green,
        SegmentKind::OnLimited => Color::LightGreen,
        SegmentKind::Off => Color::Red,
        SegmentKind::OffLimited => Color::LightRed,
        SegmentKind::DayCharging => Color::Cyan,
    }
}

/// Gauge color for an energy level against the two thresholds.
pub fn level_color(energy_wh: f64, off_wh: f64, resume_wh: f64) -> Color {
    if energy_wh >= resume_wh {
        LEVEL_HIGH
    } else if energy_wh > off_wh {
        LEVEL_MID
    } else {
        LEVEL_LOW
    }
}
