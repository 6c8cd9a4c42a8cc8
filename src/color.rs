use eframe::egui::Color32;

use crate::state::NoticeLevel;

/// Opacity of the statistics box drawn over histograms (0.9).
const STATS_BOX_ALPHA: u8 = 230;

// ---------------------------------------------------------------------------
// Named colours
// ---------------------------------------------------------------------------

/// Resolve a CSS/SVG colour name such as `goldenrod`.
/// Unknown names fall back to light gray.
pub fn named_color(name: &str) -> Color32 {
    palette::named::from_str(&name.trim().to_ascii_lowercase())
        .map(|rgb| Color32::from_rgb(rgb.red, rgb.green, rgb.blue))
        .unwrap_or(Color32::LIGHT_GRAY)
}

/// Semi-transparent white behind the histogram statistics.
pub fn stats_box_fill() -> Color32 {
    let white = palette::named::WHITE;
    Color32::from_rgba_unmultiplied(white.red, white.green, white.blue, STATS_BOX_ALPHA)
}

/// Text colour of a notice in the input panel.
pub fn notice_color(level: NoticeLevel) -> Color32 {
    match level {
        NoticeLevel::Info => Color32::from_rgb(70, 130, 180),
        NoticeLevel::Success => Color32::from_rgb(46, 139, 87),
        NoticeLevel::Warning => Color32::from_rgb(218, 165, 32),
        NoticeLevel::Error => Color32::RED,
    }
}
