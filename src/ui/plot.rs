use eframe::egui::{self, Color32, FontId, Rect, Stroke, Ui};
use egui_plot::{Bar, BarChart, Plot};

use crate::color;
use crate::data::histogram::HistogramFigure;

const PLOT_HEIGHT: f32 = 340.0;
const BOX_MARGIN: f32 = 10.0;
const BOX_PADDING: f32 = 8.0;

// ---------------------------------------------------------------------------
// Histogram panel
// ---------------------------------------------------------------------------

/// Render one histogram with its statistics box in the upper-right corner.
pub fn histogram_plot(ui: &mut Ui, figure: &HistogramFigure, id: &str) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.strong(figure.title.as_str());
    });

    let fill = color::named_color(&figure.color);
    let width = figure.histogram.bin_width();
    let bars: Vec<Bar> = figure
        .histogram
        .bars()
        .map(|(center, count)| {
            Bar::new(center, count as f64)
                .width(width)
                .fill(fill)
                .stroke(Stroke::new(1.0, Color32::BLACK))
        })
        .collect();

    let response = Plot::new(id)
        .height(PLOT_HEIGHT)
        .x_axis_label(figure.column.as_str())
        .y_axis_label("Frequency")
        .allow_scroll(false)
        .allow_boxed_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(&figure.column));
        })
        .response;

    stats_box(ui, response.rect, &figure.stats_text());
}

/// Paint the statistics text over the top-right of `plot_rect`.
fn stats_box(ui: &Ui, plot_rect: Rect, text: &str) {
    let painter = ui.painter_at(plot_rect);
    let galley = painter.layout_no_wrap(text.to_owned(), FontId::monospace(12.0), Color32::BLACK);

    let size = galley.size() + egui::vec2(2.0 * BOX_PADDING, 2.0 * BOX_PADDING);
    let min = egui::pos2(
        plot_rect.right() - BOX_MARGIN - size.x,
        plot_rect.top() + BOX_MARGIN,
    );
    let box_rect = Rect::from_min_size(min, size);

    painter.rect_filled(box_rect, 6.0, color::stats_box_fill());
    painter.galley(
        box_rect.min + egui::vec2(BOX_PADDING, BOX_PADDING),
        galley,
        Color32::BLACK,
    );
}
