use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::stats::ComparisonTable;

/// Render a raw vs composite comparison table.
pub fn comparison_table(ui: &mut Ui, table: &ComparisonTable) {
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(130.0))
        .columns(Column::auto().at_least(110.0), 3)
        .header(22.0, |mut header| {
            for title in ["", "Raw", "Composite", "Difference (%)"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for row in &table.rows {
                body.row(20.0, |mut cells| {
                    cells.col(|ui| {
                        ui.label(RichText::new(row.metric.table_label()).strong());
                    });
                    cells.col(|ui| {
                        ui.monospace(format!("{:.4}", row.raw));
                    });
                    cells.col(|ui| {
                        ui.monospace(format!("{:.4}", row.composite));
                    });
                    cells.col(|ui| {
                        ui.monospace(format!("{:.2}", row.difference_pct));
                    });
                });
            }
        });
}
