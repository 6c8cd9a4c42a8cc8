use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::color;
use crate::pipeline::{ColumnComparison, MAX_INTERVAL, MIN_INTERVAL};
use crate::state::{AnalysisTab, AppState};
use crate::ui::{plot, table};

// ---------------------------------------------------------------------------
// Header / footer
// ---------------------------------------------------------------------------

pub fn header(ui: &mut Ui) {
    ui.add_space(6.0);
    ui.heading(RichText::new("📊 Composite Analyzer").size(26.0).strong());
    ui.label("Process and validate drillhole composite data");
    ui.add_space(6.0);
}

pub fn footer(ui: &mut Ui) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.small("© 2025 Composite Analyzer.");
    });
}

// ---------------------------------------------------------------------------
// Left side panel – input widgets
// ---------------------------------------------------------------------------

/// Render the input panel: file picker, parameters and the run button.
pub fn input_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Input");
    ui.separator();

    ui.strong("Drillhole DM File");
    if ui
        .button("Browse…")
        .on_hover_text("Select a Datamine format file containing drillhole data")
        .clicked()
    {
        open_file_dialog(state);
    }

    if let Some(run) = &state.run {
        ui.label(format!("{}.dm", run.upload.base_name))
            .on_hover_text(run.upload.path.display().to_string());
        if let Some(project) = &run.project {
            ui.small(format!("Project: {project}"));
        }
    }
    ui.add_space(8.0);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if state.run.is_none() && state.notices.is_empty() {
                ui.label("Please upload a file to continue.");
            }

            if !state.columns().is_empty() {
                parameter_widgets(ui, state);
                ui.add_space(8.0);
            }

            notices(ui, state);
        });
}

fn parameter_widgets(ui: &mut Ui, state: &mut AppState) {
    let columns = state.columns().to_vec();

    ui.strong("Composite Length (m)");
    ui.add(
        egui::DragValue::new(&mut state.composite_length)
            .range(MIN_INTERVAL..=MAX_INTERVAL)
            .speed(1),
    )
    .on_hover_text("Enter the desired composite interval in meters");
    ui.add_space(4.0);

    column_selector(ui, "zone_field", "Zone Field", &columns, &mut state.zone_column)
        .on_hover_text("Select the column representing the zone in the drillhole data");
    column_selector(ui, "grade_field", "Grade Field", &columns, &mut state.grade_column)
        .on_hover_text("Select the column representing the grade in the drillhole data");
    ui.add_space(8.0);

    let run = ui
        .add_enabled(
            state.can_run(),
            egui::Button::new(RichText::new("Run Analysis").strong())
                .min_size(egui::vec2(ui.available_width(), 32.0)),
        )
        .on_hover_text("Click to composite drillhole data and visualize results");
    if run.clicked() {
        state.run_analysis();
    }
}

fn column_selector(
    ui: &mut Ui,
    id: &str,
    label: &str,
    columns: &[String],
    selected: &mut Option<String>,
) -> egui::Response {
    ui.strong(label);
    let current = selected.clone().unwrap_or_default();
    egui::ComboBox::from_id_salt(id)
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            for col in columns {
                if ui.selectable_label(current == *col, col).clicked() {
                    *selected = Some(col.clone());
                }
            }
        })
        .response
}

fn notices(ui: &mut Ui, state: &AppState) {
    for notice in &state.notices {
        ui.label(RichText::new(&notice.text).color(color::notice_color(notice.level)));
        ui.add_space(4.0);
    }
}

// ---------------------------------------------------------------------------
// Central panel – analysis output
// ---------------------------------------------------------------------------

/// Render the output tabs of the last analysis.
pub fn output_panel(ui: &mut Ui, state: &mut AppState) {
    let Some(report) = &state.report else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Upload a DM file and run the analysis to compare samples");
        });
        return;
    };

    ui.heading("Output");
    ui.separator();

    let mut tab = state.active_tab;
    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut tab, AnalysisTab::Length, "Length Analysis");
        ui.selectable_value(&mut tab, AnalysisTab::Grade, "Grade Analysis");
    });
    ui.separator();

    let mut save_requested = false;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let interval = report.params.interval;
            save_requested = match tab {
                AnalysisTab::Length => comparison_view(ui, &report.length, "Length", "length", interval),
                AnalysisTab::Grade => comparison_view(ui, &report.grade, "Grade", "grade", interval),
            };
        });

    state.active_tab = tab;
    if save_requested {
        save_table_dialog(state, tab);
    }
}

/// Paired histograms plus the comparison table. Returns true when the user
/// asked to save the table.
fn comparison_view(
    ui: &mut Ui,
    cmp: &ColumnComparison,
    title: &str,
    id: &str,
    interval: u32,
) -> bool {
    let suffix = if id == "grade" {
        format!(" ({})", cmp.column)
    } else {
        String::new()
    };

    ui.heading(format!("{title} Histograms - Raw vs Composite Samples{suffix}"));
    ui.columns(2, |cols| {
        plot::histogram_plot(&mut cols[0], &cmp.raw, &format!("{id}_raw"));
        plot::histogram_plot(&mut cols[1], &cmp.composite, &format!("{id}_composite_{interval}"));
    });
    ui.add_space(12.0);

    ui.heading(format!("{title} Stats - Raw vs Composite Samples{suffix}"));
    ui.push_id(format!("{id}_table"), |ui: &mut Ui| {
        table::comparison_table(ui, &cmp.table);
    });
    ui.add_space(6.0);
    ui.button("Save table as CSV…").clicked()
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open drillhole DM file")
        .add_filter("Datamine DM", &["dm"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Picked {}", path.display());
        state.ingest_upload(&path);
    }
}

pub fn save_table_dialog(state: &mut AppState, tab: AnalysisTab) {
    let Some(report) = &state.report else {
        return;
    };
    let column = match tab {
        AnalysisTab::Length => &report.length.column,
        AnalysisTab::Grade => &report.grade.column,
    };
    let default_name = format!("{}_{column}_comparison.csv", report.output_name);

    let file = rfd::FileDialog::new()
        .set_title("Save comparison table")
        .add_filter("CSV", &["csv"])
        .set_file_name(default_name)
        .save_file();

    if let Some(path) = file {
        state.save_comparison_to(tab, &path);
    }
}
