use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::export::export_csv;
use crate::state::{AppState, LoadStatus};
use crate::ui::{plot, table};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let ready = state.status.page().is_some();
            if ui
                .add_enabled(ready, egui::Button::new("Export series…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let summary = state.status.summary();
        if summary.error.is_some() {
            ui.label(RichText::new(summary.sentence()).color(Color32::RED));
        } else {
            ui.label(summary.sentence());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(msg);
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – legend and notes
// ---------------------------------------------------------------------------

pub fn side_panel(ui: &mut Ui, state: &AppState) {
    ui.heading("Geographies");
    ui.separator();

    match state.status.page() {
        Some(page) if page.dataset.geographies.is_empty() => {
            ui.label("The dataset lists no geographies.");
        }
        Some(page) => {
            for (geo, color) in page.encoder.legend_entries() {
                plot::swatch(ui, color, &geo);
            }
        }
        None => {
            ui.label("No dataset loaded.");
        }
    }

    ui.add_space(12.0);
    ui.heading("About the data");
    ui.separator();
    ui.label(
        "Incomes, home values and gross rents are ACS 5-year medians (tables \
         B19013, B25077 and B25064). Price-to-income is median home value over \
         median household income; rent-to-income is twelve months of median \
         gross rent over median household income.",
    );
    ui.add_space(6.0);
    ui.label(
        "The rent benchmark is HUD's two-bedroom Fair Market Rent for the \
         county, applied to the principal city as well. HUD workbooks for the \
         most recent years could not be read, so the benchmark line stops \
         early; gaps are left empty rather than filled in.",
    );
    ui.add_space(6.0);
    ui.label(
        "The owner cost-burden share is approximate: it is summed from \
         published cost brackets upstream.",
    );
}

// ---------------------------------------------------------------------------
// Central panel – charts or the single error message
// ---------------------------------------------------------------------------

pub fn central_panel(ui: &mut Ui, state: &AppState) {
    match &state.status {
        LoadStatus::Loading { path } => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.horizontal(|ui: &mut Ui| {
                    ui.spinner();
                    ui.label(format!("Loading {}", path.display()));
                });
            });
        }
        LoadStatus::Failed(msg) => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading(RichText::new(msg).color(Color32::RED));
            });
        }
        LoadStatus::Ready(page) => {
            if page.dataset.geographies.is_empty() {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("The dataset lists no geographies; there is nothing to chart.");
                });
                return;
            }
            if page.dataset.is_empty() {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("The dataset holds no usable records; there is nothing to chart.");
                });
                return;
            }
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    for model in &page.charts {
                        plot::chart(ui, model);
                        ui.add_space(16.0);
                    }
                    ui.separator();
                    table::snapshot_table(ui, &page.snapshot);
                });
        }
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open affordability dataset")
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.begin_load(&path);
    }
}

pub fn export_dialog(state: &mut AppState) {
    let Some(page) = state.status.page().cloned() else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Export chart series")
        .set_file_name("affordability_series.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match export_csv(&path, &page.charts) {
            Ok(rows) => {
                log::info!("Exported {rows} rows to {}", path.display());
                state.status_message = Some(format!("Exported {rows} rows"));
            }
            Err(e) => {
                log::error!("Failed to export series: {e:#}");
                state.status_message = Some(format!("Export failed: {e:#}"));
            }
        }
    }
}
