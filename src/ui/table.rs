use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::MetricKey;
use crate::data::series::Snapshot;

// ---------------------------------------------------------------------------
// Latest-year snapshot table
// ---------------------------------------------------------------------------

pub fn snapshot_table(ui: &mut Ui, snapshot: &Snapshot) {
    let Some(year) = snapshot.year else {
        return;
    };
    ui.heading(format!("Snapshot: {year}"));

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(180.0))
        .columns(Column::auto().at_least(90.0), MetricKey::ALL.len())
        .header(22.0, |mut header| {
            header.col(|ui: &mut Ui| {
                ui.strong("Geography");
            });
            for key in MetricKey::ALL {
                header.col(|ui: &mut Ui| {
                    ui.strong(key.label());
                });
            }
        })
        .body(|mut body| {
            for (geo, values) in &snapshot.rows {
                body.row(20.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        ui.label(geo);
                    });
                    for (key, value) in MetricKey::ALL.iter().zip(values) {
                        row.col(|ui: &mut Ui| {
                            ui.label(key.unit().format_opt(*value));
                        });
                    }
                });
            }
        });
}
