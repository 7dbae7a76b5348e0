use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, Stroke, Ui, Vec2};
use egui_plot::{GridMark, Line, LineStyle, Plot, PlotPoint, PlotPoints, Points};

use crate::chart::{ChartLine, ChartModel, RoleLegendEntry};
use crate::color::StrokeStyle;

const CHART_HEIGHT: f32 = 260.0;
const YEAR_AXIS_GROUP: &str = "housing_lens_year_axis";

fn line_style(style: StrokeStyle) -> LineStyle {
    match style {
        StrokeStyle::Solid => LineStyle::Solid,
        StrokeStyle::Dashed => LineStyle::Dashed { length: 8.0 },
    }
}

// ---------------------------------------------------------------------------
// Chart (one per ChartModel)
// ---------------------------------------------------------------------------

/// Draw one chart. Output depends only on `model`.
pub fn chart(ui: &mut Ui, model: &ChartModel) {
    ui.heading(model.spec.title);
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for (geo, color) in &model.geo_legend {
            swatch(ui, *color, geo);
            ui.add_space(8.0);
        }
    });
    if model.is_paired() {
        role_legend(ui, &model.role_legend);
    }
    if !model.has_data() {
        ui.label("No observations for this metric.");
    }

    let unit = model.spec.unit;
    let (x_min, x_max) = match (model.x_domain.first(), model.x_domain.last()) {
        (Some(&lo), Some(&hi)) => (lo as f64, hi as f64),
        _ => (0.0, 1.0),
    };

    Plot::new(model.spec.id)
        .height(CHART_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label(model.spec.y_label)
        .include_x(x_min - 0.25)
        .include_x(x_max + 0.25)
        .link_axis(YEAR_AXIS_GROUP, [true, false])
        .x_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| year_tick(mark.value))
        .y_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            unit.format(mark.value)
        })
        .label_formatter(move |name: &str, value: &PlotPoint| {
            let year = value.x.round() as i32;
            if name.is_empty() {
                format!("{year}: {}", unit.format(value.y))
            } else {
                format!("{name}\n{year}: {}", unit.format(value.y))
            }
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for line in &model.lines {
                draw_line(plot_ui, line);
            }
        });
}

/// Each run becomes its own egui_plot line, so nothing is drawn across a gap.
fn draw_line(plot_ui: &mut egui_plot::PlotUi, line: &ChartLine) {
    for segment in line.line_segments() {
        let points: PlotPoints = segment.iter().copied().collect();
        plot_ui.line(
            Line::new(points)
                .name(&line.label)
                .color(line.color)
                .style(line_style(line.style))
                .width(2.0),
        );
    }

    let isolated: Vec<[f64; 2]> = line.isolated_points().collect();
    if !isolated.is_empty() {
        plot_ui.points(
            Points::new(PlotPoints::from(isolated))
                .name(&line.label)
                .color(line.color)
                .radius(3.0),
        );
    }
}

fn year_tick(value: f64) -> String {
    if (value - value.round()).abs() < 1e-6 {
        format!("{}", value.round() as i64)
    } else {
        String::new()
    }
}

// ---------------------------------------------------------------------------
// Role legend (paired charts)
// ---------------------------------------------------------------------------

/// Stroke samples for each role, shown apart from the geography legend.
fn role_legend(ui: &mut Ui, entries: &[RoleLegendEntry]) {
    ui.horizontal(|ui: &mut Ui| {
        for entry in entries {
            let (rect, _) = ui.allocate_exact_size(Vec2::new(32.0, 12.0), egui::Sense::hover());
            let stroke = Stroke::new(2.0, ui.visuals().text_color());
            let a = rect.left_center();
            let b = rect.right_center();
            match entry.style {
                StrokeStyle::Solid => {
                    ui.painter().line_segment([a, b], stroke);
                }
                StrokeStyle::Dashed => {
                    ui.painter()
                        .extend(egui::Shape::dashed_line(&[a, b], stroke, 6.0, 4.0));
                }
            }
            ui.label(format!("{} ({})", entry.metric.label(), entry.role.label()));
            ui.add_space(12.0);
        }
    });
}

/// A coloured square followed by `label`.
pub fn swatch(ui: &mut Ui, color: Color32, label: &str) {
    ui.horizontal(|ui: &mut Ui| {
        let (rect, _) = ui.allocate_exact_size(Vec2::splat(12.0), egui::Sense::hover());
        ui.painter().rect_filled(rect, 2.0, color);
        ui.label(label);
    });
}
