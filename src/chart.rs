use eframe::egui::Color32;

use crate::color::{style_for, SeriesRole, StrokeStyle, VisualEncoder};
use crate::data::model::{AffordabilityMetric, MetricKey, ValueUnit};
use crate::data::series::{build_paired, build_series, SeriesPoint, SeriesSet};

// ---------------------------------------------------------------------------
// Chart specification
// ---------------------------------------------------------------------------

/// Which metric(s) a chart draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartMode {
    Single(MetricKey),
    /// Two lines per geography on one year domain.
    Paired {
        benchmark: MetricKey,
        observed: MetricKey,
    },
}

/// Parameters of one chart instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSpec {
    pub id: &'static str,
    pub title: &'static str,
    pub y_label: &'static str,
    pub unit: ValueUnit,
    pub mode: ChartMode,
}

/// The five charts shown on the page, top to bottom.
pub const CHARTS: [ChartSpec; 5] = [
    ChartSpec {
        id: "home_value",
        title: "Median home value",
        y_label: "Median home value (USD)",
        unit: ValueUnit::Currency,
        mode: ChartMode::Single(MetricKey::MedianHomeValue),
    },
    ChartSpec {
        id: "price_to_income",
        title: "Price-to-income ratio",
        y_label: "Home value / household income",
        unit: ValueUnit::Ratio,
        mode: ChartMode::Single(MetricKey::PriceToIncome),
    },
    ChartSpec {
        id: "rent_to_income",
        title: "Rent-to-income ratio",
        y_label: "Annual rent as share of income",
        unit: ValueUnit::Share,
        mode: ChartMode::Single(MetricKey::RentToIncome),
    },
    ChartSpec {
        id: "fmr_vs_rent",
        title: "HUD Fair Market Rent (2BR) vs. median gross rent",
        y_label: "Monthly rent (USD)",
        unit: ValueUnit::MonthlyCurrency,
        mode: ChartMode::Paired {
            benchmark: MetricKey::HudFmr2br,
            observed: MetricKey::MedianGrossRent,
        },
    },
    ChartSpec {
        id: "cost_burden",
        title: "Cost-burdened homeowners",
        y_label: "Share of owners paying 30%+ of income",
        unit: ValueUnit::Share,
        mode: ChartMode::Single(MetricKey::OwnerCostBurdenedShare),
    },
];

// ---------------------------------------------------------------------------
// Chart model – everything needed to draw, nothing egui-specific
// ---------------------------------------------------------------------------

/// A series set together with the role it plays in its chart.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleSeries {
    /// `None` in single-metric charts.
    pub role: Option<SeriesRole>,
    pub set: SeriesSet,
}

/// One drawn line: a geography (and role) broken into contiguous runs.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLine {
    pub geo_name: String,
    /// Hover name: the geography, plus the metric in paired charts.
    pub label: String,
    pub role: Option<SeriesRole>,
    pub color: Color32,
    pub style: StrokeStyle,
    /// Runs of consecutive non-null points. No run crosses a null.
    pub segments: Vec<Vec<[f64; 2]>>,
}

impl ChartLine {
    /// Runs of two or more points, drawn as lines.
    pub fn line_segments(&self) -> impl Iterator<Item = &Vec<[f64; 2]>> {
        self.segments.iter().filter(|s| s.len() > 1)
    }

    /// Points with nulls on both sides, drawn as markers.
    pub fn isolated_points(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.segments
            .iter()
            .filter(|s| s.len() == 1)
            .map(|s| s[0])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoleLegendEntry {
    pub role: SeriesRole,
    pub metric: MetricKey,
    pub style: StrokeStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    pub spec: ChartSpec,
    /// Sorted years shared by every line.
    pub x_domain: Vec<i32>,
    pub series: Vec<RoleSeries>,
    pub lines: Vec<ChartLine>,
    /// Geography → colour, canonical order.
    pub geo_legend: Vec<(String, Color32)>,
    /// Role → stroke; empty for single-metric charts.
    pub role_legend: Vec<RoleLegendEntry>,
}

impl ChartModel {
    pub fn is_paired(&self) -> bool {
        matches!(self.spec.mode, ChartMode::Paired { .. })
    }

    pub fn has_data(&self) -> bool {
        self.lines.iter().any(|l| !l.segments.is_empty())
    }
}

/// Split points into runs of consecutive non-null values.
pub fn segments(points: &[SeriesPoint]) -> Vec<Vec<[f64; 2]>> {
    let mut out = Vec::new();
    let mut current: Vec<[f64; 2]> = Vec::new();
    for p in points {
        match p.value {
            Some(v) => current.push([p.year as f64, v]),
            None => {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Build the drawable model of one chart.
pub fn build_chart(
    spec: ChartSpec,
    metrics: &[AffordabilityMetric],
    geographies: &[String],
    encoder: &VisualEncoder,
) -> ChartModel {
    let series = match spec.mode {
        ChartMode::Single(key) => vec![RoleSeries {
            role: None,
            set: build_series(metrics, geographies, key),
        }],
        ChartMode::Paired {
            benchmark,
            observed,
        } => {
            let paired = build_paired(metrics, geographies, benchmark, observed);
            vec![
                RoleSeries {
                    role: Some(SeriesRole::Benchmark),
                    set: paired.benchmark,
                },
                RoleSeries {
                    role: Some(SeriesRole::Observed),
                    set: paired.observed,
                },
            ]
        }
    };

    let x_domain = series
        .first()
        .map(|s| s.set.years.clone())
        .unwrap_or_default();

    let mut lines = Vec::new();
    for geo in geographies {
        let Some(color) = encoder.color_for(geo) else {
            continue;
        };
        for rs in &series {
            let Some(geo_series) = rs.set.get(geo) else {
                continue;
            };
            let label = match (rs.role, rs.set.metric) {
                (Some(_), Some(metric)) => format!("{geo} – {}", metric.label()),
                _ => geo.clone(),
            };
            lines.push(ChartLine {
                geo_name: geo.clone(),
                label,
                role: rs.role,
                color,
                style: rs.role.map(style_for).unwrap_or(StrokeStyle::Solid),
                segments: segments(&geo_series.points),
            });
        }
    }

    let geo_legend = encoder
        .legend_entries()
        .into_iter()
        .filter(|(g, _)| geographies.contains(g))
        .collect();

    let role_legend = match spec.mode {
        ChartMode::Single(_) => Vec::new(),
        ChartMode::Paired {
            benchmark,
            observed,
        } => vec![
            RoleLegendEntry {
                role: SeriesRole::Observed,
                metric: observed,
                style: style_for(SeriesRole::Observed),
            },
            RoleLegendEntry {
                role: SeriesRole::Benchmark,
                metric: benchmark,
                style: style_for(SeriesRole::Benchmark),
            },
        ],
    };

    ChartModel {
        spec,
        x_domain,
        series,
        lines,
        geo_legend,
        role_legend,
    }
}

/// Build all five charts with one shared encoder.
pub fn build_all(metrics: &[AffordabilityMetric], geographies: &[String]) -> Vec<ChartModel> {
    let encoder = VisualEncoder::new(geographies);
    CHARTS
        .iter()
        .map(|spec| build_chart(*spec, metrics, geographies, &encoder))
        .collect()
}
