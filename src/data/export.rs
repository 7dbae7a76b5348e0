use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::chart::ChartModel;

/// One tidy CSV row. A `None` value is written as an empty cell.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    chart: &'a str,
    metric: &'a str,
    role: &'a str,
    geo_name: &'a str,
    year: i32,
    value: Option<f64>,
}

/// Write every point of every chart series as CSV. Returns the row count.
pub fn write_series<W: Write>(writer: W, charts: &[ChartModel]) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut rows = 0;

    for chart in charts {
        for rs in &chart.series {
            let metric = rs.set.metric.map(|m| m.field_name()).unwrap_or_default();
            let role = rs.role.map(|r| r.label()).unwrap_or_default();
            for gs in &rs.set.series {
                for p in &gs.points {
                    wtr.serialize(ExportRow {
                        chart: chart.spec.id,
                        metric,
                        role,
                        geo_name: &gs.geo_name,
                        year: p.year,
                        value: p.value,
                    })
                    .with_context(|| format!("writing row for {} {}", gs.geo_name, p.year))?;
                    rows += 1;
                }
            }
        }
    }

    wtr.flush().context("flushing CSV output")?;
    Ok(rows)
}

/// Export to a file at `path`.
pub fn export_csv(path: &Path, charts: &[ChartModel]) -> Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_series(file, charts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::build_all;
    use crate::data::model::AffordabilityMetric;

    fn sample() -> (Vec<AffordabilityMetric>, Vec<String>) {
        let mut a = AffordabilityMetric::empty(2020, "A");
        a.median_gross_rent = Some(900.0);
        a.hud_fmr_2br = Some(1000.0);
        let mut b = AffordabilityMetric::empty(2021, "A");
        b.median_gross_rent = Some(950.0);
        (vec![a, b], vec!["A".to_string()])
    }

    #[test]
    fn nulls_are_written_as_empty_cells() {
        let (metrics, geos) = sample();
        let charts = build_all(&metrics, &geos);
        let mut buf = Vec::new();
        write_series(&mut buf, &charts[3..4]).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "chart,metric,role,geo_name,year,value");
        assert!(lines.contains(&"fmr_vs_rent,hud_fmr_2br,benchmark,A,2020,1000.0"));
        assert!(lines.contains(&"fmr_vs_rent,hud_fmr_2br,benchmark,A,2021,"));
        assert!(lines.contains(&"fmr_vs_rent,median_gross_rent,observed,A,2021,950.0"));
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn exports_every_chart_to_file() {
        let (metrics, geos) = sample();
        let charts = build_all(&metrics, &geos);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("series.csv");

        // 4 single charts + 2 paired series, 1 geography, 2 years.
        assert_eq!(export_csv(&path, &charts).unwrap(), 12);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("home_value,median_home_value,,A,2020,"));
    }
}
