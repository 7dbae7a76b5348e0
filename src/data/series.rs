use std::collections::{BTreeSet, HashMap};

use crate::config::year_in_range;

use super::model::{AffordabilityMetric, MetricKey};

// ---------------------------------------------------------------------------
// Series types
// ---------------------------------------------------------------------------

/// One point of a series. `value: None` is an explicit gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub year: i32,
    pub value: Option<f64>,
}

/// The points of one geography, one per year of the shared domain.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoSeries {
    pub geo_name: String,
    pub points: Vec<SeriesPoint>,
}

impl GeoSeries {
    pub fn value_at(&self, year: i32) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.year == year)
            .and_then(|p| p.value)
    }
}

/// Per-geography series in canonical geography order, all spanning `years`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeriesSet {
    pub metric: Option<MetricKey>,
    /// Shared year domain, strictly ascending.
    pub years: Vec<i32>,
    pub series: Vec<GeoSeries>,
}

impl SeriesSet {
    pub fn get(&self, geo_name: &str) -> Option<&GeoSeries> {
        self.series.iter().find(|s| s.geo_name == geo_name)
    }
}

/// Benchmark and observed series built against one year domain.
#[derive(Debug, Clone, PartialEq)]
pub struct PairedSeries {
    pub benchmark: SeriesSet,
    pub observed: SeriesSet,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Canonical index of a record's geography, or `None` when the record is
/// excluded (unknown geography or year outside the expected range).
fn admit(record: &AffordabilityMetric, index: &HashMap<&str, usize>) -> Option<usize> {
    if !year_in_range(record.year) {
        return None;
    }
    index.get(record.geo_name.as_str()).copied()
}

fn geography_index(geographies: &[String]) -> HashMap<&str, usize> {
    geographies
        .iter()
        .enumerate()
        .map(|(i, g)| (g.as_str(), i))
        .collect()
}

/// Sorted union of years across every admitted record, for any geography.
pub fn year_domain(metrics: &[AffordabilityMetric], geographies: &[String]) -> Vec<i32> {
    let index = geography_index(geographies);
    metrics
        .iter()
        .filter(|r| admit(r, &index).is_some())
        .map(|r| r.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Build one series per geography for `key` over the dataset's year domain.
///
/// Missing records and absent fields both become `None` points. When several
/// records share a `(year, geo_name)` pair the last one in input order wins,
/// including when its field is absent.
pub fn build_series(
    metrics: &[AffordabilityMetric],
    geographies: &[String],
    key: MetricKey,
) -> SeriesSet {
    let years = year_domain(metrics, geographies);
    build_series_on(metrics, geographies, key, &years)
}

/// Same as [`build_series`] but against a caller-supplied year domain.
pub fn build_series_on(
    metrics: &[AffordabilityMetric],
    geographies: &[String],
    key: MetricKey,
    years: &[i32],
) -> SeriesSet {
    let index = geography_index(geographies);

    let mut latest: HashMap<(usize, i32), &AffordabilityMetric> = HashMap::new();
    for record in metrics {
        if let Some(geo) = admit(record, &index) {
            latest.insert((geo, record.year), record);
        }
    }

    let series = geographies
        .iter()
        .enumerate()
        .map(|(geo, name)| GeoSeries {
            geo_name: name.clone(),
            points: years
                .iter()
                .map(|&year| SeriesPoint {
                    year,
                    value: latest
                        .get(&(geo, year))
                        .and_then(|r| key.value(r))
                        .filter(|v| v.is_finite()),
                })
                .collect(),
        })
        .collect();

    SeriesSet {
        metric: Some(key),
        years: years.to_vec(),
        series,
    }
}

/// Build a benchmark series and an observed series on identical x positions.
pub fn build_paired(
    metrics: &[AffordabilityMetric],
    geographies: &[String],
    benchmark: MetricKey,
    observed: MetricKey,
) -> PairedSeries {
    let years = year_domain(metrics, geographies);
    PairedSeries {
        benchmark: build_series_on(metrics, geographies, benchmark, &years),
        observed: build_series_on(metrics, geographies, observed, &years),
    }
}

/// Values of every metric for each geography in the latest year of the domain.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub year: Option<i32>,
    /// `(geo_name, value per entry of MetricKey::ALL)`, canonical order.
    pub rows: Vec<(String, Vec<Option<f64>>)>,
}

pub fn latest_snapshot(metrics: &[AffordabilityMetric], geographies: &[String]) -> Snapshot {
    let years = year_domain(metrics, geographies);
    let Some(&latest) = years.last() else {
        return Snapshot {
            year: None,
            rows: Vec::new(),
        };
    };
    let sets: Vec<SeriesSet> = MetricKey::ALL
        .iter()
        .map(|&key| build_series_on(metrics, geographies, key, &[latest]))
        .collect();

    let rows = geographies
        .iter()
        .map(|geo| {
            let values = sets
                .iter()
                .map(|set| set.get(geo).and_then(|s| s.value_at(latest)))
                .collect();
            (geo.clone(), values)
        })
        .collect();

    Snapshot {
        year: Some(latest),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geos(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn home_value(year: i32, geo: &str, value: f64) -> AffordabilityMetric {
        let mut rec = AffordabilityMetric::empty(year, geo);
        rec.median_home_value = Some(value);
        rec
    }

    fn points(set: &SeriesSet, geo: &str) -> Vec<(i32, Option<f64>)> {
        set.get(geo)
            .unwrap()
            .points
            .iter()
            .map(|p| (p.year, p.value))
            .collect()
    }

    #[test]
    fn missing_year_becomes_explicit_gap() {
        let metrics = vec![
            home_value(2020, "A", 100000.0),
            home_value(2021, "A", 110000.0),
            home_value(2020, "B", 200000.0),
        ];
        let set = build_series(&metrics, &geos(&["A", "B"]), MetricKey::MedianHomeValue);

        assert_eq!(
            points(&set, "A"),
            vec![(2020, Some(100000.0)), (2021, Some(110000.0))]
        );
        assert_eq!(points(&set, "B"), vec![(2020, Some(200000.0)), (2021, None)]);
    }

    #[test]
    fn every_geography_spans_the_union_of_years_in_order() {
        let metrics = vec![
            home_value(2019, "B", 1.0),
            home_value(2015, "A", 1.0),
            home_value(2023, "C", 1.0),
            home_value(2015, "B", 2.0),
        ];
        let set = build_series(&metrics, &geos(&["A", "B", "C"]), MetricKey::MedianHomeValue);

        assert_eq!(set.years, vec![2015, 2019, 2023]);
        for s in &set.series {
            let years: Vec<i32> = s.points.iter().map(|p| p.year).collect();
            assert_eq!(years, set.years, "{}", s.geo_name);
        }
    }

    #[test]
    fn series_follow_canonical_geography_order() {
        let metrics = vec![home_value(2020, "A", 1.0), home_value(2020, "B", 2.0)];
        let set = build_series(&metrics, &geos(&["B", "A"]), MetricKey::MedianHomeValue);
        let order: Vec<&str> = set.series.iter().map(|s| s.geo_name.as_str()).collect();
        assert_eq!(order, vec!["B", "A"]);
    }

    #[test]
    fn absent_field_is_a_gap_not_zero() {
        let mut rec = AffordabilityMetric::empty(2020, "A");
        rec.median_gross_rent = Some(900.0);
        let set = build_series(&[rec], &geos(&["A"]), MetricKey::HudFmr2br);
        assert_eq!(points(&set, "A"), vec![(2020, None)]);
    }

    #[test]
    fn duplicate_records_resolve_last_seen_wins() {
        let metrics = vec![
            home_value(2020, "A", 1.0),
            home_value(2020, "A", 2.0),
            home_value(2021, "A", 3.0),
            AffordabilityMetric::empty(2021, "A"),
        ];
        let set = build_series(&metrics, &geos(&["A"]), MetricKey::MedianHomeValue);
        assert_eq!(points(&set, "A"), vec![(2020, Some(2.0)), (2021, None)]);
    }

    #[test]
    fn unknown_geography_is_excluded() {
        let metrics = vec![
            home_value(2020, "A", 1.0),
            home_value(2021, "Unknown City", 9.0),
        ];
        let set = build_series(&metrics, &geos(&["A"]), MetricKey::MedianHomeValue);

        assert_eq!(set.series.len(), 1);
        assert!(set.get("Unknown City").is_none());
        assert_eq!(set.years, vec![2020]);
    }

    #[test]
    fn out_of_range_year_is_excluded() {
        let metrics = vec![home_value(2020, "A", 1.0), home_value(1999, "A", 9.0)];
        let set = build_series(&metrics, &geos(&["A"]), MetricKey::MedianHomeValue);
        assert_eq!(points(&set, "A"), vec![(2020, Some(1.0))]);
    }

    #[test]
    fn empty_geographies_give_empty_mapping() {
        let metrics = vec![home_value(2020, "A", 1.0)];
        let set = build_series(&metrics, &[], MetricKey::MedianHomeValue);
        assert!(set.series.is_empty());
        assert!(set.years.is_empty());
    }

    #[test]
    fn arrival_order_does_not_matter() {
        let mut metrics = vec![
            home_value(2021, "B", 4.0),
            home_value(2020, "A", 1.0),
            home_value(2022, "A", 3.0),
            home_value(2020, "B", 2.0),
        ];
        let g = geos(&["A", "B"]);
        let forward = build_series(&metrics, &g, MetricKey::MedianHomeValue);
        metrics.reverse();
        let backward = build_series(&metrics, &g, MetricKey::MedianHomeValue);
        assert_eq!(forward, backward);
    }

    #[test]
    fn paired_series_share_the_year_domain() {
        let mut metrics = Vec::new();
        for year in 2013..=2023 {
            for geo in ["A", "B"] {
                let mut rec = AffordabilityMetric::empty(year, geo);
                rec.median_gross_rent = Some(800.0 + year as f64);
                if year <= 2021 {
                    rec.hud_fmr_2br = Some(900.0 + year as f64);
                }
                metrics.push(rec);
            }
        }
        let paired = build_paired(
            &metrics,
            &geos(&["A", "B"]),
            MetricKey::HudFmr2br,
            MetricKey::MedianGrossRent,
        );

        assert_eq!(paired.benchmark.years, paired.observed.years);
        assert_eq!(paired.benchmark.years, (2013..=2023).collect::<Vec<_>>());
        let bench = paired.benchmark.get("A").unwrap();
        let obs = paired.observed.get("A").unwrap();
        assert_eq!(bench.value_at(2021), Some(2921.0));
        assert_eq!(bench.value_at(2022), None);
        assert_eq!(bench.value_at(2023), None);
        assert_eq!(obs.value_at(2023), Some(2823.0));
    }

    #[test]
    fn snapshot_reads_latest_year_without_fabricating() {
        let mut latest = AffordabilityMetric::empty(2023, "A");
        latest.median_gross_rent = Some(1200.0);
        let metrics = vec![home_value(2022, "A", 5.0), latest, home_value(2022, "B", 6.0)];
        let snap = latest_snapshot(&metrics, &geos(&["A", "B"]));

        assert_eq!(snap.year, Some(2023));
        let rent = MetricKey::ALL
            .iter()
            .position(|k| *k == MetricKey::MedianGrossRent)
            .unwrap();
        let value = MetricKey::ALL
            .iter()
            .position(|k| *k == MetricKey::MedianHomeValue)
            .unwrap();
        assert_eq!(snap.rows[0].1[rent], Some(1200.0));
        assert_eq!(snap.rows[0].1[value], None);
        assert!(snap.rows[1].1.iter().all(Option::is_none));
    }

    #[test]
    fn snapshot_of_empty_dataset_has_no_year() {
        let snap = latest_snapshot(&[], &geos(&["A"]));
        assert_eq!(snap.year, None);
        assert!(snap.rows.is_empty());
    }
}
