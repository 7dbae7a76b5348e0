use std::collections::{BTreeSet, HashMap, HashSet};

use crate::config::year_in_range;

use super::model::AffordabilityDataset;

/// Tolerated per-record anomalies found in a loaded dataset.
///
/// None of these fail a load; the series builder excludes or resolves them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetAudit {
    /// Geography names referenced by records but not listed in `geographies`.
    pub unknown_geographies: BTreeSet<String>,
    pub unknown_geography_records: usize,
    pub out_of_range_years: BTreeSet<i32>,
    pub out_of_range_records: usize,
    /// `(year, geo_name)` pairs with more than one record.
    pub duplicate_pairs: Vec<(i32, String)>,
    /// `metrics` indices of entries set aside by the loader.
    pub rejected_indices: Vec<usize>,
}

impl DatasetAudit {
    pub fn is_clean(&self) -> bool {
        self.unknown_geography_records == 0
            && self.out_of_range_records == 0
            && self.duplicate_pairs.is_empty()
            && self.rejected_indices.is_empty()
    }

    /// Human-readable findings, one line each.
    pub fn findings(&self) -> Vec<String> {
        let mut out = Vec::new();
        if !self.rejected_indices.is_empty() {
            out.push(format!(
                "{} malformed record(s) are excluded, at metrics indices {:?}",
                self.rejected_indices.len(),
                self.rejected_indices
            ));
        }
        if self.unknown_geography_records > 0 {
            out.push(format!(
                "{} record(s) name geographies outside the list and are excluded: {:?}",
                self.unknown_geography_records, self.unknown_geographies
            ));
        }
        if self.out_of_range_records > 0 {
            out.push(format!(
                "{} record(s) have years outside the expected range and are excluded: {:?}",
                self.out_of_range_records, self.out_of_range_years
            ));
        }
        if !self.duplicate_pairs.is_empty() {
            out.push(format!(
                "{} (year, geography) pair(s) have duplicate records; the last record wins: {:?}",
                self.duplicate_pairs.len(),
                self.duplicate_pairs
            ));
        }
        out
    }
}

/// Inspect a dataset for records the charts will exclude or collapse.
pub fn audit(dataset: &AffordabilityDataset) -> DatasetAudit {
    let known: HashSet<&str> = dataset.geographies.iter().map(String::as_str).collect();
    let mut report = DatasetAudit::default();
    let mut counts: HashMap<(i32, &str), usize> = HashMap::new();
    report.rejected_indices = dataset.rejected.iter().map(|r| r.index).collect();

    for record in &dataset.metrics {
        let geo = record.geo_name.as_str();
        let mut excluded = false;
        if !known.contains(geo) {
            report.unknown_geography_records += 1;
            report.unknown_geographies.insert(record.geo_name.clone());
            excluded = true;
        }
        if !year_in_range(record.year) {
            report.out_of_range_records += 1;
            report.out_of_range_years.insert(record.year);
            excluded = true;
        }
        if !excluded {
            *counts.entry((record.year, geo)).or_default() += 1;
        }
    }

    let mut duplicates: Vec<(i32, String)> = counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|((year, geo), _)| (year, geo.to_string()))
        .collect();
    duplicates.sort();
    report.duplicate_pairs = duplicates;
    report
}
