use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// AffordabilityMetric – one (year, geography) observation
// ---------------------------------------------------------------------------

/// A single observation for one geography in one year.
///
/// Every numeric field may be absent (`None`). Absence is kept as-is all the
/// way to the charts and is never read as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityMetric {
    pub year: i32,
    pub geo_name: String,
    #[serde(default)]
    pub median_household_income: Option<f64>,
    #[serde(default)]
    pub median_home_value: Option<f64>,
    #[serde(default)]
    pub median_gross_rent: Option<f64>,
    #[serde(default)]
    pub price_to_income: Option<f64>,
    #[serde(default)]
    pub rent_to_income: Option<f64>,
    #[serde(default)]
    pub owner_cost_burdened_share: Option<f64>,
    /// HUD two-bedroom Fair Market Rent. Routinely absent for the latest years.
    #[serde(default)]
    pub hud_fmr_2br: Option<f64>,
}

#[cfg(test)]
impl AffordabilityMetric {
    /// A record with only its key fields set.
    pub fn empty(year: i32, geo_name: impl Into<String>) -> Self {
        Self {
            year,
            geo_name: geo_name.into(),
            median_household_income: None,
            median_home_value: None,
            median_gross_rent: None,
            price_to_income: None,
            rent_to_income: None,
            owner_cost_burdened_share: None,
            hud_fmr_2br: None,
        }
    }
}

// ---------------------------------------------------------------------------
// AffordabilityDataset – the complete loaded artifact
// ---------------------------------------------------------------------------

/// The loaded artifact, held immutably for the lifetime of one load cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityDataset {
    /// Canonical legend / colour order.
    pub geographies: Vec<String>,
    /// Unordered; duplicates and gaps are possible.
    pub metrics: Vec<AffordabilityMetric>,
    /// Record objects whose fields did not match the record layout. Kept out
    /// of `metrics` so the rest of the dataset still charts.
    #[serde(skip)]
    pub rejected: Vec<RejectedRecord>,
}

/// A `metrics` entry that was an object but not a valid record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    /// Position in the artifact's `metrics` array.
    pub index: usize,
    pub reason: String,
}

impl AffordabilityDataset {
    pub fn new(geographies: Vec<String>, metrics: Vec<AffordabilityMetric>) -> Self {
        Self {
            geographies,
            metrics,
            rejected: Vec::new(),
        }
    }

    /// Number of metric records.
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Whether the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

// ---------------------------------------------------------------------------
// MetricKey – typed selector over the numeric record fields
// ---------------------------------------------------------------------------

/// How values of a metric are displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueUnit {
    /// Whole dollars.
    Currency,
    /// Dollars per month.
    MonthlyCurrency,
    /// Dimensionless multiple, e.g. price-to-income.
    Ratio,
    /// Fraction in `[0, 1]`, displayed as a percentage.
    Share,
}

impl ValueUnit {
    /// Format a value for ticks, hover text and tables.
    pub fn format(self, value: f64) -> String {
        match self {
            ValueUnit::Currency => format!("${}", group_thousands(value.round() as i64)),
            ValueUnit::MonthlyCurrency => {
                format!("${}/mo", group_thousands(value.round() as i64))
            }
            ValueUnit::Ratio => format!("{value:.2}x"),
            ValueUnit::Share => format!("{:.1}%", value * 100.0),
        }
    }

    /// Format an optional value; absent values are shown as "n/a".
    pub fn format_opt(self, value: Option<f64>) -> String {
        value.map_or_else(|| "n/a".to_string(), |v| self.format(v))
    }
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if n < 0 {
        out.insert(0, '-');
    }
    out
}

/// Selects one numeric field of [`AffordabilityMetric`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetricKey {
    MedianHouseholdIncome,
    MedianHomeValue,
    MedianGrossRent,
    PriceToIncome,
    RentToIncome,
    OwnerCostBurdenedShare,
    HudFmr2br,
}

impl MetricKey {
    pub const ALL: [MetricKey; 7] = [
        MetricKey::MedianHouseholdIncome,
        MetricKey::MedianHomeValue,
        MetricKey::MedianGrossRent,
        MetricKey::PriceToIncome,
        MetricKey::RentToIncome,
        MetricKey::OwnerCostBurdenedShare,
        MetricKey::HudFmr2br,
    ];

    /// Read this field from a record. `None` is the absent-value marker.
    pub fn value(self, record: &AffordabilityMetric) -> Option<f64> {
        match self {
            MetricKey::MedianHouseholdIncome => record.median_household_income,
            MetricKey::MedianHomeValue => record.median_home_value,
            MetricKey::MedianGrossRent => record.median_gross_rent,
            MetricKey::PriceToIncome => record.price_to_income,
            MetricKey::RentToIncome => record.rent_to_income,
            MetricKey::OwnerCostBurdenedShare => record.owner_cost_burdened_share,
            MetricKey::HudFmr2br => record.hud_fmr_2br,
        }
    }

    /// JSON field name.
    pub fn field_name(self) -> &'static str {
        match self {
            MetricKey::MedianHouseholdIncome => "median_household_income",
            MetricKey::MedianHomeValue => "median_home_value",
            MetricKey::MedianGrossRent => "median_gross_rent",
            MetricKey::PriceToIncome => "price_to_income",
            MetricKey::RentToIncome => "rent_to_income",
            MetricKey::OwnerCostBurdenedShare => "owner_cost_burdened_share",
            MetricKey::HudFmr2br => "hud_fmr_2br",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MetricKey::MedianHouseholdIncome => "Median household income",
            MetricKey::MedianHomeValue => "Median home value",
            MetricKey::MedianGrossRent => "Median gross rent",
            MetricKey::PriceToIncome => "Price-to-income",
            MetricKey::RentToIncome => "Rent-to-income",
            MetricKey::OwnerCostBurdenedShare => "Owner cost-burdened share",
            MetricKey::HudFmr2br => "HUD FMR (2BR)",
        }
    }

    pub fn unit(self) -> ValueUnit {
        match self {
            MetricKey::MedianHouseholdIncome | MetricKey::MedianHomeValue => ValueUnit::Currency,
            MetricKey::MedianGrossRent | MetricKey::HudFmr2br => ValueUnit::MonthlyCurrency,
            MetricKey::PriceToIncome => ValueUnit::Ratio,
            MetricKey::RentToIncome | MetricKey::OwnerCostBurdenedShare => ValueUnit::Share,
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}
