use std::path::PathBuf;

/// First year of the expected observation range (inclusive).
pub const FIRST_YEAR: i32 = 2013;
/// Last year of the expected observation range (inclusive).
pub const LAST_YEAR: i32 = 2023;

/// Environment variable overriding the dataset location.
pub const DATASET_ENV: &str = "HOUSING_LENS_DATASET";
/// Where the data-preparation step writes the artifact.
pub const DEFAULT_DATASET_PATH: &str = "data/processed/affordability.json";

/// Whether `year` falls inside the expected observation range.
pub fn year_in_range(year: i32) -> bool {
    (FIRST_YEAR..=LAST_YEAR).contains(&year)
}

// ---------------------------------------------------------------------------
// Viewer configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    pub dataset_path: PathBuf,
}

impl ViewerConfig {
    /// Resolve from the process arguments and environment.
    pub fn from_env() -> Self {
        let arg = std::env::args().nth(1);
        let env = std::env::var(DATASET_ENV).ok();
        Self::resolve(arg, env)
    }

    /// First positional argument wins, then the environment, then the default.
    pub fn resolve(arg: Option<String>, env: Option<String>) -> Self {
        let dataset_path = arg
            .filter(|a| !a.trim().is_empty())
            .or_else(|| env.filter(|e| !e.trim().is_empty()))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET_PATH));
        Self { dataset_path }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self::resolve(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_takes_precedence_over_env() {
        let cfg = ViewerConfig::resolve(Some("a.json".into()), Some("b.json".into()));
        assert_eq!(cfg.dataset_path, PathBuf::from("a.json"));
    }

    #[test]
    fn env_used_when_no_argument() {
        let cfg = ViewerConfig::resolve(None, Some("b.json".into()));
        assert_eq!(cfg.dataset_path, PathBuf::from("b.json"));
    }

    #[test]
    fn blank_values_fall_back_to_default() {
        let cfg = ViewerConfig::resolve(Some(" ".into()), Some(String::new()));
        assert_eq!(cfg, ViewerConfig::default());
        assert_eq!(cfg.dataset_path, PathBuf::from(DEFAULT_DATASET_PATH));
    }

    #[test]
    fn year_range_is_inclusive() {
        assert!(year_in_range(2013));
        assert!(year_in_range(2023));
        assert!(!year_in_range(2012));
        assert!(!year_in_range(2024));
    }
}
