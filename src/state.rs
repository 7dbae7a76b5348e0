use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;

use crate::chart::{build_all, ChartModel};
use crate::color::VisualEncoder;
use crate::config::ViewerConfig;
use crate::data::audit::audit;
use crate::data::loader::{spawn_load, LoadError};
use crate::data::model::AffordabilityDataset;
use crate::data::series::{latest_snapshot, Snapshot};

// ---------------------------------------------------------------------------
// Load status
// ---------------------------------------------------------------------------

/// Everything derived from a successfully loaded dataset. Built once per
/// load cycle and never mutated.
#[derive(Debug)]
pub struct LoadedPage {
    pub dataset: AffordabilityDataset,
    pub encoder: VisualEncoder,
    pub charts: Vec<ChartModel>,
    pub snapshot: Snapshot,
}

impl LoadedPage {
    pub fn new(dataset: AffordabilityDataset) -> Self {
        let encoder = VisualEncoder::new(&dataset.geographies);
        let charts = build_all(&dataset.metrics, &dataset.geographies);
        let snapshot = latest_snapshot(&dataset.metrics, &dataset.geographies);
        Self {
            dataset,
            encoder,
            charts,
            snapshot,
        }
    }
}

/// `Loading → Ready` or `Loading → Failed`; both outcomes are final for the
/// cycle.
#[derive(Debug, Clone)]
pub enum LoadStatus {
    Loading { path: PathBuf },
    Ready(Arc<LoadedPage>),
    Failed(String),
}

/// The only view of the data the narrative text gets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary {
    pub loaded: bool,
    pub record_count: usize,
    pub geography_count: usize,
    pub error: Option<String>,
}

impl PageSummary {
    pub fn sentence(&self) -> String {
        match (&self.error, self.loaded) {
            (Some(err), _) => err.clone(),
            (None, true) => format!(
                "Loaded {} records across {} geographies.",
                self.record_count, self.geography_count
            ),
            (None, false) => "Loading dataset…".to_string(),
        }
    }
}

impl LoadStatus {
    pub fn summary(&self) -> PageSummary {
        match self {
            LoadStatus::Loading { .. } => PageSummary {
                loaded: false,
                record_count: 0,
                geography_count: 0,
                error: None,
            },
            LoadStatus::Ready(page) => PageSummary {
                loaded: true,
                record_count: page.dataset.len(),
                geography_count: page.dataset.geographies.len(),
                error: None,
            },
            LoadStatus::Failed(msg) => PageSummary {
                loaded: false,
                record_count: 0,
                geography_count: 0,
                error: Some(msg.clone()),
            },
        }
    }

    pub fn page(&self) -> Option<&Arc<LoadedPage>> {
        match self {
            LoadStatus::Ready(page) => Some(page),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadStatus::Loading { .. })
    }

    /// Resolve a pending load. Has no effect once the cycle has finished.
    pub fn finish(self, result: Result<AffordabilityDataset, LoadError>) -> Self {
        let LoadStatus::Loading { path } = self else {
            return self;
        };
        match result {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} records for {} geographies from {}",
                    dataset.len(),
                    dataset.geographies.len(),
                    path.display()
                );
                let report = audit(&dataset);
                if !report.is_clean() {
                    for finding in report.findings() {
                        log::warn!("{finding}");
                    }
                }
                LoadStatus::Ready(Arc::new(LoadedPage::new(dataset)))
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                LoadStatus::Failed(format!("Error: {e}"))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: ViewerConfig,

    /// Status of the current load cycle.
    pub status: LoadStatus,

    /// Result channel of the in-flight load, if any.
    pending: Option<Receiver<Result<AffordabilityDataset, LoadError>>>,

    /// Outcome of the last export, shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    /// Create the state and start loading the configured dataset.
    pub fn new(config: ViewerConfig) -> Self {
        let path = config.dataset_path.clone();
        let mut state = Self {
            config,
            status: LoadStatus::Loading { path: path.clone() },
            pending: None,
            status_message: None,
        };
        state.begin_load(&path);
        state
    }

    /// Start a fresh load cycle, discarding whatever the previous one held.
    pub fn begin_load(&mut self, path: &Path) {
        log::info!("Loading dataset from {}", path.display());
        self.status = LoadStatus::Loading {
            path: path.to_path_buf(),
        };
        self.status_message = None;
        self.pending = Some(spawn_load(path.to_path_buf()));
    }

    /// Check the in-flight load. Returns `true` when the status changed.
    pub fn poll(&mut self) -> bool {
        let Some(rx) = &self.pending else {
            return false;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => Err(LoadError::Fetch {
                path: self.current_path(),
                source: std::io::Error::other("loader thread exited without a result"),
            }),
        };
        self.pending = None;
        self.complete(result);
        true
    }

    fn complete(&mut self, result: Result<AffordabilityDataset, LoadError>) {
        let status = std::mem::replace(&mut self.status, LoadStatus::Failed(String::new()));
        self.status = status.finish(result);
    }

    fn current_path(&self) -> PathBuf {
        match &self.status {
            LoadStatus::Loading { path } => path.clone(),
            _ => self.config.dataset_path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::AffordabilityMetric;

    fn dataset() -> AffordabilityDataset {
        let mut rec = AffordabilityMetric::empty(2020, "A");
        rec.median_home_value = Some(100000.0);
        AffordabilityDataset::new(
            vec!["A".into(), "B".into()],
            vec![rec, AffordabilityMetric::empty(2021, "B")],
        )
    }

    fn loading() -> LoadStatus {
        LoadStatus::Loading {
            path: PathBuf::from("affordability.json"),
        }
    }

    #[test]
    fn loading_reports_not_loaded() {
        let summary = loading().summary();
        assert!(!summary.loaded);
        assert_eq!(summary.error, None);
        assert_eq!(summary.sentence(), "Loading dataset…");
    }

    #[test]
    fn ready_builds_five_charts_and_summary() {
        let status = loading().finish(Ok(dataset()));
        let page = status.page().unwrap();
        assert_eq!(page.charts.len(), 5);

        let summary = status.summary();
        assert!(summary.loaded);
        assert_eq!(summary.record_count, 2);
        assert_eq!(summary.geography_count, 2);
        assert_eq!(summary.sentence(), "Loaded 2 records across 2 geographies.");
    }

    #[test]
    fn failure_is_single_terminal_state() {
        let status = loading().finish(Err(LoadError::Schema("missing `metrics`".into())));
        assert!(status.page().is_none());
        let summary = status.summary();
        assert!(!summary.loaded);
        assert!(summary.sentence().contains("missing `metrics`"));

        let after = status.finish(Ok(dataset()));
        assert!(matches!(after, LoadStatus::Failed(_)));
    }

    #[test]
    fn app_state_loads_from_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("affordability.json");
        std::fs::write(&path, serde_json::to_string(&dataset()).unwrap()).unwrap();

        let mut state = AppState::new(ViewerConfig { dataset_path: path });
        assert!(state.status.is_loading());
        while !state.poll() {
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert_eq!(state.status.summary().record_count, 2);
        assert!(!state.poll());
    }

    #[test]
    fn missing_metrics_key_renders_no_charts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, r#"{"geographies": ["A"]}"#).unwrap();

        let mut state = AppState::new(ViewerConfig { dataset_path: path });
        while !state.poll() {
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert!(matches!(state.status, LoadStatus::Failed(_)));
        assert!(state.status.page().is_none());
    }

    #[test]
    fn mistyped_record_does_not_take_down_the_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("affordability.json");
        std::fs::write(
            &path,
            r#"{"geographies": ["A"], "metrics": [
                {"year": 2020, "geo_name": "A", "median_home_value": 100000},
                {"year": 2021, "geo_name": "A", "median_home_value": 110000},
                {"year": 2022, "geo_name": "A", "median_home_value": "n/a"}
            ]}"#,
        )
        .unwrap();

        let mut state = AppState::new(ViewerConfig { dataset_path: path });
        while !state.poll() {
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        let page = state.status.page().unwrap();
        assert_eq!(page.dataset.rejected.len(), 1);
        assert_eq!(state.status.summary().record_count, 2);

        let home_value = &page.charts[0];
        assert_eq!(home_value.x_domain, vec![2020, 2021]);
        assert_eq!(
            home_value.lines[0].segments,
            vec![vec![[2020.0, 100000.0], [2021.0, 110000.0]]]
        );
    }
}
