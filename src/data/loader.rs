use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};

use serde::Deserialize;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{AffordabilityDataset, AffordabilityMetric, RejectedRecord};

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Why a dataset could not be loaded. Every variant is terminal for the
/// load cycle it belongs to.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read dataset {}: {source}", .path.display())]
    Fetch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("dataset is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("dataset has an unexpected shape: {0}")]
    Schema(String),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read and validate the artifact at `path`.
pub fn load_file(path: &Path) -> Result<AffordabilityDataset, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Fetch {
        path: path.to_path_buf(),
        source,
    })?;
    parse_dataset(&text)
}

/// Start loading `path` on a worker thread. The receiver yields exactly one
/// result.
pub fn spawn_load(path: PathBuf) -> Receiver<Result<AffordabilityDataset, LoadError>> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let result = load_file(&path);
        // The receiver is gone if the viewer started another load cycle.
        let _ = tx.send(result);
    });
    rx
}

// ---------------------------------------------------------------------------
// JSON validation
// ---------------------------------------------------------------------------

/// Expected document:
///
/// ```json
/// {
///   "geographies": ["Fergus Falls city, Minnesota", ...],
///   "metrics": [
///     { "year": 2013, "geo_name": "Fergus Falls city, Minnesota",
///       "median_home_value": 112300, "hud_fmr_2br": null, ... },
///     ...
///   ]
/// }
/// ```
///
/// Records are returned exactly as found: no filtering, reordering or
/// coercion of missing values. An object entry whose fields do not fit the
/// record layout (say `"year": "2021"`) is set aside in `rejected` instead of
/// failing the load.
pub fn parse_dataset(text: &str) -> Result<AffordabilityDataset, LoadError> {
    let root: JsonValue = serde_json::from_str(text)?;

    let obj = root
        .as_object()
        .ok_or_else(|| schema("top-level value must be an object"))?;

    let geographies = parse_geographies(obj.get("geographies"))?;
    let (metrics, rejected) = parse_metrics(obj.get("metrics"))?;

    Ok(AffordabilityDataset {
        geographies,
        metrics,
        rejected,
    })
}

fn parse_geographies(val: Option<&JsonValue>) -> Result<Vec<String>, LoadError> {
    let arr = val
        .ok_or_else(|| schema("missing `geographies`"))?
        .as_array()
        .ok_or_else(|| schema("`geographies` must be an array of strings"))?;

    let mut seen = HashSet::with_capacity(arr.len());
    arr.iter()
        .enumerate()
        .map(|(i, v)| {
            let name = v
                .as_str()
                .ok_or_else(|| schema(format!("geographies[{i}] is not a string")))?;
            if !seen.insert(name) {
                return Err(schema(format!("geographies[{i}]: duplicate `{name}`")));
            }
            Ok(name.to_string())
        })
        .collect()
}

fn parse_metrics(
    val: Option<&JsonValue>,
) -> Result<(Vec<AffordabilityMetric>, Vec<RejectedRecord>), LoadError> {
    let arr = val
        .ok_or_else(|| schema("missing `metrics`"))?
        .as_array()
        .ok_or_else(|| schema("`metrics` must be an array of records"))?;

    let mut metrics = Vec::with_capacity(arr.len());
    let mut rejected = Vec::new();
    for (i, v) in arr.iter().enumerate() {
        if !v.is_object() {
            return Err(schema(format!("metrics[{i}] is not a record")));
        }
        match AffordabilityMetric::deserialize(v) {
            Ok(record) => metrics.push(record),
            Err(e) => rejected.push(RejectedRecord {
                index: i,
                reason: e.to_string(),
            }),
        }
    }
    Ok((metrics, rejected))
}

fn schema(msg: impl Into<String>) -> LoadError {
    LoadError::Schema(msg.into())
}
