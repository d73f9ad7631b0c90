//! Pipeline configuration: which datasets to score, where outputs go, and
//! the minimum-score cutoff.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

fn default_min_score() -> f64 {
    9.0
}

/// One source dataset: where it lives, the constant score its records carry,
/// and where the annotated copy goes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSpec {
    pub path: PathBuf,
    pub score: f64,
    pub output: PathBuf,
}

/// Full pipeline configuration.
///
/// Stored as plain JSON on disk:
/// ```json
/// {
///   "sources": [
///     { "path": "special_records_1-1.csv", "score": 9, "output": "special_records_1-1_updated.csv" }
///   ],
///   "merged_output": "merged_sum_score.csv",
///   "positions_file": "gps_gpgga_data5.csv",
///   "final_output": "final_data_with_gps_data.csv",
///   "min_score": 9
/// }
/// ```
///
/// Sources are an ordered list, so annotation and merge order is exactly the
/// order written in the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub sources: Vec<SourceSpec>,
    pub merged_output: PathBuf,
    pub positions_file: PathBuf,
    pub final_output: PathBuf,
    #[serde(default = "default_min_score")]
    pub min_score: f64,
}

impl PipelineConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }
}

impl Default for PipelineConfig {
    /// The dataset map the tool ships with: four anomaly datasets with their
    /// historical scores, merged and joined against the GPGGA GPS capture.
    fn default() -> Self {
        let sources = [
            ("special_records_1-1", 9.0),
            ("anomalies_1-2", 3.0),
            ("detected_anomalies_1-3", 2.0),
            ("merged_analysis1-4", 3.0),
        ]
        .into_iter()
        .map(|(name, score)| SourceSpec {
            path: PathBuf::from(format!("{name}.csv")),
            score,
            output: PathBuf::from(format!("{name}_updated.csv")),
        })
        .collect();

        PipelineConfig {
            sources,
            merged_output: PathBuf::from("merged_sum_score.csv"),
            positions_file: PathBuf::from("gps_gpgga_data5.csv"),
            final_output: PathBuf::from("final_data_with_gps_data.csv"),
            min_score: default_min_score(),
        }
    }
}
