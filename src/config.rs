// src/config.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Export projections a run can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputTarget {
    CombinedTable,
    PerDatePartitions,
}

/// One run's configuration, loadable from a YAML file. The range is
/// inclusive on both ends; everything else has a conservative default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Pause between successive page fetches.
    #[serde(default = "default_request_delay_secs")]
    pub request_delay_secs: u64,
    #[serde(default = "default_outputs")]
    pub outputs: Vec<OutputTarget>,
    /// Also wrap the per-date files into one ZIP bundle.
    #[serde(default)]
    pub bundle_daily: bool,
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
}

fn default_request_delay_secs() -> u64 {
    2
}

fn default_outputs() -> Vec<OutputTarget> {
    vec![OutputTarget::CombinedTable, OutputTarget::PerDatePartitions]
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("out")
}

impl ScrapeConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_yaml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_secs(self.request_delay_secs)
    }

    pub fn wants(&self, target: OutputTarget) -> bool {
        self.outputs.contains(&target)
    }
}
