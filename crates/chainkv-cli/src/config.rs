use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::cli::BaselineOpts;

/// Settings for reading and checking a baseline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineConfig {
    /// Baseline file, one name per line.
    pub baseline_path: PathBuf,
    /// Value stored for every baseline name; lookups returning anything
    /// else count as unrecognized.
    pub sentinel: String,
    /// Initial bucket count. Zero sizes the table from the baseline length.
    pub initial_capacity: usize,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            baseline_path: PathBuf::from("data.txt"),
            sentinel: "1".to_string(),
            initial_capacity: 0,
        }
    }
}

impl BaselineConfig {
    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Start from `--config` (or defaults) and apply the shared flags.
    pub fn from_opts(opts: &BaselineOpts) -> anyhow::Result<Self> {
        let mut config = match &opts.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(path) = &opts.baseline {
            config.baseline_path = path.clone();
        }
        Ok(config)
    }
}
