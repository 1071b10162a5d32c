use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Name of the linked top-level design.
    pub design: String,
    /// Directory containing the `.lib` files to sweep.
    pub lib_dir: PathBuf,
    /// Root of the per-process report directories.
    pub report_dir: PathBuf,
    /// Process labels naming the subdirectories of `report_dir`.
    pub processes: Vec<String>,
    /// Clock period (ns) for the generated run script.
    pub clock_period: f64,
    /// Overrides the STA executable name.
    pub sta_bin: Option<String>,
}

pub fn parse_sweep_config(path: impl AsRef<Path>) -> Result<SweepConfig> {
    let contents = fs::read_to_string(path)?;
    let data = toml::from_str(&contents)?;
    Ok(data)
}
