use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::corner;

pub mod power;
pub mod timing;

pub use power::{scrape_power, PowerRecord};
pub use timing::{scrape_timing, PathType, SlackStatus, TimingRecord};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("report file name {0:?} has no PVT corner segment")]
    MissingCorner(String),

    #[error("{file:?}: malformed total power line: {line:?}")]
    MalformedTotalLine { file: PathBuf, line: String },

    #[error("{file:?}: slack reported before any path type")]
    SlackBeforePathType { file: PathBuf },

    #[error("{file:?}: malformed slack value {value:?}")]
    MalformedSlack { file: PathBuf, value: String },
}

pub type Result<T> = std::result::Result<T, ReportError>;

/// Report flavors distinguished by the second dot-separated segment of
/// the file name (`<design>.power.<lib>.rpt`, `<design>.timing.<lib>.rpt`).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReportKind {
    Power,
    Timing,
}

impl ReportKind {
    fn matches(&self, file_name: &str) -> bool {
        file_name.split('.').nth(1) == Some(match self {
            ReportKind::Power => "power",
            ReportKind::Timing => "timing",
        })
    }
}

/// Lists the reports of the given kind in one process directory, paired
/// with their PVT corner labels. Sorted by file name so scrape output is
/// deterministic regardless of directory order.
pub(crate) fn report_files(proc_dir: &Path, kind: ReportKind) -> Result<Vec<(PathBuf, String)>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(proc_dir)? {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if !kind.matches(&file_name) {
            continue;
        }
        let pvt = corner::pvt_label(&file_name)
            .ok_or_else(|| ReportError::MissingCorner(file_name.clone()))?;
        files.push((entry.path(), pvt));
    }
    files.sort();
    Ok(files)
}
