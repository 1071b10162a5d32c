use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::report::{report_files, ReportError, ReportKind, Result};

lazy_static! {
    static ref PATH_TYPE_RE: Regex = Regex::new(r"(?i)Path Type\s*:\s*(\w+)").unwrap();
    static ref SLACK_RE: Regex =
        Regex::new(r"(?i)([-\d.]+)\s+slack\s*\((MET|VIOLATED)\)").unwrap();
}

/// Timing check flavor. Reports label min-delay paths `min` and
/// max-delay paths `max`; those correspond to hold and setup checks.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum PathType {
    Hold,
    Setup,
}

impl PathType {
    fn from_report(label: &str) -> Self {
        if label.eq_ignore_ascii_case("min") {
            PathType::Hold
        } else {
            PathType::Setup
        }
    }
}

impl fmt::Display for PathType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathType::Hold => write!(f, "hold"),
            PathType::Setup => write!(f, "setup"),
        }
    }
}

impl FromStr for PathType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "hold" => Ok(PathType::Hold),
            "setup" => Ok(PathType::Setup),
            other => Err(format!("unknown path type {other:?}")),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SlackStatus {
    Met,
    Violated,
}

impl fmt::Display for SlackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlackStatus::Met => write!(f, "MET"),
            SlackStatus::Violated => write!(f, "VIOLATED"),
        }
    }
}

impl FromStr for SlackStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "MET" => Ok(SlackStatus::Met),
            "VIOLATED" => Ok(SlackStatus::Violated),
            other => Err(format!("unknown slack status {other:?}")),
        }
    }
}

/// One slack line scraped from a timing report.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingRecord {
    pub process: String,
    pub corner: String,
    pub path_type: PathType,
    pub slack: f64,
    pub status: SlackStatus,
}

/// Scrapes every slack line from the timing reports under
/// `report_dir/<process>` for each of the given processes.
///
/// A `Path Type` line sets the check flavor for the slack lines that
/// follow it; a report whose first slack line precedes any path type
/// line is malformed.
pub fn scrape_timing(
    report_dir: impl AsRef<Path>,
    processes: &[String],
) -> Result<Vec<TimingRecord>> {
    let mut records = Vec::new();
    for process in processes {
        let proc_dir = report_dir.as_ref().join(process);
        for (path, pvt) in report_files(&proc_dir, ReportKind::Timing)? {
            let file = BufReader::new(File::open(&path)?);
            let mut path_type = None;
            for line in file.lines() {
                let line = line?;
                let trimmed = line.trim();

                if let Some(caps) = PATH_TYPE_RE.captures(trimmed) {
                    path_type = Some(PathType::from_report(&caps[1]));
                    continue;
                }

                if let Some(caps) = SLACK_RE.captures(trimmed) {
                    let path_type = path_type.ok_or_else(|| ReportError::SlackBeforePathType {
                        file: path.clone(),
                    })?;
                    let slack =
                        caps[1]
                            .parse::<f64>()
                            .map_err(|_| ReportError::MalformedSlack {
                                file: path.clone(),
                                value: caps[1].to_string(),
                            })?;
                    let status = if caps[2].eq_ignore_ascii_case("met") {
                        SlackStatus::Met
                    } else {
                        SlackStatus::Violated
                    };
                    records.push(TimingRecord {
                        process: process.clone(),
                        corner: pvt.clone(),
                        path_type,
                        slack,
                        status,
                    });
                }
            }
            debug!("scraped timing report {:?}", path);
        }
    }
    Ok(records)
}
