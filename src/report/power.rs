use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

use crate::report::{report_files, ReportError, ReportKind, Result};

/// One `Total` row scraped from a power report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerRecord {
    pub process: String,
    pub corner: String,
    /// Total power token exactly as reported (e.g. `9.42e-03`).
    pub total_power: String,
}

/// Scrapes the total power from every power report under
/// `report_dir/<process>` for each of the given processes.
///
/// The `Total` row of a power report lists internal, switching, and
/// leakage power followed by the total; the total is the fifth
/// whitespace-separated token. The token must parse as a float but is
/// retained verbatim so the summary table shows exactly what the
/// report said.
pub fn scrape_power(report_dir: impl AsRef<Path>, processes: &[String]) -> Result<Vec<PowerRecord>> {
    let mut records = Vec::new();
    for process in processes {
        let proc_dir = report_dir.as_ref().join(process);
        for (path, pvt) in report_files(&proc_dir, ReportKind::Power)? {
            let file = BufReader::new(File::open(&path)?);
            for line in file.lines() {
                let line = line?;
                let trimmed = line.trim();
                if !trimmed.starts_with("Total") {
                    continue;
                }
                let total = parse_total_line(trimmed).ok_or_else(|| {
                    ReportError::MalformedTotalLine {
                        file: path.clone(),
                        line: trimmed.to_string(),
                    }
                })?;
                records.push(PowerRecord {
                    process: process.clone(),
                    corner: pvt.clone(),
                    total_power: total,
                });
            }
            debug!("scraped power report {:?}", path);
        }
    }
    Ok(records)
}

/// Extracts the total power token from a `Total` row, requiring it to
/// be a valid float.
fn parse_total_line(line: &str) -> Option<String> {
    let mut tokens = line.split_whitespace();
    if tokens.next() != Some("Total") {
        return None;
    }
    // internal, switching, leakage, then the total
    let total = tokens.nth(3)?;
    total.parse::<f64>().ok()?;
    Some(total.to_string())
}
