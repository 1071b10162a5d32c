use std::fmt::Write as FmtWrite;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context};

use crate::corner::CornerKey;
use crate::report::{PathType, PowerRecord, SlackStatus, TimingRecord};
use crate::Result;

/// Writes the power summary table: `Process` (10), `PVT Corner` (30),
/// `Total Power`.
pub fn write_power_summary(path: impl AsRef<Path>, records: &[PowerRecord]) -> Result<()> {
    let mut out = String::new();
    writeln!(out, "{:<10}{:<30}{}", "Process", "PVT Corner", "Total Power")?;
    for r in records {
        writeln!(out, "{:<10}{:<30}{}", r.process, r.corner, r.total_power)?;
    }
    save(path, &out)
}

/// Writes the timing summary table: `Process` (10), `PVT Corner` (30),
/// `Path Type` (15), `Slack` (12), `Status`.
pub fn write_timing_summary(path: impl AsRef<Path>, records: &[TimingRecord]) -> Result<()> {
    let mut out = String::new();
    writeln!(
        out,
        "{:<10}{:<30}{:<15}{:<12}{}",
        "Process", "PVT Corner", "Path Type", "Slack", "Status"
    )?;
    for r in records {
        writeln!(
            out,
            "{:<10}{:<30}{:<15}{:<12} {}",
            r.process, r.corner, r.path_type, r.slack, r.status
        )?;
    }
    save(path, &out)
}

fn save(path: impl AsRef<Path>, contents: &str) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

/// A power summary row with its corner decoded for sorting and
/// charting.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerRow {
    pub process: String,
    pub corner: String,
    pub key: CornerKey,
    pub power_w: f64,
}

/// A timing summary row with its corner decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingRow {
    pub process: String,
    pub corner: String,
    pub key: CornerKey,
    pub path_type: PathType,
    pub slack: f64,
    pub status: SlackStatus,
}

/// Loads a power summary table, sorted by process, then temperature,
/// then voltage.
pub fn load_power_summary(path: impl AsRef<Path>) -> Result<Vec<PowerRow>> {
    let path = path.as_ref();
    let contents =
        fs::read_to_string(path).with_context(|| format!("Error reading {path:?}"))?;

    let mut rows = Vec::new();
    for (i, line) in contents.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        let &[process, corner, power] = fields.as_slice() else {
            bail!("{path:?}:{}: malformed power summary row", i + 1);
        };
        rows.push(PowerRow {
            process: process.to_string(),
            corner: corner.to_string(),
            key: parse_corner(corner, path, i)?,
            power_w: power
                .parse()
                .with_context(|| format!("{path:?}:{}: bad power value {power:?}", i + 1))?,
        });
    }

    rows.sort_by(|a, b| a.process.cmp(&b.process).then(a.key.cmp_order(&b.key)));
    Ok(rows)
}

/// Loads a timing summary table, sorted by process, then path type,
/// then temperature, then voltage.
pub fn load_timing_summary(path: impl AsRef<Path>) -> Result<Vec<TimingRow>> {
    let path = path.as_ref();
    let contents =
        fs::read_to_string(path).with_context(|| format!("Error reading {path:?}"))?;

    let mut rows = Vec::new();
    for (i, line) in contents.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        let &[process, corner, path_type, slack, status] = fields.as_slice() else {
            bail!("{path:?}:{}: malformed timing summary row", i + 1);
        };
        rows.push(TimingRow {
            process: process.to_string(),
            corner: corner.to_string(),
            key: parse_corner(corner, path, i)?,
            path_type: path_type
                .parse()
                .map_err(|e| anyhow::anyhow!("{path:?}:{}: {e}", i + 1))?,
            slack: slack
                .parse()
                .with_context(|| format!("{path:?}:{}: bad slack value {slack:?}", i + 1))?,
            status: status
                .parse()
                .map_err(|e| anyhow::anyhow!("{path:?}:{}: {e}", i + 1))?,
        });
    }

    rows.sort_by(|a, b| {
        a.process
            .cmp(&b.process)
            .then(a.path_type.cmp(&b.path_type))
            .then(a.key.cmp_order(&b.key))
    });
    Ok(rows)
}

fn parse_corner(corner: &str, path: &Path, line_idx: usize) -> Result<CornerKey> {
    CornerKey::parse(corner).ok_or_else(|| {
        anyhow::anyhow!(
            "{path:?}:{}: unrecognized PVT corner label {corner:?}",
            line_idx + 1
        )
    })
}
