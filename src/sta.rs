use std::fs::{self, File};
use std::path::Path;
use std::process::Command;

use anyhow::Context as AnyhowContext;
use log::{info, warn};
use serde::Serialize;
use tera::Context;

use crate::config::SweepConfig;
use crate::corner;
use crate::paths::{out_sta, out_sta_stderr, out_sta_stdout, out_tcl};
use crate::{anyhow, Result, TEMPLATES};

pub const DEFAULT_STA_BIN: &str = "sta";

/// Template context for one STA run script.
#[derive(Debug, Clone, Serialize)]
pub struct RunScriptParams {
    pub design: String,
    pub lib_dir: String,
    pub lib_name: String,
    /// Report subdirectory for this lib (its process group, e.g. `TT`).
    pub file_dir: String,
    pub report_dir: String,
    pub clock_period: f64,
}

pub fn render_run_script(params: &RunScriptParams) -> Result<String> {
    Ok(TEMPLATES.render("sta.tcl", &Context::from_serialize(params)?)?)
}

pub struct SweepOutcome {
    /// Number of libs swept.
    pub total: usize,
    /// Number of STA runs that exited unsuccessfully.
    pub failed: usize,
}

/// Runs the STA binary once per `.lib` file in the configured library
/// directory.
///
/// Each run gets its own rendered script and captured stdout/stderr
/// under `<work_dir>/sta/`. A run that exits unsuccessfully is logged
/// and counted; the sweep continues with the remaining libs.
pub fn run_corner_sweep(config: &SweepConfig, work_dir: impl AsRef<Path>) -> Result<SweepOutcome> {
    let work_dir = work_dir.as_ref();
    let sta_bin = config.sta_bin.as_deref().unwrap_or(DEFAULT_STA_BIN);

    let mut lib_files = Vec::new();
    for entry in fs::read_dir(&config.lib_dir)
        .with_context(|| format!("Error listing library directory {:?}", config.lib_dir))?
    {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(".lib") {
            lib_files.push(name);
        }
    }
    lib_files.sort();

    if lib_files.is_empty() {
        warn!("no .lib files found in {:?}", config.lib_dir);
    }

    fs::create_dir_all(out_sta(work_dir))?;

    let mut failed = 0;
    for lib_name in &lib_files {
        let file_dir = corner::corner_group(lib_name)
            .ok_or_else(|| anyhow!("lib file {lib_name:?} has no corner segment"))?;
        let lib_stem = lib_name.strip_suffix(".lib").unwrap_or(lib_name);

        let script = render_run_script(&RunScriptParams {
            design: config.design.clone(),
            lib_dir: config.lib_dir.to_string_lossy().into_owned(),
            lib_name: lib_name.clone(),
            file_dir,
            report_dir: config.report_dir.to_string_lossy().into_owned(),
            clock_period: config.clock_period,
        })?;

        let tcl_path = out_tcl(work_dir, lib_stem);
        fs::write(&tcl_path, script)?;

        let out_file = File::create(out_sta_stdout(work_dir, lib_stem))?;
        let err_file = File::create(out_sta_stderr(work_dir, lib_stem))?;

        info!("running STA for {lib_name}");
        let status = Command::new(sta_bin)
            .arg("-exit")
            .arg(&tcl_path)
            .stdout(out_file)
            .stderr(err_file)
            .status()
            .with_context(|| format!("Error launching {sta_bin:?}"))?;

        if !status.success() {
            warn!("STA run for {lib_name} exited unsuccessfully ({status})");
            failed += 1;
        }
    }

    Ok(SweepOutcome {
        total: lib_files.len(),
        failed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_params() -> RunScriptParams {
        RunScriptParams {
            design: "pmu_fsm".to_string(),
            lib_dir: "/work/libs".to_string(),
            lib_name: "sky130_fd_sc_hd__tt_025C_1v80.lib".to_string(),
            file_dir: "TT".to_string(),
            report_dir: "/work/reports".to_string(),
            clock_period: 10.0,
        }
    }

    #[test]
    fn render_run_script_substitutes_params() {
        let script = render_run_script(&test_params()).unwrap();
        assert!(script.contains("read_liberty /work/libs/sky130_fd_sc_hd__tt_025C_1v80.lib"));
        assert!(script.contains("link_design pmu_fsm"));
        assert!(script.contains("-period 10"));
        assert!(script.contains("set rpt_dir /work/reports/TT"));
        assert!(script
            .contains("pmu_fsm.timing.sky130_fd_sc_hd__tt_025C_1v80.lib.rpt"));
        assert!(script
            .contains("pmu_fsm.power.sky130_fd_sc_hd__tt_025C_1v80.lib.rpt"));
    }

    fn sweep_config(lib_dir: PathBuf, sta_bin: &str) -> SweepConfig {
        SweepConfig {
            design: "pmu_fsm".to_string(),
            lib_dir,
            report_dir: PathBuf::from("reports"),
            processes: vec!["TT".to_string()],
            clock_period: 10.0,
            sta_bin: Some(sta_bin.to_string()),
        }
    }

    #[test]
    fn sweep_counts_failed_runs() {
        let dir = tempfile::tempdir().unwrap();
        let lib_dir = dir.path().join("libs");
        std::fs::create_dir_all(&lib_dir).unwrap();
        std::fs::write(lib_dir.join("sky130_fd_sc_hd__tt_025C_1v80.lib"), "").unwrap();
        std::fs::write(lib_dir.join("sky130_fd_sc_hd__ss_100C_1v60.lib"), "").unwrap();
        std::fs::write(lib_dir.join("README"), "not a lib").unwrap();

        // `false` ignores its arguments and exits nonzero, so every
        // run counts as failed without needing the real binary.
        let config = sweep_config(lib_dir, "false");
        let outcome = run_corner_sweep(&config, dir.path().join("work")).unwrap();
        assert_eq!(outcome.total, 2);
        assert_eq!(outcome.failed, 2);
    }

    #[test]
    fn sweep_renders_a_script_per_lib() {
        let dir = tempfile::tempdir().unwrap();
        let lib_dir = dir.path().join("libs");
        std::fs::create_dir_all(&lib_dir).unwrap();
        std::fs::write(lib_dir.join("sky130_fd_sc_hd__ff_n40C_1v95.lib"), "").unwrap();

        let work_dir = dir.path().join("work");
        let config = sweep_config(lib_dir, "true");
        let outcome = run_corner_sweep(&config, &work_dir).unwrap();
        assert_eq!(outcome.total, 1);
        assert_eq!(outcome.failed, 0);

        let tcl = std::fs::read_to_string(
            work_dir.join("sta/sky130_fd_sc_hd__ff_n40C_1v95.tcl"),
        )
        .unwrap();
        assert!(tcl.contains("read_liberty"));
        assert!(tcl.contains("FF"));
    }

    #[test]
    fn sweep_rejects_libs_without_corner_segment() {
        let dir = tempfile::tempdir().unwrap();
        let lib_dir = dir.path().join("libs");
        std::fs::create_dir_all(&lib_dir).unwrap();
        std::fs::write(lib_dir.join("plain.lib"), "").unwrap();

        let config = sweep_config(lib_dir, "true");
        assert!(run_corner_sweep(&config, dir.path().join("work")).is_err());
    }
}
