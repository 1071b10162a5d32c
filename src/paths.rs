use std::path::{Path, PathBuf};

pub fn out_power_summary(work_dir: impl AsRef<Path>) -> PathBuf {
    PathBuf::from(work_dir.as_ref()).join("power_summary.rpt")
}

pub fn out_timing_summary(work_dir: impl AsRef<Path>) -> PathBuf {
    PathBuf::from(work_dir.as_ref()).join("timing_summary.rpt")
}

pub fn out_plots(work_dir: impl AsRef<Path>) -> PathBuf {
    PathBuf::from(work_dir.as_ref()).join("plots")
}

/// Directory holding the rendered run scripts and captured tool output.
pub fn out_sta(work_dir: impl AsRef<Path>) -> PathBuf {
    PathBuf::from(work_dir.as_ref()).join("sta")
}

pub fn out_tcl(work_dir: impl AsRef<Path>, lib_stem: &str) -> PathBuf {
    out_sta(work_dir).join(format!("{lib_stem}.tcl"))
}

pub fn out_sta_stdout(work_dir: impl AsRef<Path>, lib_stem: &str) -> PathBuf {
    out_sta(work_dir).join(format!("{lib_stem}.out"))
}

pub fn out_sta_stderr(work_dir: impl AsRef<Path>, lib_stem: &str) -> PathBuf {
    out_sta(work_dir).join(format!("{lib_stem}.err"))
}
