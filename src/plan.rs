use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use log::info;

use crate::cli::progress::StepContext;
use crate::config::SweepConfig;
use crate::paths::{out_plots, out_power_summary, out_timing_summary};
use crate::report::{scrape_power, scrape_timing};
use crate::{plot, sta, summary, Result};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TaskKey {
    GeneratePlan,
    RunSta,
    SummarizePower,
    SummarizeTiming,
    PlotCharts,
    All,
}

/// A concrete plan for one sweep: the configuration with its paths
/// resolved against the configuration file's directory.
pub struct SweepPlan {
    pub config: SweepConfig,
}

pub fn generate_plan(mut config: SweepConfig, config_dir: &Path) -> Result<SweepPlan> {
    if config.processes.is_empty() {
        bail!("no processes configured");
    }
    config.lib_dir = resolve(config_dir, &config.lib_dir);
    config.report_dir = resolve(config_dir, &config.report_dir);
    Ok(SweepPlan { config })
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

pub struct ExecutePlanParams<'a> {
    pub work_dir: &'a Path,
    pub plan: &'a SweepPlan,
    pub tasks: &'a HashSet<TaskKey>,
    pub ctx: Option<&'a mut StepContext>,
}

pub fn execute_plan(params: ExecutePlanParams) -> Result<()> {
    let ExecutePlanParams {
        work_dir,
        plan,
        tasks,
        mut ctx,
    } = params;
    let config = &plan.config;
    let enabled = |key: TaskKey| tasks.contains(&key) || tasks.contains(&TaskKey::All);

    if enabled(TaskKey::RunSta) {
        let outcome = sta::run_corner_sweep(config, work_dir)
            .with_context(|| "Error running the STA sweep")?;
        info!(
            "swept {} libs ({} failed)",
            outcome.total, outcome.failed
        );
        finish(&mut ctx, TaskKey::RunSta);
    }

    let power = scrape_power(&config.report_dir, &config.processes)
        .with_context(|| "Error scraping power reports")?;
    summary::write_power_summary(out_power_summary(work_dir), &power)
        .with_context(|| "Error writing the power summary")?;
    info!("summarized {} power records", power.len());
    finish(&mut ctx, TaskKey::SummarizePower);

    let timing = scrape_timing(&config.report_dir, &config.processes)
        .with_context(|| "Error scraping timing reports")?;
    summary::write_timing_summary(out_timing_summary(work_dir), &timing)
        .with_context(|| "Error writing the timing summary")?;
    info!("summarized {} timing records", timing.len());
    finish(&mut ctx, TaskKey::SummarizeTiming);

    if enabled(TaskKey::PlotCharts) {
        let power_rows = summary::load_power_summary(out_power_summary(work_dir))?;
        let timing_rows = summary::load_timing_summary(out_timing_summary(work_dir))?;
        plot::render_charts(&power_rows, &timing_rows, out_plots(work_dir))
            .with_context(|| "Error rendering charts")?;
        finish(&mut ctx, TaskKey::PlotCharts);
    }

    Ok(())
}

fn finish(ctx: &mut Option<&mut StepContext>, key: TaskKey) {
    if let Some(ctx) = ctx.as_mut() {
        ctx.finish(key);
    }
}
