use std::collections::HashSet;
use std::fs::canonicalize;
use std::path::{Path, PathBuf};

use clap::Parser;

use crate::cli::args::Args;
use crate::cli::progress::StepContext;
use crate::config::parse_sweep_config;
use crate::plan::{execute_plan, generate_plan, ExecutePlanParams, TaskKey};
use crate::Result;

pub mod args;
pub mod progress;

pub const BANNER: &str = r"
     _
 ___| |_ __ _ _____      _____  ___ _ __
/ __| __/ _` / __\ \ /\ / / _ \/ _ \ '_ \
\__ \ || (_| \__ \\ V  V /  __/  __/ |_) |
|___/\__\__,_|___/ \_/\_/ \___|\___| .__/
                                   |_|

stasweep v0.1
";

pub fn run() -> Result<()> {
    let args = Args::parse();

    let config_path = canonicalize(&args.config)?;

    println!("{BANNER}");

    println!("Reading configuration file...\n");
    let config = parse_sweep_config(&config_path)?;

    println!("Configuration file: {:?}", &config_path);
    println!("Sweep parameters:");
    println!("\tDesign: {}", config.design);
    println!("\tLibrary directory: {:?}", config.lib_dir);
    println!("\tReport directory: {:?}", config.report_dir);
    println!("\tProcesses: {}", config.processes.join(", "));
    println!("\tClock period: {} ns", config.clock_period);

    let enabled_tasks = vec![
        (args.sta, TaskKey::RunSta),
        (args.plot, TaskKey::PlotCharts),
        (args.all, TaskKey::All),
    ]
    .into_iter()
    .filter_map(|(a, b)| if a { Some(b) } else { None });

    let tasks = HashSet::from_iter(enabled_tasks);

    let mut ctx = StepContext::new(&tasks);

    let config_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let plan = ctx.check(generate_plan(config, config_dir))?;
    ctx.finish(TaskKey::GeneratePlan);

    let work_dir = if let Some(output_dir) = args.output_dir {
        output_dir
    } else {
        PathBuf::from(".")
    };
    std::fs::create_dir_all(&work_dir)?;
    let work_dir = canonicalize(work_dir)?;

    let res = execute_plan(ExecutePlanParams {
        work_dir: &work_dir,
        plan: &plan,
        tasks: &tasks,
        ctx: Some(&mut ctx),
    });

    ctx.check(res)?;
    println!("Artifacts saved to: {:?}\n", &work_dir);

    Ok(())
}
