use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about,
    help_template(
        "{before-help}{name} {version}\n{author-with-newline}{about-with-newline}\n{usage-heading} {usage}\n\n{all-args}{after-help}"
    )
)]
pub struct Args {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "stasweep.toml")]
    pub config: PathBuf,

    /// Directory to which output files should be saved.
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Run the STA sweep over the configured library directory.
    #[arg(long)]
    pub sta: bool,

    /// Render charts from the summary tables.
    #[arg(long)]
    pub plot: bool,

    /// Run all available steps.
    #[arg(short, long)]
    pub all: bool,
}
