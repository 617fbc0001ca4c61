//! `curvature` 명령행 도구
//!
//! ```text
//! curvature report --metric kerr --output kerr.tex
//! curvature simulate --config run.toml --plot orbit.svg --csv orbit.csv
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueHint};

use spacetime_curvature::config::{Constants, Settings};
use spacetime_curvature::error::Result;
use spacetime_curvature::geodesic::{plot_trajectory, simulate};
use spacetime_curvature::report::{self, IndexLabels};
use spacetime_curvature::spacetimes::{MetricDefinition, MetricFamily};
use spacetime_curvature::tensors::VelocityConvention;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Curvature tensors as LaTeX and geodesic orbits in Kerr spacetimes"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Derive non-zero Christoffel, Ricci and Riemann components and write a LaTeX report
    Report(ReportArgs),

    /// Integrate a timelike geodesic and plot its x-y projection
    Simulate(SimulateArgs),
}

#[derive(Args)]
struct ReportArgs {
    /// Preset metric (minkowski, schwarzschild, kerr, kerr-newman, static-spherical)
    #[arg(long)]
    metric: Option<MetricFamily>,

    /// TOML settings file; its [report] table is used
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Output .tex file
    #[arg(long, short, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Label indices with coordinate names instead of numbers
    #[arg(long)]
    coordinate_labels: bool,

    /// Write geodesic equations with proper-time derivatives instead of v0..v3
    #[arg(long)]
    proper_time: bool,
}

#[derive(Args)]
struct SimulateArgs {
    /// TOML settings file; its [geodesic] table is used
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Output SVG plot
    #[arg(long, value_hint = ValueHint::FilePath, default_value = Constants::DEFAULT_PLOT_FILE)]
    plot: PathBuf,

    /// Also dump the trajectory as CSV
    #[arg(long, value_hint = ValueHint::FilePath)]
    csv: Option<PathBuf>,
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings> {
    match path {
        Some(path) => Settings::from_file(path),
        None => Ok(Settings::default()),
    }
}

fn run_report(args: ReportArgs) -> Result<()> {
    let mut config = load_settings(args.config.as_ref())?.report;
    if let Some(family) = args.metric {
        config.metric = MetricDefinition::Preset { family };
    }
    if let Some(output) = args.output {
        config.output = output;
    }
    if args.coordinate_labels {
        config.index_labels = IndexLabels::Coordinate;
    }
    if args.proper_time {
        config.velocity = VelocityConvention::ProperTime;
    }
    report::run(&config)?;
    Ok(())
}

fn run_simulate(args: SimulateArgs) -> Result<()> {
    let config = load_settings(args.config.as_ref())?.geodesic;
    let trajectory = simulate(config)?;
    plot_trajectory(&trajectory, &args.plot)?;
    if let Some(csv) = args.csv {
        trajectory.write_csv(csv)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Report(args) => run_report(args),
        Command::Simulate(args) => run_simulate(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
