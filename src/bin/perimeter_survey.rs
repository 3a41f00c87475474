//! Perimeter survey against the simulated robot
//!
//! Runs one survey to completion, printing telemetry as it goes. Ctrl-C
//! stops the wheels and ends the run.

use anyhow::{Context, Result};
use clap::Parser;
use perimeter_core::config::{Preset, SurveyConfig};
use perimeter_core::runtime::{CancelToken, Clock, ManualClock, SystemClock, Watchdog};
use perimeter_core::sim::{SimConfig, SimulatedRobot};
use perimeter_core::telemetry::{ConsoleReporter, Reporter, TracingReporter};
use perimeter_core::{PerimeterCore, Robot};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Measure a rectangular obstacle by following its walls"
)]
struct Args {
    /// Survey configuration (TOML); overrides --preset
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tuned constant set: standard, cautious or brisk
    #[arg(short, long, default_value = "standard")]
    preset: String,

    /// Simulated world (TOML)
    #[arg(long)]
    sim: Option<PathBuf>,

    /// Run in wall-clock time instead of virtual time
    #[arg(long)]
    realtime: bool,

    /// Stop after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Print the boxed telemetry block every tick
    #[arg(long)]
    console: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("perimeter_core=info".parse()?)
                .add_directive("perimeter_survey=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            SurveyConfig::load(path)?
        }
        None => {
            let preset: Preset = args.preset.parse()?;
            info!("Using {:?} preset", preset);
            SurveyConfig::preset(preset)
        }
    };
    if let Some(max) = args.max_ticks {
        config.runtime.max_ticks = Some(max);
    }

    let sim = match &args.sim {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str::<SimConfig>(&content)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => SimConfig::default(),
    };

    let cancel = CancelToken::new();
    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Ctrl-C received, stopping survey");
            ctrl_c_token.cancel();
        }
    });

    let console = args.console;
    let realtime = args.realtime;
    tokio::task::spawn_blocking(move || {
        if realtime {
            survey(config, sim, SystemClock::new(), cancel, console)
        } else {
            survey(config, sim, ManualClock::new(), cancel, console)
        }
    })
    .await?
}

fn survey<C>(
    config: SurveyConfig,
    sim: SimConfig,
    clock: C,
    cancel: CancelToken,
    console: bool,
) -> Result<()>
where
    C: Clock + Clone + 'static,
{
    let robot = SimulatedRobot::new(sim, clock.clone());
    match config.runtime.call_deadline() {
        Some(deadline) => {
            info!("Hardware calls bounded to {:?}", deadline);
            let robot = Watchdog::spawn(robot, deadline)?;
            run(config, robot, clock, cancel, console)
        }
        None => run(config, robot, clock, cancel, console),
    }
}

fn run<R: Robot, C: Clock>(
    config: SurveyConfig,
    robot: R,
    clock: C,
    cancel: CancelToken,
    console: bool,
) -> Result<()> {
    let mut core = PerimeterCore::new(config, robot, clock)?;
    core.init().context("bringing up robot")?;

    let mut reporter: Box<dyn Reporter> = if console {
        Box::new(ConsoleReporter::new(std::io::stdout()))
    } else {
        Box::new(TracingReporter)
    };

    let outcome = core.run(&cancel, reporter.as_mut());
    core.shutdown().context("shutting down robot")?;
    let report = outcome?;

    match (report.result, report.halt_reason()) {
        (Some(result), _) => info!(
            "Perimeter {:.2}, area {:.2} after {} ticks",
            result.perimeter, result.area, report.ticks
        ),
        (None, Some(reason)) => warn!("Survey halted: {:?}", reason),
        (None, None) => warn!("Survey ended in phase {}", report.phase),
    }
    Ok(())
}
