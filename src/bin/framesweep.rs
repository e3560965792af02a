use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use framesweep::{
    AutomationEngine, Reporter, SettingsApplier, Settings, SweepEvent, default_plan, parse_spec,
};

#[derive(Parser, Debug)]
#[command(name = "framesweep", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a spec file and report what it contains.
    Validate(ValidateArgs),
    /// Print the built-in default plan as JSON.
    DumpDefault,
    /// Run a sweep against a no-op applier with simulated frame timing.
    Run(RunArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input automation spec JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Input automation spec JSON; omit to run the default plan.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Simulated frame rate.
    #[arg(long, default_value_t = 60)]
    fps: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::DumpDefault => cmd_dump_default(),
        Command::Run(args) => cmd_run(args),
    }
}

fn read_spec(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read spec '{}'", path.display()))
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let text = read_spec(&args.in_path)?;
    let (plan, options) = parse_spec(&text)?;
    eprintln!(
        "{}: {} case(s), sleep {:.3}s, min {} frame(s)",
        args.in_path.display(),
        plan.len(),
        options.sleep_duration,
        options.min_frame_count
    );
    Ok(())
}

fn cmd_dump_default() -> anyhow::Result<()> {
    let plan = default_plan();
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

/// Applier that accepts every case; `run` exercises plan timing, not a real
/// renderer.
struct NoopApplier;

impl SettingsApplier for NoopApplier {
    fn apply(&mut self, _case_name: &str, _settings: &Settings) -> Result<(), framesweep::ApplyError> {
        Ok(())
    }
}

struct StderrReporter;

impl Reporter for StderrReporter {
    fn report(&mut self, event: SweepEvent<'_>) {
        match event {
            SweepEvent::CaseStarted { index, count, name } => {
                eprintln!("[{}/{}] {}", index + 1, count, name);
            }
            SweepEvent::ApplyFailed { index, count, error } => {
                eprintln!("[{}/{}] {}", index + 1, count, error);
            }
            SweepEvent::ReadyToCapture { .. } | SweepEvent::Finished { .. } => {}
        }
    }
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.fps > 0, "fps must be > 0");
    let engine = match &args.in_path {
        Some(path) => AutomationEngine::from_json(&read_spec(path)?)?,
        None => AutomationEngine::default_test(),
    };
    let mut engine = engine.with_reporter(Box::new(StderrReporter));

    let dt = 1.0 / f64::from(args.fps);
    let mut applier = NoopApplier;
    let mut captures = 0usize;
    let mut frames = 0u64;
    while engine.is_running() {
        engine.tick(dt, &mut applier);
        frames += 1;
        if engine.should_capture_now() {
            captures += 1;
            if let Some(name) = engine.current_screenshot_name() {
                eprintln!("  capture -> {name}.png");
            }
        }
    }
    eprintln!("done: {captures} capture point(s) over {frames} simulated frame(s)");
    Ok(())
}
