use std::{
    fs,
    io::{self, Write as _},
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "lumina-scroll", version)]
struct Cli {
    /// Log verbosity (-v debug, -vv trace). `RUST_LOG` overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scroll a scene from top to bottom and print one JSON line per frame.
    Simulate(SimulateArgs),
    /// Print every trigger's resolved range at scroll 0.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// First scroll position in px.
    #[arg(long, default_value_t = 0.0)]
    from: f64,

    /// Last scroll position in px.
    #[arg(long)]
    to: f64,

    /// Scroll distance per frame in px.
    #[arg(long, default_value_t = 100.0)]
    step: f64,

    /// Frame clock rate.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Extra seconds of frames at the final position, so reveals can finish.
    #[arg(long, default_value_t = 0.0)]
    settle: f64,

    /// Resize the viewport once scroll reaches Y, e.g. `1280x720@2000`.
    #[arg(long = "resize")]
    resizes: Vec<ResizeAt>,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ResizeAt {
    width: f64,
    height: f64,
    scroll_y: f64,
}

impl FromStr for ResizeAt {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (size, at) = s
            .split_once('@')
            .ok_or_else(|| format!("expected WxH@Y, got '{s}'"))?;
        let (w, h) = size
            .split_once('x')
            .ok_or_else(|| format!("expected WxH@Y, got '{s}'"))?;
        let num = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid number '{v}': {e}"))
        };
        Ok(Self {
            width: num(w)?,
            height: num(h)?,
            scroll_y: num(at)?,
        })
    }
}

#[derive(serde::Serialize)]
struct FrameLine<'a> {
    time_secs: f64,
    #[serde(flatten)]
    report: &'a lumina_scroll::FrameReport,
    mutations: Vec<lumina_scroll::PageEvent>,
}

#[derive(serde::Serialize)]
struct InspectEntry<'a> {
    #[serde(flatten)]
    trigger: &'a lumina_scroll::Trigger,
    #[serde(skip_serializing_if = "Option::is_none")]
    pin: Option<&'a lumina_scroll::scroll::pin::PinEntry>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Simulate(args) => cmd_simulate(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_scene_json(path: &Path) -> anyhow::Result<lumina_scroll::Scene> {
    let text =
        fs::read_to_string(path).with_context(|| format!("open scene '{}'", path.display()))?;
    let scene = lumina_scroll::Scene::from_json(&text)
        .with_context(|| format!("load scene '{}'", path.display()))?;
    Ok(scene)
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    if !(args.step.is_finite() && args.step > 0.0) {
        anyhow::bail!("--step must be > 0");
    }
    if !(args.fps.is_finite() && args.fps > 0.0) {
        anyhow::bail!("--fps must be > 0");
    }
    if !(args.settle.is_finite() && args.settle >= 0.0) {
        anyhow::bail!("--settle must be >= 0");
    }

    let scene = read_scene_json(&args.in_path)?;
    let mut mounted = scene.mount()?;
    let dir = if args.to >= args.from { 1.0 } else { -1.0 };
    let mut resizes = args.resizes.clone();
    resizes.sort_by(|a, b| (a.scroll_y * dir).total_cmp(&(b.scroll_y * dir)));
    let mut resizes = resizes.into_iter().peekable();

    let distance = (args.to - args.from).abs();
    let steps = (distance / args.step).ceil() as u64;
    let settle_frames = (args.settle * args.fps).ceil() as u64;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for i in 0..=steps + settle_frames {
        let travelled = (i.min(steps) as f64 * args.step).min(distance);
        let scroll_y = args.from + dir * travelled;
        while let Some(r) = resizes.next_if(|r| r.scroll_y * dir <= scroll_y * dir) {
            mounted.orchestrator.on_resize(r.width, r.height);
        }

        let time_secs = i as f64 / args.fps;
        let report = mounted.scroll_to(scroll_y, time_secs);
        let line = FrameLine {
            time_secs,
            report: &report,
            mutations: mounted.page.styles.take_log(),
        };
        serde_json::to_writer(&mut out, &line).context("serialize frame")?;
        writeln!(out).context("write frame")?;
    }
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let scene = read_scene_json(&args.in_path)?;
    let mut mounted = scene.mount()?;
    mounted.scroll_to(0.0, 0.0);

    let orchestrator = &mounted.orchestrator;
    let triggers: Vec<InspectEntry<'_>> = orchestrator
        .triggers()
        .map(|trigger| InspectEntry {
            trigger,
            pin: orchestrator.pins().get(trigger.id()),
        })
        .collect();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &triggers).context("serialize triggers")?;
    writeln!(out).context("write triggers")?;
    Ok(())
}
