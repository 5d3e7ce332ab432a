use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "newsreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Prepare and compose the timeline, then print it as JSON without encoding.
    Plan(PlanArgs),
    /// Print probed duration, dimensions and fit for each numbered asset pair.
    Probe(ProbeArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Script JSON (`title` + `summary_and_images`).
    #[arg(long)]
    script: PathBuf,

    /// Directory holding `image{i}.png` and `audio{i}.wav`.
    #[arg(long)]
    assets: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Render configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override segment preparation workers.
    #[arg(long)]
    workers: Option<usize>,

    /// Encode without the voice track.
    #[arg(long, default_value_t = false)]
    no_audio: bool,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Script JSON.
    #[arg(long)]
    script: PathBuf,

    /// Asset directory.
    #[arg(long)]
    assets: PathBuf,

    /// Render configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ProbeArgs {
    /// Asset directory.
    #[arg(long)]
    assets: PathBuf,

    /// Number of asset pairs to probe.
    #[arg(long)]
    count: usize,

    /// Render configuration JSON (for the content box).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Plan(args) => cmd_plan(args),
        Command::Probe(args) => cmd_probe(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<newsreel::RenderConfig> {
    let cfg = match path {
        Some(p) => newsreel::RenderConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display()))?,
        None => newsreel::RenderConfig::default(),
    };
    Ok(cfg.with_env_overrides())
}

fn load_script(script: &Path, assets: &Path) -> anyhow::Result<newsreel::Script> {
    newsreel::load_script(script, assets)
        .with_context(|| format!("load script '{}'", script.display()))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(args.config.as_deref())?;
    if let Some(w) = args.workers {
        cfg.workers = w;
    }
    let script = load_script(&args.script, &args.assets)?;

    let probe = newsreel::FsAssetProbe::new();
    let mut session = newsreel::ProductionSession::new(cfg, &probe)?;
    let outcome = session
        .produce(&script, &args.out, !args.no_audio)
        .with_context(|| format!("render '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({:.2}s, {} frames, {} elided)",
        outcome.path.display(),
        outcome.duration_sec,
        outcome.stats.frames_total,
        outcome.stats.frames_elided
    );
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    let script = load_script(&args.script, &args.assets)?;

    let probe = newsreel::FsAssetProbe::new();
    let mut session = newsreel::ProductionSession::new(cfg, &probe)?;
    let timeline = session.compose(&script)?;

    let json = serde_json::to_string_pretty(&timeline.plan()).context("serialize plan")?;
    println!("{json}");
    Ok(())
}

fn cmd_probe(args: ProbeArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    cfg.validate()?;

    let probe = newsreel::FsAssetProbe::new();
    let reports = newsreel::probe_assets(&args.assets, args.count, &probe, cfg.content_box())
        .with_context(|| format!("probe assets in '{}'", args.assets.display()))?;

    let json = serde_json::to_string_pretty(&reports).context("serialize probe report")?;
    println!("{json}");
    Ok(())
}
