use std::{path::PathBuf, time::Duration};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use disco_doodle::{
    FfmpegSink, FfmpegSinkOpts, FloorRenderer, Fps, FrameSink, OfflineBeats, PartyConfig,
    PartyController, PartySession, PersonaFetcher, PngSequenceSink, SessionOpts,
    ShapeDescription, Tick, persona::client::source_from_config,
    stroke::input::gestures_from_path,
};

#[derive(Parser, Debug)]
#[command(name = "disco-doodle", version)]
struct Cli {
    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Party configuration JSON (viewport, fps, persona service, seed).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a dance party clip: MP4 (requires `ffmpeg` on PATH) or a PNG sequence directory.
    Party(PartyArgs),
    /// Render the dance floor at one tick as a PNG.
    Frame(FrameArgs),
    /// Ask the persona service for a dancer identity and print it as JSON.
    Persona(PersonaArgs),
}

#[derive(Parser, Debug)]
struct PartyArgs {
    /// Recorded strokes JSON.
    #[arg(long)]
    strokes: PathBuf,

    /// Output path: `*.mp4` encodes a video, anything else is a PNG frame directory.
    #[arg(long)]
    out: PathBuf,

    /// Clip length in seconds.
    #[arg(long, default_value_t = 8.0)]
    duration: f64,

    /// Override the configured frame rate (integer fps).
    #[arg(long)]
    fps: Option<u32>,

    /// Leave the soundtrack out of the MP4.
    #[arg(long, default_value_t = false)]
    no_audio: bool,

    /// How long to wait for personas before the first frame.
    #[arg(long, default_value_t = 20.0)]
    persona_wait: f64,

    /// Print the session report as JSON on stdout.
    #[arg(long, default_value_t = false)]
    report: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Recorded strokes JSON.
    #[arg(long)]
    strokes: PathBuf,

    /// Animation tick to render.
    #[arg(long, default_value_t = 0)]
    tick: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct PersonaArgs {
    /// Number of points in the drawn stroke (more than 30 reads as complex).
    #[arg(long)]
    points: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let cfg = match &cli.config {
        Some(path) => PartyConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => PartyConfig::default(),
    };

    match cli.cmd {
        Command::Party(args) => cmd_party(&cfg, args),
        Command::Frame(args) => cmd_frame(&cfg, args),
        Command::Persona(args) => cmd_persona(&cfg, args),
    }
}

/// Replay every recorded gesture into a fresh controller.
fn load_party(
    cfg: &PartyConfig,
    strokes: &std::path::Path,
) -> anyhow::Result<PartyController<OfflineBeats>> {
    let gestures = gestures_from_path(strokes)
        .with_context(|| format!("load strokes '{}'", strokes.display()))?;
    let mut controller = PartyController::from_config(cfg, OfflineBeats::new());
    for g in &gestures {
        if let Some(color) = g.color() {
            controller.set_color(color);
        }
        for ev in g.pointer_events() {
            controller.pointer(ev);
        }
    }
    tracing::info!(
        gestures = gestures.len(),
        dancers = controller.dancers().len(),
        "strokes loaded"
    );
    Ok(controller)
}

fn cmd_party(cfg: &PartyConfig, args: PartyArgs) -> anyhow::Result<()> {
    let fps = match args.fps {
        Some(n) => Fps::new(n, 1)?,
        None => cfg.render.fps,
    };
    let mut controller = load_party(cfg, &args.strokes)?;
    let wait = Duration::try_from_secs_f64(args.persona_wait.max(0.0))
        .context("invalid --persona-wait")?;
    controller.wait_for_personas(wait);
    let mut session = PartySession::new(controller)?;

    let is_mp4 = args
        .out
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("mp4"));
    let audio_out = (is_mp4 && !args.no_audio).then(|| args.out.with_extension("f32le"));
    let opts = SessionOpts {
        fps,
        duration_secs: args.duration,
        audio_out: audio_out.clone(),
    };

    let mut sink: Box<dyn FrameSink> = if is_mp4 {
        Box::new(FfmpegSink::new(FfmpegSinkOpts::new(&args.out)))
    } else {
        Box::new(PngSequenceSink::new(&args.out))
    };
    let report = session
        .render(&opts, sink.as_mut())
        .with_context(|| format!("render party to '{}'", args.out.display()))?;

    if let Some(pcm) = audio_out {
        // The soundtrack is muxed into the MP4 by now.
        let _ = std::fs::remove_file(pcm);
    }
    if args.report {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frame(cfg: &PartyConfig, args: FrameArgs) -> anyhow::Result<()> {
    let controller = load_party(cfg, &args.strokes)?;
    let mut renderer = FloorRenderer::new(controller.viewport())?;
    let frame = renderer.render(controller.dancers(), Tick(args.tick))?;
    frame
        .save_png(&args.out)
        .with_context(|| format!("write png '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_persona(cfg: &PartyConfig, args: PersonaArgs) -> anyhow::Result<()> {
    let fetcher = PersonaFetcher::new(source_from_config(&cfg.persona));
    let description = ShapeDescription::from_point_count(args.points);
    let persona = fetcher.fetch(description);
    println!("{}", serde_json::to_string_pretty(&persona)?);
    Ok(())
}
