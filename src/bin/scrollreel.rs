use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use scrollreel::{
    FrameSink, RenderSettings, ScrollScript, Story, StoryConfig,
    encode::{
        ffmpeg::{FfmpegEncoder, Mp4Target},
        png::{PngSequence, write_png},
    },
    render::{create_backend, text::TextEngine},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "scrollreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the story at one scroll position as a PNG.
    Frame(FrameArgs),
    /// Render a scripted scroll-through as an MP4 (requires `ffmpeg` on PATH)
    /// or, when `--out` has no `.mp4` extension, a directory of PNG frames.
    Render(RenderArgs),
    /// Print the evaluated scene at one scroll position as JSON.
    Dump(DumpArgs),
}

#[derive(Parser, Debug)]
struct ConfigArg {
    /// Story config JSON. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Scroll progress in [0, 1].
    #[arg(long)]
    progress: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Frames to step after seeking so the background field moves.
    #[arg(long, default_value_t = 0)]
    settle_frames: u32,

    #[command(flatten)]
    config: ConfigArg,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Output MP4 path, or a directory for PNG frames.
    #[arg(long)]
    out: PathBuf,

    /// Frames spent scrolling from top to bottom.
    #[arg(long)]
    frames: usize,

    /// Extra frames after the scroll so smoothing and scrub settle.
    #[arg(long, default_value_t = 60)]
    settle_frames: usize,

    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Per-frame scroll events JSON replacing the top-to-bottom sweep.
    #[arg(long)]
    script: Option<PathBuf>,

    #[command(flatten)]
    config: ConfigArg,
}

#[derive(Parser, Debug)]
struct DumpArgs {
    /// Scroll progress in [0, 1].
    #[arg(long)]
    progress: f64,

    #[command(flatten)]
    config: ConfigArg,
}

#[derive(serde::Serialize)]
struct Dump<'a> {
    progress: f64,
    time: Option<f64>,
    phase: Option<&'static str>,
    scene: &'a scrollreel::Scene,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Dump(args) => cmd_dump(args),
    }
}

fn load_config(arg: &ConfigArg) -> anyhow::Result<StoryConfig> {
    match &arg.config {
        Some(path) => Ok(StoryConfig::from_json_file(path)?),
        None => Ok(StoryConfig::default()),
    }
}

fn load_text(config: &StoryConfig) -> anyhow::Result<Option<TextEngine>> {
    Ok(config
        .font_path
        .as_deref()
        .map(TextEngine::from_file)
        .transpose()?)
}

fn check_progress(progress: f64) -> anyhow::Result<()> {
    if !(0.0..=1.0).contains(&progress) {
        anyhow::bail!("--progress must be within [0, 1], got {progress}");
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    check_progress(args.progress)?;
    let config = load_config(&args.config)?;
    let clear = config.clear_rgba;
    let text = load_text(&config)?;
    let mut story = Story::new(config)?;
    let mut backend = create_backend(RenderSettings::default(), text);

    story.seek_progress(args.progress);
    for _ in 0..args.settle_frames {
        story.step(1.0 / 60.0);
    }
    let frame = story.render(backend.as_mut())?;
    write_png(&frame, &args.out, clear)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    if args.frames == 0 {
        anyhow::bail!("--frames must be > 0");
    }
    let config = load_config(&args.config)?;
    let clear = config.clear_rgba;
    let viewport = config.viewport;
    let limit = config.scroll_limit();
    let text = load_text(&config)?;
    let mut story = Story::new(config)?;
    let mut backend = create_backend(RenderSettings::default(), text);

    let script = match &args.script {
        Some(path) => read_script(path)?,
        None => ScrollScript::sweep(limit, args.frames)
            .then(ScrollScript::idle(args.settle_frames)),
    };

    let mut sink: Box<dyn FrameSink> = if is_mp4(&args.out) {
        let target = Mp4Target::new(&args.out, viewport, args.fps)?;
        Box::new(FfmpegEncoder::new(target, clear)?)
    } else {
        Box::new(PngSequence::new(&args.out, clear)?)
    };

    let stats = scrollreel::run_script(
        &mut story,
        &script,
        args.fps,
        backend.as_mut(),
        sink.as_mut(),
    )?;

    eprintln!("wrote {} ({} frames)", args.out.display(), stats.frames);
    Ok(())
}

fn cmd_dump(args: DumpArgs) -> anyhow::Result<()> {
    check_progress(args.progress)?;
    let mut story = Story::new(load_config(&args.config)?)?;
    story.seek_progress(args.progress);

    let dump = Dump {
        progress: args.progress,
        time: story.timeline().time(),
        phase: story.phase().map(|p| p.label()),
        scene: story.scene(),
    };
    let json = serde_json::to_string_pretty(&dump).context("serialize scene")?;
    println!("{json}");
    Ok(())
}

fn read_script(path: &Path) -> anyhow::Result<ScrollScript> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("read script '{}'", path.display()))?;
    Ok(ScrollScript::from_json_str(&s)?)
}

fn is_mp4(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("mp4"))
}
