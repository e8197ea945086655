use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "algoanim", version)]
struct Cli {
    /// Engine config JSON; missing fields keep their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log verbosity on stderr (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize an animation document and write the canonical JSON.
    Normalize(NormalizeArgs),
    /// Print the evaluated scene and render plan at a time, as JSON.
    Eval(EvalArgs),
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Run headless playback and print the cursor per frame.
    Play(PlayArgs),
}

#[derive(Parser, Debug)]
struct NormalizeArgs {
    /// Input document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SurfaceArgs {
    /// Surface width in pixels (config default when omitted).
    #[arg(long)]
    width: Option<u32>,

    /// Surface height in pixels (config default when omitted).
    #[arg(long)]
    height: Option<u32>,
}

#[derive(Parser, Debug)]
struct EvalArgs {
    /// Input document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Cursor in seconds.
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    #[command(flatten)]
    surface: SurfaceArgs,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Cursor in seconds.
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    surface: SurfaceArgs,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Input document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Simulated frame rate.
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// Loop instead of stopping at the end.
    #[arg(long = "loop")]
    looping: bool,

    /// Stop after this many frames.
    #[arg(long, default_value_t = 600)]
    max_frames: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => algoanim::EngineConfig::from_path(path)?,
        None => algoanim::EngineConfig::default(),
    };

    match cli.cmd {
        Command::Normalize(args) => cmd_normalize(args, &config),
        Command::Eval(args) => cmd_eval(args, &config),
        Command::Frame(args) => cmd_frame(args, &config),
        Command::Play(args) => cmd_play(args, &config),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_doc_json(
    path: &Path,
    config: &algoanim::EngineConfig,
) -> anyhow::Result<algoanim::AnimationDocument> {
    let f = File::open(path).with_context(|| format!("open document '{}'", path.display()))?;
    let r = BufReader::new(f);
    let raw: serde_json::Value =
        serde_json::from_reader(r).with_context(|| "parse document JSON")?;
    Ok(algoanim::normalize_value_with(
        &raw,
        &config.normalize_options(),
    ))
}

fn surface_for(args: &SurfaceArgs, config: &algoanim::EngineConfig) -> algoanim::SurfaceDesc {
    algoanim::SurfaceDesc::new(
        args.width.unwrap_or(config.surface_width),
        args.height.unwrap_or(config.surface_height),
    )
}

fn write_output(out: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            std::fs::write(path, text).with_context(|| format!("write '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn cmd_normalize(args: NormalizeArgs, config: &algoanim::EngineConfig) -> anyhow::Result<()> {
    let doc = read_doc_json(&args.in_path, config)?;
    let json = doc.to_json_string_pretty()?;
    write_output(args.out.as_deref(), &json)
}

fn cmd_eval(args: EvalArgs, config: &algoanim::EngineConfig) -> anyhow::Result<()> {
    let doc = read_doc_json(&args.in_path, config)?;
    let surface = surface_for(&args.surface, config);
    let scene = algoanim::Evaluator::eval_at(&doc, args.time);
    let plan = algoanim::compile_scene(&scene, surface, doc.canvas_size());
    let out = serde_json::json!({ "scene": scene, "plan": plan });
    let text = serde_json::to_string_pretty(&out).with_context(|| "serialize eval output")?;
    write_output(None, &text)
}

fn cmd_frame(args: FrameArgs, config: &algoanim::EngineConfig) -> anyhow::Result<()> {
    let doc = read_doc_json(&args.in_path, config)?;
    let surface = surface_for(&args.surface, config);
    let plan = algoanim::compile_frame(&doc, args.time, surface);

    let mut backend = algoanim::CpuRasterizer::new(config.render_settings());
    let frame = backend.render(&plan)?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_play(args: PlayArgs, config: &algoanim::EngineConfig) -> anyhow::Result<()> {
    if !(args.fps.is_finite() && args.fps > 0.0) {
        anyhow::bail!("--fps must be positive, got {}", args.fps);
    }
    let doc = read_doc_json(&args.in_path, config)?;
    let mut session =
        algoanim::PlaybackSession::new(&doc, algoanim::ManualFrameDriver::new(), config);
    session.set_looping(args.looping);
    session.play();

    let step = 1.0 / args.fps;
    for frame in 0..args.max_frames {
        let Some(handle) = session.driver_mut().fire() else {
            break;
        };
        let now = f64::from(frame) * step;
        let outcome = session.tick(handle, now);
        println!(
            "{frame}\t{:.4}\t{:.4}\t{}",
            session.cursor(),
            session.committed_cursor(),
            serde_json::to_string(&outcome).with_context(|| "serialize tick outcome")?
        );
        if matches!(outcome, algoanim::TickOutcome::Finished { .. }) {
            break;
        }
    }
    session.teardown();
    Ok(())
}
