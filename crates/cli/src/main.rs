//! Sonoview CLI: render waveform views, inspect pitch content and export
//! selections from WAV files.

mod ascii;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use sonoview_core::audio::io::{read_wav, write_wav};
use sonoview_core::config::Settings;
use sonoview_core::pitch::render::bin_label;
use sonoview_core::pitch::{pitch_frequency, DisplayMode, PitchMapper};
use sonoview_core::surface::RecordingSurface;
use sonoview_core::view::{
    render_waveform, InteractionController, Selection, ViewEvent, ViewState, Viewport,
};

use crate::ascii::AsciiSurface;

// ─── Top-level CLI ───────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "sonoview",
    about = "Waveform viewer and pitch inspector for WAV recordings",
    version,
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Settings file (JSON); falls back to $SONOVIEW_CONFIG
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Draw the waveform view as text or as recorded draw commands
    Render(RenderArgs),
    /// Show the strongest pitches at a point in time
    Pitch(PitchArgs),
    /// Write a sample range to a new WAV file
    Export(ExportArgs),
}

// ─── Render ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input WAV file
    input: PathBuf,

    /// Surface width in characters (or pixels with --json)
    #[arg(long, default_value_t = 100)]
    width: usize,

    /// Surface height in rows (or pixels with --json)
    #[arg(long, default_value_t = 24)]
    height: usize,

    /// Columns per surface width (overrides settings)
    #[arg(long)]
    resolution: Option<f32>,

    /// Visible sample range, START-END
    #[arg(long, value_parser = parse_span)]
    range: Option<(usize, usize)>,

    /// Selected sample range, START-END
    #[arg(long, value_parser = parse_span)]
    select: Option<(usize, usize)>,

    /// JSON array of view events to replay before drawing
    #[arg(long)]
    events: Option<PathBuf>,

    /// Print draw commands as JSON instead of a text raster
    #[arg(long, default_value_t = false)]
    json: bool,
}

// ─── Pitch ───────────────────────────────────────────────────────

#[derive(Parser, Debug)]
struct PitchArgs {
    /// Input WAV file
    input: PathBuf,

    /// Analysis position in seconds
    #[arg(long, default_value_t = 0.0)]
    at: f64,

    /// FFT size, a power of two (overrides settings)
    #[arg(long)]
    fft_size: Option<usize>,

    /// Bin labels
    #[arg(long, value_parser = ["note", "frequency"])]
    mode: Option<String>,

    /// Number of bins to list
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Print the whole pitch table as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

// ─── Export ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input WAV file
    input: PathBuf,

    /// Sample range to keep, START-END
    #[arg(long, required = true, value_parser = parse_span)]
    select: (usize, usize),

    /// Output WAV file
    #[arg(short, long)]
    output: PathBuf,
}

// ─── Main ────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let result = Settings::resolve(cli.config.as_deref()).and_then(|settings| match cli.command {
        Command::Render(args) => run_render(args, settings),
        Command::Pitch(args) => run_pitch(args, settings),
        Command::Export(args) => run_export(args),
    });

    if let Err(e) = result {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

// ─── Helpers ─────────────────────────────────────────────────────

/// Parse `START-END` into a sample pair.
fn parse_span(s: &str) -> std::result::Result<(usize, usize), String> {
    let (a, b) = s
        .split_once('-')
        .ok_or_else(|| format!("expected START-END, got '{s}'"))?;
    let start = a
        .trim()
        .parse()
        .map_err(|_| format!("invalid start sample '{a}'"))?;
    let end = b
        .trim()
        .parse()
        .map_err(|_| format!("invalid end sample '{b}'"))?;
    Ok((start, end))
}

fn load_input(path: &Path) -> Result<Arc<sonoview_core::SampleBuffer>> {
    if !path.exists() {
        bail!("File not found: {}", path.display());
    }
    let buffer = read_wav(path)?;
    if buffer.is_empty() {
        bail!("{} contains no samples", path.display());
    }
    Ok(Arc::new(buffer))
}

fn load_events(path: &Path) -> Result<Vec<ViewEvent>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read events: {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("Invalid events file: {}", path.display()))
}

// ─── Render runner ───────────────────────────────────────────────

fn run_render(args: RenderArgs, settings: Settings) -> Result<()> {
    if args.width == 0 || args.height == 0 {
        bail!("Surface must be at least 1x1");
    }
    let mut options = settings.view;
    if let Some(resolution) = args.resolution {
        options.resolution = resolution;
    }
    options.validate()?;

    let buffer = load_input(&args.input)?;
    let viewport = Viewport::new(args.width as f32, args.height as f32);
    let mut state = ViewState::new(buffer, options, viewport);

    if let Some((start, end)) = args.range {
        state.set_range(start, end);
    }
    if let Some((start, end)) = args.select {
        state.set_selection(Some(Selection::new(start, end)));
    }
    if let Some(path) = &args.events {
        let events = load_events(path)?;
        log::info!("Replaying {} event(s)", events.len());
        let mut controller = InteractionController::new();
        controller.on_selection_change(|s| log::debug!("selection -> {:?}", s));
        controller.handle_all(&mut state, events);
    }

    // The event script may have resized the view
    let Viewport { width, height } = state.viewport();
    let range = state.range();
    log::info!(
        "Range {}..{} of {} samples, selection {:?}",
        range.start,
        range.end,
        state.buffer_len(),
        state.selection().map(|s| s.normalized())
    );

    if args.json {
        let mut surface = RecordingSurface::new(width, height);
        render_waveform(&state, &mut surface);
        println!("{}", serde_json::to_string_pretty(&surface.commands)?);
    } else {
        let options = state.options();
        let mut surface = AsciiSurface::new(width.max(1.0) as usize, height.max(1.0) as usize)
            .with_glyph(options.wave_color, '#')
            .with_glyph(options.alternate_color, '.')
            .with_glyph(options.marker_color, '|');
        render_waveform(&state, &mut surface);
        print!("{}", surface);
    }
    Ok(())
}

// ─── Pitch runner ────────────────────────────────────────────────

fn run_pitch(args: PitchArgs, settings: Settings) -> Result<()> {
    let buffer = load_input(&args.input)?;

    let mut analyser_settings = settings.analyser;
    if let Some(size) = args.fft_size {
        analyser_settings.fft_size = size;
    }
    // A single frame has no history to smooth against
    analyser_settings.smoothing = 0.0;
    let mut analyser = analyser_settings.build()?;

    if !(args.at >= 0.0) {
        bail!("--at must be a non-negative time");
    }
    let position = (args.at * buffer.sample_rate() as f64) as usize;
    if position >= buffer.len() {
        bail!(
            "--at {:.3}s is past the end ({:.3}s)",
            args.at,
            buffer.duration_s()
        );
    }

    let frame = analyser.analyse(&buffer, position);
    let table = PitchMapper::new().map(&frame.magnitudes_db, frame.sample_rate);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    let mode = match args.mode.as_deref() {
        Some("frequency") => DisplayMode::Frequency,
        Some(_) => DisplayMode::Note,
        None => settings.pitch.mode,
    };
    let mut strongest: Vec<(usize, f64)> = table
        .iter()
        .filter(|&(_, v)| v > settings.pitch.noise_floor)
        .collect();
    strongest.sort_by(|a, b| b.1.total_cmp(&a.1));

    if strongest.is_empty() {
        println!("No pitch content above the noise floor at {:.3}s", args.at);
        return Ok(());
    }
    for (index, intensity) in strongest.into_iter().take(args.top) {
        println!(
            "{:>8}  {:>9.1} Hz  {:>10.1}",
            bin_label(index, mode),
            pitch_frequency(index),
            intensity
        );
    }
    Ok(())
}

// ─── Export runner ───────────────────────────────────────────────

fn run_export(args: ExportArgs) -> Result<()> {
    let buffer = load_input(&args.input)?;
    let selection = Selection::new(args.select.0, args.select.1).normalized();
    let clip = buffer.slice(selection.start, selection.end);
    if clip.is_empty() {
        bail!(
            "Selection {}-{} is empty within {} samples",
            selection.start,
            selection.end,
            buffer.len()
        );
    }
    write_wav(&args.output, &clip)?;
    println!(
        "Wrote {} samples ({:.3}s) to {}",
        clip.len(),
        clip.duration_s(),
        args.output.display()
    );
    Ok(())
}
