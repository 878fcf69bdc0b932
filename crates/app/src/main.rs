use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use scanline_sonar_core::{
    AppConfig, FrameClock, FrameOutcome, PlaybackSink, ScanDriver, ScanlineImage, Sonifier,
    SpectrumAnalyzer, WavSink,
};
use tracing_subscriber::EnvFilter;

fn main() -> scanline_sonar_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.sample_rate)?;

    match cli.command {
        Commands::Render { image, output, row } => run_render(&config, &image, &output, row),
        Commands::Sweep {
            image,
            output,
            source_fps,
        } => run_sweep(&config, &image, &output, source_fps),
        Commands::Inspect { image, row } => run_inspect(&config, &image, row),
        Commands::Defaults => {
            println!("{}", AppConfig::default().to_json_pretty()?);
            Ok(())
        }
    }
}

fn load_config(
    path: Option<&Path>,
    sample_rate: Option<u32>,
) -> scanline_sonar_core::Result<AppConfig> {
    let mut config = match path {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(rate) = sample_rate {
        config.playback.sample_rate = rate;
    }
    config.validate()?;
    Ok(config)
}

fn build_sonifier(config: &AppConfig) -> scanline_sonar_core::Result<Sonifier> {
    Sonifier::new(config.pipeline.clone(), config.playback.sample_rate)
}

fn run_render(
    config: &AppConfig,
    image: &Path,
    output: &Path,
    row: Option<u32>,
) -> scanline_sonar_core::Result<()> {
    let source = ScanlineImage::open(image)?;
    let row = row.unwrap_or_else(|| source.center_row());
    let sonifier = build_sonifier(config)?;

    let report = sonifier.process_with_report(&source.row(row)?);
    tracing::info!(
        row,
        edges = report.edges.len(),
        sounding = report.sounding_edges,
        seconds = report.buffer.duration_seconds(),
        "rendered scanline"
    );

    let mut sink = WavSink::new(output, config.playback.sample_rate, config.playback.volume);
    sink.initialize()?;
    sink.submit(report.buffer)?;
    sink.shutdown()
}

fn run_sweep(
    config: &AppConfig,
    image: &Path,
    output: &Path,
    source_fps: f64,
) -> scanline_sonar_core::Result<()> {
    if !(source_fps.is_finite() && source_fps > 0.0) {
        return Err(scanline_sonar_core::SonarError::InvalidInput(
            "source fps must be a positive number",
        ));
    }

    let source = ScanlineImage::open(image)?;
    let sink = WavSink::new(output, config.playback.sample_rate, config.playback.volume);
    let mut driver = ScanDriver::new(build_sonifier(config)?, config.playback.max_fps, sink)?;
    driver.start()?;
    tracing::info!(
        rows = source.height(),
        source_fps,
        max_fps = config.playback.max_fps,
        sample_rate = driver.sonifier().sample_rate(),
        "starting sweep"
    );

    let mut clock = FrameClock::default();
    let (mut submitted, mut throttled, mut dropped) = (0_usize, 0_usize, 0_usize);
    for scanline in source.rows() {
        clock.advance(1.0 / source_fps);
        match driver.offer_frame(clock.time_seconds, &scanline) {
            FrameOutcome::Submitted { .. } => submitted += 1,
            FrameOutcome::Throttled => throttled += 1,
            FrameOutcome::Dropped { .. } => dropped += 1,
        }
    }

    let sink = driver.stop()?;
    tracing::info!(
        submitted,
        throttled,
        dropped,
        samples = sink.samples_written(),
        output = %sink.path().display(),
        "sweep finished"
    );
    Ok(())
}

fn run_inspect(
    config: &AppConfig,
    image: &Path,
    row: Option<u32>,
) -> scanline_sonar_core::Result<()> {
    let source = ScanlineImage::open(image)?;
    let row = row.unwrap_or_else(|| source.center_row());
    let sonifier = build_sonifier(config)?;

    let report = sonifier.process_with_report(&source.row(row)?);
    let summary = SpectrumAnalyzer::new().summarize(&report.buffer)?;

    let mapper = sonifier.synth().mapper();
    let json = serde_json::json!({
        "row": row,
        "threshold": sonifier.config().threshold,
        "distance_range": mapper.distance_range(),
        "frequency_range": mapper.frequency_range(),
        "input_len": report.input_len,
        "edges": report.edges,
        "sounding_edges": report.sounding_edges,
        "summary": summary,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Listen to the edges along a scanline", long_about = None)]
struct Cli {
    /// JSON configuration file; missing fields use the defaults.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Override the output sample rate in Hz.
    #[arg(long, global = true)]
    sample_rate: Option<u32>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sonify a single image row into a WAV file.
    Render {
        /// Image to read the scanline from.
        image: PathBuf,
        /// Output WAV path.
        output: PathBuf,
        /// Row to sample; defaults to the centre row.
        #[arg(short, long)]
        row: Option<u32>,
    },
    /// Treat every image row as a successive frame and record the result.
    Sweep {
        image: PathBuf,
        output: PathBuf,
        /// Rate at which rows are offered to the driver.
        #[arg(long, default_value_t = 60.0)]
        source_fps: f64,
    },
    /// Print detected edges and a spectral summary as JSON.
    Inspect {
        image: PathBuf,
        #[arg(short, long)]
        row: Option<u32>,
    },
    /// Print the default configuration as JSON.
    Defaults,
}
