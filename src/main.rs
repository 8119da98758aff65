// src/main.rs
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use gesture_control::data::SessionRecorder;
use gesture_control::{
    EngineConfig, GestureEngine, InputSink, LandmarkSource, ReplaySource, SimulatedSource, SourceItem,
    TracingSink,
};

#[derive(Debug, Parser)]
#[command(name = "gesture_control")]
#[command(about = "Turn hand-landmark streams into pointer, click, drag and typing events")]
struct Cli {
    /// JSON-lines recording of landmark frames and controls. Runs a simulated hand when omitted.
    replay: Option<PathBuf>,
    /// Engine configuration file. Defaults to $GESTURE_CONTROL_CONFIG, then the per-user config.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory that receives the session folder with events.csv and report.html.
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Session folder name. Defaults to a timestamped name.
    #[arg(long)]
    session: Option<String>,
    /// Number of frames to simulate when no recording is given (30 fps).
    #[arg(long, default_value_t = 300)]
    frames: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => EngineConfig::discover().context("loading configuration")?,
    };
    let frame_width = config.frame_width;
    let mut engine = GestureEngine::new(config).context("starting gesture engine")?;

    let mut source: Box<dyn LandmarkSource> = match &cli.replay {
        Some(path) => {
            info!("Replaying landmarks from {}", path.display());
            Box::new(
                ReplaySource::open(path)
                    .with_context(|| format!("opening {}", path.display()))?,
            )
        }
        None => {
            info!("No recording given, simulating {} frames", cli.frames);
            Box::new(SimulatedSource::new(frame_width, cli.frames))
        }
    };

    let output_dir = cli.output_dir.clone().unwrap_or_else(default_output_dir);
    let mut recorder = SessionRecorder::new(output_dir, cli.session.clone());
    let csv_path = recorder.start_csv().context("creating event log")?;
    let mut sink = TracingSink::default();

    while let Some(item) = source.next_item().context("reading landmark stream")? {
        match item {
            SourceItem::Frame(frame) => {
                let events = engine.process_frame(&frame);
                for event in &events {
                    sink.dispatch(event);
                }
                recorder.record_frame(frame.timestamp, &events).context("logging events")?;
            }
            SourceItem::Control(control) => {
                engine.apply(control);
                let events = engine.take_pending();
                for event in &events {
                    sink.dispatch(event);
                }
                recorder.record_between_frames(&events).context("logging events")?;
            }
        }
    }
    recorder.flush()?;

    let stats = engine.stats();
    info!(
        "Session done: {} frames ({} rejected), {} hands skipped, {} events",
        stats.frames, stats.rejected_frames, stats.rejected_hands, stats.events
    );

    let report_path = recorder.generate_report().context("writing report")?;
    info!("Events written to {}", csv_path.display());
    info!("Report written to {}", report_path.display());

    let summary = recorder.summary();
    if !summary.typed_text.is_empty() {
        info!("Typed: {:?}", summary.typed_text);
    }
    Ok(())
}

fn default_output_dir() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|dirs| dirs.document_dir().map(|p| p.join("GestureControl")))
        .unwrap_or_else(|| PathBuf::from("./output"))
}
