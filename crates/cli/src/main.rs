use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::Parser;

use facecam_core::annotation::infrastructure::raster_painter::RasterPainter;
use facecam_core::capture::domain::frame_source::FrameSource;
use facecam_core::capture::infrastructure::image_sequence_source::ImageSequenceSource;
use facecam_core::capture::infrastructure::opencv_camera::OpenCvCamera;
use facecam_core::detection::infrastructure::cascade_resolver::{self, CascadePaths};
use facecam_core::detection::infrastructure::opencv_cascade::OpenCvCascadeLoader;
use facecam_core::session::capture_session::{CaptureSession, TickOutcome};
use facecam_core::session::tick_scheduler::TickScheduler;
use facecam_core::shared::constants::{DEFAULT_CAMERA_INDEX, SNAPSHOT_PREFIX, TICK_INTERVAL};
use facecam_core::snapshot::domain::snapshot_format::{default_snapshot_path, SnapshotFormat};
use facecam_core::snapshot::infrastructure::image_file_writer::ImageFileWriter;

/// Live face and eye detection on a camera feed.
#[derive(Parser)]
#[command(name = "facecam")]
struct Cli {
    /// Camera device index.
    #[arg(long, default_value_t = DEFAULT_CAMERA_INDEX)]
    camera: u32,

    /// Replay the images of a directory instead of opening a camera.
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Start over when the replayed images run out.
    #[arg(long, requires = "replay")]
    loop_replay: bool,

    /// Number of ticks to run (0 = until the replay ends or forever).
    #[arg(long, default_value = "0")]
    frames: u64,

    /// Directory holding the default Haar cascades.
    #[arg(long)]
    cascade_dir: Option<PathBuf>,

    /// Face cascade XML, overriding the default lookup.
    #[arg(long)]
    face_cascade: Option<PathBuf>,

    /// Eye cascade XML, overriding the default lookup.
    #[arg(long)]
    eye_cascade: Option<PathBuf>,

    /// TrueType font for the overlay text.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Save the last displayed frame to this file (.jpg, .png or .bmp).
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Save the last displayed frame into this directory with a timestamped name.
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// File name prefix for --snapshot-dir.
    #[arg(long, default_value = SNAPSHOT_PREFIX)]
    snapshot_prefix: String,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let cascades = resolve_cascades(&cli)?;
    let source: Box<dyn FrameSource> = match &cli.replay {
        Some(dir) => Box::new(ImageSequenceSource::new(dir).looping(cli.loop_replay)),
        None => Box::new(OpenCvCamera::new()),
    };

    let mut session = CaptureSession::new(
        source,
        Box::new(OpenCvCascadeLoader::new()),
        Box::new(ImageFileWriter::new()),
        Box::new(RasterPainter::from_font_lookup(cli.font.as_deref())),
    )
    .with_camera_index(cli.camera);

    session.load_default_classifiers(&cascades)?;
    log::info!("{}", session.status());
    session.start()?;

    let stop_on_read_failure = cli.replay.is_some() && !cli.loop_replay;
    run_loop(&mut session, cli.frames, stop_on_read_failure);

    if let Some(path) = snapshot_target(&cli) {
        session.capture_snapshot(&path)?;
        eprintln!("{}", session.status());
    }

    session.shutdown();
    Ok(())
}

fn run_loop(session: &mut CaptureSession, frames: u64, stop_on_read_failure: bool) {
    let mut pacer = TickScheduler::new(TICK_INTERVAL);
    let mut ticks = 0u64;

    while frames == 0 || ticks < frames {
        let deadline = pacer.next_deadline(Instant::now());
        let now = Instant::now();
        if deadline > now {
            std::thread::sleep(deadline - now);
        }

        match session.tick_at(deadline) {
            TickOutcome::Displayed {
                report: Some(report),
            } => {
                println!(
                    "tick {ticks}: {} faces, {} eyes",
                    report.face_count(),
                    report.eyes.len()
                );
            }
            TickOutcome::Displayed { report: None } => {
                println!("tick {ticks}: {}", session.status());
            }
            TickOutcome::ReadFailed => {
                log::warn!("{}", session.status());
                if stop_on_read_failure {
                    log::info!("Replay finished after {ticks} ticks");
                    break;
                }
            }
            TickOutcome::Skipped => continue,
            TickOutcome::NotCapturing => break,
        }
        ticks += 1;
    }

    if pacer.skipped() > 0 {
        log::info!("{} tick deadlines missed", pacer.skipped());
    }
}

fn resolve_cascades(cli: &Cli) -> Result<CascadePaths, Box<dyn std::error::Error>> {
    let cascade_dir = match &cli.cascade_dir {
        Some(dir) => dir.clone(),
        None => cascade_resolver::default_cascade_dir()?,
    };
    if cascade_resolver::ensure_cascade_dir(&cascade_dir)? {
        eprintln!(
            "Created {}. Copy haarcascade_frontalface_default.xml and haarcascade_eye.xml into it.",
            cascade_dir.display()
        );
    }

    let mut paths = cascade_resolver::resolve_from_env(&cascade_dir);
    if let Some(face) = &cli.face_cascade {
        paths.face = Some(face.clone());
    }
    if let Some(eye) = &cli.eye_cascade {
        paths.eye = Some(eye.clone());
    }
    Ok(paths)
}

fn snapshot_target(cli: &Cli) -> Option<PathBuf> {
    match (&cli.snapshot, &cli.snapshot_dir) {
        (Some(path), _) => Some(path.clone()),
        (None, Some(dir)) => Some(default_snapshot_path(dir, &cli.snapshot_prefix)),
        (None, None) => None,
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(dir) = &cli.replay {
        if !dir.is_dir() {
            return Err(format!("Replay directory not found: {}", dir.display()).into());
        }
    }
    if cli.replay.is_none() && cli.frames == 0 && cli_wants_snapshot(cli) {
        return Err("--frames is required when saving a snapshot from a live camera".into());
    }
    if cli.loop_replay && cli.frames == 0 && cli_wants_snapshot(cli) {
        return Err("--frames is required when saving a snapshot from a looping replay".into());
    }
    if cli.snapshot.is_some() && cli.snapshot_dir.is_some() {
        return Err("--snapshot and --snapshot-dir are mutually exclusive".into());
    }
    if let Some(path) = &cli.snapshot {
        if SnapshotFormat::from_path(path).is_none() {
            return Err(format!(
                "Snapshot must end in .jpg, .jpeg, .png or .bmp, got {}",
                path.display()
            )
            .into());
        }
    }
    if let Some(dir) = &cli.snapshot_dir {
        if !dir.is_dir() {
            return Err(format!("Snapshot directory not found: {}", dir.display()).into());
        }
    }
    if cli.snapshot_prefix.is_empty() {
        return Err("Snapshot prefix must not be empty".into());
    }
    for path in [&cli.face_cascade, &cli.eye_cascade, &cli.font]
        .into_iter()
        .flatten()
    {
        if !path.is_file() {
            return Err(format!("File not found: {}", path.display()).into());
        }
    }
    Ok(())
}

fn cli_wants_snapshot(cli: &Cli) -> bool {
    cli.snapshot.is_some() || cli.snapshot_dir.is_some()
}
