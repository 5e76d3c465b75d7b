//! Processing loop binary: connect to the camera stream, run the tracking
//! pipeline frame-at-a-time, and post steering commands to the robot.

use anyhow::Context;
use clap::Parser;
use image::imageops::{self, FilterType};
use sentry_vision::core_modules::annotate;
use sentry_vision::io::command_sink::{CommandSink, HttpCommandSink};
use sentry_vision::io::frame_source::{FrameSource, ImageDirSource, MjpegStream};
use sentry_vision::{Command, TrackerConfig, TrackerPipeline};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sentry_vision", about = "Keeps a camera robot pointed at the most prominent moving object in its video stream.")]
struct Cli {
    /// IP address of the robot (camera stream and control endpoint).
    #[arg(long, default_value = "192.168.38.154")]
    ip: String,

    /// Full MJPEG stream URL. Overrides the URL derived from --ip.
    #[arg(long)]
    stream_url: Option<String>,

    /// Play back a directory of image frames instead of a live stream.
    #[arg(long)]
    frames: Option<PathBuf>,

    /// TOML file with tracker configuration overrides.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write annotated frames as PNGs into this directory.
    #[arg(long)]
    dump_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => TrackerConfig::from_toml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => TrackerConfig::default(),
    };

    let mut source: Box<dyn FrameSource> = match &cli.frames {
        Some(dir) => {
            let source = ImageDirSource::open(dir)
                .with_context(|| format!("opening frame directory {}", dir.display()))?;
            info!(frames = source.len(), dir = %dir.display(), "playing back frame directory");
            Box::new(source)
        }
        None => {
            let url = cli
                .stream_url
                .clone()
                .unwrap_or_else(|| format!("http://{}:81/stream", cli.ip));
            info!(url, "connecting to camera stream");
            Box::new(MjpegStream::connect(&url).context("connecting to camera stream")?)
        }
    };

    let control_url = format!("http://{}/control", cli.ip);
    let mut sink = HttpCommandSink::new(control_url, config.command_timeout());
    let mut pipeline = TrackerPipeline::new(config.clone())?;

    if let Some(dir) = &cli.dump_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating dump directory {}", dir.display()))?;
    }

    let mut frame_index: u64 = 0;
    loop {
        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                info!("stream ended");
                break;
            }
            Err(e) => {
                warn!(error = %e, "stream failed, shutting down");
                break;
            }
        };

        let report = match pipeline.process_frame(&frame, Instant::now()) {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, frame_index, "skipping frame");
                frame_index += 1;
                continue;
            }
        };

        if let Some(command) = report.command {
            info!(command = command.as_str(), frame_index, "issuing command");
            if let Err(e) = sink.send(command) {
                // Transmission failure never alters tracking state; the next
                // eligible frame retries naturally.
                warn!(error = %e, command = command.as_str(), "command transmission failed");
            }
        }

        if let Some(dir) = &cli.dump_dir {
            let mut annotated = imageops::resize(
                &frame,
                config.canonical_width,
                config.canonical_height,
                FilterType::Triangle,
            );
            annotate::draw_overlay(&mut annotated, report.region.as_ref(), report.smoothed_centroid);
            let path = dir.join(format!("frame_{frame_index:06}.png"));
            if let Err(e) = annotated.save(&path) {
                warn!(error = %e, path = %path.display(), "failed to write annotated frame");
            }
        }

        frame_index += 1;
    }

    // Clean shutdown: leave the robot stationary.
    info!("issuing final stop");
    if let Err(e) = sink.send(Command::Stop) {
        warn!(error = %e, "final stop failed");
    }

    Ok(())
}
