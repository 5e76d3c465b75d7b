// THEORY:
// This file is the main entry point for the `sentry_vision` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the
// public API exposed to external consumers (like the `sentry_vision` binary).
//
// The primary goal is to export the `TrackerPipeline` and its associated data
// structures (`TrackerConfig`, `FrameReport`, `Command`) as the clean,
// high-level interface for the tracking engine, together with the I/O trait
// seams (`FrameSource`, `CommandSink`) the processing loop plugs into. The
// internal stages (`core_modules`) stay reachable for direct use and testing
// but are not part of the everyday surface.

pub mod config;
pub mod core_modules;
pub mod error;
pub mod io;
pub mod pipeline;

pub use config::TrackerConfig;
pub use core_modules::decision::Command;
pub use core_modules::region::Region;
pub use error::TrackerError;
pub use io::command_sink::{CommandSink, HttpCommandSink};
pub use io::frame_source::{FrameSource, ImageDirSource, MjpegStream};
pub use pipeline::{FrameReport, TrackerPipeline};
