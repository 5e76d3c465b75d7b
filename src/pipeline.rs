// THEORY:
// The `pipeline` module is the top-level API for the tracking engine. It owns
// every piece of per-session state (the background model, the position
// history, the decision policy's issue timestamp) and wires the per-frame
// stages together in their fixed order:
//
//   frame -> resize -> segment motion -> clean mask -> select region
//         -> smooth position -> decide command
//
// One `TrackerPipeline` is one tracking session. All state lives in the
// instance, never at module level, so multiple independent trackers can
// coexist and tests can construct as many as they like. The instance is not
// designed for concurrent mutation: confine it to one thread, or guard it
// with one exclusive lock.
//
// The pipeline deliberately does not own the frame source or the command
// sink. It is handed a frame and a timestamp and reports what it saw and what
// it decided; the caller owns the I/O loop.

use crate::config::TrackerConfig;
use crate::core_modules::background::BackgroundModel;
use crate::core_modules::decision::{Command, DecisionPolicy};
use crate::core_modules::mask;
use crate::core_modules::region::{self, Region};
use crate::core_modules::smoother::PositionSmoother;
use crate::error::TrackerError;
use image::imageops::{self, FilterType};
use image::RgbImage;
use std::time::Instant;
use tracing::trace;

/// What the pipeline saw and decided for a single frame.
#[derive(Debug, Clone)]
pub struct FrameReport {
    /// The selected candidate region, in canonical-frame coordinates.
    pub region: Option<Region>,
    /// The smoothed centroid, present only when a region was found.
    pub smoothed_centroid: Option<(i32, i32)>,
    /// The command issued this frame, `None` while the rate gate is closed.
    pub command: Option<Command>,
}

/// The main, top-level struct for one tracking session.
pub struct TrackerPipeline {
    config: TrackerConfig,
    background: BackgroundModel,
    smoother: PositionSmoother,
    policy: DecisionPolicy,
}

impl TrackerPipeline {
    pub fn new(config: TrackerConfig) -> Result<Self, TrackerError> {
        config.validate()?;
        let background = BackgroundModel::new(
            config.canonical_width,
            config.canonical_height,
            config.background_history_frames,
            config.background_variance_threshold,
        );
        let smoother = PositionSmoother::new(config.smoothing_window_frames);
        let policy = DecisionPolicy::new(
            config.canonical_width,
            config.center_threshold_px,
            config.min_command_interval(),
        );
        Ok(Self {
            config,
            background,
            smoother,
            policy,
        })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Runs the full per-frame stage chain. `now` is the wall-clock instant
    /// the frame was received; the decision policy's rate gate measures
    /// against it, which keeps timing simulable in tests.
    ///
    /// An empty frame is an error the caller should treat as "skip this
    /// cycle": no state was touched.
    pub fn process_frame(
        &mut self,
        frame: &RgbImage,
        now: Instant,
    ) -> Result<FrameReport, TrackerError> {
        if frame.width() == 0 || frame.height() == 0 {
            return Err(TrackerError::EmptyFrame(format!(
                "{}x{} frame",
                frame.width(),
                frame.height()
            )));
        }

        let canonical = (self.config.canonical_width, self.config.canonical_height);
        let resized;
        let frame = if frame.dimensions() == canonical {
            frame
        } else {
            resized = imageops::resize(frame, canonical.0, canonical.1, FilterType::Triangle);
            &resized
        };

        let raw_mask = self.background.apply(frame);
        let cleaned = mask::clean(&raw_mask);
        let region = region::select_largest(&cleaned, self.config.min_region_area_px2 as usize);

        // The smoother only runs on frames that produced a region. A
        // detection gap leaves the history intact and drives the "no object"
        // path below, which decides `stop`.
        let smoothed = region.map(|r| self.smoother.push(r.centroid()));

        let command = self.policy.decide(smoothed, now);

        trace!(
            region = ?region,
            smoothed = ?smoothed,
            command = ?command,
            "frame processed"
        );

        Ok(FrameReport {
            region,
            smoothed_centroid: smoothed,
            command,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use std::time::Duration;

    fn test_config() -> TrackerConfig {
        TrackerConfig {
            canonical_width: 320,
            canonical_height: 240,
            min_region_area_px2: 200,
            ..TrackerConfig::default()
        }
    }

    #[test]
    fn empty_frame_is_rejected_without_touching_state() {
        let mut pipeline = TrackerPipeline::new(test_config()).expect("pipeline");
        let empty = RgbImage::new(0, 0);
        let err = pipeline.process_frame(&empty, Instant::now());
        assert!(matches!(err, Err(TrackerError::EmptyFrame(_))));
    }

    #[test]
    fn oversized_frame_is_resized_to_canonical() {
        let mut pipeline = TrackerPipeline::new(test_config()).expect("pipeline");
        // Double the canonical resolution; processing must still succeed and
        // report coordinates inside the canonical frame.
        let frame = RgbImage::from_pixel(640, 480, Rgb([90, 90, 90]));
        let report = pipeline
            .process_frame(&frame, Instant::now())
            .expect("report");
        assert!(report.region.is_none());
        assert_eq!(report.command, Some(Command::Stop));
    }

    #[test]
    fn detection_gap_keeps_history_and_decides_stop() {
        let mut pipeline = TrackerPipeline::new(test_config()).expect("pipeline");
        let now = Instant::now();
        let step = Duration::from_millis(300);
        let background = RgbImage::from_pixel(320, 240, Rgb([0, 0, 0]));

        for i in 0..4 {
            pipeline
                .process_frame(&background, now + step * i)
                .expect("warmup");
        }

        let mut with_object = background.clone();
        for y in 100..140 {
            for x in 40..80 {
                with_object.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }
        let seen = pipeline
            .process_frame(&with_object, now + step * 4)
            .expect("object frame");
        assert!(seen.region.is_some());

        // Object vanishes: no region, command falls back to stop.
        let gap = pipeline
            .process_frame(&background, now + step * 5)
            .expect("gap frame");
        assert!(gap.region.is_none());
        assert!(gap.smoothed_centroid.is_none());
        assert_eq!(gap.command, Some(Command::Stop));
    }
}
