// THEORY:
// The `background` module is the motion segmentation layer of the tracker. It
// maintains a per-pixel statistical model of the static scene and classifies
// each pixel of every new frame as either background (consistent with the
// model) or foreground (a statistically significant deviation, i.e. motion).
//
// Key architectural principles:
// 1.  **Adaptive Per-Pixel Statistics**: Every pixel location carries its own
//     running mean and variance of luminance, updated with a learning rate
//     derived from a rolling history window. A pixel is foreground when its
//     squared deviation from the learned mean exceeds a configurable multiple
//     of the learned variance.
// 2.  **Selective Update**: Background-classified pixels adapt at the full
//     learning rate, while foreground-classified pixels adapt at a heavily
//     reduced rate. A moving object passing through a region therefore cannot
//     poison the model, but a genuine permanent scene change is still
//     absorbed eventually.
// 3.  **Session-Scoped State**: The model is created once per tracking session
//     and updated on every processed frame, whether or not a candidate object
//     is ultimately found. There is no reset operation.
//
// Shadow suppression is intentionally absent: shadows classify as foreground,
// which keeps genuine low-contrast objects from being discarded.

use image::{GrayImage, Luma, RgbImage};

/// Variance assigned to a pixel the first time it is observed.
const INITIAL_VARIANCE: f32 = 225.0;
/// Floor for the modeled variance, so a perfectly static pixel still
/// tolerates sensor noise without flagging every frame.
const MIN_VARIANCE: f32 = 4.0;
/// Ceiling for the modeled variance, so one outlier cannot inflate the
/// acceptance band enough to swallow real motion.
const MAX_VARIANCE: f32 = 400.0;
/// Fraction of the learning rate applied to foreground-classified pixels.
const FOREGROUND_LEARNING_SCALE: f32 = 0.1;

/// A per-pixel adaptive Gaussian background model over luminance.
pub struct BackgroundModel {
    width: u32,
    height: u32,
    /// Rolling window length that bounds the learning rate.
    history: u32,
    /// Foreground gate: squared deviation must exceed `threshold * variance`.
    var_threshold: f32,
    mean: Vec<f32>,
    variance: Vec<f32>,
    frames_seen: u64,
}

impl BackgroundModel {
    pub fn new(width: u32, height: u32, history: u32, var_threshold: f32) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            history: history.max(1),
            var_threshold,
            mean: vec![0.0; len],
            variance: vec![INITIAL_VARIANCE; len],
            frames_seen: 0,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }

    /// Classifies every pixel of `frame` against the model and updates the
    /// model in place. Returns the binary foreground mask (255 = foreground).
    ///
    /// The frame must already be at the model's resolution; the caller owns
    /// resizing.
    pub fn apply(&mut self, frame: &RgbImage) -> GrayImage {
        debug_assert_eq!(frame.dimensions(), (self.width, self.height));

        let mut mask = GrayImage::new(self.width, self.height);

        if self.frames_seen == 0 {
            // First frame: adopt it as the initial scene. Nothing can be
            // called motion yet, so the mask stays empty.
            for (x, y, pixel) in frame.enumerate_pixels() {
                let index = (y * self.width + x) as usize;
                self.mean[index] = luminance(pixel);
            }
            self.frames_seen = 1;
            return mask;
        }

        let effective_window = self.frames_seen.min(self.history as u64) as f32;
        let alpha = 1.0 / effective_window;

        for (x, y, pixel) in frame.enumerate_pixels() {
            let index = (y * self.width + x) as usize;
            let value = luminance(pixel);
            let deviation = value - self.mean[index];
            let squared = deviation * deviation;
            let foreground = squared > self.var_threshold * self.variance[index];

            let rate = if foreground {
                alpha * FOREGROUND_LEARNING_SCALE
            } else {
                alpha
            };
            self.mean[index] += rate * deviation;
            self.variance[index] =
                (self.variance[index] + rate * (squared - self.variance[index]))
                    .clamp(MIN_VARIANCE, MAX_VARIANCE);

            if foreground {
                mask.put_pixel(x, y, Luma([255]));
            }
        }

        self.frames_seen += 1;
        mask
    }
}

/// Rec. 601 luminance of an RGB pixel, in the 0..255 range.
fn luminance(pixel: &image::Rgb<u8>) -> f32 {
    0.299 * pixel.0[0] as f32 + 0.587 * pixel.0[1] as f32 + 0.114 * pixel.0[2] as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn solid_frame(width: u32, height: u32, value: u8) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([value, value, value]))
    }

    fn foreground_count(mask: &GrayImage) -> usize {
        mask.pixels().filter(|p| p.0[0] != 0).count()
    }

    #[test]
    fn static_scene_stays_background() {
        let mut model = BackgroundModel::new(64, 48, 100, 50.0);
        for _ in 0..10 {
            let mask = model.apply(&solid_frame(64, 48, 120));
            assert_eq!(foreground_count(&mask), 0);
        }
        assert_eq!(model.frames_seen(), 10);
    }

    #[test]
    fn sudden_bright_patch_is_foreground() {
        let mut model = BackgroundModel::new(64, 48, 100, 50.0);
        for _ in 0..5 {
            model.apply(&solid_frame(64, 48, 0));
        }

        let mut frame = solid_frame(64, 48, 0);
        for y in 10..20 {
            for x in 10..30 {
                frame.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }
        let mask = model.apply(&frame);
        assert_eq!(foreground_count(&mask), 20 * 10);
        for y in 10..20 {
            for x in 10..30 {
                assert_eq!(mask.get_pixel(x, y).0[0], 255);
            }
        }
    }

    #[test]
    fn vacated_area_returns_to_background() {
        let mut model = BackgroundModel::new(64, 48, 100, 50.0);
        for _ in 0..5 {
            model.apply(&solid_frame(64, 48, 0));
        }

        let mut occupied = solid_frame(64, 48, 0);
        for y in 0..10 {
            for x in 0..10 {
                occupied.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }
        model.apply(&occupied);

        // Object gone: the selective update must not have absorbed it.
        let mask = model.apply(&solid_frame(64, 48, 0));
        assert_eq!(foreground_count(&mask), 0);
    }

    #[test]
    fn first_frame_is_all_background() {
        let mut model = BackgroundModel::new(32, 32, 100, 50.0);
        let mask = model.apply(&solid_frame(32, 32, 200));
        assert_eq!(foreground_count(&mask), 0);
        assert_eq!(model.frames_seen(), 1);
    }
}
