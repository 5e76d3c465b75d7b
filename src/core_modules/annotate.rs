// THEORY:
// The `annotate` module draws the tracker's view of the world back onto the
// frame for human debugging: the selected region's bounding box, the smoothed
// centroid, and the vertical center line the decision policy steers against.
// It never influences tracking; it exists so a developer can dump frames to
// disk and see why the robot turned when it did.

use crate::core_modules::region::Region;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const CENTROID_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const CENTER_LINE_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
const CENTROID_RADIUS: i32 = 5;

/// Draws the tracking overlay in place on a canonical-resolution frame.
pub fn draw_overlay(frame: &mut RgbImage, region: Option<&Region>, smoothed: Option<(i32, i32)>) {
    let center_x = (frame.width() / 2) as f32;
    let height = frame.height() as f32;
    draw_line_segment_mut(frame, (center_x, 0.0), (center_x, height), CENTER_LINE_COLOR);

    if let Some(region) = region {
        let rect = Rect::at(region.x as i32, region.y as i32)
            .of_size(region.width.max(1), region.height.max(1));
        draw_hollow_rect_mut(frame, rect, BOX_COLOR);
    }

    if let Some((x, y)) = smoothed {
        draw_filled_circle_mut(frame, (x, y), CENTROID_RADIUS, CENTROID_COLOR);
    }
}
