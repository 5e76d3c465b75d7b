// THEORY:
// The `region` module is the spatial grouping layer. It takes the cleaned
// binary foreground mask and condenses it into at most one actionable object:
// "the most prominent moving thing in this frame."
//
// Key architectural principles:
// 1.  **Connected Components**: Foreground pixels are grouped into maximal
//     8-connected regions. Each region is summarized by its bounding box and
//     pixel count; regions have no identity across frames.
// 2.  **Largest-Wins Selection**: Only the single largest region survives.
//     The tracker steers one axis toward one object, so competing smaller
//     regions are irrelevant by design.
// 3.  **Area Gate**: A region below the minimum-area threshold is treated as
//     residual noise (leaves, lighting flicker) and discarded, even when it
//     is the only region present.
//
// When two regions tie on area the one with the lowest component label wins,
// which is the first one encountered in row-major scan order. The rule is
// arbitrary but deterministic.

use image::{GrayImage, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};

/// A single connected foreground region, summarized by its bounding box and
/// area. Valid for one frame only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Number of foreground pixels in the region.
    pub area: usize,
}

impl Region {
    /// Center of the bounding box, in pixel coordinates.
    pub fn centroid(&self) -> (i32, i32) {
        (
            (self.x + self.width / 2) as i32,
            (self.y + self.height / 2) as i32,
        )
    }
}

/// Per-label accumulator used while scanning the label map.
#[derive(Clone, Copy)]
struct Extent {
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
    count: usize,
}

impl Extent {
    fn empty() -> Self {
        Self {
            min_x: u32::MAX,
            min_y: u32::MAX,
            max_x: 0,
            max_y: 0,
            count: 0,
        }
    }

    fn include(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
        self.count += 1;
    }

    fn into_region(self) -> Region {
        Region {
            x: self.min_x,
            y: self.min_y,
            width: self.max_x - self.min_x + 1,
            height: self.max_y - self.min_y + 1,
            area: self.count,
        }
    }
}

/// Extracts connected foreground regions from a cleaned mask and returns the
/// largest one, or `None` when no region reaches `min_area`.
pub fn select_largest(mask: &GrayImage, min_area: usize) -> Option<Region> {
    let labels = connected_components(mask, Connectivity::Eight, Luma([0u8]));

    let mut extents: Vec<Extent> = Vec::new();
    for (x, y, label) in labels.enumerate_pixels() {
        let label = label.0[0] as usize;
        if label == 0 {
            continue;
        }
        if label > extents.len() {
            extents.resize(label, Extent::empty());
        }
        extents[label - 1].include(x, y);
    }

    let mut best: Option<Extent> = None;
    for extent in extents {
        // Strict comparison keeps the lowest label on an area tie.
        if best.map_or(true, |b| extent.count > b.count) {
            best = Some(extent);
        }
    }

    best.filter(|b| b.count >= min_area)
        .map(Extent::into_region)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_with_rects(width: u32, height: u32, rects: &[(u32, u32, u32, u32)]) -> GrayImage {
        let mut mask = GrayImage::new(width, height);
        for &(x, y, w, h) in rects {
            for yy in y..y + h {
                for xx in x..x + w {
                    mask.put_pixel(xx, yy, Luma([255]));
                }
            }
        }
        mask
    }

    #[test]
    fn empty_mask_yields_none() {
        let mask = GrayImage::new(64, 48);
        assert_eq!(select_largest(&mask, 1), None);
    }

    #[test]
    fn largest_of_several_regions_wins() {
        let mask = mask_with_rects(100, 100, &[(5, 5, 10, 10), (40, 40, 30, 30), (80, 10, 5, 5)]);
        let region = select_largest(&mask, 1).expect("a region");
        assert_eq!((region.x, region.y), (40, 40));
        assert_eq!((region.width, region.height), (30, 30));
        assert_eq!(region.area, 900);
    }

    #[test]
    fn region_below_min_area_is_discarded() {
        let mask = mask_with_rects(100, 100, &[(10, 10, 10, 10)]);
        assert_eq!(select_largest(&mask, 500), None);
        assert!(select_largest(&mask, 100).is_some());
    }

    #[test]
    fn equal_area_tie_goes_to_scan_order() {
        // Two 20x20 squares; the one whose first pixel appears earlier in
        // row-major order gets the lower label and must win the tie.
        let mask = mask_with_rects(100, 100, &[(60, 50, 20, 20), (10, 5, 20, 20)]);
        let region = select_largest(&mask, 1).expect("a region");
        assert_eq!((region.x, region.y), (10, 5));
    }

    #[test]
    fn centroid_is_bounding_box_center() {
        let mask = mask_with_rects(200, 200, &[(50, 60, 100, 80)]);
        let region = select_largest(&mask, 1).expect("a region");
        assert_eq!(region.centroid(), (100, 100));
    }
}
