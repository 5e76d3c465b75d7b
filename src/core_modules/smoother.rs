// THEORY:
// The `smoother` module dampens per-frame jitter in the tracked object's
// position. Raw centroids wobble: segmentation noise shifts the bounding box
// a few pixels every frame even for a steadily moving object, and a twitchy
// position estimate would make the decision policy oscillate around the dead
// zone edge.
//
// The smoother keeps a bounded FIFO history of recent raw centroids and
// reports their arithmetic mean. It is only fed on frames that actually
// produced a region; a brief detection gap leaves the history untouched, so
// smoothing resumes from where it left off instead of restarting cold.

use std::collections::VecDeque;

/// A bounded moving-average filter over raw centroid positions.
pub struct PositionSmoother {
    history: VecDeque<(i32, i32)>,
    capacity: usize,
}

impl PositionSmoother {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Appends a raw centroid, evicting the oldest entry at capacity, and
    /// returns the mean of all held centroids rounded to the nearest pixel.
    pub fn push(&mut self, raw: (i32, i32)) -> (i32, i32) {
        self.history.push_back(raw);
        if self.history.len() > self.capacity {
            self.history.pop_front();
        }

        let count = self.history.len() as f64;
        let (sum_x, sum_y) = self
            .history
            .iter()
            .fold((0i64, 0i64), |(sx, sy), &(x, y)| {
                (sx + x as i64, sy + y as i64)
            });
        (
            (sum_x as f64 / count).round() as i32,
            (sum_y as f64 / count).round() as i32,
        )
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// The raw centroids currently held, oldest first.
    pub fn history(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.history.iter().copied()
    }
}
