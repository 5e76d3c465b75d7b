// THEORY:
// The `decision` module converts the smoothed object position into a discrete
// steering command for the robot. It is the only policy code in the system:
// everything upstream answers "where is the object," this module answers
// "what should the robot do about it."
//
// Two mechanisms, both stateful in exactly one value each:
// 1.  **Dead Zone**: The frame has a horizontal band around its center. An
//     object inside the band is centered (`stop`); left of the band means
//     `left`, right of it means `right`. The band comparison is strict, so a
//     centroid exactly at the band edge still counts as centered.
// 2.  **Rate Limiting**: Commands are issued no more often than a minimum
//     interval, independent of frame rate, so a fast camera cannot flood the
//     actuator link. While the gate is closed the previous command simply
//     stands and this frame issues nothing.
//
// The issue timestamp resets whenever a command is issued, regardless of
// whether transmission later succeeds. A failed send is the sink's problem to
// report; the next eligible frame retries naturally.

use std::fmt;
use std::time::{Duration, Instant};

/// A discrete steering command. The wire format is the lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Left,
    Right,
    Stop,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Left => "left",
            Command::Right => "right",
            Command::Stop => "stop",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rate-limited dead-zone steering policy.
pub struct DecisionPolicy {
    center_x: i32,
    dead_zone: i32,
    min_interval: Duration,
    last_issued: Option<Instant>,
}

impl DecisionPolicy {
    pub fn new(frame_width: u32, center_threshold_px: u32, min_interval: Duration) -> Self {
        Self {
            center_x: (frame_width / 2) as i32,
            dead_zone: center_threshold_px as i32,
            min_interval,
            last_issued: None,
        }
    }

    /// Decides the command for this frame. `target` is the smoothed centroid
    /// when an object is present. Returns `None` when the rate gate is
    /// closed; otherwise returns the issued command and arms the gate.
    pub fn decide(&mut self, target: Option<(i32, i32)>, now: Instant) -> Option<Command> {
        if let Some(last) = self.last_issued {
            if now.duration_since(last) < self.min_interval {
                return None;
            }
        }

        let command = match target {
            None => Command::Stop,
            Some((x, _)) if x < self.center_x - self.dead_zone => Command::Left,
            Some((x, _)) if x > self.center_x + self.dead_zone => Command::Right,
            Some(_) => Command::Stop,
        };

        self.last_issued = Some(now);
        Some(command)
    }
}
