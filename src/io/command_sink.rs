// THEORY:
// The `command_sink` module is the tracker's boundary with the robot's
// actuator controller. The decision policy produces a `Command`; the sink's
// only job is to deliver its wire string and report success or failure.
//
// The trait exists so tests can substitute a recording mock and exercise the
// full pipeline without network I/O. The production implementation POSTs to
// the robot's control endpoint with a short timeout, bounding how long a
// stalled actuator link can delay the next frame.

use crate::core_modules::decision::Command;
use crate::error::TrackerError;
use std::time::Duration;
use tracing::debug;

/// Delivers steering commands to the robot.
pub trait CommandSink {
    fn send(&mut self, command: Command) -> Result<(), TrackerError>;
}

/// Sends commands as HTTP POST bodies to the robot's control endpoint.
pub struct HttpCommandSink {
    agent: ureq::Agent,
    control_url: String,
}

impl HttpCommandSink {
    pub fn new(control_url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            control_url: control_url.into(),
        }
    }
}

impl CommandSink for HttpCommandSink {
    fn send(&mut self, command: Command) -> Result<(), TrackerError> {
        let response = self
            .agent
            .post(&self.control_url)
            .send_string(command.as_str())
            .map_err(|e| TrackerError::Command(e.to_string()))?;
        debug!(
            command = command.as_str(),
            status = response.status(),
            "command acknowledged"
        );
        Ok(())
    }
}
