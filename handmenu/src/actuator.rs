//! Pointer output sink.
//!
//! Injecting events into the OS pointer is platform specific and lives
//! outside this crate.  [`TracingActuator`] logs what would be injected.

use tracing::{info, trace};

use crate::pipeline::CursorPosition;

/// Receives cursor moves and clicks from the frame loop.
pub trait PointerActuator {
    fn move_cursor(&mut self, position: CursorPosition) -> anyhow::Result<()>;
    fn click(&mut self) -> anyhow::Result<()>;
}

/// Actuator that only logs.
#[derive(Debug, Default)]
pub struct TracingActuator {
    pub moves: u64,
    pub clicks: u64,
}

impl PointerActuator for TracingActuator {
    fn move_cursor(&mut self, position: CursorPosition) -> anyhow::Result<()> {
        self.moves += 1;
        trace!(x = position.x, y = position.y, "move cursor");
        Ok(())
    }

    fn click(&mut self) -> anyhow::Result<()> {
        self.clicks += 1;
        info!("Clicked");
        Ok(())
    }
}

/// One call made on a [`RecordingActuator`].
#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PointerCall {
    Move(CursorPosition),
    Click,
}

#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingActuator {
    pub calls: Vec<PointerCall>,
}

#[cfg(test)]
impl RecordingActuator {
    pub fn clicks(&self) -> usize {
        self.calls.iter().filter(|c| **c == PointerCall::Click).count()
    }
}

#[cfg(test)]
impl PointerActuator for RecordingActuator {
    fn move_cursor(&mut self, position: CursorPosition) -> anyhow::Result<()> {
        self.calls.push(PointerCall::Move(position));
        Ok(())
    }

    fn click(&mut self) -> anyhow::Result<()> {
        self.calls.push(PointerCall::Click);
        Ok(())
    }
}
