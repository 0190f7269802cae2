//! User-facing playback state and the abstract input it reacts to.

use std::time::Duration;

use crate::Result;

/// Lower bound for the per-event delay, in milliseconds.
pub const MIN_DELAY_MS: u32 = 0;
/// Upper bound for the per-event delay, in milliseconds.
pub const MAX_DELAY_MS: u32 = 200;
/// Below this delay the step size is 1ms, at or above it 5ms.
const FINE_STEP_LIMIT: u32 = 10;

/// Abstract user commands. Backends translate their own key or window
/// events into these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    Quit,
    ToggleFullscreen,
    TogglePause,
    Restart,
    /// Slow playback down.
    IncreaseDelay,
    /// Speed playback up.
    DecreaseDelay,
    /// The windowed surface was resized to the given dimensions.
    Resize { width: u32, height: u32 },
}

/// Source of pending user input. `poll` must not block.
pub trait InputSource {
    fn poll(&mut self) -> Result<Vec<InputCommand>>;
}

/// Mutable playback state shared by the sink's pacing and input handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackSettings {
    delay_ms: u32,
    pub paused: bool,
    pub restart_requested: bool,
    pub running: bool,
}

impl PlaybackSettings {
    pub fn new(delay_ms: u32) -> Self {
        if delay_ms > MAX_DELAY_MS {
            tracing::warn!(delay_ms, max = MAX_DELAY_MS, "initial delay clamped");
        }
        Self {
            delay_ms: delay_ms.clamp(MIN_DELAY_MS, MAX_DELAY_MS),
            paused: false,
            restart_requested: false,
            running: true,
        }
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.delay_ms))
    }

    pub fn increase_delay(&mut self) {
        let step = if self.delay_ms < FINE_STEP_LIMIT { 1 } else { 5 };
        self.delay_ms = (self.delay_ms + step).min(MAX_DELAY_MS);
    }

    pub fn decrease_delay(&mut self) {
        let step = if self.delay_ms < FINE_STEP_LIMIT { 1 } else { 5 };
        self.delay_ms = self.delay_ms.saturating_sub(step).max(MIN_DELAY_MS);
    }

    /// Applies the commands that only touch playback state and returns
    /// `true` if the command was consumed. Display commands are left to the
    /// caller.
    pub fn apply(&mut self, command: InputCommand) -> bool {
        match command {
            InputCommand::Quit => self.running = false,
            InputCommand::TogglePause => self.paused = !self.paused,
            InputCommand::Restart => self.restart_requested = true,
            InputCommand::IncreaseDelay => self.increase_delay(),
            InputCommand::DecreaseDelay => self.decrease_delay(),
            InputCommand::ToggleFullscreen | InputCommand::Resize { .. } => return false,
        }
        true
    }

    /// Consumes a pending restart request.
    pub fn take_restart(&mut self) -> bool {
        std::mem::take(&mut self.restart_requested)
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self::new(5)
    }
}
