use std::time::{Duration, Instant};

/// Stopwatch for a single sorting run.
///
/// Time accumulates only while the clock is running. Pausing freezes the
/// reading and resuming continues from the frozen value; stopping freezes it
/// for good until the next [`PlaybackClock::reset`].
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    accumulated: Duration,
    running_since: Option<Instant>,
    stopped: bool,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::start_at(Instant::now())
    }
}

impl PlaybackClock {
    /// Creates a clock that starts counting immediately.
    pub fn start() -> Self {
        Self::default()
    }

    pub fn start_at(now: Instant) -> Self {
        Self {
            accumulated: Duration::ZERO,
            running_since: Some(now),
            stopped: false,
        }
    }

    pub fn reset(&mut self) {
        self.reset_at(Instant::now());
    }

    pub fn reset_at(&mut self, now: Instant) {
        *self = Self::start_at(now);
    }

    pub fn pause_at(&mut self, now: Instant) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += now.saturating_duration_since(since);
        }
    }

    pub fn resume_at(&mut self, now: Instant) {
        if !self.stopped && self.running_since.is_none() {
            self.running_since = Some(now);
        }
    }

    /// Freezes the reading permanently for this run.
    pub fn stop_at(&mut self, now: Instant) {
        self.pause_at(now);
        self.stopped = true;
    }

    pub fn pause(&mut self) {
        self.pause_at(Instant::now());
    }

    pub fn resume(&mut self) {
        self.resume_at(Instant::now());
    }

    pub fn stop(&mut self) {
        self.stop_at(Instant::now());
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn elapsed_at(&self, now: Instant) -> Duration {
        match self.running_since {
            Some(since) => self.accumulated + now.saturating_duration_since(since),
            None => self.accumulated,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Instant::now())
    }
}
