//! Turns algorithm events into paced frames and tones while servicing user
//! input between events.

use std::{thread, time::Duration};

use crate::{
    audio::SoundBoard,
    event::{Event, EventSink, Halt, Step},
    playback::{InputCommand, InputSource, PlaybackSettings},
    render::{caption, FrameRenderer, Overlay, RenderModel, Surface},
    timeline::PlaybackClock,
};

/// Poll interval while paused or parked on the final screen.
pub const IDLE_POLL: Duration = Duration::from_millis(100);

/// Event consumer that also owns the per-run lifecycle the session drives.
pub trait PlaybackSink: EventSink {
    /// Prepares for a fresh run over `array`: new snapshot, new scale,
    /// zeroed timer.
    fn reset(&mut self, array: &[u32]);

    /// Holds the finished run on screen until the user restarts or quits.
    /// Never returns without one of those (or a fault).
    fn finalize(&mut self) -> Halt;
}

/// Interactive sink over a drawing surface, an input source and a sound board.
pub struct FrameSink<S, I> {
    surface: S,
    input: I,
    sound: SoundBoard,
    renderer: FrameRenderer,
    settings: PlaybackSettings,
    model: RenderModel,
    clock: PlaybackClock,
    title: String,
    final_screen: bool,
    idle_poll: Duration,
    draw_failures: usize,
}

impl<S: Surface, I: InputSource> FrameSink<S, I> {
    pub fn new(
        surface: S,
        input: I,
        sound: SoundBoard,
        renderer: FrameRenderer,
        title: impl Into<String>,
        delay_ms: u32,
    ) -> Self {
        let mut sink = Self {
            surface,
            input,
            sound,
            renderer,
            settings: PlaybackSettings::new(delay_ms),
            model: RenderModel::default(),
            clock: PlaybackClock::start(),
            title: title.into(),
            final_screen: false,
            idle_poll: IDLE_POLL,
            draw_failures: 0,
        };
        sink.update_caption();
        sink
    }

    /// Overrides the pause/final-screen poll interval.
    pub fn with_idle_poll(mut self, idle_poll: Duration) -> Self {
        self.idle_poll = idle_poll;
        self
    }

    pub fn settings(&self) -> &PlaybackSettings {
        &self.settings
    }

    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    pub fn model(&self) -> &RenderModel {
        &self.model
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn sound(&self) -> &SoundBoard {
        &self.sound
    }

    /// Draws the current snapshot. Backend failures are logged, not raised.
    fn redraw(&mut self) {
        let overlay = Overlay {
            title: &self.title,
            elapsed: self.clock.elapsed(),
            delay_ms: self.settings.delay_ms(),
            paused: self.settings.paused,
            final_screen: self.final_screen,
        };
        if let Err(err) = self.renderer.draw(&mut self.surface, &self.model, &overlay) {
            self.draw_failures += 1;
            if self.draw_failures == 1 {
                tracing::warn!(%err, "failed to draw frame");
            } else {
                tracing::debug!(%err, failures = self.draw_failures, "failed to draw frame");
            }
        }
    }

    fn update_caption(&mut self) {
        let text = caption(&self.title, self.settings.paused);
        if let Err(err) = self.surface.set_caption(&text) {
            tracing::warn!(%err, "failed to set caption");
        }
    }

    /// Drains pending input, then reports quit or restart if requested.
    fn service_input(&mut self) -> Step {
        let commands = self.input.poll().map_err(Halt::Fault)?;
        for command in commands {
            self.handle(command);
        }

        if !self.settings.running {
            return Err(Halt::Quit);
        }
        if self.settings.take_restart() {
            tracing::info!("restart requested");
            return Err(Halt::Restart);
        }
        Ok(())
    }

    fn handle(&mut self, command: InputCommand) {
        tracing::trace!(?command, "input");
        // Nothing is playing on the final screen, so there is nothing to pause.
        if self.final_screen && command == InputCommand::TogglePause {
            return;
        }
        if self.settings.apply(command) {
            if command == InputCommand::TogglePause {
                if self.settings.paused {
                    self.clock.pause();
                } else {
                    self.clock.resume();
                }
                self.update_caption();
            }
            return;
        }

        match command {
            InputCommand::ToggleFullscreen => {
                if let Err(err) = self.surface.toggle_fullscreen() {
                    tracing::warn!(%err, "failed to toggle fullscreen");
                }
                self.redraw();
            }
            InputCommand::Resize { width, height } => {
                // A fullscreen surface tracks the display itself, it only needs a repaint.
                if !self.surface.is_fullscreen() && width > 0 && height > 0 {
                    if let Err(err) = self.surface.resize(width, height) {
                        tracing::warn!(%err, width, height, "failed to resize surface");
                    }
                }
                self.redraw();
            }
            _ => {}
        }
    }
}

impl<S: Surface, I: InputSource> EventSink for FrameSink<S, I> {
    fn on_event(&mut self, array: &[u32], event: Event) -> Step {
        if !self.settings.running {
            return Err(Halt::Quit);
        }
        self.service_input()?;

        if self.settings.paused {
            self.model.set_event(event.clone());
            loop {
                self.redraw();
                self.service_input()?;
                if !self.settings.paused {
                    break;
                }
                thread::sleep(self.idle_poll);
            }
        }

        if event.is_end {
            self.clock.stop();
        }
        self.model.update(array, event);
        self.redraw();

        if let Some(value) = self.model.active_value() {
            self.sound.play(value);
        }

        let delay = self.settings.delay();
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        Ok(())
    }
}

impl<S: Surface, I: InputSource> PlaybackSink for FrameSink<S, I> {
    fn reset(&mut self, array: &[u32]) {
        self.model.reset(array);
        self.sound.set_max_value(self.model.max_value());
        self.clock.reset();
        self.settings.paused = false;
        self.settings.restart_requested = false;
        self.final_screen = false;
        self.draw_failures = 0;
        self.update_caption();
        self.redraw();
    }

    fn finalize(&mut self) -> Halt {
        if !self.settings.running {
            return Halt::Quit;
        }

        self.clock.stop();
        self.final_screen = true;
        self.model.clear_event();
        self.redraw();

        loop {
            if let Err(halt) = self.service_input() {
                return halt;
            }
            thread::sleep(self.idle_poll);
        }
    }
}

impl<S, I> std::fmt::Debug for FrameSink<S, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameSink")
            .field("title", &self.title)
            .field("settings", &self.settings)
            .field("clock", &self.clock)
            .field("final_screen", &self.final_screen)
            .finish()
    }
}
