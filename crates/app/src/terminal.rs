//! Crossterm-backed drawing surface and keyboard input.
//!
//! One terminal cell is one surface unit. "Windowed" mode draws into the
//! top-left three quarters of the terminal, "fullscreen" uses all of it.

use std::io::{self, BufWriter, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen, SetTitle,
    },
};
use sort_visualiser_core::{
    InputCommand, InputSource, Rect, Result, Rgb, Surface, TextStyle, VisualiserError,
};

/// Used when the terminal cannot report its size.
const FALLBACK_SIZE: (u16, u16) = (80, 24);
/// Rows above the bars: title, info line and a spacer.
const OVERLAY_ROWS: u32 = 3;

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.0,
        g: rgb.1,
        b: rgb.2,
    }
}

fn terminal_size() -> (u16, u16) {
    match terminal::size() {
        Ok(size) => size,
        Err(err) => {
            tracing::warn!(%err, "could not query terminal size, using fallback");
            FALLBACK_SIZE
        }
    }
}

fn windowed_region(terminal: (u16, u16)) -> (u16, u16) {
    (
        (u32::from(terminal.0) * 3 / 4) as u16,
        (u32::from(terminal.1) * 3 / 4) as u16,
    )
}

pub struct TerminalSurface {
    out: BufWriter<Stdout>,
    terminal: (u16, u16),
    window: (u16, u16),
    fullscreen: bool,
    background: Rgb,
}

impl TerminalSurface {
    /// Switches the terminal into raw mode on the alternate screen. The
    /// terminal is restored when the surface is dropped.
    pub fn open(fullscreen: bool) -> Result<Self> {
        enable_raw_mode()
            .map_err(|err| VisualiserError::Display(format!("cannot enter raw mode: {err}")))?;
        let mut out = BufWriter::new(io::stdout());
        execute!(out, EnterAlternateScreen, Hide)?;

        let terminal = terminal_size();
        tracing::info!(?terminal, fullscreen, "terminal surface ready");
        Ok(Self {
            out,
            terminal,
            window: windowed_region(terminal),
            fullscreen,
            background: Rgb(0, 0, 0),
        })
    }

    fn region(&self) -> (u16, u16) {
        if self.fullscreen {
            self.terminal
        } else {
            (
                self.window.0.min(self.terminal.0),
                self.window.1.min(self.terminal.1),
            )
        }
    }

    /// Clips `text` starting at column `x` to the drawable width.
    fn clip<'a>(&self, text: &'a str, x: u16) -> &'a str {
        let room = usize::from(self.region().0.saturating_sub(x));
        match text.char_indices().nth(room) {
            Some((end, _)) => &text[..end],
            None => text,
        }
    }
}

impl Surface for TerminalSurface {
    fn size(&self) -> (u32, u32) {
        let (width, height) = self.region();
        (u32::from(width), u32::from(height))
    }

    fn overlay_height(&self) -> u32 {
        OVERLAY_ROWS
    }

    fn line_height(&self) -> u32 {
        1
    }

    fn text_width(&self, text: &str, _style: TextStyle) -> u32 {
        text.chars().count() as u32
    }

    fn fill(&mut self, background: Rgb) -> Result<()> {
        // Pick up terminal resizes that happened in fullscreen mode.
        self.terminal = terminal_size();
        self.background = background;

        queue!(self.out, ResetColor, Clear(ClearType::All))?;
        let (width, height) = self.region();
        let row = " ".repeat(usize::from(width));
        queue!(self.out, SetBackgroundColor(color(background)))?;
        for y in 0..height {
            queue!(self.out, MoveTo(0, y), Print(&row))?;
        }
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, fill: Rgb) -> Result<()> {
        let (width, height) = self.region();
        let left = rect.x.clamp(0, i32::from(width)) as u16;
        let right = (rect.x + rect.width as i32).clamp(0, i32::from(width)) as u16;
        let top = rect.y.clamp(0, i32::from(height)) as u16;
        let bottom = (rect.y + rect.height as i32).clamp(0, i32::from(height)) as u16;
        if left >= right || top >= bottom {
            return Ok(());
        }

        let cells = " ".repeat(usize::from(right - left));
        queue!(self.out, SetBackgroundColor(color(fill)))?;
        for y in top..bottom {
            queue!(self.out, MoveTo(left, y), Print(&cells))?;
        }
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        fill: Rgb,
        _style: TextStyle,
    ) -> Result<()> {
        let (width, height) = self.region();
        if x < 0 || y < 0 || x >= i32::from(width) || y >= i32::from(height) {
            return Ok(());
        }
        let (x, y) = (x as u16, y as u16);
        let visible = self.clip(text, x);
        queue!(
            self.out,
            MoveTo(x, y),
            SetBackgroundColor(color(self.background)),
            SetForegroundColor(color(fill)),
            Print(visible)
        )?;
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        queue!(self.out, ResetColor)?;
        self.out.flush()?;
        Ok(())
    }

    fn set_caption(&mut self, caption: &str) -> Result<()> {
        queue!(self.out, SetTitle(caption))?;
        Ok(())
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn toggle_fullscreen(&mut self) -> Result<()> {
        self.fullscreen = !self.fullscreen;
        tracing::debug!(fullscreen = self.fullscreen, "view mode toggled");
        Ok(())
    }

    /// `width` x `height` is the new terminal size; the window keeps its
    /// three-quarter share of it.
    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        let clamp = |value: u32| value.min(u32::from(u16::MAX)) as u16;
        self.terminal = (clamp(width), clamp(height));
        self.window = windowed_region(self.terminal);
        Ok(())
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        if let Err(err) = execute!(self.out, ResetColor, LeaveAlternateScreen, Show) {
            tracing::warn!(%err, "failed to leave alternate screen");
        }
        if let Err(err) = disable_raw_mode() {
            tracing::warn!(%err, "failed to disable raw mode");
        }
    }
}

/// Non-blocking keyboard and resize input.
#[derive(Debug, Default)]
pub struct KeyboardInput;

impl KeyboardInput {
    fn translate(event: Event) -> Option<InputCommand> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(InputCommand::Quit)
                }
                KeyCode::Char('q') | KeyCode::Char('Q') => Some(InputCommand::Quit),
                KeyCode::Esc => Some(InputCommand::ToggleFullscreen),
                KeyCode::Char('p') | KeyCode::Char('P') => Some(InputCommand::TogglePause),
                KeyCode::Char('r') | KeyCode::Char('R') => Some(InputCommand::Restart),
                KeyCode::Char('+') | KeyCode::Char('=') => Some(InputCommand::IncreaseDelay),
                KeyCode::Char('-') | KeyCode::Char('_') => Some(InputCommand::DecreaseDelay),
                _ => None,
            },
            Event::Resize(width, height) => Some(InputCommand::Resize {
                width: u32::from(width),
                height: u32::from(height),
            }),
            _ => None,
        }
    }
}

impl InputSource for KeyboardInput {
    fn poll(&mut self) -> Result<Vec<InputCommand>> {
        let mut commands = Vec::new();
        while event::poll(Duration::ZERO)? {
            if let Some(command) = Self::translate(event::read()?) {
                commands.push(command);
            }
        }
        Ok(commands)
    }
}
