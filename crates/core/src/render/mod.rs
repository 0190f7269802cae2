//! Render model and frame composition over an abstract drawing surface.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{event::Event, Result};

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Colours used to draw a frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: Rgb,
    pub bar_start: Rgb,
    pub bar_end: Rgb,
    pub highlight: Rgb,
    pub moving: Rgb,
    pub sweep: Rgb,
    pub text: Rgb,
    pub title: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgb(20, 20, 30),
            bar_start: Rgb(50, 150, 255),
            bar_end: Rgb(255, 100, 150),
            highlight: Rgb(255, 255, 0),
            moving: Rgb(255, 50, 50),
            sweep: Rgb(0, 255, 100),
            text: Rgb(220, 220, 220),
            title: Rgb(255, 255, 255),
        }
    }
}

impl Palette {
    /// Base bar colour: per-channel linear blend from `bar_start` to
    /// `bar_end` by `value / max`, truncated and clamped to `0..=255`.
    pub fn gradient(&self, value: u32, max: u32) -> Rgb {
        let ratio = if max > 0 {
            f64::from(value) / f64::from(max)
        } else {
            0.0
        };
        let blend = |start: u8, end: u8| -> u8 {
            let mixed = f64::from(start) * (1.0 - ratio) + f64::from(end) * ratio;
            (mixed as i64).clamp(0, 255) as u8
        };
        Rgb(
            blend(self.bar_start.0, self.bar_end.0),
            blend(self.bar_start.1, self.bar_end.1),
            blend(self.bar_start.2, self.bar_end.2),
        )
    }

    /// Colour of bar `index` under `event`. Active beats highlighted, and
    /// during the sweep the active bar uses the sweep colour.
    pub fn bar_color(&self, index: usize, value: u32, max: u32, event: &Event) -> Rgb {
        if event.active == Some(index) {
            if event.is_final_sweep {
                self.sweep
            } else {
                self.moving
            }
        } else if event.highlighted.contains(&index) {
            self.highlight
        } else {
            self.gradient(value, max)
        }
    }
}

/// Axis-aligned rectangle in surface units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Fraction of each bar slot left empty as spacing.
const BAR_SPACING: f64 = 0.1;

/// Lays out one bar per value across a `width` x `height` surface, leaving
/// `reserved` units at the top for the overlay.
pub fn bar_rects(values: &[u32], max: u32, width: u32, height: u32, reserved: u32) -> Vec<Rect> {
    let n = values.len();
    let slot = if n > 0 {
        f64::from(width) / n as f64
    } else {
        f64::from(width)
    };
    let spacing = (slot * BAR_SPACING).floor();
    let bar_width = ((slot - spacing).ceil() as u32).max(1);
    let area = f64::from(height.saturating_sub(reserved));

    values
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            let bar_height = if max > 0 {
                (f64::from(value) / f64::from(max) * area).max(0.0).round() as u32
            } else {
                0
            };
            Rect {
                x: (index as f64 * slot).floor() as i32,
                y: height as i32 - bar_height as i32,
                width: bar_width,
                height: bar_height,
            }
        })
        .collect()
}

/// Text role, lets a surface pick a larger face for the title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Title,
    Body,
}

/// Drawing surface provided by a graphics backend.
pub trait Surface {
    /// Current drawable size.
    fn size(&self) -> (u32, u32);
    /// Height kept free of bars for the overlay.
    fn overlay_height(&self) -> u32;
    /// Vertical distance between the title row and the info row.
    fn line_height(&self) -> u32;
    fn text_width(&self, text: &str, style: TextStyle) -> u32;

    fn fill(&mut self, color: Rgb) -> Result<()>;
    fn fill_rect(&mut self, rect: Rect, color: Rgb) -> Result<()>;
    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Rgb, style: TextStyle)
        -> Result<()>;
    fn present(&mut self) -> Result<()>;

    fn set_caption(&mut self, caption: &str) -> Result<()>;
    fn is_fullscreen(&self) -> bool;
    fn toggle_fullscreen(&mut self) -> Result<()>;
    /// Adjusts a windowed surface to new dimensions.
    fn resize(&mut self, width: u32, height: u32) -> Result<()>;
}

/// Read-only snapshot of the array plus the event that produced it.
#[derive(Debug, Clone, Default)]
pub struct RenderModel {
    values: Vec<u32>,
    max_value: u32,
    event: Event,
}

impl RenderModel {
    pub fn new(values: &[u32]) -> Self {
        let mut model = Self::default();
        model.reset(values);
        model
    }

    /// Replaces the snapshot and recomputes the scale. Used when a run starts.
    pub fn reset(&mut self, values: &[u32]) {
        self.values = values.to_vec();
        self.max_value = values.iter().copied().max().filter(|&max| max > 0).unwrap_or(1);
        self.event = Event::settled();
    }

    /// Refreshes the snapshot in place; the scale stays fixed for the run.
    pub fn update(&mut self, values: &[u32], event: Event) {
        self.values.clear();
        self.values.extend_from_slice(values);
        self.event = event;
    }

    pub fn set_event(&mut self, event: Event) {
        self.event = event;
    }

    pub fn clear_event(&mut self) {
        self.event = Event::settled();
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    pub fn max_value(&self) -> u32 {
        self.max_value
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    /// Value under the event's active index, if any.
    pub fn active_value(&self) -> Option<u32> {
        self.event
            .active
            .and_then(|index| self.values.get(index).copied())
    }
}

/// Text shown above the bars.
#[derive(Debug, Clone)]
pub struct Overlay<'a> {
    pub title: &'a str,
    pub elapsed: Duration,
    pub delay_ms: u32,
    pub paused: bool,
    pub final_screen: bool,
}

impl Overlay<'_> {
    pub fn timer_text(&self) -> String {
        let prefix = if self.final_screen { "Final Time:" } else { "Time:" };
        format!("{prefix} {:.2}s", self.elapsed.as_secs_f64())
    }

    /// Left-aligned info segments in drawing order.
    pub fn left_segments(&self) -> Vec<String> {
        let mut segments = vec![self.timer_text()];
        if !self.final_screen {
            segments.push(format!("Delay: {}ms [+/-]", self.delay_ms));
            let state = if self.paused { "PAUSED [P]" } else { "Running [P]" };
            segments.push(format!("{state} Restart [R]"));
        }
        segments
    }

    /// Right-aligned hint.
    pub fn right_hint(&self) -> &'static str {
        if self.final_screen {
            "Quit [Q] Restart [R]"
        } else {
            "Quit [Q] Fullscreen [ESC]"
        }
    }
}

/// Window caption for an algorithm, flagged while paused.
pub fn caption(title: &str, paused: bool) -> String {
    let suffix = if paused { " [PAUSED]" } else { "" };
    format!("Sorting Visualizer - {title}{suffix}")
}

/// Composes frames from a [`RenderModel`] onto a [`Surface`].
#[derive(Debug, Clone, Default)]
pub struct FrameRenderer {
    palette: Palette,
}

impl FrameRenderer {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn draw<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        model: &RenderModel,
        overlay: &Overlay<'_>,
    ) -> Result<()> {
        surface.fill(self.palette.background)?;

        let (width, height) = surface.size();
        let rects = bar_rects(
            model.values(),
            model.max_value(),
            width,
            height,
            surface.overlay_height(),
        );
        for (index, rect) in rects.into_iter().enumerate() {
            let value = model.values()[index];
            let color = self
                .palette
                .bar_color(index, value, model.max_value(), model.event());
            surface.fill_rect(rect, color)?;
        }

        self.draw_overlay(surface, overlay)?;
        surface.present()
    }

    fn draw_overlay<S: Surface + ?Sized>(&self, surface: &mut S, overlay: &Overlay<'_>) -> Result<()> {
        let (width, _) = surface.size();
        let pad = surface.text_width(" ", TextStyle::Body) as i32;

        let title_width = surface.text_width(overlay.title, TextStyle::Title) as i32;
        let title_x = ((width as i32 - title_width) / 2).max(0);
        surface.draw_text(overlay.title, title_x, 0, self.palette.title, TextStyle::Title)?;

        let row = surface.line_height() as i32;
        let mut x = pad;
        for segment in overlay.left_segments() {
            surface.draw_text(&segment, x, row, self.palette.text, TextStyle::Body)?;
            x += surface.text_width(&segment, TextStyle::Body) as i32 + 3 * pad;
        }

        let hint = overlay.right_hint();
        let hint_x = width as i32 - surface.text_width(hint, TextStyle::Body) as i32 - pad;
        surface.draw_text(hint, hint_x.max(x), row, self.palette.text, TextStyle::Body)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// In-memory surface with one unit per character.
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub width: u32,
        pub height: u32,
        pub fullscreen: bool,
        pub rects: Vec<(Rect, Rgb)>,
        pub texts: Vec<String>,
        pub captions: Vec<String>,
        pub presented: usize,
        pub fail_present: bool,
    }

    impl RecordingSurface {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                fullscreen: true,
                ..Default::default()
            }
        }

        pub fn last_frame_text(&self) -> String {
            self.texts.join(" | ")
        }
    }

    impl Surface for RecordingSurface {
        fn size(&self) -> (u32, u32) {
            (self.width, self.height)
        }

        fn overlay_height(&self) -> u32 {
            2
        }

        fn line_height(&self) -> u32 {
            1
        }

        fn text_width(&self, text: &str, _style: TextStyle) -> u32 {
            text.chars().count() as u32
        }

        fn fill(&mut self, _color: Rgb) -> Result<()> {
            self.rects.clear();
            self.texts.clear();
            Ok(())
        }

        fn fill_rect(&mut self, rect: Rect, color: Rgb) -> Result<()> {
            self.rects.push((rect, color));
            Ok(())
        }

        fn draw_text(
            &mut self,
            text: &str,
            _x: i32,
            _y: i32,
            _color: Rgb,
            _style: TextStyle,
        ) -> Result<()> {
            self.texts.push(text.to_string());
            Ok(())
        }

        fn present(&mut self) -> Result<()> {
            if self.fail_present {
                return Err(crate::VisualiserError::Display("present failed".into()));
            }
            self.presented += 1;
            Ok(())
        }

        fn set_caption(&mut self, caption: &str) -> Result<()> {
            self.captions.push(caption.to_string());
            Ok(())
        }

        fn is_fullscreen(&self) -> bool {
            self.fullscreen
        }

        fn toggle_fullscreen(&mut self) -> Result<()> {
            self.fullscreen = !self.fullscreen;
            Ok(())
        }

        fn resize(&mut self, width: u32, height: u32) -> Result<()> {
            self.width = width;
            self.height = height;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingSurface;
    use super::*;

    #[test]
    fn gradient_runs_from_start_to_end() {
        let palette = Palette::default();
        assert_eq!(palette.gradient(0, 100), palette.bar_start);
        assert_eq!(palette.gradient(100, 100), palette.bar_end);
        assert_eq!(palette.gradient(50, 100), Rgb(152, 125, 202));
        assert_eq!(palette.gradient(7, 0), palette.bar_start);
    }

    #[test]
    fn overrides_follow_precedence() {
        let palette = Palette::default();
        let event = Event::moved(&[0, 1], 1);
        assert_eq!(palette.bar_color(0, 5, 10, &event), palette.highlight);
        assert_eq!(palette.bar_color(1, 5, 10, &event), palette.moving);
        assert_eq!(palette.bar_color(2, 10, 10, &event), palette.bar_end);

        let sweep = Event::sweep(2);
        assert_eq!(palette.bar_color(2, 10, 10, &sweep), palette.sweep);
    }

    #[test]
    fn bars_fill_the_area_below_the_overlay() {
        let rects = bar_rects(&[10, 5, 0], 10, 30, 12, 2);
        assert_eq!(rects.len(), 3);
        assert_eq!(rects[0], Rect { x: 0, y: 2, width: 9, height: 10 });
        assert_eq!(rects[1], Rect { x: 10, y: 7, width: 9, height: 5 });
        assert_eq!(rects[2], Rect { x: 20, y: 12, width: 9, height: 0 });
    }

    #[test]
    fn narrow_slots_keep_one_unit_bars() {
        let rects = bar_rects(&[1; 100], 1, 40, 10, 0);
        assert!(rects.iter().all(|rect| rect.width == 1));
        assert_eq!(rects[99].x, 39);
    }

    #[test]
    fn model_scale_ignores_zero_arrays() {
        assert_eq!(RenderModel::new(&[]).max_value(), 1);
        assert_eq!(RenderModel::new(&[0, 0]).max_value(), 1);
        assert_eq!(RenderModel::new(&[3, 9, 4]).max_value(), 9);
    }

    #[test]
    fn overlay_text_switches_on_final_screen() {
        let mut overlay = Overlay {
            title: "Bubble Sort",
            elapsed: Duration::from_millis(1_234),
            delay_ms: 5,
            paused: true,
            final_screen: false,
        };
        assert_eq!(overlay.timer_text(), "Time: 1.23s");
        assert_eq!(overlay.left_segments()[2], "PAUSED [P] Restart [R]");

        overlay.final_screen = true;
        assert_eq!(overlay.left_segments(), vec!["Final Time: 1.23s".to_string()]);
        assert_eq!(overlay.right_hint(), "Quit [Q] Restart [R]");
    }

    #[test]
    fn renderer_draws_one_rect_per_value_and_presents() {
        let mut surface = RecordingSurface::new(40, 20);
        let mut model = RenderModel::new(&[4, 2, 8]);
        model.set_event(Event::moved(&[0], 2));
        let overlay = Overlay {
            title: "Heap Sort",
            elapsed: Duration::ZERO,
            delay_ms: 0,
            paused: false,
            final_screen: false,
        };

        FrameRenderer::default()
            .draw(&mut surface, &model, &overlay)
            .unwrap();

        assert_eq!(surface.rects.len(), 3);
        assert_eq!(surface.rects[2].1, Palette::default().moving);
        assert_eq!(surface.rects[0].1, Palette::default().highlight);
        assert_eq!(surface.presented, 1);
        assert!(surface.last_frame_text().contains("Heap Sort"));
    }

    #[test]
    fn captions_mark_pause() {
        assert_eq!(caption("Merge Sort", false), "Sorting Visualizer - Merge Sort");
        assert_eq!(
            caption("Merge Sort", true),
            "Sorting Visualizer - Merge Sort [PAUSED]"
        );
    }
}
