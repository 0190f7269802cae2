//! Core library for the Sort Visualiser application.
//!
//! Sorting algorithms are written as ordinary in-place code that reports
//! each comparison and move to an [`EventSink`]. The sink renders the array,
//! plays a tone for the value that just moved, paces playback and services
//! user input; its answer at every event tells the algorithm whether to go
//! on, restart from scratch or quit. Everything runs on one thread, the
//! event call being the only point where control changes hands.

pub mod algorithms;
pub mod audio;
pub mod config;
pub mod error;
pub mod event;
pub mod playback;
pub mod render;
pub mod session;
pub mod sink;
pub mod timeline;

pub use algorithms::{menu_order, Algorithm, ALGORITHMS, DEFAULT_ALGORITHM};
pub use audio::{AudioOutput, PlayOutcome, SoundBoard, Tone, ToneCache, ToneConfig};
pub use config::{AppConfig, DisplayConfig, SessionSettings};
pub use error::{Result, VisualiserError};
pub use event::{Event, EventCounts, EventLog, EventSink, EventTally, Halt, Step};
pub use playback::{InputCommand, InputSource, PlaybackSettings};
pub use render::{FrameRenderer, Palette, Rect, RenderModel, Rgb, Surface, TextStyle};
pub use session::{trace, ArrayGenerator, Session, SessionEnd, SessionReport, SessionState, TraceReport};
pub use sink::{FrameSink, PlaybackSink};
pub use timeline::PlaybackClock;
