//! Value-to-pitch tone synthesis, the tone cache and best-effort playback.

use std::{collections::HashMap, f64::consts::PI, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::Result;

/// Parameters shared by every synthesised tone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneConfig {
    pub sample_rate: u32,
    pub duration_ms: u32,
    pub min_frequency: f64,
    pub max_frequency: f64,
    /// Linear amplitude in `0.0..=1.0`.
    pub volume: f64,
    /// Share of the tone, counted from the tail, that fades to silence.
    pub fade_fraction: f64,
    /// Number of voices the mixer may play at once.
    pub channels: usize,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            duration_ms: 30,
            min_frequency: 100.0,
            max_frequency: 1_200.0,
            volume: 0.1,
            fade_fraction: 0.1,
            channels: 32,
        }
    }
}

impl ToneConfig {
    /// Pitch for `value` on a logarithmic scale between the configured
    /// bounds, so equal value steps sound like equal pitch steps.
    pub fn frequency_for(&self, value: u32, max_value: u32) -> f64 {
        if max_value == 0 {
            return self.min_frequency;
        }
        let ratio = (f64::from(value) / f64::from(max_value)).clamp(0.0, 1.0);
        let low = self.min_frequency.ln();
        let high = self.max_frequency.ln();
        (low + ratio * (high - low)).exp()
    }

    pub fn samples_per_tone(&self) -> usize {
        (u64::from(self.sample_rate) * u64::from(self.duration_ms) / 1_000) as usize
    }
}

/// A rendered mono tone as signed 16-bit PCM.
#[derive(Debug, Clone, PartialEq)]
pub struct Tone {
    pub frequency: f64,
    pub sample_rate: u32,
    pub samples: Vec<i16>,
}

impl Tone {
    /// Renders a sine at `frequency` for the configured duration with a
    /// linear fade over the tail.
    pub fn synthesize(frequency: f64, config: &ToneConfig) -> Self {
        let len = config.samples_per_tone();
        let rate = f64::from(config.sample_rate);
        let mut wave: Vec<f64> = (0..len)
            .map(|t| (2.0 * PI * frequency * t as f64 / rate).sin())
            .collect();

        let fade_len = (config.fade_fraction * len as f64) as usize;
        if fade_len > 0 {
            let tail = len - fade_len;
            for (step, sample) in wave[tail..].iter_mut().enumerate() {
                let gain = if fade_len > 1 {
                    1.0 - step as f64 / (fade_len - 1) as f64
                } else {
                    1.0
                };
                *sample *= gain;
            }
        }

        let scale = f64::from(i16::MAX) * config.volume;
        Self {
            frequency,
            sample_rate: config.sample_rate,
            samples: wave.into_iter().map(|s| (s * scale) as i16).collect(),
        }
    }

    /// Interleaves the mono samples into left/right pairs.
    pub fn stereo(&self) -> Vec<i16> {
        self.samples.iter().flat_map(|&s| [s, s]).collect()
    }
}

/// Lazily populated map from array value to rendered tone.
///
/// Entries are never evicted while the scale stays the same; a new
/// `max_value` invalidates every entry because pitches depend on it.
#[derive(Debug, Clone)]
pub struct ToneCache {
    config: ToneConfig,
    max_value: u32,
    tones: HashMap<u32, Arc<Tone>>,
}

impl ToneCache {
    pub fn new(config: ToneConfig, max_value: u32) -> Self {
        Self {
            config,
            max_value,
            tones: HashMap::new(),
        }
    }

    pub fn config(&self) -> &ToneConfig {
        &self.config
    }

    pub fn max_value(&self) -> u32 {
        self.max_value
    }

    pub fn len(&self) -> usize {
        self.tones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tones.is_empty()
    }

    /// Rescales the cache. Does nothing if the scale is unchanged.
    pub fn set_max_value(&mut self, max_value: u32) {
        if max_value != self.max_value {
            tracing::debug!(
                old = self.max_value,
                new = max_value,
                cached = self.tones.len(),
                "tone scale changed, clearing cache"
            );
            self.max_value = max_value;
            self.tones.clear();
        }
    }

    pub fn get_or_create(&mut self, value: u32) -> Arc<Tone> {
        let config = &self.config;
        let max_value = self.max_value;
        self.tones
            .entry(value)
            .or_insert_with(|| {
                Arc::new(Tone::synthesize(
                    config.frequency_for(value, max_value),
                    config,
                ))
            })
            .clone()
    }
}

/// Polyphonic output provided by an audio backend.
pub trait AudioOutput {
    /// Index of a voice that is not currently playing, if any.
    fn find_free_channel(&mut self) -> Option<usize>;
    fn play(&mut self, channel: usize, tone: &Tone) -> Result<()>;
}

/// Outcome of a [`SoundBoard::play`] request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Played { channel: usize },
    /// Every voice was busy.
    Dropped,
    /// No audio backend is available.
    Muted,
    /// The backend refused the tone; already logged.
    Failed,
}

/// Tone cache bound to an optional output. Audio is non-critical, so every
/// failure ends in a log line rather than an error.
pub struct SoundBoard {
    cache: ToneCache,
    output: Option<Box<dyn AudioOutput>>,
}

impl SoundBoard {
    pub fn new(cache: ToneCache, output: Option<Box<dyn AudioOutput>>) -> Self {
        Self { cache, output }
    }

    /// Board that keeps the cache warm but never makes a sound.
    pub fn muted(config: ToneConfig) -> Self {
        Self::new(ToneCache::new(config, 1), None)
    }

    pub fn cache(&self) -> &ToneCache {
        &self.cache
    }

    pub fn set_max_value(&mut self, max_value: u32) {
        self.cache.set_max_value(max_value);
    }

    pub fn play(&mut self, value: u32) -> PlayOutcome {
        let Some(output) = self.output.as_mut() else {
            return PlayOutcome::Muted;
        };
        let tone = self.cache.get_or_create(value);
        let Some(channel) = output.find_free_channel() else {
            tracing::trace!(value, "all voices busy, tone dropped");
            return PlayOutcome::Dropped;
        };
        match output.play(channel, &tone) {
            Ok(()) => PlayOutcome::Played { channel },
            Err(err) => {
                tracing::warn!(value, channel, %err, "failed to play tone");
                PlayOutcome::Failed
            }
        }
    }
}

impl std::fmt::Debug for SoundBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundBoard")
            .field("cache", &self.cache)
            .field("output", &self.output.is_some())
            .finish()
    }
}
