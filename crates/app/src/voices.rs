//! Rodio-backed polyphonic tone output.

use rodio::{buffer::SamplesBuffer, OutputStream, Sink};
use sort_visualiser_core::{AudioOutput, Result, Tone, VisualiserError};

/// A fixed pool of sinks on the default output device. Each sink is one
/// voice; a voice is free once its queue has drained.
pub struct RodioVoices {
    // Dropping the stream silences every sink.
    _stream: OutputStream,
    voices: Vec<Sink>,
}

impl RodioVoices {
    pub fn open(voice_count: usize) -> Result<Self> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|err| VisualiserError::Audio(format!("no output device: {err}")))?;
        let voices = (0..voice_count.max(1))
            .map(|_| {
                Sink::try_new(&handle)
                    .map_err(|err| VisualiserError::Audio(format!("cannot create voice: {err}")))
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(voices = voices.len(), "audio output ready");
        Ok(Self {
            _stream: stream,
            voices,
        })
    }
}

impl AudioOutput for RodioVoices {
    fn find_free_channel(&mut self) -> Option<usize> {
        self.voices.iter().position(Sink::empty)
    }

    fn play(&mut self, channel: usize, tone: &Tone) -> Result<()> {
        let voice = self
            .voices
            .get(channel)
            .ok_or_else(|| VisualiserError::Audio(format!("no voice {channel}")))?;
        voice.append(SamplesBuffer::new(2, tone.sample_rate, tone.stereo()));
        Ok(())
    }
}
