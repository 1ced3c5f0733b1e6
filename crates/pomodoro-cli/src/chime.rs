//! Chime backends.
//!
//! The terminal bell is always available. With the `audio` feature the
//! chime is synthesised and played on the default output device instead.

use std::io::Write;

use pomodoro_core::timer::ChimeSink;
use pomodoro_core::ChimeError;

/// Rings the terminal bell on stderr.
#[cfg_attr(feature = "audio", allow(dead_code))]
#[derive(Debug, Default)]
pub struct BellChime;

impl ChimeSink for BellChime {
    fn play(&mut self) -> Result<(), ChimeError> {
        let mut err = std::io::stderr();
        err.write_all(b"\x07")
            .and_then(|_| err.flush())
            .map_err(|e| ChimeError(e.to_string()))
    }
}

#[cfg(feature = "audio")]
pub use tone::ToneChime;

#[cfg(feature = "audio")]
mod tone {
    use std::time::Duration;

    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use pomodoro_core::timer::{ChimeSink, ChimeTone};
    use pomodoro_core::ChimeError;

    /// Plays [`ChimeTone`] through cpal on a detached thread.
    #[derive(Debug, Default)]
    pub struct ToneChime {
        tone: ChimeTone,
    }

    impl ChimeSink for ToneChime {
        fn play(&mut self) -> Result<(), ChimeError> {
            let tone = self.tone;
            std::thread::Builder::new()
                .name("chime".into())
                .spawn(move || {
                    if let Err(e) = play_blocking(tone) {
                        tracing::debug!(error = %e, "chime playback failed");
                    }
                })
                .map(|_| ())
                .map_err(|e| ChimeError(e.to_string()))
        }
    }

    fn play_blocking(tone: ChimeTone) -> Result<(), Box<dyn std::error::Error>> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or("no output device found")?;

        let supported = device.default_output_config()?;
        let sample_format = supported.sample_format();
        if sample_format != cpal::SampleFormat::F32 {
            return Err(format!("unsupported sample format '{sample_format}'").into());
        }

        let config: cpal::StreamConfig = supported.into();
        let channels = config.channels as usize;
        let samples = tone.render(config.sample_rate.0);
        let mut cursor = 0usize;

        let stream = device.build_output_stream(
            &config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                for frame in data.chunks_mut(channels) {
                    let sample = samples.get(cursor).copied().unwrap_or(0.0);
                    cursor += 1;
                    for out in frame.iter_mut() {
                        *out = sample;
                    }
                }
            },
            |err| tracing::debug!(error = %err, "chime stream error"),
            None,
        )?;

        stream.play()?;
        std::thread::sleep(Duration::from_secs_f32(tone.length_secs + 0.05));
        Ok(())
    }
}

/// The chime used by interactive sessions.
pub fn default_chime() -> Box<dyn ChimeSink> {
    #[cfg(feature = "audio")]
    {
        Box::new(ToneChime::default())
    }
    #[cfg(not(feature = "audio"))]
    {
        Box::new(BellChime)
    }
}
