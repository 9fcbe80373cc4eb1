//! Sound cues. Samples are synthesized here; playback goes through rodio when
//! the crate is built with the `sound` feature and is silent otherwise.

use tracing::{debug, warn};

pub const SAMPLE_RATE: u32 = 44_100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Flap,
    Death,
}

/// A linear pitch sweep through a sawtooth with a linear fade out.
#[derive(Debug, Clone, Copy)]
struct Sweep {
    from_hz: f32,
    to_hz: f32,
    sweep_secs: f32,
    gain: f32,
    fade_secs: f32,
    length_secs: f32,
}

impl Cue {
    fn sweep(self) -> Sweep {
        match self {
            Cue::Flap => Sweep {
                from_hz: 500.0,
                to_hz: 900.0,
                sweep_secs: 0.08,
                gain: 0.08,
                fade_secs: 0.1,
                length_secs: 0.1,
            },
            // Falling 400 Hz -> 80 Hz growl.
            Cue::Death => Sweep {
                from_hz: 400.0,
                to_hz: 80.0,
                sweep_secs: 0.4,
                gain: 0.15,
                fade_secs: 0.5,
                length_secs: 0.5,
            },
        }
    }
}

/// Mono samples for `cue` at [`SAMPLE_RATE`].
pub fn synthesize(cue: Cue) -> Vec<f32> {
    let s = cue.sweep();
    let rate = SAMPLE_RATE as f32;
    let len = (s.length_secs * rate) as usize;
    let mut phase = 0.0f32;

    (0..len)
        .map(|i| {
            let t = i as f32 / rate;
            let freq = s.from_hz + (s.to_hz - s.from_hz) * (t / s.sweep_secs).min(1.0);
            let gain = s.gain * (1.0 - (t / s.fade_secs).min(1.0));
            phase = (phase + freq / rate).fract();
            (2.0 * phase - 1.0) * gain
        })
        .collect()
}

pub struct Sound {
    output: Option<output::Output>,
}

impl Sound {
    pub fn new(enabled: bool) -> Self {
        if !enabled {
            debug!("sound muted");
            return Self::muted();
        }
        let output = output::Output::open();
        if output.is_none() {
            warn!("no audio output, playing silently");
        }
        Self { output }
    }

    pub fn muted() -> Self {
        Self { output: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.output.is_some()
    }

    pub fn play(&self, cue: Cue) {
        if let Some(output) = &self.output {
            output.play(cue);
        }
    }
}

#[cfg(feature = "sound")]
mod output {
    use rodio::buffer::SamplesBuffer;
    use rodio::{OutputStream, OutputStreamHandle, Sink};
    use tracing::{debug, warn};

    use super::{Cue, SAMPLE_RATE, synthesize};

    pub struct Output {
        // Dropping the stream stops all playback.
        _stream: OutputStream,
        handle: OutputStreamHandle,
        flap: Vec<f32>,
        death: Vec<f32>,
    }

    impl Output {
        pub fn open() -> Option<Self> {
            match OutputStream::try_default() {
                Ok((stream, handle)) => Some(Self {
                    _stream: stream,
                    handle,
                    flap: synthesize(Cue::Flap),
                    death: synthesize(Cue::Death),
                }),
                Err(e) => {
                    debug!(error = %e, "could not open audio output");
                    None
                }
            }
        }

        pub fn play(&self, cue: Cue) {
            let samples = match cue {
                Cue::Flap => self.flap.clone(),
                Cue::Death => self.death.clone(),
            };
            match Sink::try_new(&self.handle) {
                Ok(sink) => {
                    sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples));
                    sink.detach();
                }
                Err(e) => warn!(error = %e, ?cue, "could not play cue"),
            }
        }
    }
}

#[cfg(not(feature = "sound"))]
mod output {
    use super::Cue;

    pub struct Output;

    impl Output {
        pub fn open() -> Option<Self> {
            None
        }

        pub fn play(&self, _cue: Cue) {}
    }
}
