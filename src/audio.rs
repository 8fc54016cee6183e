//! Sound cues for game events.
//!
//! The cue tables are plain data so any backend can play them. Two backends
//! ship: the terminal bell, always available, and a small synthesizer built
//! on rodio behind the `sound` feature.

use crate::core::events::GameEvent;
use crate::core::game_loop::AudioSink;
use std::io::Write;

/// Oscillator shape of a tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Sawtooth,
}

/// One note of a cue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    pub seconds: f32,
    /// Start time relative to the cue.
    pub offset: f32,
    pub wave: Wave,
}

const fn tone(frequency: f32, seconds: f32, offset: f32, wave: Wave) -> Tone {
    Tone {
        frequency,
        seconds,
        offset,
        wave,
    }
}

const JUMP_CUE: [Tone; 1] = [tone(800.0, 0.1, 0.0, Wave::Sine)];
const SCORE_CUE: [Tone; 1] = [tone(1200.0, 0.2, 0.0, Wave::Sine)];
const HIT_CUE: [Tone; 1] = [tone(150.0, 0.3, 0.0, Wave::Sawtooth)];
const WIN_CUE: [Tone; 3] = [
    tone(523.0, 0.2, 0.0, Wave::Sine),
    tone(659.0, 0.2, 0.1, Wave::Sine),
    tone(784.0, 0.3, 0.2, Wave::Sine),
];
const GAME_OVER_CUE: [Tone; 3] = [
    tone(400.0, 0.2, 0.0, Wave::Sawtooth),
    tone(300.0, 0.2, 0.15, Wave::Sawtooth),
    tone(200.0, 0.4, 0.3, Wave::Sawtooth),
];

/// Tones to play for an event. Empty for events without a cue.
pub fn cue(event: GameEvent) -> &'static [Tone] {
    match event {
        GameEvent::Jump => &JUMP_CUE,
        GameEvent::Score => &SCORE_CUE,
        GameEvent::Hit => &HIT_CUE,
        GameEvent::Win => &WIN_CUE,
        GameEvent::GameOver => &GAME_OVER_CUE,
        GameEvent::Started => &[],
    }
}

/// Background melody as (frequency, seconds) pairs.
pub const MELODY: [(f32, f32); 8] = [
    (523.0, 0.8),
    (587.0, 0.4),
    (659.0, 0.8),
    (784.0, 0.4),
    (880.0, 1.2),
    (784.0, 0.4),
    (659.0, 0.8),
    (523.0, 1.2),
];

/// Silence after each melody note.
pub const MELODY_NOTE_GAP: f32 = 0.1;

/// The melody laid out as tones with absolute offsets.
pub fn melody_tones() -> Vec<Tone> {
    let mut offset = 0.0;
    MELODY
        .iter()
        .map(|&(frequency, seconds)| {
            let note = tone(frequency, seconds, offset, Wave::Sine);
            offset += seconds + MELODY_NOTE_GAP;
            note
        })
        .collect()
}

/// Length of one melody pass, trailing gap included.
pub fn melody_seconds() -> f64 {
    MELODY
        .iter()
        .map(|&(_, seconds)| f64::from(seconds + MELODY_NOTE_GAP))
        .sum()
}

/// Plays nothing.
#[derive(Debug, Default)]
pub struct Silent;

impl AudioSink for Silent {
    fn notify(&mut self, _event: GameEvent) {}
}

/// Rings the terminal bell for hits and for the end of a session.
#[derive(Debug)]
pub struct Bell<W: Write> {
    out: W,
}

impl<W: Write> Bell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> AudioSink for Bell<W> {
    fn notify(&mut self, event: GameEvent) {
        let rings = match event {
            GameEvent::Hit => 1,
            GameEvent::Win | GameEvent::GameOver => 2,
            GameEvent::Started | GameEvent::Jump | GameEvent::Score => 0,
        };
        for _ in 0..rings {
            if let Err(e) = self.out.write_all(b"\x07") {
                log::debug!("bell failed: {}", e);
                return;
            }
        }
        if rings > 0 {
            let _ = self.out.flush();
        }
    }
}

#[cfg(feature = "sound")]
pub use synth::{AudioError, Synth};

#[cfg(feature = "sound")]
mod synth {
    use super::{cue, melody_tones, Tone, Wave};
    use crate::core::events::GameEvent;
    use crate::core::game_loop::AudioSink;
    use rodio::source::{SawtoothWave, SineWave, Source};
    use rodio::{OutputStream, OutputStreamHandle, Sink};
    use std::time::Duration;
    use thiserror::Error;

    const CUE_VOLUME: f32 = 0.3;
    const MUSIC_VOLUME: f32 = 0.1;

    #[derive(Debug, Error)]
    pub enum AudioError {
        #[error("no audio output: {0}")]
        Stream(#[from] rodio::StreamError),
        #[error("cannot play: {0}")]
        Play(#[from] rodio::PlayError),
    }

    /// Synthesizes cues on the default output device.
    pub struct Synth {
        // Dropping the stream silences every sink
        _stream: OutputStream,
        handle: OutputStreamHandle,
    }

    impl Synth {
        pub fn try_default() -> Result<Self, AudioError> {
            let (stream, handle) = OutputStream::try_default()?;
            Ok(Self {
                _stream: stream,
                handle,
            })
        }

        fn play(&self, tones: &[Tone], volume: f32) -> Result<(), AudioError> {
            for tone in tones {
                let sink = Sink::try_new(&self.handle)?;
                let length = Duration::from_secs_f32(tone.seconds);
                let delay = Duration::from_secs_f32(tone.offset);
                match tone.wave {
                    Wave::Sine => sink.append(
                        SineWave::new(tone.frequency)
                            .take_duration(length)
                            .amplify(volume)
                            .delay(delay),
                    ),
                    Wave::Sawtooth => sink.append(
                        SawtoothWave::new(tone.frequency)
                            .take_duration(length)
                            .amplify(volume)
                            .delay(delay),
                    ),
                }
                sink.detach();
            }
            Ok(())
        }
    }

    impl AudioSink for Synth {
        fn notify(&mut self, event: GameEvent) {
            if let Err(e) = self.play(cue(event), CUE_VOLUME) {
                log::debug!("{} cue failed: {}", event.name(), e);
            }
        }

        fn play_melody(&mut self) {
            if let Err(e) = self.play(&melody_tones(), MUSIC_VOLUME) {
                log::debug!("melody failed: {}", e);
            }
        }
    }
}
