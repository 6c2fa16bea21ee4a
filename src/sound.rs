//! Synthesized feedback cues.
//!
//! Each cue is a short sine tone that steps through a few frequencies while
//! its gain falls exponentially from 0.3 to 0.01. Cues render to PCM so they
//! can be exported as WAV files; in the terminal they are announced through a
//! [`SoundSink`].

use std::f64::consts::TAU;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub const SAMPLE_RATE: u32 = 44_100;

const START_GAIN: f64 = 0.3;
const END_GAIN: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SoundCue {
    Welcome,
    Select,
    Start,
    Correct,
    Incorrect,
    Finish,
}

/// Frequency change at an offset from the start of the cue
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneStep {
    pub at_secs: f64,
    pub hz: f64,
}

const fn step(at_secs: f64, hz: f64) -> ToneStep {
    ToneStep { at_secs, hz }
}

const RISING_TRIAD: &[ToneStep] = &[step(0.0, 523.25), step(0.1, 659.25), step(0.2, 783.99)];
const SELECT: &[ToneStep] = &[step(0.0, 440.0)];
const START: &[ToneStep] = &[step(0.0, 523.25), step(0.1, 659.25)];
const INCORRECT: &[ToneStep] = &[step(0.0, 300.0), step(0.1, 250.0)];
const FINISH: &[ToneStep] = &[
    step(0.0, 523.25),
    step(0.2, 659.25),
    step(0.4, 783.99),
    step(0.6, 1046.5),
];

impl SoundCue {
    pub const ALL: [SoundCue; 6] = [
        SoundCue::Welcome,
        SoundCue::Select,
        SoundCue::Start,
        SoundCue::Correct,
        SoundCue::Incorrect,
        SoundCue::Finish,
    ];

    pub fn steps(self) -> &'static [ToneStep] {
        match self {
            SoundCue::Welcome | SoundCue::Correct => RISING_TRIAD,
            SoundCue::Select => SELECT,
            SoundCue::Start => START,
            SoundCue::Incorrect => INCORRECT,
            SoundCue::Finish => FINISH,
        }
    }

    pub fn duration_secs(self) -> f64 {
        match self {
            SoundCue::Select | SoundCue::Start => 0.3,
            SoundCue::Welcome | SoundCue::Correct | SoundCue::Incorrect => 0.5,
            SoundCue::Finish => 1.0,
        }
    }

    pub fn frequency_at(self, t: f64) -> f64 {
        self.steps()
            .iter()
            .take_while(|s| s.at_secs <= t)
            .last()
            .map_or(0.0, |s| s.hz)
    }

    /// Exponential ramp from START_GAIN to END_GAIN over the cue
    pub fn gain_at(self, t: f64) -> f64 {
        let progress = (t / self.duration_secs()).clamp(0.0, 1.0);
        START_GAIN * (END_GAIN / START_GAIN).powf(progress)
    }

    pub fn render(self, sample_rate: u32) -> Vec<f32> {
        let rate = f64::from(sample_rate);
        let count = (self.duration_secs() * rate).round() as usize;
        let mut phase = 0.0_f64;
        (0..count)
            .map(|i| {
                let t = i as f64 / rate;
                let sample = phase.sin() * self.gain_at(t);
                phase = (phase + TAU * self.frequency_at(t) / rate) % TAU;
                sample as f32
            })
            .collect()
    }
}

// =============================================================================
// WAV EXPORT
// =============================================================================

/// 16-bit mono PCM
pub fn write_wav<W: Write>(out: &mut W, samples: &[f32], sample_rate: u32) -> io::Result<()> {
    let data_len = (samples.len() * 2) as u32;
    out.write_all(b"RIFF")?;
    out.write_all(&(36 + data_len).to_le_bytes())?;
    out.write_all(b"WAVE")?;
    out.write_all(b"fmt ")?;
    out.write_all(&16u32.to_le_bytes())?;
    out.write_all(&1u16.to_le_bytes())?; // PCM
    out.write_all(&1u16.to_le_bytes())?; // mono
    out.write_all(&sample_rate.to_le_bytes())?;
    out.write_all(&(sample_rate * 2).to_le_bytes())?;
    out.write_all(&2u16.to_le_bytes())?;
    out.write_all(&16u16.to_le_bytes())?;
    out.write_all(b"data")?;
    out.write_all(&data_len.to_le_bytes())?;
    for sample in samples {
        let pcm = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
        out.write_all(&pcm.to_le_bytes())?;
    }
    Ok(())
}

/// Render every cue into `dir/{cue}.wav`
pub fn export_all(dir: &Path) -> io::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    SoundCue::ALL
        .iter()
        .map(|&cue| {
            let path = dir.join(format!("{cue}.wav"));
            let mut out = BufWriter::new(File::create(&path)?);
            write_wav(&mut out, &cue.render(SAMPLE_RATE), SAMPLE_RATE)?;
            out.flush()?;
            Ok(path)
        })
        .collect()
}

// =============================================================================
// PLAYBACK
// =============================================================================

pub trait SoundSink: Send {
    fn play(&mut self, cue: SoundCue);
}

/// Rings the terminal bell for each cue
pub struct TerminalBell<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write + Send> SoundSink for TerminalBell<W> {
    fn play(&mut self, cue: SoundCue) {
        if let Err(e) = self.out.write_all(b"\x07").and_then(|_| self.out.flush()) {
            tracing::debug!(%cue, error = %e, "bell failed");
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Muted;

impl SoundSink for Muted {
    fn play(&mut self, _cue: SoundCue) {}
}

/// Keeps every played cue; clones share the same log
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    played: Arc<Mutex<Vec<SoundCue>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<SoundCue> {
        self.played.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl SoundSink for RecordingSink {
    fn play(&mut self, cue: SoundCue) {
        if let Ok(mut played) = self.played.lock() {
            played.push(cue);
        }
    }
}
