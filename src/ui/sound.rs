//! Sound cues: procedural chiptune effects via rodio.
//!
//! Every cue is synthesized into an in-memory WAV buffer once at startup;
//! playback is fire-and-forget through a detached rodio `Sink`.
//!
//! Built without the "sound" feature, `SoundEngine` is a stub that
//! swallows every cue.

use crate::sim::event::GameEvent;

/// Which effect a game event maps to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cue {
    Start,
    Jump,
    Die,
    Clear,
}

impl Cue {
    /// Landing is silent; it would fire on every hop.
    pub fn for_event(event: &GameEvent) -> Option<Cue> {
        match event {
            GameEvent::Started | GameEvent::Retry { .. } => Some(Cue::Start),
            GameEvent::Jumped => Some(Cue::Jump),
            GameEvent::PlayerKilled { .. } => Some(Cue::Die),
            GameEvent::LevelComplete => Some(Cue::Clear),
            GameEvent::Landed => None,
        }
    }
}

#[cfg(feature = "sound")]
mod inner {
    use std::f32::consts::TAU;
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::Cue;

    const SAMPLE_RATE: u32 = 22050;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_start: Arc<Vec<u8>>,
        sfx_jump: Arc<Vec<u8>>,
        sfx_die: Arc<Vec<u8>>,
        sfx_clear: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        /// `None` when no output device can be opened.
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    log::warn!("audio disabled: {e}");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_start: Arc::new(make_wav(&gen_start())),
                sfx_jump: Arc::new(make_wav(&gen_jump())),
                sfx_die: Arc::new(make_wav(&gen_die())),
                sfx_clear: Arc::new(make_wav(&gen_clear())),
            })
        }

        pub fn play(&self, cue: Cue) {
            let buf = match cue {
                Cue::Start => &self.sfx_start,
                Cue::Jump => &self.sfx_jump,
                Cue::Die => &self.sfx_die,
                Cue::Clear => &self.sfx_clear,
            };
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach();
                }
            }
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators (mono f32 samples)
    // ════════════════════════════════════════════════════════════

    fn square(phase: f32) -> f32 {
        if phase.fract() < 0.5 { 1.0 } else { -1.0 }
    }

    /// Two quick rising notes.
    fn gen_start() -> Vec<f32> {
        let mut samples = Vec::new();
        for &freq in &[523.0_f32, 784.0] {
            let n = (SAMPLE_RATE as f32 * 0.06) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.5;
                samples.push((t * freq * TAU).sin() * env * 0.25);
            }
        }
        samples
    }

    /// Jump: square-wave chirp sweeping upward.
    fn gen_jump() -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.09) as usize;
        let mut phase = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 280.0 + t * 520.0;
                phase += freq / SAMPLE_RATE as f32;
                let env = (1.0 - t).powf(0.7);
                square(phase) * env * 0.12
            })
            .collect()
    }

    /// Death: noisy crunch falling in pitch.
    fn gen_die() -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.35) as usize;
        let mut rng: u32 = 0x2545_f491;
        let mut phase = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 320.0 - t * 250.0;
                phase += freq / SAMPLE_RATE as f32;
                rng = rng.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                let env = (1.0 - t).powf(1.5);
                (square(phase) * 0.5 + noise * 0.5) * env * 0.25
            })
            .collect()
    }

    /// Level complete: arpeggio C5 E5 G5 C6 with a held top note.
    fn gen_clear() -> Vec<f32> {
        let mut samples = Vec::new();
        let notes = [(523.0_f32, 0.09), (659.0, 0.09), (784.0, 0.09), (1047.0, 0.3)];
        for &(freq, dur) in &notes {
            let n = (SAMPLE_RATE as f32 * dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.6;
                let wave = (t * freq * TAU).sin() * 0.7 + (t * freq * 2.0 * TAU).sin() * 0.3;
                samples.push(wave * env * 0.3);
            }
        }
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder (16-bit PCM mono)
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let bits_per_sample: u16 = 16;
        let block_align: u16 = bits_per_sample / 8;
        let byte_rate = SAMPLE_RATE * block_align as u32;
        let data_size = samples.len() as u32 * block_align as u32;

        let mut buf = Vec::with_capacity(44 + data_size as usize);
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&1u16.to_le_bytes()); // mono
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }
        buf
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn wav_header_matches_payload() {
            let wav = make_wav(&gen_jump());
            assert_eq!(&wav[0..4], b"RIFF");
            assert_eq!(&wav[8..12], b"WAVE");
            let data_size = u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]);
            assert_eq!(wav.len(), 44 + data_size as usize);
        }

        #[test]
        fn generated_samples_stay_in_range() {
            for samples in [gen_start(), gen_jump(), gen_die(), gen_clear()] {
                assert!(!samples.is_empty());
                assert!(samples.iter().all(|s| s.abs() <= 1.0));
            }
        }
    }
}

// ════════════════════════════════════════════════════════════
//  Public API (no-ops when the sound feature is off)
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play(&self, _cue: Cue) {}
}

/// Play the cue for each event, if any.
pub fn play_events(engine: Option<&SoundEngine>, events: &[GameEvent]) {
    let Some(engine) = engine else { return };
    for cue in events.iter().filter_map(Cue::for_event) {
        engine.play(cue);
    }
}
