/// Sound engine: procedural chiptune effects via rodio.
///
/// All sounds are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Build without the "sound" feature to disable audio entirely; the stub
/// SoundEngine does nothing.

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::wav;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_jump: Arc<Vec<u8>>,
        sfx_land: Arc<Vec<u8>>,
        sfx_game_over: Arc<Vec<u8>>,
        sfx_restart: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        /// `None` when no output device can be opened.
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    log::warn!("audio output unavailable: {e}");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_jump: Arc::new(wav::encode(&wav::gen_jump())),
                sfx_land: Arc::new(wav::encode(&wav::gen_land())),
                sfx_game_over: Arc::new(wav::encode(&wav::gen_game_over())),
                sfx_restart: Arc::new(wav::encode(&wav::gen_restart())),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            let sink = match Sink::try_new(&self.handle) {
                Ok(s) => s,
                Err(e) => {
                    log::debug!("sound sink failed: {e}");
                    return;
                }
            };
            let cursor = Cursor::new(buf.as_ref().clone());
            if let Ok(src) = rodio::Decoder::new(cursor) {
                sink.append(src);
                sink.detach();
            }
        }

        pub fn play_jump(&self) { self.play(&self.sfx_jump); }
        pub fn play_land(&self) { self.play(&self.sfx_land); }
        pub fn play_game_over(&self) { self.play(&self.sfx_game_over); }
        pub fn play_restart(&self) { self.play(&self.sfx_restart); }
    }
}

/// Waveform generators and the WAV encoder. Pure, so they build and test
/// with or without an audio backend.
#[cfg_attr(not(feature = "sound"), allow(dead_code))]
mod wav {
    use std::f32::consts::TAU;

    pub const SAMPLE_RATE: u32 = 22050;

    fn samples_for(seconds: f32) -> usize {
        (SAMPLE_RATE as f32 * seconds) as usize
    }

    /// Jump: quick upward sweep.
    pub fn gen_jump() -> Vec<f32> {
        let n = samples_for(0.12);
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 300.0 + t * 500.0;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - t;
                (ti * freq * TAU).sin() * env * 0.25
            })
            .collect()
    }

    /// Land: short low thump with a little noise.
    pub fn gen_land() -> Vec<f32> {
        let n = samples_for(0.06);
        let mut rng: u32 = 12345;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let tone = (ti * 110.0 * TAU).sin();
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                (tone * 0.7 + noise * 0.3) * (1.0 - t).powf(1.5) * 0.3
            })
            .collect()
    }

    /// Game over: descending minor line A4 F#4 Eb4 C4, faded out.
    pub fn gen_game_over() -> Vec<f32> {
        let mut samples = notes(&[440.0, 370.0, 311.0, 261.0], 0.12, 0.3);
        let fade_len = samples.len() / 4;
        let total = samples.len();
        for (i, s) in samples.iter_mut().enumerate().skip(total - fade_len) {
            *s *= (total - i) as f32 / fade_len as f32;
        }
        samples
    }

    /// Restart: rising C5 E5 G5.
    pub fn gen_restart() -> Vec<f32> {
        notes(&[523.0, 659.0, 784.0], 0.07, 0.25)
    }

    fn notes(freqs: &[f32], note_dur: f32, volume: f32) -> Vec<f32> {
        let n = samples_for(note_dur);
        let mut samples = Vec::with_capacity(n * freqs.len());
        for &freq in freqs {
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.3;
                let wave = (t * freq * TAU).sin() * 0.7 + (t * freq * 2.0 * TAU).sin() * 0.3;
                samples.push(wave * env * volume);
            }
        }
        samples
    }

    /// Wrap mono f32 samples into a 16-bit PCM WAV buffer.
    pub fn encode(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&num_channels.to_le_bytes());
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
        fn wav_header_sizes_match_payload() {
            let samples = gen_jump();
            let buf = encode(&samples);
            assert_eq!(&buf[0..4], b"RIFF");
            assert_eq!(&buf[8..12], b"WAVE");
            assert_eq!(buf.len(), 44 + samples.len() * 2);
            let data_size = u32::from_le_bytes([buf[40], buf[41], buf[42], buf[43]]);
            assert_eq!(data_size as usize, samples.len() * 2);
        }

        #[test]
        fn effects_stay_in_range() {
            for fx in [gen_jump(), gen_land(), gen_game_over(), gen_restart()] {
                assert!(!fx.is_empty());
                assert!(fx.iter().all(|s| s.abs() <= 1.0));
            }
        }

        #[test]
        fn game_over_fades_to_silence() {
            let fx = gen_game_over();
            let tail = &fx[fx.len() - 10..];
            assert!(tail.iter().all(|s| s.abs() < 0.01));
        }
    }
}

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_jump(&self) {}
    pub fn play_land(&self) {}
    pub fn play_game_over(&self) {}
    pub fn play_restart(&self) {}
}
