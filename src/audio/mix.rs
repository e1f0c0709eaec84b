use std::path::Path;

use crate::{
    audio::voice::Voice,
    foundation::error::{DiscoError, DiscoResult},
};

/// Output sample rate of the beat soundtrack.
pub const MIX_SAMPLE_RATE: u32 = 48_000;
/// Output channel count (interleaved stereo).
pub const MIX_CHANNELS: u16 = 2;

/// Destination for fired voices. Once scheduled, a voice is never revisited.
pub trait VoiceSink {
    fn schedule(&mut self, voice: &Voice);
}

/// Records voices without synthesizing them.
impl VoiceSink for Vec<Voice> {
    fn schedule(&mut self, voice: &Voice) {
        self.push(*voice);
    }
}

/// Synthesizes voices into an interleaved stereo `f32` buffer that grows as voices land.
#[derive(Clone, Debug)]
pub struct VoiceMix {
    sample_rate: u32,
    samples: Vec<f32>,
    voices: usize,
}

impl Default for VoiceMix {
    fn default() -> Self {
        Self::new(MIX_SAMPLE_RATE)
    }
}

impl VoiceMix {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            samples: Vec::new(),
            voices: 0,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        MIX_CHANNELS
    }

    /// Number of voices mixed so far.
    pub fn voice_count(&self) -> usize {
        self.voices
    }

    /// Length of the buffer in frames (one frame = one sample per channel).
    pub fn len_frames(&self) -> usize {
        self.samples.len() / usize::from(MIX_CHANNELS)
    }

    pub fn add(&mut self, voice: &Voice) {
        let mono = voice.synthesize(self.sample_rate);
        let start = (voice.at_secs.max(0.0) * f64::from(self.sample_rate)).round() as usize;
        let ch = usize::from(MIX_CHANNELS);
        let end = (start + mono.len()) * ch;
        if self.samples.len() < end {
            self.samples.resize(end, 0.0);
        }
        for (i, s) in mono.iter().enumerate() {
            let idx = (start + i) * ch;
            for c in 0..ch {
                self.samples[idx + c] += *s;
            }
        }
        self.voices += 1;
    }

    /// Unclamped interleaved samples.
    pub fn raw(&self) -> &[f32] {
        &self.samples
    }

    /// Interleaved samples clamped to [-1, 1], padded or cut to exactly `frames` frames.
    pub fn render_frames(&self, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0f32; frames * usize::from(MIX_CHANNELS)];
        let n = out.len().min(self.samples.len());
        out[..n].copy_from_slice(&self.samples[..n]);
        for s in &mut out {
            *s = s.clamp(-1.0, 1.0);
        }
        out
    }

    /// Whole buffer clamped to [-1, 1].
    pub fn finish(self) -> Vec<f32> {
        let frames = self.len_frames();
        self.render_frames(frames)
    }
}

impl VoiceSink for VoiceMix {
    fn schedule(&mut self, voice: &Voice) {
        self.add(voice);
    }
}

/// Write interleaved `f32` PCM samples to a raw little-endian `.f32le` file.
pub fn write_mix_to_f32le_file(samples_interleaved: &[f32], out_path: &Path) -> DiscoResult<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            DiscoError::audio(format!(
                "failed to create audio mix output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let mut bytes = Vec::<u8>::with_capacity(samples_interleaved.len() * 4);
    for &sample in samples_interleaved {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        DiscoError::audio(format!(
            "failed to write mixed audio file '{}': {e}",
            out_path.display()
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/audio/mix.rs"]
mod tests;
