use std::f64::consts::TAU;

use crate::foundation::rng::Rng64;

pub const KICK_DURATION_SECS: f64 = 0.5;
pub const KICK_START_HZ: f64 = 150.0;
pub const KICK_END_HZ: f64 = 0.01;

pub const SNARE_DURATION_SECS: f64 = 0.2;
pub const SNARE_NOISE_SECS: f64 = 0.1;
pub const SNARE_DECAY_SECS: f64 = 0.1;
pub const SNARE_GAIN: f64 = 0.5;
pub const SNARE_HIGHPASS_HZ: f64 = 1000.0;

pub const BASS_DURATION_SECS: f64 = 0.3;
pub const BASS_GAIN: f64 = 0.1;

/// Level every envelope decays towards.
pub const ENVELOPE_FLOOR: f64 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VoiceKind {
    /// Downward pitch sweep with matching amplitude decay.
    Kick,
    /// High-passed white noise burst; `seed` picks the noise.
    Snare { seed: u64 },
    /// Square wave.
    Bass { freq_hz: f64 },
}

/// One fire-and-forget sound event.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Voice {
    pub kind: VoiceKind,
    /// Start time in seconds on the scheduler's clock.
    pub at_secs: f64,
}

impl Voice {
    pub fn duration_secs(&self) -> f64 {
        match self.kind {
            VoiceKind::Kick => KICK_DURATION_SECS,
            VoiceKind::Snare { .. } => SNARE_DURATION_SECS,
            VoiceKind::Bass { .. } => BASS_DURATION_SECS,
        }
    }

    /// Render the voice as mono samples starting at its own time zero.
    pub fn synthesize(&self, sample_rate: u32) -> Vec<f32> {
        let sr = f64::from(sample_rate);
        let len = (self.duration_secs() * sr).round() as usize;
        match self.kind {
            VoiceKind::Kick => kick(len, sr),
            VoiceKind::Snare { seed } => snare(len, sr, seed),
            VoiceKind::Bass { freq_hz } => bass(len, sr, freq_hz),
        }
    }
}

/// Exponential ramp from `from` to `to` over `dur` seconds, held at `to` afterwards.
pub fn exp_ramp(from: f64, to: f64, t: f64, dur: f64) -> f64 {
    if t <= 0.0 {
        return from;
    }
    if t >= dur {
        return to;
    }
    from * (to / from).powf(t / dur)
}

fn kick(len: usize, sr: f64) -> Vec<f32> {
    let mut phase = 0.0f64;
    (0..len)
        .map(|i| {
            let t = i as f64 / sr;
            let freq = exp_ramp(KICK_START_HZ, KICK_END_HZ, t, KICK_DURATION_SECS);
            let gain = exp_ramp(1.0, ENVELOPE_FLOOR, t, KICK_DURATION_SECS);
            let s = phase.sin() * gain;
            phase = (phase + TAU * freq / sr) % TAU;
            s as f32
        })
        .collect()
}

fn snare(len: usize, sr: f64, seed: u64) -> Vec<f32> {
    let noise_len = (SNARE_NOISE_SECS * sr).round() as usize;
    let mut rng = Rng64::new(seed);
    let mut hp = Biquad::highpass(SNARE_HIGHPASS_HZ, sr);
    (0..len)
        .map(|i| {
            let t = i as f64 / sr;
            let x = if i < noise_len {
                rng.next_f64_01() * 2.0 - 1.0
            } else {
                0.0
            };
            let gain = exp_ramp(SNARE_GAIN, ENVELOPE_FLOOR, t, SNARE_DECAY_SECS);
            (hp.process(x) * gain) as f32
        })
        .collect()
}

fn bass(len: usize, sr: f64, freq_hz: f64) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let t = i as f64 / sr;
            let square = if (freq_hz * t).fract() < 0.5 { 1.0 } else { -1.0 };
            let gain = exp_ramp(BASS_GAIN, ENVELOPE_FLOOR, t, BASS_DURATION_SECS);
            (square * gain) as f32
        })
        .collect()
}

/// Direct form I biquad (RBJ cookbook coefficients).
#[derive(Clone, Copy, Debug)]
struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl Biquad {
    fn highpass(cutoff_hz: f64, sr: f64) -> Self {
        let q = std::f64::consts::FRAC_1_SQRT_2;
        let w0 = TAU * cutoff_hz / sr;
        let cos = w0.cos();
        let alpha = w0.sin() / (2.0 * q);
        let a0 = 1.0 + alpha;
        Self {
            b0: (1.0 + cos) / 2.0 / a0,
            b1: -(1.0 + cos) / a0,
            b2: (1.0 + cos) / 2.0 / a0,
            a1: -2.0 * cos / a0,
            a2: (1.0 - alpha) / a0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    fn process(&mut self, x: f64) -> f64 {
        let y = self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/voice.rs"]
mod tests;
