use crate::audio::voice::{Voice, VoiceKind};

pub const TEMPO_BPM: f64 = 124.0;

/// Bassline cycle, indexed by `beat % 4`.
pub const BASS_NOTES_HZ: [f64; 4] = [55.0, 65.0, 49.0, 58.0];

/// The answering bass note plays this much higher, half a beat later.
pub const BASS_OFFBEAT_RATIO: f64 = 1.5;

pub fn beat_interval_secs() -> f64 {
    60.0 / TEMPO_BPM
}

/// The fixed four-on-the-floor pattern: kick every beat, snare on odd beats, two bass notes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BeatPattern;

impl BeatPattern {
    pub fn bass_note(beat: u64) -> f64 {
        BASS_NOTES_HZ[(beat % 4) as usize]
    }

    pub fn has_snare(beat: u64) -> bool {
        beat % 2 == 1
    }

    pub fn voices_for_beat(&self, beat: u64, at_secs: f64) -> Vec<Voice> {
        let mut voices = Vec::with_capacity(4);
        voices.push(Voice {
            kind: VoiceKind::Kick,
            at_secs,
        });
        if Self::has_snare(beat) {
            voices.push(Voice {
                kind: VoiceKind::Snare { seed: beat },
                at_secs,
            });
        }
        let note = Self::bass_note(beat);
        voices.push(Voice {
            kind: VoiceKind::Bass { freq_hz: note },
            at_secs,
        });
        voices.push(Voice {
            kind: VoiceKind::Bass {
                freq_hz: note * BASS_OFFBEAT_RATIO,
            },
            at_secs: at_secs + beat_interval_secs() / 2.0,
        });
        voices
    }
}

/// Deterministic state of the self-rescheduling beat loop, independent of any real clock.
///
/// `start(now)` makes beat 0 due immediately; every emitted beat schedules the next one a beat
/// interval later. Times are measured from the transport's start so the loop does not drift.
#[derive(Clone, Debug, Default)]
pub struct BeatTransport {
    pattern: BeatPattern,
    playing: bool,
    started_at: f64,
    beat: u64,
}

impl BeatTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Beats emitted since the last start.
    pub fn beat(&self) -> u64 {
        self.beat
    }

    /// Returns `false` when already playing (nothing changes).
    pub fn start(&mut self, now_secs: f64) -> bool {
        if self.playing {
            return false;
        }
        self.playing = true;
        self.started_at = now_secs;
        self.beat = 0;
        true
    }

    /// Returns `false` when already stopped.
    pub fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.playing, false)
    }

    /// Time of the next scheduled beat, if playing.
    pub fn next_due(&self) -> Option<f64> {
        self.playing
            .then(|| self.started_at + (self.beat as f64) * beat_interval_secs())
    }

    /// Emit the voices of every beat due at or before `now_secs`.
    pub fn poll(&mut self, now_secs: f64) -> Vec<Voice> {
        let mut out = Vec::new();
        while let Some(due) = self.next_due() {
            if due > now_secs {
                break;
            }
            tracing::debug!(beat = self.beat, at = due, "beat");
            out.extend(self.pattern.voices_for_beat(self.beat, due));
            self.beat += 1;
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/pattern.rs"]
mod tests;
