use super::*;

const SR: u32 = 48_000;

fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
}

#[test]
fn exp_ramp_hits_endpoints_and_holds() {
    assert_eq!(exp_ramp(1.0, 0.01, 0.0, 0.5), 1.0);
    assert!((exp_ramp(1.0, 0.01, 0.25, 0.5) - 0.1).abs() < 1e-9);
    assert_eq!(exp_ramp(1.0, 0.01, 0.5, 0.5), 0.01);
    assert_eq!(exp_ramp(1.0, 0.01, 3.0, 0.5), 0.01);
}

#[test]
fn voice_lengths_follow_durations() {
    let kick = Voice {
        kind: VoiceKind::Kick,
        at_secs: 0.0,
    };
    let snare = Voice {
        kind: VoiceKind::Snare { seed: 1 },
        at_secs: 0.0,
    };
    let bass = Voice {
        kind: VoiceKind::Bass { freq_hz: 55.0 },
        at_secs: 0.0,
    };
    assert_eq!(kick.synthesize(SR).len(), 24_000);
    assert_eq!(snare.synthesize(SR).len(), 9_600);
    assert_eq!(bass.synthesize(SR).len(), 14_400);
}

#[test]
fn kick_decays() {
    let s = Voice {
        kind: VoiceKind::Kick,
        at_secs: 0.0,
    }
    .synthesize(SR);
    let head = peak(&s[..2_400]);
    let tail = peak(&s[s.len() - 2_400..]);
    assert!(head > 0.5);
    assert!(tail < 0.05);
}

#[test]
fn snare_is_silent_after_noise_and_deterministic() {
    let v = Voice {
        kind: VoiceKind::Snare { seed: 5 },
        at_secs: 0.0,
    };
    let a = v.synthesize(SR);
    assert_eq!(a, v.synthesize(SR));
    assert!(peak(&a[..4_800]) > 0.05);
    // Input stops at 0.1 s; the filter tail dies out well before the voice ends.
    assert!(peak(&a[a.len() - 100..]) < 1e-3);
}

#[test]
fn snare_highpass_removes_dc() {
    let mut hp = Biquad::highpass(1000.0, f64::from(SR));
    let mut last = 0.0;
    for _ in 0..48_000 {
        last = hp.process(1.0);
    }
    assert!(last.abs() < 1e-6);
}

#[test]
fn bass_is_square_with_decaying_amplitude() {
    let s = Voice {
        kind: VoiceKind::Bass { freq_hz: 100.0 },
        at_secs: 0.0,
    }
    .synthesize(SR);
    assert!((s[0] - 0.1).abs() < 1e-6);
    // Second half of the first period is negative.
    assert!(s[300] < 0.0);
    assert!(peak(&s[s.len() - 480..]) < 0.012);
}
