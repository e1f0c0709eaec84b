use super::*;

fn snares(voices: &[Voice]) -> usize {
    voices
        .iter()
        .filter(|v| matches!(v.kind, VoiceKind::Snare { .. }))
        .count()
}

fn bass_freqs(voices: &[Voice]) -> Vec<f64> {
    voices
        .iter()
        .filter_map(|v| match v.kind {
            VoiceKind::Bass { freq_hz } => Some(freq_hz),
            _ => None,
        })
        .collect()
}

#[test]
fn interval_matches_tempo() {
    assert!((beat_interval_secs() - 60.0 / 124.0).abs() < 1e-12);
}

#[test]
fn snare_fires_only_on_beats_one_and_three() {
    let p = BeatPattern;
    let fired: Vec<u64> = (0..4)
        .filter(|&b| snares(&p.voices_for_beat(b, 0.0)) == 1)
        .collect();
    assert_eq!(fired, vec![1, 3]);
    for b in 0..4 {
        assert!(snares(&p.voices_for_beat(b, 0.0)) <= 1);
    }
}

#[test]
fn every_beat_has_one_kick_and_two_bass_notes() {
    let p = BeatPattern;
    for b in 0..8 {
        let v = p.voices_for_beat(b, 1.0);
        assert_eq!(v.iter().filter(|v| v.kind == VoiceKind::Kick).count(), 1);
        let freqs = bass_freqs(&v);
        assert_eq!(freqs.len(), 2);
        assert!((freqs[1] - freqs[0] * 1.5).abs() < 1e-9);
        let offbeat = v
            .iter()
            .rev()
            .find(|v| matches!(v.kind, VoiceKind::Bass { .. }))
            .unwrap();
        assert!((offbeat.at_secs - (1.0 + beat_interval_secs() / 2.0)).abs() < 1e-12);
    }
}

#[test]
fn bass_cycles_through_four_notes() {
    let notes: Vec<f64> = (0..8).map(BeatPattern::bass_note).collect();
    assert_eq!(&notes[..4], &BASS_NOTES_HZ);
    assert_eq!(&notes[4..], &BASS_NOTES_HZ);
    let mut distinct = notes[..4].to_vec();
    distinct.sort_by(f64::total_cmp);
    distinct.dedup();
    assert_eq!(distinct.len(), 4);
}

#[test]
fn transport_emits_first_beat_immediately() {
    let mut t = BeatTransport::new();
    assert!(t.poll(10.0).is_empty());
    assert!(t.start(2.0));
    let v = t.poll(2.0);
    assert_eq!(t.beat(), 1);
    assert!(v.iter().all(|v| v.at_secs >= 2.0));
    assert_eq!(v[0].kind, VoiceKind::Kick);
    assert!((t.next_due().unwrap() - (2.0 + beat_interval_secs())).abs() < 1e-12);
}

#[test]
fn transport_catches_up_on_every_due_beat() {
    let mut t = BeatTransport::new();
    t.start(0.0);
    let v = t.poll(beat_interval_secs() * 3.5);
    assert_eq!(t.beat(), 4);
    assert_eq!(snares(&v), 2);
    assert_eq!(bass_freqs(&v).len(), 8);
}

#[test]
fn start_is_idempotent_and_stop_cancels() {
    let mut t = BeatTransport::new();
    assert!(t.start(0.0));
    t.poll(0.0);
    assert!(!t.start(5.0));
    assert_eq!(t.beat(), 1);
    assert!(t.stop());
    assert!(!t.stop());
    assert_eq!(t.next_due(), None);
    assert!(t.poll(100.0).is_empty());
}

#[test]
fn restart_resets_the_beat_counter() {
    let mut t = BeatTransport::new();
    t.start(0.0);
    t.poll(2.0);
    t.stop();
    t.start(10.0);
    assert_eq!(t.beat(), 0);
    let v = t.poll(10.0);
    assert_eq!(snares(&v), 0);
    assert_eq!(bass_freqs(&v)[0], BASS_NOTES_HZ[0]);
}

#[derive(Clone, Default)]
struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn beats_are_logged_at_debug() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, || {
        let mut t = BeatTransport::new();
        t.start(0.0);
        t.poll(beat_interval_secs());
    });
    let logs = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    assert_eq!(logs.matches(" beat beat=").count(), 2, "{logs}");
    assert!(logs.contains("DEBUG"), "{logs}");
}
