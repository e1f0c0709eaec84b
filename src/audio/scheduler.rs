use std::{
    sync::{
        Arc, Mutex, TryLockError,
        atomic::{AtomicU64, Ordering},
        mpsc::{self, RecvTimeoutError},
    },
    thread::JoinHandle,
    time::{Duration, Instant},
};

use crate::{
    audio::{
        mix::{MIX_SAMPLE_RATE, VoiceMix, VoiceSink},
        pattern::BeatTransport,
    },
    foundation::error::{DiscoError, DiscoResult},
};

/// The only surface through which the party controller drives the music.
pub trait BeatControl {
    /// Start the loop; a no-op while already playing.
    fn start(&mut self);
    /// Cancel the next scheduled beat; a no-op while stopped.
    fn stop(&mut self);
    fn is_playing(&self) -> bool;
}

struct BeatLoop {
    stop_tx: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

/// Real-time beat loop on a dedicated worker thread.
///
/// Voice times are seconds since the scheduler was created.
pub struct BeatScheduler<S: VoiceSink + Send + 'static> {
    sink: Arc<Mutex<S>>,
    epoch: Instant,
    beats: Arc<AtomicU64>,
    running: Option<BeatLoop>,
}

impl<S: VoiceSink + Send + 'static> BeatScheduler<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink: Arc::new(Mutex::new(sink)),
            epoch: Instant::now(),
            beats: Arc::new(AtomicU64::new(0)),
            running: None,
        }
    }

    /// Shared handle to the sink receiving voices.
    ///
    /// The worker never waits for this lock. A beat that finds it held is dropped.
    pub fn sink(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.sink)
    }

    /// Beats fired since the last start, counting any dropped on a busy sink.
    pub fn beats_emitted(&self) -> u64 {
        self.beats.load(Ordering::Acquire)
    }

    fn spawn(&mut self) -> DiscoResult<BeatLoop> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let sink = Arc::clone(&self.sink);
        let beats = Arc::clone(&self.beats);
        let epoch = self.epoch;
        beats.store(0, Ordering::Release);

        let handle = std::thread::Builder::new()
            .name("disco-beat".to_string())
            .spawn(move || {
                let mut transport = BeatTransport::new();
                transport.start(epoch.elapsed().as_secs_f64());
                loop {
                    let voices = transport.poll(epoch.elapsed().as_secs_f64());
                    if !voices.is_empty() {
                        // Never block on the sink: `stop` joins this thread and its caller may
                        // be holding the guard.
                        match sink.try_lock() {
                            Ok(mut sink) => {
                                for v in &voices {
                                    sink.schedule(v);
                                }
                            }
                            Err(TryLockError::WouldBlock) => {
                                tracing::debug!(
                                    beat = transport.beat(),
                                    "voice sink busy, beat dropped"
                                )
                            }
                            Err(TryLockError::Poisoned(_)) => {
                                tracing::warn!("voice sink lock poisoned, beat dropped")
                            }
                        }
                        beats.store(transport.beat(), Ordering::Release);
                    }

                    let Some(due) = transport.next_due() else {
                        break;
                    };
                    let wait = (due - epoch.elapsed().as_secs_f64()).max(0.0);
                    match stop_rx.recv_timeout(Duration::from_secs_f64(wait)) {
                        Err(RecvTimeoutError::Timeout) => continue,
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })
            .map_err(|e| DiscoError::audio(format!("failed to spawn beat thread: {e}")))?;

        Ok(BeatLoop { stop_tx, handle })
    }
}

impl<S: VoiceSink + Send + 'static> BeatControl for BeatScheduler<S> {
    fn start(&mut self) {
        if self.running.is_some() {
            return;
        }
        match self.spawn() {
            Ok(running) => {
                tracing::debug!("beat loop started");
                self.running = Some(running);
            }
            Err(e) => tracing::warn!(error = %e, "beat loop unavailable"),
        }
    }

    fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };
        // The worker may already have exited; a failed send is fine.
        let _ = running.stop_tx.send(());
        if running.handle.join().is_err() {
            tracing::warn!("beat thread panicked");
        }
        tracing::debug!("beat loop stopped");
    }

    fn is_playing(&self) -> bool {
        self.running.is_some()
    }
}

impl<S: VoiceSink + Send + 'static> Drop for BeatScheduler<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Beat loop driven by an explicit session clock; voices go straight into a PCM mix.
#[derive(Clone, Debug, Default)]
pub struct OfflineBeats {
    transport: BeatTransport,
    mix: VoiceMix,
    now_secs: f64,
    total_beats: u64,
}

impl OfflineBeats {
    pub fn new() -> Self {
        Self::with_sample_rate(MIX_SAMPLE_RATE)
    }

    pub fn with_sample_rate(sample_rate: u32) -> Self {
        Self {
            transport: BeatTransport::new(),
            mix: VoiceMix::new(sample_rate),
            now_secs: 0.0,
            total_beats: 0,
        }
    }

    pub fn now_secs(&self) -> f64 {
        self.now_secs
    }

    /// Beats emitted across every start.
    pub fn total_beats(&self) -> u64 {
        self.total_beats
    }

    pub fn mix(&self) -> &VoiceMix {
        &self.mix
    }

    /// Move the session clock forward, firing every beat due on the way. Never moves backwards.
    pub fn advance_to(&mut self, secs: f64) {
        if secs < self.now_secs {
            return;
        }
        let before = self.transport.beat();
        for v in self.transport.poll(secs) {
            self.mix.schedule(&v);
        }
        self.total_beats += self.transport.beat().saturating_sub(before);
        self.now_secs = secs;
    }

    /// Advance to `secs` and return the clamped stereo mix covering `[0, secs)`.
    pub fn render_until(&mut self, secs: f64) -> Vec<f32> {
        self.advance_to(secs);
        let frames = (secs.max(0.0) * f64::from(self.mix.sample_rate())).round() as usize;
        self.mix.render_frames(frames)
    }
}

impl BeatControl for OfflineBeats {
    fn start(&mut self) {
        if self.transport.start(self.now_secs) {
            tracing::debug!(at = self.now_secs, "offline beats started");
        }
    }

    fn stop(&mut self) {
        if self.transport.stop() {
            tracing::debug!(at = self.now_secs, "offline beats stopped");
        }
    }

    fn is_playing(&self) -> bool {
        self.transport.is_playing()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/scheduler.rs"]
mod tests;
