use std::{
    sync::{
        Arc,
        mpsc::{self, Receiver, RecvTimeoutError, Sender},
    },
    time::{Duration, Instant},
};

use crate::{
    animation::clock::AnimationClock,
    audio::scheduler::BeatControl,
    config::PartyConfig,
    dancer::model::{DanceParams, Dancer},
    foundation::{
        core::{Canvas, Rgba8, Tick},
        rng::Rng64,
    },
    persona::{
        client::{PersonaFetcher, PersonaSource, source_from_config},
        model::{Persona, ShapeDescription},
    },
    stroke::recorder::{MIN_STROKE_POINTS, PointerEvent, Stroke, StrokeId, StrokeRecorder},
};

pub const WELCOME_ANNOUNCEMENT: &str =
    "Draw a circle, a star or a stick figure to start the party!";
pub const CLEARED_ANNOUNCEMENT: &str = "The floor is empty, draw a new star!";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    #[default]
    Drawing,
    Party,
}

/// A finished persona request, addressed by the id of the dancer it was made for.
#[derive(Clone, Debug)]
struct PersonaReady {
    id: StrokeId,
    persona: Persona,
}

/// Single owner of the mode, the dancer collection, the announcement and the animation tick.
///
/// Persona requests run on worker threads; their results are only applied here, by
/// [`PartyController::poll_personas`] or [`PartyController::wait_for_personas`].
pub struct PartyController<B: BeatControl> {
    state: GameState,
    dancers: Vec<Dancer>,
    announcement: String,
    beats: B,
    fetcher: PersonaFetcher,
    persona_tx: Sender<PersonaReady>,
    persona_rx: Receiver<PersonaReady>,
    pending: usize,
    recorder: StrokeRecorder,
    clock: AnimationClock,
    rng: Rng64,
    viewport: Canvas,
}

impl<B: BeatControl> PartyController<B> {
    pub fn new(beats: B, source: Arc<dyn PersonaSource>, viewport: Canvas, mut rng: Rng64) -> Self {
        let (persona_tx, persona_rx) = mpsc::channel();
        let recorder = StrokeRecorder::new(Rng64::new(rng.next_u64()));
        Self {
            state: GameState::Drawing,
            dancers: Vec::new(),
            announcement: WELCOME_ANNOUNCEMENT.to_string(),
            beats,
            fetcher: PersonaFetcher::new(source),
            persona_tx,
            persona_rx,
            pending: 0,
            recorder,
            clock: AnimationClock::new(),
            rng,
            viewport,
        }
    }

    /// Build from configuration: persona source from the environment, RNG from the seed or clock.
    pub fn from_config(cfg: &PartyConfig, beats: B) -> Self {
        let rng = cfg.seed.map(Rng64::new).unwrap_or_else(Rng64::from_clock);
        Self::new(beats, source_from_config(&cfg.persona), cfg.viewport, rng)
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn dancers(&self) -> &[Dancer] {
        &self.dancers
    }

    pub fn dancer(&self, id: &StrokeId) -> Option<&Dancer> {
        self.dancers.iter().find(|d| d.id() == id)
    }

    pub fn announcement(&self) -> &str {
        &self.announcement
    }

    pub fn viewport(&self) -> Canvas {
        self.viewport
    }

    /// Persona requests still in flight.
    pub fn pending_personas(&self) -> usize {
        self.pending
    }

    pub fn beats(&self) -> &B {
        &self.beats
    }

    pub fn beats_mut(&mut self) -> &mut B {
        &mut self.beats
    }

    pub fn recorder(&self) -> &StrokeRecorder {
        &self.recorder
    }

    pub fn set_color(&mut self, color: Rgba8) {
        self.recorder.set_color(color);
    }

    /// Current animation tick.
    pub fn tick(&self) -> Tick {
        self.clock.tick()
    }

    /// Advance the animation one frame. The clock only runs while the floor has dancers.
    pub fn advance_frame(&mut self) -> Tick {
        self.clock.advance()
    }

    /// Feed a pointer event to the recorder; a completed stroke is promoted straight away.
    pub fn pointer(&mut self, event: PointerEvent) -> Option<StrokeId> {
        let stroke = self.recorder.handle(event)?;
        self.promote(stroke)
    }

    /// Turn `stroke` into a dancer and request its persona.
    ///
    /// The first dancer on an empty floor switches a drawing session into party mode.
    pub fn promote(&mut self, stroke: Stroke) -> Option<StrokeId> {
        if stroke.points.len() < MIN_STROKE_POINTS {
            tracing::debug!(points = stroke.points.len(), "stroke too short to dance");
            return None;
        }

        let description = ShapeDescription::classify(&stroke.points);
        let params = DanceParams::sample(&mut self.rng, self.viewport);
        let dancer = Dancer::new(stroke, params);
        let id = dancer.id().clone();

        let first = self.dancers.is_empty();
        self.dancers.push(dancer);
        tracing::debug!(%id, style = ?params.style, %description, "dancer joined");

        if first {
            self.clock.start();
            if self.state == GameState::Drawing {
                self.enter_party();
            }
        }

        self.request_persona(id.clone(), description);
        Some(id)
    }

    fn request_persona(&mut self, id: StrokeId, description: ShapeDescription) {
        let fetcher = self.fetcher.clone();
        let tx = self.persona_tx.clone();
        let worker_id = id.clone();
        let spawned = std::thread::Builder::new()
            .name("disco-persona".to_string())
            .spawn(move || {
                let persona = fetcher.fetch(description);
                // The controller may be gone; its dancers no longer need a name then.
                let _ = tx.send(PersonaReady {
                    id: worker_id,
                    persona,
                });
            });
        if let Err(e) = spawned {
            tracing::warn!(error = %e, %id, "persona worker unavailable, using fallback");
            let _ = self.persona_tx.send(PersonaReady {
                id,
                persona: Persona::fallback(),
            });
        }
        self.pending += 1;
    }

    /// Switch between drawing and party mode, starting or stopping the beat.
    pub fn toggle(&mut self) -> GameState {
        match self.state {
            GameState::Drawing => self.enter_party(),
            GameState::Party => {
                self.state = GameState::Drawing;
                self.beats.stop();
                tracing::info!("back to drawing");
            }
        }
        self.state
    }

    fn enter_party(&mut self) {
        self.state = GameState::Party;
        self.beats.start();
        tracing::info!(dancers = self.dancers.len(), "party started");
    }

    /// Empty the floor. The mode and the beat are left alone.
    pub fn clear(&mut self) {
        let removed = self.dancers.len();
        self.dancers.clear();
        self.clock.stop();
        self.announcement = CLEARED_ANNOUNCEMENT.to_string();
        tracing::info!(removed, "dance floor cleared");
    }

    /// Apply every persona that has arrived. Returns how many dancers were renamed.
    pub fn poll_personas(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(ready) = self.persona_rx.try_recv() {
            applied += usize::from(self.apply(ready));
        }
        applied
    }

    /// Block until every in-flight request has reported back or `timeout` elapses.
    ///
    /// A timeout too large to express as a deadline (such as `Duration::MAX`) waits without one.
    pub fn wait_for_personas(&mut self, timeout: Duration) -> usize {
        let deadline = Instant::now().checked_add(timeout);
        let mut applied = self.poll_personas();
        while self.pending > 0 {
            let Some(deadline) = deadline else {
                match self.persona_rx.recv() {
                    Ok(ready) => applied += usize::from(self.apply(ready)),
                    Err(_) => break,
                }
                continue;
            };
            let left = deadline.saturating_duration_since(Instant::now());
            match self.persona_rx.recv_timeout(left) {
                Ok(ready) => applied += usize::from(self.apply(ready)),
                Err(RecvTimeoutError::Timeout) => {
                    tracing::warn!(pending = self.pending, "gave up waiting for personas");
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        applied
    }

    fn apply(&mut self, ready: PersonaReady) -> bool {
        self.pending = self.pending.saturating_sub(1);
        let PersonaReady { id, persona } = ready;
        let Some(dancer) = self.dancers.iter_mut().find(|d| *d.id() == id) else {
            tracing::warn!(%id, "persona arrived for a dancer that left the floor");
            return false;
        };
        let announcement = format!(
            "New dancer: {}! \"{}\"",
            persona.name, persona.catchphrase
        );
        if !dancer.assign_persona(persona) {
            tracing::warn!(%id, "dancer already has a persona");
            return false;
        }
        tracing::info!(%id, name = dancer.personality(), "dancer got a persona");
        self.announcement = announcement;
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/party/controller.rs"]
mod tests;
