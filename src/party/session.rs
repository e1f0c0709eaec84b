use std::path::PathBuf;

use crate::{
    audio::{
        mix::{MIX_CHANNELS, write_mix_to_f32le_file},
        scheduler::{BeatControl, OfflineBeats},
    },
    encode::sink::{AudioInputConfig, FrameSink, SinkConfig},
    foundation::{
        core::{Fps, FrameIndex, Tick},
        error::{DiscoError, DiscoResult},
    },
    party::controller::{GameState, PartyController},
    persona::model::Persona,
    render::{floor::FloorRenderer, frame::FrameRGBA},
    stroke::recorder::StrokeId,
};

/// Longest clip a single [`PartySession::render`] call accepts.
pub const MAX_SESSION_SECS: f64 = 6.0 * 60.0 * 60.0;

/// Options for [`PartySession::render`].
#[derive(Clone, Debug)]
pub struct SessionOpts {
    pub fps: Fps,
    pub duration_secs: f64,
    /// Where to write the raw `f32le` soundtrack. Without it the sink gets no audio.
    pub audio_out: Option<PathBuf>,
}

/// One dancer as it stood at the end of a render.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RosterEntry {
    pub id: StrokeId,
    pub personality: String,
    pub persona: Option<Persona>,
}

/// Summary of a finished render.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SessionReport {
    pub frames: u64,
    pub beats: u64,
    pub final_tick: Tick,
    pub state: GameState,
    pub announcement: String,
    pub roster: Vec<RosterEntry>,
    pub audio: Option<PathBuf>,
}

/// Offline playback of a party: the controller drives an [`OfflineBeats`] clock and every frame
/// is rasterized into a [`FrameSink`].
pub struct PartySession {
    controller: PartyController<OfflineBeats>,
    renderer: FloorRenderer,
}

impl PartySession {
    pub fn new(controller: PartyController<OfflineBeats>) -> DiscoResult<Self> {
        let renderer = FloorRenderer::new(controller.viewport())?;
        Ok(Self {
            controller,
            renderer,
        })
    }

    pub fn controller(&self) -> &PartyController<OfflineBeats> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PartyController<OfflineBeats> {
        &mut self.controller
    }

    pub fn into_controller(self) -> PartyController<OfflineBeats> {
        self.controller
    }

    /// Rasterize the floor as it looks right now.
    pub fn snapshot(&mut self) -> DiscoResult<FrameRGBA> {
        self.controller.poll_personas();
        self.renderer
            .render(self.controller.dancers(), self.controller.tick())
    }

    /// Render `opts.duration_secs` of the party into `sink`, one frame per tick.
    #[tracing::instrument(skip_all, fields(fps = opts.fps.as_f64(), secs = opts.duration_secs))]
    pub fn render(
        &mut self,
        opts: &SessionOpts,
        sink: &mut dyn FrameSink,
    ) -> DiscoResult<SessionReport> {
        Fps::new(opts.fps.num, opts.fps.den)?;
        if !opts.duration_secs.is_finite() || opts.duration_secs < 0.0 {
            return Err(DiscoError::validation(
                "session duration must be a finite, non-negative number of seconds",
            ));
        }
        if opts.duration_secs > MAX_SESSION_SECS {
            return Err(DiscoError::validation(format!(
                "session duration {}s exceeds the {MAX_SESSION_SECS}s limit",
                opts.duration_secs
            )));
        }
        let frames = opts.fps.secs_to_frames_floor(opts.duration_secs);
        let start_secs = self.controller.beats().now_secs();
        let beats_before = self.controller.beats().total_beats();

        // The soundtrack covers the whole span up front; the beat keeps its own clock.
        let audio = match &opts.audio_out {
            Some(path) if self.controller.beats().is_playing() => {
                let end = start_secs + opts.fps.frames_to_secs(frames);
                pcm_len(end, self.controller.beats().mix().sample_rate())?;
                let pcm = self.controller.beats_mut().render_until(end);
                let sample_rate = self.controller.beats().mix().sample_rate();
                let skip = (start_secs * f64::from(sample_rate)).round() as usize
                    * usize::from(MIX_CHANNELS);
                write_mix_to_f32le_file(pcm.get(skip..).unwrap_or_default(), path)?;
                Some(AudioInputConfig {
                    path: path.clone(),
                    sample_rate,
                    channels: MIX_CHANNELS,
                })
            }
            Some(_) => {
                tracing::info!("beat is not playing, rendering without a soundtrack");
                None
            }
            None => None,
        };

        let viewport = self.controller.viewport();
        sink.begin(SinkConfig {
            width: viewport.width,
            height: viewport.height,
            fps: opts.fps,
            audio: audio.clone(),
        })?;

        for i in 0..frames {
            self.controller.poll_personas();
            let frame = self
                .renderer
                .render(self.controller.dancers(), self.controller.tick())?;
            sink.push_frame(FrameIndex(i), &frame)?;
            self.controller.advance_frame();
            let now = start_secs + opts.fps.frames_to_secs(i + 1);
            self.controller.beats_mut().advance_to(now);
        }
        sink.end()?;

        let report = SessionReport {
            frames,
            beats: self.controller.beats().total_beats() - beats_before,
            final_tick: self.controller.tick(),
            state: self.controller.state(),
            announcement: self.controller.announcement().to_string(),
            roster: self
                .controller
                .dancers()
                .iter()
                .map(|d| RosterEntry {
                    id: d.id().clone(),
                    personality: d.personality().to_string(),
                    persona: d.persona().cloned(),
                })
                .collect(),
            audio: audio.map(|a| a.path),
        };
        tracing::info!(
            frames = report.frames,
            beats = report.beats,
            dancers = report.roster.len(),
            "party rendered"
        );
        Ok(report)
    }
}

/// Interleaved sample count of a mix covering `[0, secs)`, if it fits in memory terms.
fn pcm_len(secs: f64, sample_rate: u32) -> DiscoResult<usize> {
    let frames = (secs.max(0.0) * f64::from(sample_rate)).round();
    let samples = frames * f64::from(MIX_CHANNELS);
    if !samples.is_finite() || samples > (isize::MAX as usize / size_of::<f32>()) as f64 {
        return Err(DiscoError::validation(format!(
            "soundtrack of {secs}s at {sample_rate} Hz is too long to mix"
        )));
    }
    Ok(samples as usize)
}

#[cfg(test)]
#[path = "../../tests/unit/party/session.rs"]
mod tests;
