//! Disco Doodle turns hand-drawn strokes into dancers that bounce to a synthesized disco beat.
//!
//! - Feed pointer gestures (or finished [`Stroke`]s) into a [`PartyController`]
//! - Each stroke becomes a [`Dancer`] at once; a generated [`Persona`] names it later
//! - The first dancer starts the party and the beat
//! - Render the floor frame by frame with a [`PartySession`] into any [`FrameSink`]
#![forbid(unsafe_code)]

pub mod animation;
pub mod audio;
pub mod config;
pub mod dancer;
pub mod encode;
pub mod foundation;
pub mod party;
pub mod persona;
pub mod render;
pub mod stroke;

pub use crate::animation::pose::{Pose, pose_at};
pub use crate::audio::mix::{VoiceMix, VoiceSink, write_mix_to_f32le_file};
pub use crate::audio::pattern::{BeatPattern, BeatTransport};
pub use crate::audio::scheduler::{BeatControl, BeatScheduler, OfflineBeats};
pub use crate::audio::voice::{Voice, VoiceKind};
pub use crate::config::PartyConfig;
pub use crate::dancer::model::{DanceParams, DanceStyle, Dancer};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{
    AudioInputConfig, FrameSink, InMemorySink, PngSequenceSink, SinkConfig,
};
pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Point, Rgba8, Tick};
pub use crate::foundation::error::{DiscoError, DiscoResult};
pub use crate::foundation::rng::Rng64;
pub use crate::party::controller::{GameState, PartyController};
pub use crate::party::session::{PartySession, SessionOpts, SessionReport};
pub use crate::persona::client::{GeminiClient, OfflinePersona, PersonaFetcher, PersonaSource};
pub use crate::persona::model::{Persona, ShapeDescription};
pub use crate::render::floor::FloorRenderer;
pub use crate::render::frame::FrameRGBA;
pub use crate::stroke::input::GestureInput;
pub use crate::stroke::recorder::{PointerEvent, Stroke, StrokeId, StrokeRecorder};
