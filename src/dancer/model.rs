use crate::{
    foundation::{
        core::{Canvas, Point, Rgba8},
        rng::Rng64,
    },
    persona::model::Persona,
    stroke::recorder::{Stroke, StrokeId},
};

/// Label shown until a persona arrives.
pub const PLACEHOLDER_PERSONALITY: &str = "Summoning a soul...";

/// Dance move tag, picked uniformly when a dancer is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DanceStyle {
    Bounce,
    Wiggle,
    Spin,
    Shuffle,
    Moonwalk,
}

impl DanceStyle {
    pub const ALL: [DanceStyle; 5] = [
        DanceStyle::Bounce,
        DanceStyle::Wiggle,
        DanceStyle::Spin,
        DanceStyle::Shuffle,
        DanceStyle::Moonwalk,
    ];

    pub fn random(rng: &mut Rng64) -> Self {
        Self::ALL[rng.index(Self::ALL.len())]
    }
}

/// Randomized animation and placement parameters of one dancer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DanceParams {
    pub style: DanceStyle,
    /// Base scale in `[0.8, 1.2)`.
    pub scale: f64,
    /// Tilt amplitude in degrees, `[15, 30)`.
    pub rotation: f64,
    /// Horizontal placement relative to the floor centre.
    pub offset_x: f64,
    /// Vertical placement relative to the floor centre.
    pub offset_y: f64,
    /// Animation frequency multiplier in `[0.8, 2.0)`.
    pub speed: f64,
    /// Vertical bounce amplitude in pixels, `[30, 70)`.
    pub bounce_height: f64,
}

impl DanceParams {
    /// Sample parameters; placement stays within 60% of the viewport width and 40% of its height.
    pub fn sample(rng: &mut Rng64, viewport: Canvas) -> Self {
        let style = DanceStyle::random(rng);
        let scale = rng.range(0.8, 1.2);
        let rotation = rng.range(15.0, 30.0);
        let offset_x = (rng.next_f64_01() - 0.5) * (f64::from(viewport.width) * 0.6);
        let offset_y = (rng.next_f64_01() - 0.5) * (f64::from(viewport.height) * 0.4);
        let speed = rng.range(0.8, 2.0);
        let bounce_height = rng.range(30.0, 70.0);
        Self {
            style,
            scale,
            rotation,
            offset_x,
            offset_y,
            speed,
            bounce_height,
        }
    }
}

/// A promoted stroke. Shape, colour and id are fixed at creation; only the label changes, once.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Dancer {
    id: StrokeId,
    points: Vec<Point>,
    color: Rgba8,
    pub params: DanceParams,
    personality: String,
    persona: Option<Persona>,
}

impl Dancer {
    pub fn new(stroke: Stroke, params: DanceParams) -> Self {
        Self {
            id: stroke.id,
            points: stroke.points,
            color: stroke.color,
            params,
            personality: PLACEHOLDER_PERSONALITY.to_string(),
            persona: None,
        }
    }

    pub fn id(&self) -> &StrokeId {
        &self.id
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn color(&self) -> Rgba8 {
        self.color
    }

    pub fn personality(&self) -> &str {
        &self.personality
    }

    pub fn persona(&self) -> Option<&Persona> {
        self.persona.as_ref()
    }

    /// Attach the persona. Returns `false` when one was already attached.
    pub(crate) fn assign_persona(&mut self, persona: Persona) -> bool {
        if self.persona.is_some() {
            return false;
        }
        self.personality = persona.name.clone();
        self.persona = Some(persona);
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dancer/model.rs"]
mod tests;
