use crate::foundation::{
    core::{BezPath, Point, Rgba8},
    rng::Rng64,
};

/// Gestures with fewer points than this are treated as accidental taps.
pub const MIN_STROKE_POINTS: usize = 6;

/// Length of the random base-36 stroke identifier.
pub const STROKE_ID_LEN: usize = 9;

/// Colour used until [`StrokeRecorder::set_color`] is called.
pub const DEFAULT_STROKE_COLOR: Rgba8 = Rgba8::opaque(255, 0, 255);

/// Locally unique identifier shared by a stroke and the dancer promoted from it.
#[derive(
    Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct StrokeId(pub String);

impl std::fmt::Display for StrokeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A finished gesture: ordered canvas points plus colour and identifier.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Stroke {
    pub id: StrokeId,
    pub points: Vec<Point>,
    pub color: Rgba8,
}

/// Pointer/touch input in canvas-local coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Press(Point),
    Move(Point),
    Release,
    Leave,
}

/// Records one gesture at a time and keeps a live trace of it for immediate feedback.
#[derive(Debug)]
pub struct StrokeRecorder {
    color: Rgba8,
    active: bool,
    points: Vec<Point>,
    trace: BezPath,
    rng: Rng64,
}

impl StrokeRecorder {
    pub fn new(rng: Rng64) -> Self {
        Self {
            color: DEFAULT_STROKE_COLOR,
            active: false,
            points: Vec::new(),
            trace: BezPath::new(),
            rng,
        }
    }

    pub fn color(&self) -> Rgba8 {
        self.color
    }

    /// Colour of strokes started after this call.
    pub fn set_color(&mut self, color: Rgba8) {
        self.color = color;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Points of the gesture in progress.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Straight segments between consecutive points of the gesture in progress.
    pub fn live_trace(&self) -> &BezPath {
        &self.trace
    }

    pub fn begin(&mut self, p: Point) {
        self.active = true;
        self.points.clear();
        self.points.push(p);
        self.trace = BezPath::new();
        self.trace.move_to(p);
    }

    /// Append `p` to the active gesture. Returns `false` (and does nothing) when idle.
    pub fn extend(&mut self, p: Point) -> bool {
        if !self.active {
            return false;
        }
        self.points.push(p);
        self.trace.line_to(p);
        true
    }

    /// Finish the gesture. Short gestures are dropped silently; the trace is always cleared.
    pub fn end(&mut self) -> Option<Stroke> {
        if !self.active {
            return None;
        }
        self.active = false;
        self.trace = BezPath::new();
        let points = std::mem::take(&mut self.points);
        if points.len() < MIN_STROKE_POINTS {
            tracing::debug!(points = points.len(), "discarding short gesture");
            return None;
        }
        Some(Stroke {
            id: StrokeId(self.rng.token(STROKE_ID_LEN)),
            points,
            color: self.color,
        })
    }

    pub fn handle(&mut self, event: PointerEvent) -> Option<Stroke> {
        match event {
            PointerEvent::Press(p) => {
                self.begin(p);
                None
            }
            PointerEvent::Move(p) => {
                self.extend(p);
                None
            }
            PointerEvent::Release | PointerEvent::Leave => self.end(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stroke/recorder.rs"]
mod tests;
