use crate::{
    dancer::model::Dancer,
    foundation::core::{Affine, BezPath, Point, Rect, Tick, Vec2},
};

/// Horizontal sway amplitude in pixels.
pub const WIGGLE_AMPLITUDE: f64 = 25.0;
/// Relative amplitude of the breathing scale pulse.
pub const PULSE_AMPLITUDE: f64 = 0.1;

/// Per-frame transform of one dancer. Recomputed from scratch every tick.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Pose {
    /// Vertical offset in pixels; never positive (y grows downwards, so dancers hop up).
    pub bounce: f64,
    /// Horizontal offset in pixels.
    pub wiggle: f64,
    /// Tilt in degrees.
    pub tilt_deg: f64,
    pub scale: f64,
    /// Floor shadow size, shrinking as the dancer leaves the ground.
    pub shadow_scale: f64,
}

pub fn pose_at(dancer: &Dancer, tick: Tick) -> Pose {
    let t = tick.as_f64();
    let p = &dancer.params;
    let bounce = -(t * 0.1 * p.speed).sin().abs() * p.bounce_height;
    let wiggle = (t * 0.15 * p.speed).sin() * WIGGLE_AMPLITUDE;
    let tilt_deg = (t * 0.1 * p.speed).cos() * p.rotation;
    let scale = (1.0 + (t * 0.2).sin() * PULSE_AMPLITUDE) * p.scale;
    Pose {
        bounce,
        wiggle,
        tilt_deg,
        scale,
        shadow_scale: 1.0 - bounce.abs() / 100.0,
    }
}

impl Pose {
    /// Map the dancer's normalized stroke onto the floor.
    ///
    /// The box centre lands on `floor_center` plus the dancer's placement and this frame's
    /// wiggle/bounce; rotation and scale pivot on that centre.
    pub fn to_affine(&self, floor_center: Point, dancer: &Dancer) -> Affine {
        let size = local_bounds(dancer.points()).size();
        let anchor = floor_center
            + Vec2::new(
                dancer.params.offset_x + self.wiggle,
                dancer.params.offset_y + self.bounce,
            );
        Affine::translate(anchor.to_vec2())
            * Affine::rotate(self.tilt_deg.to_radians())
            * Affine::scale(self.scale)
            * Affine::translate(Vec2::new(-size.width / 2.0, -size.height / 2.0))
    }
}

/// Axis-aligned bounds of `points`; `Rect::ZERO` for an empty slice.
pub fn local_bounds(points: &[Point]) -> Rect {
    let mut it = points.iter();
    let Some(first) = it.next() else {
        return Rect::ZERO;
    };
    it.fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p))
}

/// Shift `points` so their bounding box starts at the origin.
pub fn normalize_points(points: &[Point]) -> Vec<Point> {
    let origin = local_bounds(points).origin().to_vec2();
    points.iter().map(|p| *p - origin).collect()
}

/// Polyline through the normalized points.
pub fn normalized_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut pts = normalize_points(points).into_iter();
    if let Some(first) = pts.next() {
        path.move_to(first);
        for p in pts {
            path.line_to(p);
        }
    }
    path
}

#[cfg(test)]
#[path = "../../tests/unit/animation/pose.rs"]
mod tests;
