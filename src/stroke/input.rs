//! Recorded gestures as JSON, replayed through the pointer interface.
//!
//! A document is an array whose entries are either `{"points": [[x, y], ...], "color": "#rrggbb"}`
//! or a bare `[[x, y], ...]`.

use std::{fs::File, io::BufReader, path::Path};

use crate::{
    foundation::{
        core::{Point, Rgba8},
        error::{DiscoError, DiscoResult},
    },
    stroke::recorder::PointerEvent,
};

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
#[serde(untagged)]
pub enum GestureInput {
    Styled {
        points: Vec<[f64; 2]>,
        #[serde(default)]
        color: Option<Rgba8>,
    },
    Bare(Vec<[f64; 2]>),
}

impl GestureInput {
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        let raw = match self {
            Self::Styled { points, .. } | Self::Bare(points) => points,
        };
        raw.iter().map(|[x, y]| Point::new(*x, *y))
    }

    pub fn color(&self) -> Option<Rgba8> {
        match self {
            Self::Styled { color, .. } => *color,
            Self::Bare(_) => None,
        }
    }

    /// Press on the first point, move through the rest, release. Empty gestures yield nothing.
    pub fn pointer_events(&self) -> Vec<PointerEvent> {
        let mut pts = self.points();
        let Some(first) = pts.next() else {
            return Vec::new();
        };
        std::iter::once(PointerEvent::Press(first))
            .chain(pts.map(PointerEvent::Move))
            .chain(std::iter::once(PointerEvent::Release))
            .collect()
    }
}

pub fn gestures_from_reader(r: impl std::io::Read) -> DiscoResult<Vec<GestureInput>> {
    serde_json::from_reader(r).map_err(|e| DiscoError::serde(format!("parse strokes JSON: {e}")))
}

pub fn gestures_from_path(path: impl AsRef<Path>) -> DiscoResult<Vec<GestureInput>> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|e| {
        DiscoError::validation(format!("open strokes JSON '{}': {e}", path.display()))
    })?;
    gestures_from_reader(BufReader::new(f))
}

#[cfg(test)]
#[path = "../../tests/unit/stroke/input.rs"]
mod tests;
