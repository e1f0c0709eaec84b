use crate::foundation::core::Point;

/// Strokes with more points than this are described as complex.
pub const COMPLEX_POINT_THRESHOLD: usize = 30;

/// Generated display identity of a dancer.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Persona {
    pub name: String,
    pub catchphrase: String,
    pub vibe: String,
}

impl Persona {
    /// Returned whenever the generative service cannot be used.
    pub fn fallback() -> Self {
        Self {
            name: "Neon Dancer".to_string(),
            catchphrase: "Ready to Groove!".to_string(),
            vibe: "Energetic".to_string(),
        }
    }
}

/// Coarse classification of a stroke, derived from its point count alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeDescription {
    Simple,
    Complex,
}

impl ShapeDescription {
    pub fn from_point_count(n: usize) -> Self {
        if n > COMPLEX_POINT_THRESHOLD {
            Self::Complex
        } else {
            Self::Simple
        }
    }

    pub fn classify(points: &[Point]) -> Self {
        Self::from_point_count(points.len())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Complex => "complex",
        }
    }

    /// Phrase used inside the generation prompt.
    pub fn phrase(self) -> &'static str {
        match self {
            Self::Simple => "simple geometric shape",
            Self::Complex => "complex piece of abstract art",
        }
    }
}

impl std::fmt::Display for ShapeDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/persona/model.rs"]
mod tests;
