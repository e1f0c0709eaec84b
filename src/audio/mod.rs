//! Synthesized disco beat: voice synthesis, the fixed pattern, and the schedulers that fire it.

pub mod mix;
pub mod pattern;
pub mod scheduler;
pub mod voice;
