pub mod input;
pub mod recorder;
