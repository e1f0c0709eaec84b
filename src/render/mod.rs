//! CPU rasterization of the dance floor.

pub mod floor;
pub mod frame;
