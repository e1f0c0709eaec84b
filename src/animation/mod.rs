pub mod clock;
pub mod pose;
