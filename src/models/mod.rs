//! Core data models for the signal engine.

mod confidence;
mod history;
mod ids;
mod live;
mod signal;
mod stats;

pub use confidence::*;
pub use history::*;
pub use ids::*;
pub use live::*;
pub use signal::*;
pub use stats::*;
