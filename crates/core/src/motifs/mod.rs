//! Tactical motif detection for a single position

mod detector;
mod types;

pub use detector::analyze;
pub use types::*;
