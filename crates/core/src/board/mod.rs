//! Board geometry and position query helpers

mod guard;
mod queries;
mod rays;

pub use guard::HypotheticalMove;
pub use queries::{attack_set, defender_set, gives_check, is_pinned};
pub use rays::{first_piece_along, Direction};
