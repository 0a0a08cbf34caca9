//! Error types for whatthemove-core

use shakmaty::{Color, Square};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A side's king is missing from the board. Unreachable for a legally
    /// constructed position, kept as an invariant check.
    #[error("{0:?} king is missing from the board")]
    MissingKing(Color),

    /// The pin predicate reported a pin, but the ray walk from the pinned
    /// piece found no enemy piece before the board edge.
    #[error("pin ray from {pinned} reached the board edge without an enemy piece")]
    InconsistentPin { pinned: Square },

    /// A hypothetical move could not be undone. Fatal: the position can no
    /// longer be trusted.
    #[error("position was not restored after a hypothetical move")]
    Restoration,

    #[error("PGN error: {0}")]
    Pgn(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
