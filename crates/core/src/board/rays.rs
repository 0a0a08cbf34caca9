//! Ray directions and bounded ray walks

use shakmaty::{Board, File, Rank, Square};

/// One of the 8 straight-line directions on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// (file, rank) step of this direction.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::NorthEast => (1, 1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, -1),
            Direction::South => (0, -1),
            Direction::SouthWest => (-1, -1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, 1),
        }
    }

    /// Direction pointing from `from` toward `to`, with the raw file/rank
    /// delta reduced to unit components. `None` when the squares coincide.
    pub fn between(from: Square, to: Square) -> Option<Direction> {
        let df = (to.file() as i32 - from.file() as i32).signum();
        let dr = (to.rank() as i32 - from.rank() as i32).signum();
        Direction::from_delta(df, dr)
    }

    fn from_delta(df: i32, dr: i32) -> Option<Direction> {
        match (df, dr) {
            (0, 1) => Some(Direction::North),
            (1, 1) => Some(Direction::NorthEast),
            (1, 0) => Some(Direction::East),
            (1, -1) => Some(Direction::SouthEast),
            (0, -1) => Some(Direction::South),
            (-1, -1) => Some(Direction::SouthWest),
            (-1, 0) => Some(Direction::West),
            (-1, 1) => Some(Direction::NorthWest),
            _ => None,
        }
    }

    /// One step from `from`, or `None` at the board edge.
    pub fn step(self, from: Square) -> Option<Square> {
        let (df, dr) = self.delta();
        let file = from.file() as i32 + df;
        let rank = from.rank() as i32 + dr;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Square::from_coords(
                File::new(file as u32),
                Rank::new(rank as u32),
            ))
        } else {
            None
        }
    }
}

/// Walks from `origin` in `direction` and returns the first occupied
/// square, or `None` if the ray runs off the board.
pub fn first_piece_along(board: &Board, origin: Square, direction: Direction) -> Option<Square> {
    let mut current = origin;
    while let Some(next) = direction.step(current) {
        if board.piece_at(next).is_some() {
            return Some(next);
        }
        current = next;
    }
    None
}
