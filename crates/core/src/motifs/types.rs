//! Motif records produced by the analysis
//!
//! Every record is a value copy of square coordinates; none of them borrow
//! from the position they were computed on.

use serde::{Deserialize, Serialize};
use shakmaty::{Color, Square};

/// Own piece attacked by the opponent with zero own defenders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HangingPiece {
    #[serde(with = "square_name")]
    pub square: Square,
}

/// Own piece with zero own defenders and zero current attackers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoosePiece {
    #[serde(with = "square_name")]
    pub square: Square,
}

/// Own piece that is the sole defender of more than one other own piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverloadedDefender {
    #[serde(with = "square_name")]
    pub square: Square,
}

/// Own pawn with zero own defenders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeakPawn {
    #[serde(with = "square_name")]
    pub square: Square,
}

/// Absolutely pinned own piece and the enemy piece delivering the pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pin {
    #[serde(with = "square_name")]
    pub pinned: Square,
    #[serde(with = "square_name")]
    pub pinner: Square,
}

/// A move that exposes a check from a piece other than the one that moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredCheck {
    /// Origin square of the moving piece.
    #[serde(with = "square_name")]
    pub mover: Square,
    /// The piece whose check the move reveals.
    #[serde(with = "square_name")]
    pub attacker: Square,
}

/// A legal move that gives check, in SAN with check/mate suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckMove {
    pub san: String,
}

/// A legal move that delivers checkmate, in coordinate notation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckmateThreat {
    pub mv: String,
}

/// File-occupancy test around both kings. This is a literal occupancy
/// check (king's file holds nothing but kings), not a rook/queen
/// alignment evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KingSafety {
    pub own_open_file: bool,
    pub opponent_open_file: bool,
}

/// Full per-color analysis of one position. List fields are empty, never
/// absent, when a category has no findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(with = "color_name")]
    pub color: Color,
    pub move_number: u32,
    pub king_safety: KingSafety,
    pub available_checks: Vec<CheckMove>,
    pub checkmate_threats: Vec<CheckmateThreat>,
    pub hanging: Vec<HangingPiece>,
    pub loose: Vec<LoosePiece>,
    pub overloaded_defenders: Vec<OverloadedDefender>,
    pub weak_pawns: Vec<WeakPawn>,
    pub pins: Vec<Pin>,
    pub discovered_checks: Vec<DiscoveredCheck>,
}

mod square_name {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};
    use shakmaty::Square;

    pub fn serialize<S: Serializer>(square: &Square, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&square.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Square, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(D::Error::custom)
    }
}

mod color_name {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};
    use shakmaty::Color;

    pub fn serialize<S: Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(match color {
            Color::White => "white",
            Color::Black => "black",
        })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
        match String::deserialize(deserializer)?.as_str() {
            "white" => Ok(Color::White),
            "black" => Ok(Color::Black),
            other => Err(D::Error::custom(format!("unknown color '{other}'"))),
        }
    }
}
