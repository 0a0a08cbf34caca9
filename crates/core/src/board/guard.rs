//! Scoped hypothetical-move application

use shakmaty::{fen::Fen, Chess, EnPassantMode, Move, Position};

use crate::error::{Error, Result};

/// Applies one move to a position and guarantees the exact prior position
/// is back in place when the guard goes away, on every exit path.
///
/// While the guard is alive it holds the only reference to the position,
/// so nothing else can observe the mutated state. Call [`finish`] to
/// restore eagerly and have the restoration verified; dropping the guard
/// (early return, `?`, unwind) restores without verification.
///
/// [`finish`]: HypotheticalMove::finish
pub struct HypotheticalMove<'a> {
    position: &'a mut Chess,
    saved: Chess,
    restored: bool,
}

impl<'a> HypotheticalMove<'a> {
    pub fn play(position: &'a mut Chess, mv: Move) -> Self {
        let saved = position.clone();
        position.play_unchecked(mv);
        HypotheticalMove {
            position,
            saved,
            restored: false,
        }
    }

    /// The position with the hypothetical move applied.
    pub fn position(&self) -> &Chess {
        self.position
    }

    /// Restores the prior position and verifies the round trip.
    pub fn finish(mut self) -> Result<()> {
        self.rewind();
        let restored = Fen::from_position(&*self.position, EnPassantMode::Legal);
        let saved = Fen::from_position(&self.saved, EnPassantMode::Legal);
        if restored == saved {
            Ok(())
        } else {
            Err(Error::Restoration)
        }
    }

    fn rewind(&mut self) {
        if !self.restored {
            *self.position = self.saved.clone();
            self.restored = true;
        }
    }
}

impl Drop for HypotheticalMove<'_> {
    fn drop(&mut self) {
        self.rewind();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::{CastlingMode, Color};

    fn fen_of(position: &Chess) -> String {
        Fen::from_position(position, EnPassantMode::Legal).to_string()
    }

    #[test]
    fn finish_restores_and_verifies() {
        let mut position = Chess::default();
        let before = fen_of(&position);
        let mv = position.legal_moves()[0];

        let guard = HypotheticalMove::play(&mut position, mv);
        assert_eq!(guard.position().turn(), Color::Black);
        guard.finish().unwrap();

        assert_eq!(fen_of(&position), before);
        assert_eq!(position.turn(), Color::White);
    }

    #[test]
    fn drop_restores_without_finish() {
        let mut position: Chess = "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4"
            .parse::<Fen>()
            .unwrap()
            .into_position(CastlingMode::Standard)
            .unwrap();
        let before = fen_of(&position);

        for mv in position.legal_moves() {
            let guard = HypotheticalMove::play(&mut position, mv);
            let _ = guard.position().is_checkmate();
            // No finish: the guard is dropped at the end of the iteration.
        }

        assert_eq!(fen_of(&position), before);
    }
}
