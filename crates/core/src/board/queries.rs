//! Attack, defense, check and pin queries on a position
//!
//! Every query is a pure function of (position, square, color) and is
//! recomputed from scratch on each call; nothing here survives a
//! hypothetical move.

use shakmaty::{attacks, Bitboard, Chess, Color, Move, Position, Square};

/// Squares holding a piece of `color` whose move rules currently reach
/// `square`, accounting for blockers.
pub fn attack_set(position: &Chess, square: Square, color: Color) -> Bitboard {
    let board = position.board();
    board.attacks_to(square, color, board.occupied())
}

/// Like [`attack_set`] for the piece's own color, with the square itself
/// excluded so a piece never counts as its own defender.
pub fn defender_set(position: &Chess, square: Square, color: Color) -> Bitboard {
    attack_set(position, square, color) & !Bitboard::from(square)
}

/// Whether playing `mv` leaves the opponent in check.
pub fn gives_check(position: &Chess, mv: Move) -> bool {
    let mut after = position.clone();
    after.play_unchecked(mv);
    after.is_check()
}

/// Whether the piece of `color` on `square` is absolutely pinned to its
/// own king: some enemy slider is aligned with the king and this piece is
/// the only thing standing between them.
pub fn is_pinned(position: &Chess, color: Color, square: Square) -> bool {
    let board = position.board();
    let Some(king) = board.king_of(color) else {
        return false;
    };
    if square == king || !board.by_color(color).contains(square) {
        return false;
    }

    let occupied = board.occupied();
    let snipers = ((attacks::rook_attacks(king, Bitboard::EMPTY) & board.rooks_and_queens())
        | (attacks::bishop_attacks(king, Bitboard::EMPTY) & board.bishops_and_queens()))
        & board.by_color(!color);

    for sniper in snipers {
        let blockers = attacks::between(king, sniper) & occupied;
        if blockers.count() == 1 && blockers.contains(square) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::{fen::Fen, CastlingMode};

    fn position(fen: &str) -> Chess {
        fen.parse::<Fen>()
            .unwrap()
            .into_position(CastlingMode::Standard)
            .unwrap()
    }

    #[test]
    fn attack_set_respects_blockers() {
        // White pawn e4 attacks d5; the black rook behind the knight on d5
        // does not reach d5's attacker list for white.
        let pos = position("k2r4/8/8/3n4/4P3/8/8/7K w - - 0 1");
        let white = attack_set(&pos, Square::D5, Color::White);
        assert_eq!(white.count(), 1);
        assert!(white.contains(Square::E4));

        // The rook on d8 defends the knight.
        let black = defender_set(&pos, Square::D5, Color::Black);
        assert_eq!(black.count(), 1);
        assert!(black.contains(Square::D8));
    }

    #[test]
    fn defender_set_never_includes_the_square_itself() {
        let pos = Chess::default();
        for square in pos.board().by_color(Color::White) {
            assert!(!defender_set(&pos, square, Color::White).contains(square));
        }
    }

    #[test]
    fn gives_check_is_side_effect_free() {
        let pos = position("r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4");
        let before = Fen::from_position(&pos, shakmaty::EnPassantMode::Legal).to_string();

        let checking: Vec<Move> = pos
            .legal_moves()
            .into_iter()
            .filter(|&mv| gives_check(&pos, mv))
            .collect();
        assert_eq!(checking.len(), 3); // Qxf7#, Bxf7+, Qxe5+

        let after = Fen::from_position(&pos, shakmaty::EnPassantMode::Legal).to_string();
        assert_eq!(before, after);
    }

    #[test]
    fn pinned_rook_on_the_kings_file() {
        let pos = position("k3q3/8/8/8/4R3/8/8/4K3 w - - 0 1");
        assert!(is_pinned(&pos, Color::White, Square::E4));
        assert!(!is_pinned(&pos, Color::White, Square::E1));
        // The queen is not pinned for black.
        assert!(!is_pinned(&pos, Color::Black, Square::E8));
    }

    #[test]
    fn two_blockers_mean_no_pin() {
        // Rook e4 and bishop e3 both sit between the king and the queen.
        let pos = position("k3q3/8/8/8/4R3/4B3/8/4K3 w - - 0 1");
        assert!(!is_pinned(&pos, Color::White, Square::E4));
        assert!(!is_pinned(&pos, Color::White, Square::E3));
    }
}
