//! Motif detection engine
//!
//! Each evaluator reads the position, and the check scanner and
//! discovered-check detector additionally borrow it mutably through the
//! [`HypotheticalMove`] guard for single-ply lookahead. No evaluator
//! depends on another's intermediate state, and the position is back in
//! its original state when [`analyze`] returns.

use shakmaty::{san::SanPlus, Chess, Color, File, Move, Position, Rank, Role, Square};

use super::types::{
    AnalysisReport, CheckMove, CheckmateThreat, DiscoveredCheck, HangingPiece, KingSafety,
    LoosePiece, OverloadedDefender, Pin, WeakPawn,
};
use crate::board::{
    attack_set, defender_set, first_piece_along, gives_check, is_pinned, Direction,
    HypotheticalMove,
};
use crate::error::{Error, Result};

/// Runs every motif evaluator against `position` from `color`'s
/// perspective and assembles the per-color report.
///
/// The exclusive borrow lasts for the whole call: hypothetical moves are
/// applied in place and undone before this returns, so no other reader
/// may observe the position in the meantime.
pub fn analyze(position: &mut Chess, color: Color, move_number: u32) -> Result<AnalysisReport> {
    for side in [Color::White, Color::Black] {
        if position.board().king_of(side).is_none() {
            return Err(Error::MissingKing(side));
        }
    }

    let king_safety = king_safety(position, color)?;
    let threats = scan_checks(position)?;
    let vulnerabilities = classify_vulnerabilities(position, color);
    let pins = find_pins(position, color)?;
    let discovered_checks = find_discovered_checks(position)?;

    Ok(AnalysisReport {
        color,
        move_number,
        king_safety,
        available_checks: threats.available,
        checkmate_threats: threats.mates,
        hanging: vulnerabilities.hanging,
        loose: vulnerabilities.loose,
        overloaded_defenders: vulnerabilities.overloaded,
        weak_pawns: vulnerabilities.weak_pawns,
        pins,
        discovered_checks,
    })
}

fn king_safety(position: &Chess, color: Color) -> Result<KingSafety> {
    Ok(KingSafety {
        own_open_file: king_file_open(position, color)?,
        opponent_open_file: king_file_open(position, !color)?,
    })
}

/// Occupancy test: every square on the king's file is empty or holds a
/// king (either color's).
fn king_file_open(position: &Chess, color: Color) -> Result<bool> {
    let board = position.board();
    let king = board.king_of(color).ok_or(Error::MissingKing(color))?;
    Ok(Rank::ALL.into_iter().all(|rank| {
        match board.piece_at(Square::from_coords(king.file(), rank)) {
            None => true,
            Some(piece) => piece.role == Role::King,
        }
    }))
}

struct ThreatScan {
    available: Vec<CheckMove>,
    mates: Vec<CheckmateThreat>,
}

/// Checking moves for the side to move, in move-generator order, plus the
/// subset that delivers checkmate.
fn scan_checks(position: &mut Chess) -> Result<ThreatScan> {
    let mut scan = ThreatScan {
        available: Vec::new(),
        mates: Vec::new(),
    };

    let moves = position.legal_moves();
    for mv in moves {
        if !gives_check(position, mv) {
            continue;
        }
        let san = SanPlus::from_move(position.clone(), mv).to_string();

        let guard = HypotheticalMove::play(position, mv);
        let is_mate = guard.position().is_checkmate();
        guard.finish()?;

        if is_mate {
            scan.mates.push(CheckmateThreat {
                mv: move_description(mv),
            });
        }
        scan.available.push(CheckMove { san });
    }
    Ok(scan)
}

#[derive(Default)]
struct Vulnerabilities {
    hanging: Vec<HangingPiece>,
    loose: Vec<LoosePiece>,
    overloaded: Vec<OverloadedDefender>,
    weak_pawns: Vec<WeakPawn>,
}

/// Partitions `color`'s pieces into hanging / loose / overload-candidate,
/// first matching rule winning, and independently collects undefended
/// pawns as weak.
fn classify_vulnerabilities(position: &Chess, color: Color) -> Vulnerabilities {
    let board = position.board();
    let mut out = Vulnerabilities::default();

    for square in board.by_color(color) {
        let Some(piece) = board.piece_at(square) else {
            continue;
        };
        let attackers = attack_set(position, square, !color);
        let defenders = defender_set(position, square, color);

        if !attackers.is_empty() && defenders.is_empty() {
            out.hanging.push(HangingPiece { square });
        } else if defenders.is_empty() {
            out.loose.push(LoosePiece { square });
        } else if defenders.count() == 1 {
            if let Some(defender) = defenders.into_iter().next() {
                let seen = out.overloaded.iter().any(|o| o.square == defender);
                if !seen && sole_dependents(position, color, defender) > 1 {
                    out.overloaded.push(OverloadedDefender { square: defender });
                }
            }
        }

        if piece.role == Role::Pawn && defenders.is_empty() {
            out.weak_pawns.push(WeakPawn { square });
        }
    }
    out
}

/// How many of `color`'s pieces have `defender` as their only defender.
/// Pieces with a second defender never count, even if `defender` also
/// protects them.
fn sole_dependents(position: &Chess, color: Color, defender: Square) -> usize {
    position
        .board()
        .by_color(color)
        .into_iter()
        .filter(|&square| {
            let defenders = defender_set(position, square, color);
            defenders.count() == 1 && defenders.contains(defender)
        })
        .count()
}

/// Absolute pins against `color`'s king, each resolved to the enemy piece
/// delivering it. A pin whose ray yields no enemy piece is logged and
/// omitted rather than failing the report.
fn find_pins(position: &Chess, color: Color) -> Result<Vec<Pin>> {
    let board = position.board();
    let king = board.king_of(color).ok_or(Error::MissingKing(color))?;

    let mut pins = Vec::new();
    for square in board.by_color(color) {
        if !is_pinned(position, color, square) {
            continue;
        }
        match resolve_pinner(position, color, king, square) {
            Ok(pinner) => pins.push(Pin {
                pinned: square,
                pinner,
            }),
            Err(Error::InconsistentPin { pinned }) => {
                tracing::warn!(%pinned, "pinned piece has no reachable pinner, omitting");
            }
            Err(other) => return Err(other),
        }
    }
    Ok(pins)
}

/// Walks from the pinned piece away from the king; the first occupied
/// square must hold the enemy pinner.
fn resolve_pinner(position: &Chess, color: Color, king: Square, pinned: Square) -> Result<Square> {
    let board = position.board();
    let direction = Direction::between(king, pinned).ok_or(Error::InconsistentPin { pinned })?;
    match first_piece_along(board, pinned, direction) {
        Some(square) if board.by_color(!color).contains(square) => Ok(square),
        _ => Err(Error::InconsistentPin { pinned }),
    }
}

/// Moves of the side to move that put the opponent in check through a
/// piece other than the one that moved. One attacker is reported per
/// move, the first in attack-set order.
fn find_discovered_checks(position: &mut Chess) -> Result<Vec<DiscoveredCheck>> {
    let mover_color = position.turn();
    let mut discovered = Vec::new();

    let moves = position.legal_moves();
    for mv in moves {
        let Some(from) = mv.from() else {
            continue;
        };
        let to = mv.to();

        let guard = HypotheticalMove::play(position, mv);
        let after = guard.position();
        let mut attacker = None;
        if after.is_check() {
            if let Some(king) = after.board().king_of(!mover_color) {
                attacker = attack_set(after, king, mover_color)
                    .into_iter()
                    .find(|&square| square != to);
            }
        }
        guard.finish()?;

        if let Some(attacker) = attacker {
            discovered.push(DiscoveredCheck {
                mover: from,
                attacker,
            });
        }
    }
    Ok(discovered)
}

/// Coordinate notation for a move, promotions suffixed with the piece
/// letter and castling written as the king's two-square hop.
fn move_description(mv: Move) -> String {
    match mv {
        Move::Normal {
            from,
            to,
            promotion,
            ..
        } => match promotion {
            Some(role) => format!("{}{}{}", from, to, role.char()),
            None => format!("{}{}", from, to),
        },
        Move::EnPassant { from, to, .. } => format!("{}{}", from, to),
        Move::Castle { king, rook } => {
            let king_to = if rook.file() > king.file() {
                Square::from_coords(File::G, king.rank())
            } else {
                Square::from_coords(File::C, king.rank())
            };
            format!("{}{}", king, king_to)
        }
        Move::Put { .. } => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::{fen::Fen, CastlingMode, EnPassantMode};

    fn position(fen: &str) -> Chess {
        fen.parse::<Fen>()
            .unwrap()
            .into_position(CastlingMode::Standard)
            .unwrap()
    }

    fn fen_of(position: &Chess) -> String {
        Fen::from_position(position, EnPassantMode::Legal).to_string()
    }

    fn squares(pieces: &[HangingPiece]) -> Vec<Square> {
        pieces.iter().map(|p| p.square).collect()
    }

    #[test]
    fn king_on_an_empty_file_is_open() {
        let pos = position("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        let safety = king_safety(&pos, Color::White).unwrap();
        assert!(safety.own_open_file);
        // The opponent king sits on the same file and kings don't count.
        assert!(safety.opponent_open_file);
    }

    #[test]
    fn any_non_king_piece_closes_the_file() {
        let pos = position("4k3/8/8/8/4P3/8/8/4K3 w - - 0 1");
        let safety = king_safety(&pos, Color::White).unwrap();
        assert!(!safety.own_open_file);
        assert!(!safety.opponent_open_file);
    }

    #[test]
    fn attacked_undefended_knight_is_hanging() {
        let pos = position("k7/8/8/3n4/4P3/8/8/7K b - - 0 1");
        let v = classify_vulnerabilities(&pos, Color::Black);
        assert_eq!(squares(&v.hanging), vec![Square::D5]);
        // The bare king has neither attackers nor defenders.
        assert_eq!(v.loose.len(), 1);
        assert_eq!(v.loose[0].square, Square::A8);
        assert!(v.weak_pawns.is_empty());
    }

    #[test]
    fn defended_unattacked_knight_is_neither_hanging_nor_loose() {
        let pos = position("k7/8/2p5/3n4/8/8/8/7K b - - 0 1");
        let v = classify_vulnerabilities(&pos, Color::Black);
        assert!(v.hanging.is_empty());
        let loose: Vec<Square> = v.loose.iter().map(|p| p.square).collect();
        assert!(!loose.contains(&Square::D5));
        // The defending pawn itself is loose and weak.
        assert!(loose.contains(&Square::C6));
        assert_eq!(v.weak_pawns.len(), 1);
        assert_eq!(v.weak_pawns[0].square, Square::C6);
    }

    #[test]
    fn hanging_pawn_is_also_weak() {
        let pos = position("k7/8/8/3p4/8/8/8/3R3K b - - 0 1");
        let v = classify_vulnerabilities(&pos, Color::Black);
        assert_eq!(squares(&v.hanging), vec![Square::D5]);
        assert_eq!(v.weak_pawns.len(), 1);
        assert_eq!(v.weak_pawns[0].square, Square::D5);
    }

    #[test]
    fn hanging_and_loose_never_share_a_square() {
        let pos = Chess::default();
        for color in [Color::White, Color::Black] {
            let v = classify_vulnerabilities(&pos, color);
            for hanging in &v.hanging {
                assert!(v.loose.iter().all(|l| l.square != hanging.square));
            }
        }
    }

    #[test]
    fn shared_sole_defender_is_flagged_once() {
        // The d2 pawn is the only defender of both c3 and e3.
        let pos = position("k7/8/8/8/8/2P1P3/3P4/7K w - - 0 1");
        let v = classify_vulnerabilities(&pos, Color::White);
        let flagged: Vec<Square> = v.overloaded.iter().map(|o| o.square).collect();
        assert_eq!(flagged, vec![Square::D2]);
    }

    #[test]
    fn defender_with_one_dependent_is_not_overloaded() {
        // c6 defends only the knight on d5.
        let pos = position("k7/8/2p5/3n4/8/8/8/7K b - - 0 1");
        let v = classify_vulnerabilities(&pos, Color::Black);
        assert!(v.overloaded.is_empty());
    }

    #[test]
    fn starting_position_classification() {
        let v = classify_vulnerabilities(&Chess::default(), Color::White);
        assert!(v.hanging.is_empty());
        assert!(v.weak_pawns.is_empty());
        let loose: Vec<Square> = v.loose.iter().map(|p| p.square).collect();
        assert_eq!(loose, vec![Square::A1, Square::H1]);
        // a1 solely defends b1+a2, d1 solely defends c1+e1, e1 solely
        // defends d1+f2, h1 solely defends g1+h2.
        let flagged: Vec<Square> = v.overloaded.iter().map(|o| o.square).collect();
        assert_eq!(flagged, vec![Square::A1, Square::D1, Square::E1, Square::H1]);
    }

    #[test]
    fn scholars_mate_is_reported_as_checkmate_threat() {
        let mut pos =
            position("r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4");
        let before = fen_of(&pos);

        let scan = scan_checks(&mut pos).unwrap();
        let sans: Vec<&str> = scan.available.iter().map(|c| c.san.as_str()).collect();
        assert_eq!(sans.len(), 3);
        assert!(sans.contains(&"Qxf7#"));
        assert!(sans.contains(&"Bxf7+"));
        assert!(sans.contains(&"Qxe5+"));

        assert_eq!(scan.mates.len(), 1);
        assert_eq!(scan.mates[0].mv, "h5f7");

        assert_eq!(fen_of(&pos), before);
    }

    #[test]
    fn position_without_checks_yields_empty_lists() {
        let mut pos = Chess::default();
        let scan = scan_checks(&mut pos).unwrap();
        assert!(scan.available.is_empty());
        assert!(scan.mates.is_empty());
    }

    #[test]
    fn pinned_rook_resolves_to_the_queen_behind_it() {
        let pos = position("k3q3/8/8/8/4R3/8/8/4K3 w - - 0 1");
        let pins = find_pins(&pos, Color::White).unwrap();
        assert_eq!(
            pins,
            vec![Pin {
                pinned: Square::E4,
                pinner: Square::E8,
            }]
        );
        // Nothing is pinned for black.
        assert!(find_pins(&pos, Color::Black).unwrap().is_empty());
    }

    #[test]
    fn bishop_moves_reveal_the_rook_check() {
        let mut pos = position("4k3/8/8/8/8/4B3/8/4R1K1 w - - 0 1");
        let before = fen_of(&pos);

        let discovered = find_discovered_checks(&mut pos).unwrap();
        // Every bishop move leaves the e-file and reveals the rook.
        assert_eq!(discovered.len(), 10);
        for d in &discovered {
            assert_eq!(d.mover, Square::E3);
            assert_eq!(d.attacker, Square::E1);
        }

        assert_eq!(fen_of(&pos), before);
    }

    #[test]
    fn direct_checks_are_not_discovered() {
        let mut pos =
            position("r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4");
        assert!(find_discovered_checks(&mut pos).unwrap().is_empty());
    }

    #[test]
    fn analyze_is_idempotent_and_restores_the_position() {
        let mut pos =
            position("r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4");
        let before = fen_of(&pos);

        let first = analyze(&mut pos, Color::White, 4).unwrap();
        let second = analyze(&mut pos, Color::White, 4).unwrap();
        assert_eq!(first, second);
        assert_eq!(fen_of(&pos), before);

        assert_eq!(first.color, Color::White);
        assert_eq!(first.move_number, 4);
        assert_eq!(first.checkmate_threats.len(), 1);
    }

    #[test]
    fn report_lists_default_to_empty() {
        let mut pos = Chess::default();
        let report = analyze(&mut pos, Color::Black, 1).unwrap();
        assert!(report.available_checks.is_empty());
        assert!(report.checkmate_threats.is_empty());
        assert!(report.hanging.is_empty());
        assert!(report.weak_pawns.is_empty());
        assert!(report.pins.is_empty());
        assert!(report.discovered_checks.is_empty());
        assert!(!report.king_safety.own_open_file);
    }
}
