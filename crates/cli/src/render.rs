//! Markdown rendering of analysis reports
//!
//! All formatting lives here; the core only hands over square
//! coordinates, so piece letters are looked up from the position.

use shakmaty::{Chess, Color, Position, Square};
use whatthemove_core::AnalysisReport;

pub fn markdown(position: &Chess, report: &AnalysisReport, san: &str) -> String {
    let mut lines = Vec::new();

    lines.push(format!(
        "### Move {}: {} plays `{}`",
        report.move_number,
        color_name(report.color),
        san
    ));
    lines.push(String::new());

    lines.push("**Kings**".to_string());
    lines.push(format!(
        "- Own king on open file: {}",
        yes_no(report.king_safety.own_open_file)
    ));
    lines.push(format!(
        "- Opponent king on open file: {}",
        yes_no(report.king_safety.opponent_open_file)
    ));
    lines.push(format!(
        "- Available checks: {}",
        join_or_none(report.available_checks.iter().map(|c| c.san.clone()))
    ));
    if !report.checkmate_threats.is_empty() {
        let threats: Vec<String> = report
            .checkmate_threats
            .iter()
            .map(|t| format!("Checkmate threat: {}", t.mv))
            .collect();
        lines.push(format!("- {}", threats.join(", ")));
    }
    lines.push(String::new());

    lines.push("**Things**".to_string());
    lines.push(format!(
        "- Hanging pieces: {}",
        join_or_none(report.hanging.iter().map(|h| piece_tag(position, h.square)))
    ));
    lines.push(format!(
        "- Loose pieces: {}",
        join_or_none(report.loose.iter().map(|l| piece_tag(position, l.square)))
    ));
    lines.push(format!(
        "- Overloaded pieces: {}",
        join_or_none(
            report
                .overloaded_defenders
                .iter()
                .map(|o| piece_tag(position, o.square))
        )
    ));
    lines.push(format!(
        "- Weak pawns: {}",
        join_or_none(report.weak_pawns.iter().map(|w| w.square.to_string()))
    ));
    lines.push(String::new());

    lines.push("**Strings**".to_string());
    lines.push(format!(
        "- Potential pins: {}",
        join_or_none(report.pins.iter().map(|p| format!(
            "{} pinned by {}",
            piece_tag(position, p.pinned),
            piece_tag(position, p.pinner)
        )))
    ));
    lines.push(format!(
        "- Potential discovered checks: {}",
        join_or_none(report.discovered_checks.iter().map(|d| format!(
            "{} moving reveals check from {}",
            piece_tag(position, d.mover),
            piece_tag(position, d.attacker)
        )))
    ));

    lines.join("\n")
}

fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

fn join_or_none(items: impl Iterator<Item = String>) -> String {
    let joined: Vec<String> = items.collect();
    if joined.is_empty() {
        "None".to_string()
    } else {
        joined.join(", ")
    }
}

/// `N@d5`-style tag, uppercase for white pieces, lowercase for black.
fn piece_tag(position: &Chess, square: Square) -> String {
    match position.board().piece_at(square) {
        Some(piece) => format!("{}@{}", piece.char(), square),
        None => square.to_string(),
    }
}
