//! PGN parsing and game replay
//!
//! The visitor only collects tags and mainline SAN strings; legality is
//! checked when the game is replayed into per-ply positions.

use pgn_reader::{RawTag, SanPlus, Skip, Visitor};
use shakmaty::{san::San, Chess, Color, Position};
use std::fs;
use std::io::Cursor;
use std::ops::ControlFlow;
use std::path::Path;

use crate::error::{Error, Result};

/// A parsed chess game: tags plus the mainline moves in SAN.
#[derive(Debug, Clone)]
pub struct ParsedGame {
    pub event: Option<String>,
    pub site: Option<String>,
    pub date: Option<String>,
    pub white: Option<String>,
    pub black: Option<String>,
    pub result: Option<String>,
    pub moves: Vec<String>,
}

/// One mainline ply: the move just played and the position it produced.
#[derive(Debug, Clone)]
pub struct PlyPosition {
    pub ply: usize,
    pub move_number: u32,
    pub mover: Color,
    pub san: String,
    pub position: Chess,
}

impl ParsedGame {
    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    pub fn summary(&self) -> String {
        let white = self.white.as_deref().unwrap_or("Unknown");
        let black = self.black.as_deref().unwrap_or("Unknown");
        let result = self.result.as_deref().unwrap_or("*");
        format!("{} vs {} - {}", white, black, result)
    }

    /// Replays the mainline from the starting position and returns the
    /// position after every ply, in order.
    pub fn replay(&self) -> Result<Vec<PlyPosition>> {
        let mut position = Chess::default();
        let mut plies = Vec::with_capacity(self.moves.len());

        for (ply, san_str) in self.moves.iter().enumerate() {
            let san: San = san_str
                .parse()
                .map_err(|e| Error::Pgn(format!("bad SAN '{}' at ply {}: {}", san_str, ply, e)))?;
            let mv = san.to_move(&position).map_err(|e| {
                Error::Pgn(format!("illegal move '{}' at ply {}: {}", san_str, ply, e))
            })?;
            let mover = position.turn();
            position = position.play(mv).map_err(|e| {
                Error::Pgn(format!("illegal move '{}' at ply {}: {}", san_str, ply, e))
            })?;

            plies.push(PlyPosition {
                ply,
                move_number: ply as u32 / 2 + 1,
                mover,
                san: san_str.clone(),
                position: position.clone(),
            });
        }
        Ok(plies)
    }
}

#[derive(Default)]
struct GameTags {
    event: Option<String>,
    site: Option<String>,
    date: Option<String>,
    white: Option<String>,
    black: Option<String>,
    result: Option<String>,
}

struct GameMoves {
    tags: GameTags,
    moves: Vec<String>,
}

struct GameCollector;

impl Visitor for GameCollector {
    type Tags = GameTags;
    type Movetext = GameMoves;
    type Output = ParsedGame;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        ControlFlow::Continue(GameTags::default())
    }

    fn tag(
        &mut self,
        tags: &mut Self::Tags,
        name: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        let value_str = value.decode_utf8_lossy().to_string();
        match String::from_utf8_lossy(name).as_ref() {
            "Event" => tags.event = Some(value_str),
            "Site" => tags.site = Some(value_str),
            "Date" => tags.date = Some(value_str),
            "White" => tags.white = Some(value_str),
            "Black" => tags.black = Some(value_str),
            "Result" => tags.result = Some(value_str),
            _ => {}
        }
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: Self::Tags) -> ControlFlow<Self::Output, Self::Movetext> {
        ControlFlow::Continue(GameMoves {
            tags,
            moves: Vec::new(),
        })
    }

    fn san(&mut self, movetext: &mut Self::Movetext, san: SanPlus) -> ControlFlow<Self::Output> {
        movetext.moves.push(san.san.to_string());
        ControlFlow::Continue(())
    }

    fn begin_variation(
        &mut self,
        _movetext: &mut Self::Movetext,
    ) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn end_game(&mut self, movetext: Self::Movetext) -> Self::Output {
        ParsedGame {
            event: movetext.tags.event,
            site: movetext.tags.site,
            date: movetext.tags.date,
            white: movetext.tags.white,
            black: movetext.tags.black,
            result: movetext.tags.result,
            moves: movetext.moves,
        }
    }
}

pub fn parse_pgn_file<P: AsRef<Path>>(path: P) -> Result<Vec<ParsedGame>> {
    let contents = fs::read_to_string(path)?;
    parse_pgn_string(&contents)
}

pub fn parse_pgn_string(pgn: &str) -> Result<Vec<ParsedGame>> {
    let mut collector = GameCollector;
    let mut games = Vec::new();

    let cursor = Cursor::new(pgn.as_bytes());
    let mut reader = pgn_reader::Reader::new(cursor);

    loop {
        match reader.read_game(&mut collector) {
            Ok(Some(game)) => games.push(game),
            Ok(None) => break,
            Err(e) => return Err(Error::Pgn(e.to_string())),
        }
    }

    if games.is_empty() {
        return Err(Error::Pgn("no games found".to_string()));
    }
    Ok(games)
}
