//! WhatTheMove Core Library
//!
//! Analyzes a single chess position and produces a structured catalogue
//! of tactical motifs: king exposure, available checks and checkmate
//! threats, hanging/loose/overloaded/weak pieces, absolute pins with
//! their pinners, and discovered-check potential.

pub mod board;
pub mod error;
pub mod motifs;
pub mod parser;

pub use error::{Error, Result};
pub use motifs::{analyze, AnalysisReport};
pub use parser::{parse_pgn_file, parse_pgn_string, ParsedGame, PlyPosition};
