//! Chess rules engine with SAN output and a game history that can be
//! navigated.
#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod board;
pub mod color;
pub mod fen;
pub mod game;
pub mod movement;
pub mod piece;
pub mod position;
pub mod special;
pub mod validator;

#[cfg(test)]
mod fuzz;

pub use board::Board;
pub use color::Color;
pub use fen::{Fen, ParseFenError};
pub use game::{Game, GameOptions, GameSnapshot, GameStatus, MoveError};
pub use movement::{Disambiguation, Move};
pub use piece::{Piece, PieceKind, PieceRecord};
pub use position::{ParsePositionError, Position, PositionRecord};
pub use validator::MoveValidator;
