use std::fmt::{self, Display, Formatter};

use crate::{
    piece::{Piece, PieceKind},
    position::Position,
};

/// Extra source-square information SAN needs when more than one piece of
/// the same kind can reach the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Disambiguation {
    pub needs_file: bool,
    pub needs_rank: bool,
}

/// A single ply as it was played.
///
/// `piece` and `captured` are copies taken before the board changed, so a
/// move stays meaningful however far the game advances afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub promotion: Option<PieceKind>,
    pub is_castling: bool,
    pub is_en_passant: bool,
    pub is_check: bool,
    pub is_checkmate: bool,
    pub disambiguation: Disambiguation,
}
impl Move {
    pub fn new(from: Position, to: Position, piece: Piece) -> Self {
        Move {
            from,
            to,
            piece,
            captured: None,
            promotion: None,
            is_castling: false,
            is_en_passant: false,
            is_check: false,
            is_checkmate: false,
            disambiguation: Disambiguation::default(),
        }
    }
    pub fn is_capture(&self) -> bool {
        self.captured.is_some() || self.is_en_passant
    }
    pub fn is_promotion(&self) -> bool {
        self.piece.kind == PieceKind::Pawn && self.to.row == self.piece.color.promotion_rank()
    }
    /// Pawn advance of two squares, the move that opens en passant.
    pub fn is_double_pawn_push(&self) -> bool {
        self.piece.kind == PieceKind::Pawn
            && self.from.col == self.to.col
            && (self.from.row - self.to.row).abs() == 2
    }
    pub fn to_san(&self) -> String {
        self.to_string()
    }
}
impl Display for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_castling {
            if self.to.col == 6 {
                write!(f, "O-O")?;
            } else {
                write!(f, "O-O-O")?;
            }
        } else {
            if let Some(letter) = self.piece.kind.san_letter() {
                write!(f, "{letter}")?;
            }
            if self.disambiguation.needs_file
                && let Some(file) = self.from.file()
            {
                write!(f, "{file}")?;
            }
            if self.disambiguation.needs_rank
                && let Some(rank) = self.from.rank()
            {
                write!(f, "{rank}")?;
            }
            if self.is_capture() {
                if self.piece.kind == PieceKind::Pawn
                    && let Some(file) = self.from.file()
                {
                    write!(f, "{file}")?;
                }
                write!(f, "x")?;
            }
            write!(f, "{}", self.to)?;
            if self.is_promotion() {
                let kind = self.promotion.unwrap_or(PieceKind::Queen);
                write!(f, "={}", kind.uppercase())?;
            }
        }
        if self.is_checkmate {
            write!(f, "#")?;
        } else if self.is_check {
            write!(f, "+")?;
        }
        Ok(())
    }
}
