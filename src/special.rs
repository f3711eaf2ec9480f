//! Board side effects of castling, en passant and promotion.
//!
//! Nothing here checks legality; callers hand in moves that
//! [`crate::validator::MoveValidator`] already accepted.

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use crate::{
    board::Board,
    piece::{Piece, PieceKind},
    position::Position,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromotionError {
    NoPawn(Position),
    InvalidKind(PieceKind),
}
impl Display for PromotionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PromotionError::NoPawn(position) => write!(f, "no pawn to promote on {position}")?,
            PromotionError::InvalidKind(kind) => write!(f, "a pawn cannot promote to a {kind}")?,
        }
        Ok(())
    }
}
impl Error for PromotionError {}

/// What a move did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Execution {
    pub captured: Option<Piece>,
    pub is_castling: bool,
    pub is_en_passant: bool,
}

pub fn is_castling(piece: Piece, from: Position, to: Position) -> bool {
    piece.kind == PieceKind::King && (to.col - from.col).abs() == 2
}
/// A pawn moving diagonally onto an empty square.
pub fn is_en_passant(board: &Board, piece: Piece, from: Position, to: Position) -> bool {
    piece.kind == PieceKind::Pawn && from.col != to.col && board.get_piece(to).is_none()
}
/// Moves the king two files, then places the rook on the square it passed.
pub fn perform_castling(board: &mut Board, from: Position, to: Position) {
    board.move_piece(from, to);
    let (rook_from, rook_to) = if to.col > from.col {
        (Position::new(from.row, 7), Position::new(from.row, to.col - 1))
    } else {
        (Position::new(from.row, 0), Position::new(from.row, to.col + 1))
    };
    board.move_piece(rook_from, rook_to);
}
/// Returns the captured pawn, taken from the origin rank at the
/// destination's file.
pub fn perform_en_passant(board: &mut Board, from: Position, to: Position) -> Option<Piece> {
    board.move_piece(from, to);
    board[Position::new(from.row, to.col)].take()
}
/// Replaces the pawn on `position` with a fresh, already moved piece of
/// `kind` and the same color.
pub fn promote(board: &mut Board, position: Position, kind: PieceKind) -> Result<(), PromotionError> {
    if !kind.can_promote_to() {
        return Err(PromotionError::InvalidKind(kind));
    }
    let pawn = board
        .get_piece(position)
        .filter(|piece| piece.kind == PieceKind::Pawn)
        .ok_or(PromotionError::NoPawn(position))?;
    board[position] = Some(Piece::moved(kind, pawn.color));
    Ok(())
}
/// Promotes if a pawn now stands on its promotion rank; does nothing
/// otherwise.
pub fn promote_if_needed(
    board: &mut Board,
    position: Position,
    kind: Option<PieceKind>,
) -> Result<bool, PromotionError> {
    let Some(piece) = board.get_piece(position) else {
        return Ok(false);
    };
    if piece.kind != PieceKind::Pawn || position.row != piece.color.promotion_rank() {
        return Ok(false);
    }
    promote(board, position, kind.unwrap_or(PieceKind::Queen))?;
    Ok(true)
}
/// Applies a move on `board`, dispatching to castling or en passant by the
/// shape of the move. Promotion is left to the caller.
///
/// # Panics
/// Panics if either position is off the board.
pub fn execute(board: &mut Board, from: Position, to: Position) -> Execution {
    let Some(piece) = board.get_piece(from) else {
        return Execution::default();
    };
    if is_castling(piece, from, to) {
        perform_castling(board, from, to);
        Execution {
            captured: None,
            is_castling: true,
            is_en_passant: false,
        }
    } else if is_en_passant(board, piece, from, to) {
        Execution {
            captured: perform_en_passant(board, from, to),
            is_castling: false,
            is_en_passant: true,
        }
    } else {
        Execution {
            captured: board.move_piece(from, to),
            is_castling: false,
            is_en_passant: false,
        }
    }
}
#[cfg(test)]
mod test {
    use crate::{
        board::Board,
        color::Color,
        piece::PieceKind,
        position::Position,
        special::{PromotionError, execute, promote, promote_if_needed},
    };

    fn at(s: &str) -> Position {
        s.parse().unwrap()
    }

    #[test]
    fn castling_relocates_rook() {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R").unwrap();
        let execution = execute(&mut board, at("e1"), at("g1"));
        assert!(execution.is_castling);
        assert_eq!(board.fen(), "r3k2r/8/8/8/8/8/8/R4RK1");
        let execution = execute(&mut board, at("e8"), at("c8"));
        assert!(execution.is_castling);
        assert_eq!(board.fen(), "2kr3r/8/8/8/8/8/8/R4RK1");
        assert!(board.get_piece(at("d8")).unwrap().moved);
    }
    #[test]
    fn en_passant_removes_passed_pawn() {
        let mut board = Board::from_fen("8/8/8/3pP3/8/8/8/8").unwrap();
        let execution = execute(&mut board, at("e5"), at("d6"));
        assert!(execution.is_en_passant);
        assert_eq!(
            execution.captured.map(|piece| (piece.kind, piece.color)),
            Some((PieceKind::Pawn, Color::Black))
        );
        assert_eq!(board.fen(), "8/8/3P4/8/8/8/8/8");
    }
    #[test]
    fn plain_capture() {
        let mut board = Board::from_fen("8/8/8/3p4/4P3/8/8/8").unwrap();
        let execution = execute(&mut board, at("e4"), at("d5"));
        assert!(!execution.is_en_passant);
        assert!(execution.captured.is_some());
        assert_eq!(board.fen(), "8/8/8/3P4/8/8/8/8");
    }
    #[test]
    fn promotion() {
        let mut board = Board::from_fen("P7/8/8/8/8/8/8/7p").unwrap();
        assert_eq!(promote_if_needed(&mut board, at("a8"), None), Ok(true));
        assert_eq!(
            promote_if_needed(&mut board, at("h1"), Some(PieceKind::Knight)),
            Ok(true)
        );
        assert_eq!(board.fen(), "Q7/8/8/8/8/8/8/7n");
        let queen = board.get_piece(at("a8")).unwrap();
        assert!(queen.moved);
        assert_eq!(queen.color, Color::White);
    }
    #[test]
    fn promotion_contract() {
        let mut board = Board::from_fen("N7/8/8/8/8/8/4P3/8").unwrap();
        assert_eq!(
            promote(&mut board, at("a8"), PieceKind::Queen),
            Err(PromotionError::NoPawn(at("a8")))
        );
        assert_eq!(
            promote(&mut board, at("e2"), PieceKind::King),
            Err(PromotionError::InvalidKind(PieceKind::King))
        );
        assert_eq!(promote_if_needed(&mut board, at("e2"), None), Ok(false));
        assert_eq!(promote_if_needed(&mut board, at("d4"), None), Ok(false));
    }
}
