use tracing::trace;

use crate::{
    board::Board,
    color::Color,
    movement::{Disambiguation, Move},
    piece::{Piece, PieceKind},
    position::Position,
    special,
};

/// Legal-move oracle for one position.
///
/// `last_move` is the move that produced `board`; it alone decides whether
/// en passant is available.
#[derive(Debug, Clone, Copy)]
pub struct MoveValidator<'a> {
    board: &'a Board,
    turn: Color,
    last_move: Option<&'a Move>,
}
impl<'a> MoveValidator<'a> {
    pub fn new(board: &'a Board, turn: Color, last_move: Option<&'a Move>) -> Self {
        MoveValidator {
            board,
            turn,
            last_move,
        }
    }
    /// Destinations the piece on `position` may legally move to. Empty when
    /// the square is empty or holds a piece of the side not to move.
    pub fn legal_moves(&self, position: Position) -> Vec<Position> {
        let Some(piece) = self.board.get_piece(position) else {
            return Vec::new();
        };
        if piece.color != self.turn {
            return Vec::new();
        }
        let mut candidates = piece.possible_moves(position, self.board);
        match piece.kind {
            PieceKind::King => candidates.extend(self.castling_moves(position, piece)),
            PieceKind::Pawn => candidates.extend(self.en_passant_move(position, piece)),
            _ => {}
        }
        candidates.retain(|destination| self.keeps_king_safe(position, *destination, piece.color));
        trace!(
            square = %position,
            count = candidates.len(),
            "legal moves generated"
        );
        candidates
    }
    pub fn is_legal(&self, from: Position, to: Position) -> bool {
        self.legal_moves(from).contains(&to)
    }
    /// Whether the side to move has at least one legal move.
    pub fn has_legal_move(&self) -> bool {
        self.board
            .all_pieces(self.turn)
            .into_iter()
            .any(|(position, _)| !self.legal_moves(position).is_empty())
    }
    /// Plays the move on a copy of the board and looks for check.
    fn keeps_king_safe(&self, from: Position, to: Position, color: Color) -> bool {
        let mut board = *self.board;
        special::execute(&mut board, from, to);
        !board.is_in_check(color)
    }
    /// Castling destinations of an unmoved king on its home square. Only
    /// the squares the king crosses and lands on must be free of attack.
    pub fn castling_moves(&self, position: Position, king: Piece) -> Vec<Position> {
        let row = king.color.back_rank();
        if king.kind != PieceKind::King
            || king.moved
            || position != Position::new(row, 4)
            || self.board.is_square_under_attack(position, !king.color)
        {
            return Vec::new();
        }
        let rook_ready = |col| {
            self.board
                .get_piece(Position::new(row, col))
                .is_some_and(|rook: Piece| {
                    rook.kind == PieceKind::Rook && rook.color == king.color && !rook.moved
                })
        };
        let empty = |cols: &[i8]| {
            cols.iter()
                .all(|col| self.board.get_piece(Position::new(row, *col)).is_none())
        };
        let safe = |cols: &[i8]| {
            cols.iter().all(|col| {
                !self
                    .board
                    .is_square_under_attack(Position::new(row, *col), !king.color)
            })
        };
        let mut moves = Vec::new();
        if rook_ready(7) && empty(&[5, 6]) && safe(&[5, 6]) {
            moves.push(Position::new(row, 6));
        }
        if rook_ready(0) && empty(&[1, 2, 3]) && safe(&[2, 3]) {
            moves.push(Position::new(row, 2));
        }
        moves
    }
    /// The en passant capture available to `pawn`, if the previous move was
    /// an adjacent enemy double push.
    pub fn en_passant_move(&self, position: Position, pawn: Piece) -> Option<Position> {
        if pawn.kind != PieceKind::Pawn || position.row != pawn.color.en_passant_rank() {
            return None;
        }
        let last = self.last_move?;
        let passed = last.is_double_pawn_push()
            && last.piece.color != pawn.color
            && last.to.row == position.row
            && (last.to.col - position.col).abs() == 1;
        passed.then(|| Position::new(position.row + pawn.color.pawn_direction(), last.to.col))
    }
    /// Source-square information SAN needs for moving the piece on `from`
    /// to `to`. Pawns and kings never need any.
    pub fn disambiguation(&self, from: Position, to: Position) -> Disambiguation {
        let Some(piece) = self.board.get_piece(from) else {
            return Disambiguation::default();
        };
        if matches!(piece.kind, PieceKind::Pawn | PieceKind::King) {
            return Disambiguation::default();
        }
        let rivals: Vec<Position> = self
            .board
            .all_pieces(piece.color)
            .into_iter()
            .filter(|(position, other)| *position != from && other.kind == piece.kind)
            .map(|(position, _)| position)
            .filter(|position| self.legal_moves(*position).contains(&to))
            .collect();
        if rivals.is_empty() {
            return Disambiguation::default();
        }
        let shares_file = rivals.iter().any(|rival| rival.col == from.col);
        let shares_rank = rivals.iter().any(|rival| rival.row == from.row);
        if !shares_file {
            Disambiguation {
                needs_file: true,
                needs_rank: false,
            }
        } else if !shares_rank {
            Disambiguation {
                needs_file: false,
                needs_rank: true,
            }
        } else {
            Disambiguation {
                needs_file: true,
                needs_rank: true,
            }
        }
    }
}
