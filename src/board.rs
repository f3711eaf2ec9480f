use std::{
    fmt::{self, Display, Formatter},
    ops::{Index, IndexMut},
};

use crate::{
    color::Color,
    fen::{Fen, ParseFenError},
    piece::{Piece, PieceKind, PieceRecord},
    position::Position,
};

/// 8×8 mailbox. Row 0 holds rank 8.
///
/// `Board` is `Copy`, so legality probing plays moves on independent copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}
impl Board {
    pub fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
        }
    }
    pub fn starting_position() -> Self {
        let mut board = Board::empty();
        for (col, kind) in (0..8).zip(PieceKind::STARTING_CONFIGURATION) {
            for color in [Color::White, Color::Black] {
                board[Position::new(color.back_rank(), col)] = Some(Piece::new(kind, color));
                board[Position::new(color.pawn_home_rank(), col)] =
                    Some(Piece::new(PieceKind::Pawn, color));
            }
        }
        board
    }
    pub fn from_fen(fen: &str) -> Result<Self, ParseFenError> {
        let Fen(board) = fen.parse()?;
        Ok(board)
    }
    /// Placement field of the FEN record describing this board.
    pub fn fen(&self) -> String {
        Fen(*self).to_string()
    }
    /// `None` for empty squares and for positions off the board.
    pub fn get_piece(&self, position: Position) -> Option<Piece> {
        if position.is_valid() {
            self[position]
        } else {
            None
        }
    }
    /// # Panics
    /// Panics if `position` is off the board.
    pub fn set_piece(&mut self, position: Position, piece: Option<Piece>) {
        self[position] = piece;
    }
    /// Moves whatever stands on `from` to `to`, marking it as moved, and
    /// returns what previously stood on `to`. Nothing is checked.
    ///
    /// # Panics
    /// Panics if either position is off the board.
    pub fn move_piece(&mut self, from: Position, to: Position) -> Option<Piece> {
        let piece = self[from].take().map(|piece| Piece {
            moved: true,
            ..piece
        });
        std::mem::replace(&mut self[to], piece)
    }
    /// Every occupied square, scanned row by row from rank 8.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Piece)> + '_ {
        (0..8)
            .flat_map(|row| (0..8).map(move |col| Position::new(row, col)))
            .filter_map(|position| Some((position, self[position]?)))
    }
    pub fn all_pieces(&self, color: Color) -> Vec<(Position, Piece)> {
        self.pieces()
            .filter(|(_, piece)| piece.color == color)
            .collect()
    }
    /// Whether any piece of `by_color` could move to or capture on
    /// `position`. Pawns count their diagonals only.
    pub fn is_square_under_attack(&self, position: Position, by_color: Color) -> bool {
        self.pieces()
            .filter(|(_, piece)| piece.color == by_color)
            .any(|(origin, piece)| {
                if piece.kind == PieceKind::Pawn {
                    piece.attack_positions(origin).contains(&position)
                } else {
                    piece.possible_moves(origin, self).contains(&position)
                }
            })
    }
    /// First king of `color` found, or [`Position::NOT_FOUND`].
    pub fn find_king(&self, color: Color) -> Position {
        self.pieces()
            .find(|(_, piece)| piece.kind == PieceKind::King && piece.color == color)
            .map_or(Position::NOT_FOUND, |(position, _)| position)
    }
    /// A side without a king is never in check.
    pub fn is_in_check(&self, color: Color) -> bool {
        let king = self.find_king(color);
        king.is_valid() && self.is_square_under_attack(king, !color)
    }
    /// Row-major records, `None` for empty squares.
    pub fn records(&self) -> [[Option<PieceRecord>; 8]; 8] {
        self.squares.map(|row| row.map(|piece| piece.map(Piece::record)))
    }
}
impl Default for Board {
    fn default() -> Self {
        Board::starting_position()
    }
}
impl Index<Position> for Board {
    type Output = Option<Piece>;

    fn index(&self, index: Position) -> &Self::Output {
        &self.squares[index.row as usize][index.col as usize]
    }
}
impl IndexMut<Position> for Board {
    fn index_mut(&mut self, index: Position) -> &mut Self::Output {
        &mut self.squares[index.row as usize][index.col as usize]
    }
}
impl Display for Board {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in 0..8 {
            for col in 0..8 {
                let symbol = self
                    .get_piece(Position::new(row, col))
                    .map_or('.', Piece::symbol);
                write!(f, "{symbol} ")?;
            }
            writeln!(f, "{}", 8 - row)?;
        }
        write!(f, "a b c d e f g h")?;
        Ok(())
    }
}
