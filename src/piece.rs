use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use serde::Serialize;

use crate::{board::Board, color::Color, position::Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}
impl PieceKind {
    pub const PROMOTION_CHOICES: [Self; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];
    pub const STARTING_CONFIGURATION: [Self; 8] = [
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Queen,
        PieceKind::King,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Rook,
    ];
    pub fn uppercase(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }
    pub fn lowercase(self) -> char {
        self.uppercase().to_ascii_lowercase()
    }
    /// Letter used in algebraic notation, `None` for pawns.
    pub fn san_letter(self) -> Option<char> {
        (self != PieceKind::Pawn).then(|| self.uppercase())
    }
    pub fn can_promote_to(self) -> bool {
        PieceKind::PROMOTION_CHOICES.contains(&self)
    }
    /// Whether a piece of this kind and color starts the standard game on
    /// `position`.
    pub fn is_home_square(self, color: Color, position: Position) -> bool {
        if self == PieceKind::Pawn {
            return position.row == color.pawn_home_rank();
        }
        position.row == color.back_rank()
            && PieceKind::STARTING_CONFIGURATION
                .get(position.col as usize)
                .is_some_and(|kind| *kind == self)
    }
}
impl Display for PieceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PieceKind::Pawn => write!(f, "pawn")?,
            PieceKind::Knight => write!(f, "knight")?,
            PieceKind::Bishop => write!(f, "bishop")?,
            PieceKind::Rook => write!(f, "rook")?,
            PieceKind::Queen => write!(f, "queen")?,
            PieceKind::King => write!(f, "king")?,
        }
        Ok(())
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParsePieceKindError {
    Empty,
    UnknownSymbol(char),
    UnexpectedSymbol(char),
}
impl Display for ParsePieceKindError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParsePieceKindError::Empty => write!(f, "expected one character, found none instead")?,
            ParsePieceKindError::UnknownSymbol(c) => write!(
                f,
                "found `{c}`, expected one of `p`, `n`, `b`, `r`, `q`, `k`, or uppercase forms of these letters"
            )?,
            ParsePieceKindError::UnexpectedSymbol(c) => {
                write!(f, "unexpected `{c}`, only one character is expected")?;
            }
        }
        Ok(())
    }
}
impl Error for ParsePieceKindError {}

impl TryFrom<char> for PieceKind {
    type Error = ParsePieceKindError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        let piece = match value {
            'p' | 'P' => PieceKind::Pawn,
            'n' | 'N' => PieceKind::Knight,
            'b' | 'B' => PieceKind::Bishop,
            'r' | 'R' => PieceKind::Rook,
            'q' | 'Q' => PieceKind::Queen,
            'k' | 'K' => PieceKind::King,
            c => return Err(ParsePieceKindError::UnknownSymbol(c)),
        };
        Ok(piece)
    }
}
impl FromStr for PieceKind {
    type Err = ParsePieceKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let piece = match s {
            "pawn" => return Ok(PieceKind::Pawn),
            "knight" => return Ok(PieceKind::Knight),
            "bishop" => return Ok(PieceKind::Bishop),
            "rook" => return Ok(PieceKind::Rook),
            "queen" => return Ok(PieceKind::Queen),
            "king" => return Ok(PieceKind::King),
            s => {
                let mut characters = s.chars();
                characters
                    .next()
                    .ok_or(ParsePieceKindError::Empty)?
                    .try_into()?
            }
        };
        if let Some(c) = s.chars().nth(1) {
            return Err(ParsePieceKindError::UnexpectedSymbol(c));
        }
        Ok(piece)
    }
}

/// A piece on the board. `Copy`, so cloning a board never shares piece state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    /// Gates the pawn double advance and castling.
    pub moved: bool,
}
impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Self {
        Piece {
            kind,
            color,
            moved: false,
        }
    }
    pub fn moved(kind: PieceKind, color: Color) -> Self {
        Piece {
            kind,
            color,
            moved: true,
        }
    }
    /// Single-character notation: uppercase for white, lowercase for black.
    pub fn symbol(self) -> char {
        match self.color {
            Color::White => self.kind.uppercase(),
            Color::Black => self.kind.lowercase(),
        }
    }
    pub fn from_symbol(c: char) -> Result<Self, ParsePieceKindError> {
        let kind = PieceKind::try_from(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Ok(Piece::new(kind, color))
    }
    pub fn record(self) -> PieceRecord {
        PieceRecord {
            kind: self.kind,
            color: self.color,
            has_moved: self.moved,
        }
    }
    fn is_enemy(self, other: Piece) -> bool {
        self.color != other.color
    }
    fn step_moves(self, position: Position, board: &Board, steps: &[(i8, i8)]) -> Vec<Position> {
        steps
            .iter()
            .filter_map(|(d_row, d_col)| position.checked_offset(*d_row, *d_col))
            .filter(|destination| {
                board
                    .get_piece(*destination)
                    .is_none_or(|piece| self.is_enemy(piece))
            })
            .collect()
    }
    fn slide_moves(
        self,
        position: Position,
        board: &Board,
        directions: &[(i8, i8)],
    ) -> Vec<Position> {
        let mut moves = Vec::new();
        for (d_row, d_col) in directions {
            for destination in position.line(*d_row, *d_col) {
                match board.get_piece(destination) {
                    None => moves.push(destination),
                    Some(piece) => {
                        if self.is_enemy(piece) {
                            moves.push(destination);
                        }
                        break;
                    }
                }
            }
        }
        moves
    }
    fn pawn_moves(self, position: Position, board: &Board) -> Vec<Position> {
        let direction = self.color.pawn_direction();
        let mut moves = Vec::new();
        if let Some(one) = position.checked_offset(direction, 0)
            && board.get_piece(one).is_none()
        {
            moves.push(one);
            if !self.moved
                && let Some(two) = position.checked_offset(direction * 2, 0)
                && board.get_piece(two).is_none()
            {
                moves.push(two);
            }
        }
        moves.extend(self.attack_positions(position).into_iter().filter(|diagonal| {
            board
                .get_piece(*diagonal)
                .is_some_and(|piece| self.is_enemy(piece))
        }));
        moves
    }
    /// Pseudo-legal destinations: own king safety, castling and en passant
    /// are left to [`crate::validator::MoveValidator`].
    pub fn possible_moves(self, position: Position, board: &Board) -> Vec<Position> {
        match self.kind {
            PieceKind::Pawn => self.pawn_moves(position, board),
            PieceKind::Knight => self.step_moves(position, board, &Position::KNIGHT_JUMPS),
            PieceKind::Bishop => self.slide_moves(position, board, &Position::BISHOP_DIRECTIONS),
            PieceKind::Rook => self.slide_moves(position, board, &Position::ROOK_DIRECTIONS),
            PieceKind::Queen => self.slide_moves(position, board, &Position::QUEEN_DIRECTIONS),
            PieceKind::King => self.step_moves(position, board, &Position::KING_STEPS),
        }
    }
    /// The two forward diagonals a pawn attacks, whatever occupies them.
    /// Meaningful for pawns only; other pieces attack what they can move to.
    pub fn attack_positions(self, position: Position) -> Vec<Position> {
        let direction = self.color.pawn_direction();
        [-1, 1]
            .into_iter()
            .filter_map(|d_col| position.checked_offset(direction, d_col))
            .collect()
    }
}
impl Display for Piece {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.color, self.kind)?;
        Ok(())
    }
}

/// Plain `{type, color, hasMoved}` record handed to collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceRecord {
    #[serde(rename = "type")]
    pub kind: PieceKind,
    pub color: Color,
    pub has_moved: bool,
}

#[cfg(test)]
mod test {
    use crate::{
        board::Board,
        color::Color,
        piece::{ParsePieceKindError, Piece, PieceKind},
        position::Position,
    };

    fn sorted(mut moves: Vec<Position>) -> Vec<String> {
        moves.sort_by_key(|position| (position.row, position.col));
        moves.into_iter().map(|position| position.to_string()).collect()
    }

    #[test]
    fn symbols() {
        assert_eq!(Piece::new(PieceKind::Knight, Color::White).symbol(), 'N');
        assert_eq!(Piece::new(PieceKind::Queen, Color::Black).symbol(), 'q');
        assert_eq!(
            Piece::from_symbol('k'),
            Ok(Piece::new(PieceKind::King, Color::Black))
        );
        assert_eq!(
            Piece::from_symbol('x'),
            Err(ParsePieceKindError::UnknownSymbol('x'))
        );
    }
    #[test]
    fn parse_kind() {
        assert_eq!("queen".parse(), Ok(PieceKind::Queen));
        assert_eq!("N".parse(), Ok(PieceKind::Knight));
        assert_eq!("".parse::<PieceKind>(), Err(ParsePieceKindError::Empty));
        assert_eq!(
            "nb".parse::<PieceKind>(),
            Err(ParsePieceKindError::UnexpectedSymbol('b'))
        );
    }
    #[test]
    fn knight_in_corner() {
        let board = Board::from_fen("8/8/8/8/8/8/8/N7").unwrap();
        let knight = board.get_piece(Position::new(7, 0)).unwrap();
        assert_eq!(
            sorted(knight.possible_moves(Position::new(7, 0), &board)),
            ["b3", "c2"]
        );
    }
    #[test]
    fn slider_stops_at_first_piece() {
        let board = Board::from_fen("8/8/8/1p6/8/8/8/R2P4").unwrap();
        let rook = board.get_piece(Position::new(7, 0)).unwrap();
        assert_eq!(
            sorted(rook.possible_moves(Position::new(7, 0), &board)),
            ["a8", "a7", "a6", "a5", "a4", "a3", "a2", "b1", "c1"]
        );
        let board = Board::from_fen("8/8/8/8/3p4/8/8/B7").unwrap();
        let bishop = board.get_piece(Position::new(7, 0)).unwrap();
        assert_eq!(
            sorted(bishop.possible_moves(Position::new(7, 0), &board)),
            ["d4", "c3", "b2"]
        );
    }
    #[test]
    fn pawn_advances_and_captures() {
        let board = Board::from_fen("8/8/8/8/8/3p1p2/4P3/8").unwrap();
        let pawn = board.get_piece(Position::new(6, 4)).unwrap();
        assert_eq!(
            sorted(pawn.possible_moves(Position::new(6, 4), &board)),
            ["e4", "d3", "e3", "f3"]
        );
    }
    #[test]
    fn blocked_pawn_cannot_jump() {
        let board = Board::from_fen("8/8/8/8/8/4n3/4P3/8").unwrap();
        let pawn = board.get_piece(Position::new(6, 4)).unwrap();
        assert!(pawn.possible_moves(Position::new(6, 4), &board).is_empty());
        let board = Board::from_fen("8/8/8/8/4n3/8/4P3/8").unwrap();
        assert_eq!(sorted(pawn.possible_moves(Position::new(6, 4), &board)), ["e3"]);
    }
    #[test]
    fn moved_pawn_advances_once() {
        let board = Board::from_fen("8/8/8/8/8/4P3/8/8").unwrap();
        let pawn = board.get_piece(Position::new(5, 4)).unwrap();
        assert!(pawn.moved);
        assert_eq!(sorted(pawn.possible_moves(Position::new(5, 4), &board)), ["e4"]);
    }
    #[test]
    fn pawn_attacks_regardless_of_occupancy() {
        let pawn = Piece::new(PieceKind::Pawn, Color::Black);
        assert_eq!(
            sorted(pawn.attack_positions(Position::new(1, 0))),
            ["b6"]
        );
        assert_eq!(
            sorted(pawn.attack_positions(Position::new(1, 4))),
            ["d6", "f6"]
        );
    }
    #[test]
    fn home_squares() {
        assert!(PieceKind::King.is_home_square(Color::White, Position::new(7, 4)));
        assert!(!PieceKind::King.is_home_square(Color::Black, Position::new(7, 4)));
        assert!(PieceKind::Rook.is_home_square(Color::Black, Position::new(0, 7)));
        assert!(PieceKind::Pawn.is_home_square(Color::Black, Position::new(1, 3)));
        assert!(!PieceKind::Queen.is_home_square(Color::White, Position::new(7, 4)));
    }
}
