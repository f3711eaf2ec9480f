use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParsePositionError {
    Empty,
    RankNotProvided,
    InvalidFile(char),
    InvalidRank(char),
    UnexpectedSymbol(char),
}
impl Display for ParsePositionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParsePositionError::Empty => write!(f, "expected 2 characters, found none instead")?,
            ParsePositionError::RankNotProvided => {
                write!(f, "expected 2 characters, found 1 instead")?;
            }
            ParsePositionError::InvalidFile(c) => write!(f, "`{c}` is not a letter from a to h")?,
            ParsePositionError::InvalidRank(c) => write!(f, "`{c}` is not a number from 1 to 8")?,
            ParsePositionError::UnexpectedSymbol(c) => {
                write!(f, "unexpected `{c}`, only 2 characters are expected")?;
            }
        }
        Ok(())
    }
}
impl Error for ParsePositionError {}

/// A square coordinate. Row 0 is rank 8, column 0 is file a.
///
/// Any pair of integers can be held; only pairs inside `0..8` are on the
/// board, so check [`Position::is_valid`] before indexing a board with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}
impl Position {
    /// Returned by lookups that found nothing, such as a missing king.
    pub const NOT_FOUND: Position = Position { row: -1, col: -1 };

    pub const KNIGHT_JUMPS: [(i8, i8); 8] = [
        (-2, -1),
        (-2, 1),
        (-1, -2),
        (-1, 2),
        (1, -2),
        (1, 2),
        (2, -1),
        (2, 1),
    ];
    pub const KING_STEPS: [(i8, i8); 8] = [
        (-1, -1),
        (-1, 0),
        (-1, 1),
        (0, -1),
        (0, 1),
        (1, -1),
        (1, 0),
        (1, 1),
    ];
    pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
    pub const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
    pub const QUEEN_DIRECTIONS: [(i8, i8); 8] = [
        (-1, 0),
        (1, 0),
        (0, -1),
        (0, 1),
        (-1, -1),
        (-1, 1),
        (1, -1),
        (1, 1),
    ];

    pub fn new(row: i8, col: i8) -> Self {
        Position { row, col }
    }
    pub fn is_valid(self) -> bool {
        (0..8).contains(&self.row) && (0..8).contains(&self.col)
    }
    /// Unchecked: the result may be off the board.
    pub fn offset(self, d_row: i8, d_col: i8) -> Self {
        Position {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }
    /// Like [`Position::offset`] but `None` when the result leaves the board.
    pub fn checked_offset(self, d_row: i8, d_col: i8) -> Option<Self> {
        Some(self.offset(d_row, d_col)).filter(|position| position.is_valid())
    }
    /// Squares from this one (exclusive) towards the edge of the board.
    pub fn line(self, d_row: i8, d_col: i8) -> impl Iterator<Item = Self> {
        debug_assert!(d_row != 0 || d_col != 0);
        (1..).map_while(move |distance| self.checked_offset(d_row * distance, d_col * distance))
    }
    pub fn file(self) -> Option<char> {
        self.is_valid().then(|| (b'a' + self.col as u8) as char)
    }
    pub fn rank(self) -> Option<char> {
        self.is_valid().then(|| (b'8' - self.row as u8) as char)
    }
    /// `None` when the position is off the board.
    pub fn to_algebraic(self) -> Option<String> {
        Some(format!("{}{}", self.file()?, self.rank()?))
    }
    pub fn from_chars(file: char, rank: char) -> Result<Self, ParsePositionError> {
        let col = match file.to_ascii_lowercase() {
            c @ 'a'..='h' => c as u8 - b'a',
            _ => return Err(ParsePositionError::InvalidFile(file)),
        };
        let row = match rank {
            '1'..='8' => b'8' - rank as u8,
            _ => return Err(ParsePositionError::InvalidRank(rank)),
        };
        Ok(Position::new(row as i8, col as i8))
    }
    pub fn from_algebraic(s: &str) -> Result<Self, ParsePositionError> {
        s.parse()
    }
}
impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match (self.file(), self.rank()) {
            (Some(file), Some(rank)) => write!(f, "{file}{rank}")?,
            _ => write!(f, "({}, {})", self.row, self.col)?,
        }
        Ok(())
    }
}
impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut characters = s.chars();
        let file = characters.next().ok_or(ParsePositionError::Empty)?;
        let rank = characters
            .next()
            .ok_or(ParsePositionError::RankNotProvided)?;
        if let Some(c) = characters.next() {
            return Err(ParsePositionError::UnexpectedSymbol(c));
        }
        Position::from_chars(file, rank)
    }
}

/// Plain `{row, col}` record handed to collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PositionRecord {
    pub row: i8,
    pub col: i8,
}
impl From<Position> for PositionRecord {
    fn from(value: Position) -> Self {
        PositionRecord {
            row: value.row,
            col: value.col,
        }
    }
}
