use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    iter::{once, repeat},
    str::FromStr,
};

use crate::{
    board::Board,
    piece::Piece,
    position::Position,
};

/// Standard starting placement.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// Piece placement field of a FEN record.
///
/// Parsing reads only the first whitespace-separated field; side to move,
/// castling rights and the rest are ignored. Moved flags are inferred: a
/// piece standing on one of its starting squares counts as unmoved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fen(pub Board);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFenError {
    NotEnoughSquaresOnRank(u8),
    ExceedingSquaresOnRank(u8),
    WrongRankCount(u8),
    UnexpectedChar(char),
}
impl Display for ParseFenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParseFenError::NotEnoughSquaresOnRank(rank) => {
                write!(f, "rank {rank} describes fewer than 8 squares")?;
            }
            ParseFenError::ExceedingSquaresOnRank(rank) => {
                write!(f, "rank {rank} describes more than 8 squares")?;
            }
            ParseFenError::WrongRankCount(count) => {
                write!(f, "expected 8 ranks, found {count} instead")?;
            }
            ParseFenError::UnexpectedChar(c) => write!(f, "unexpected `{c}`")?,
        }
        Ok(())
    }
}
impl Error for ParseFenError {}

impl FromStr for Fen {
    type Err = ParseFenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let placement = s.split_whitespace().next().unwrap_or("");
        let mut board = Board::empty();
        let mut ranks: u8 = 0;
        for (row, rank) in placement.split('/').enumerate() {
            ranks = ranks.saturating_add(1);
            if row >= 8 {
                continue;
            }
            let rank_label = 8 - row as u8;
            let mut col: u8 = 0;
            for c in rank.chars() {
                if let Some(skip) = c.to_digit(10).filter(|skip| (1..=8).contains(skip)) {
                    col += skip as u8;
                } else {
                    if col >= 8 {
                        return Err(ParseFenError::ExceedingSquaresOnRank(rank_label));
                    }
                    let mut piece =
                        Piece::from_symbol(c).map_err(|_| ParseFenError::UnexpectedChar(c))?;
                    let position = Position::new(row as i8, col as i8);
                    piece.moved = !piece.kind.is_home_square(piece.color, position);
                    board.set_piece(position, Some(piece));
                    col += 1;
                }
                if col > 8 {
                    return Err(ParseFenError::ExceedingSquaresOnRank(rank_label));
                }
            }
            if col < 8 {
                return Err(ParseFenError::NotEnoughSquaresOnRank(rank_label));
            }
        }
        if ranks != 8 {
            return Err(ParseFenError::WrongRankCount(ranks));
        }
        Ok(Fen(board))
    }
}
impl Display for Fen {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (row, first) in (0..8).zip(once(true).chain(repeat(false))) {
            if !first {
                write!(f, "/")?;
            }
            let mut pieces = (0..8)
                .map(|col| self.0.get_piece(Position::new(row, col)))
                .peekable();
            while let Some(piece) = pieces.next() {
                if let Some(piece) = piece {
                    write!(f, "{}", piece.symbol())?;
                } else {
                    let mut count = 1;
                    while pieces.peek().is_some_and(Option::is_none) {
                        pieces.next();
                        count += 1;
                    }
                    write!(f, "{count}")?;
                }
            }
        }
        Ok(())
    }
}
#[cfg(test)]
mod test {
    use crate::{
        color::Color,
        fen::{Fen, ParseFenError, STARTING_FEN},
        piece::PieceKind,
        position::Position,
    };

    fn parse(s: &str) -> Result<Fen, ParseFenError> {
        s.parse()
    }

    #[test]
    fn starting_position_round_trips() {
        let fen = parse(STARTING_FEN).unwrap();
        assert_eq!(fen.to_string(), STARTING_FEN);
        let king = fen.0.get_piece(Position::new(7, 4)).unwrap();
        assert_eq!(king.kind, PieceKind::King);
        assert_eq!(king.color, Color::White);
        assert!(!king.moved);
    }
    #[test]
    fn ignores_trailing_fields() {
        let fen = parse("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").unwrap();
        assert_eq!(fen.to_string(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR");
    }
    #[test]
    fn moved_flags_are_inferred() {
        let fen = parse("8/8/8/8/8/8/4P3/R3K1R1").unwrap();
        let board = fen.0;
        assert!(!board.get_piece(Position::new(7, 0)).unwrap().moved);
        assert!(!board.get_piece(Position::new(7, 4)).unwrap().moved);
        assert!(board.get_piece(Position::new(7, 6)).unwrap().moved);
        assert!(!board.get_piece(Position::new(6, 4)).unwrap().moved);
    }
    #[test]
    fn malformed() {
        assert_eq!(
            parse("8/8/8/8/8/8/8/7"),
            Err(ParseFenError::NotEnoughSquaresOnRank(1))
        );
        assert_eq!(
            parse("8/8/8/8/8/8/8/44P"),
            Err(ParseFenError::ExceedingSquaresOnRank(1))
        );
        assert_eq!(
            parse("9/8/8/8/8/8/8/8"),
            Err(ParseFenError::UnexpectedChar('9'))
        );
        assert_eq!(parse("8/8/8/8/8/8/8"), Err(ParseFenError::WrongRankCount(7)));
        assert_eq!(
            parse("8/8/8/8/8/8/8/8/8"),
            Err(ParseFenError::WrongRankCount(9))
        );
        assert_eq!(parse(""), Err(ParseFenError::NotEnoughSquaresOnRank(8)));
    }
}
