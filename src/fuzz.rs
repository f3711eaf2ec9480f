use rand::{Rng, SeedableRng, rngs::SmallRng};
use rustc_hash::FxHashSet;

use crate::{
    color::Color,
    game::Game,
    piece::{Piece, PieceKind},
    position::Position,
};

impl From<chess::Square> for Position {
    fn from(value: chess::Square) -> Self {
        Position::new(
            (7 - value.get_rank().to_index()).try_into().unwrap(),
            value.get_file().to_index().try_into().unwrap(),
        )
    }
}
fn castling_rights(game: &Game) -> String {
    let board = game.board();
    let unmoved = |square: &str, kind: PieceKind, color: Color| {
        board
            .get_piece(square.parse().unwrap())
            .is_some_and(|piece: Piece| piece.kind == kind && piece.color == color && !piece.moved)
    };
    let mut rights = String::new();
    for (color, king, rooks) in [
        (Color::White, "e1", [("h1", 'K'), ("a1", 'Q')]),
        (Color::Black, "e8", [("h8", 'k'), ("a8", 'q')]),
    ] {
        if unmoved(king, PieceKind::King, color) {
            for (rook, right) in rooks {
                if unmoved(rook, PieceKind::Rook, color) {
                    rights.push(right);
                }
            }
        }
    }
    if rights.is_empty() {
        rights.push('-');
    }
    rights
}
fn full_fen(game: &Game) -> String {
    let en_passant = game
        .last_move()
        .filter(|movement| movement.is_double_pawn_push())
        .map_or_else(
            || "-".to_string(),
            |movement| {
                Position::new((movement.from.row + movement.to.row) / 2, movement.to.col)
                    .to_string()
            },
        );
    format!(
        "{} {} {} {en_passant} 0 1",
        game.board().fen(),
        game.current_turn().lowercase(),
        castling_rights(game),
    )
}
fn legal_moves(game: &Game) -> Vec<(Position, Position)> {
    game.board()
        .all_pieces(game.current_turn())
        .into_iter()
        .flat_map(|(from, _)| game.legal_moves(from).into_iter().map(move |to| (from, to)))
        .collect()
}
#[test]
fn matches_reference_move_generator() {
    let mut rng = SmallRng::seed_from_u64(0x5eed);
    for _ in 0..40 {
        let mut game = Game::new();
        for _ in 0..200 {
            let moves = legal_moves(&game);
            let fen = full_fen(&game);
            let reference: chess::Board = fen.parse().unwrap();
            let ours: FxHashSet<_> = moves.iter().copied().collect();
            let theirs: FxHashSet<(Position, Position)> = chess::MoveGen::new_legal(&reference)
                .map(|movement| (movement.get_source().into(), movement.get_dest().into()))
                .collect();
            if let Some((from, to)) = ours.difference(&theirs).next() {
                panic!("found {from}{to} but it's not a legal move\n{game}\n{fen}");
            }
            if let Some((from, to)) = theirs.difference(&ours).next() {
                panic!("{from}{to} not found\n{game}\n{fen}");
            }
            if moves.is_empty() {
                assert!(game.status().is_over(), "no moves but game is active\n{fen}");
                break;
            }
            let (from, to) = moves[rng.random_range(0..moves.len())];
            let promotion = PieceKind::PROMOTION_CHOICES
                [rng.random_range(0..PieceKind::PROMOTION_CHOICES.len())];
            assert!(game.make_move(from, to, Some(promotion)), "{from}{to} rejected\n{fen}");
        }
    }
}
#[test]
fn history_round_trip_on_random_games() {
    let mut rng = SmallRng::seed_from_u64(7);
    for _ in 0..10 {
        let mut game = Game::new();
        for _ in 0..60 {
            let moves = legal_moves(&game);
            if moves.is_empty() {
                break;
            }
            let (from, to) = moves[rng.random_range(0..moves.len())];
            assert!(game.make_move(from, to, None));
        }
        let end = (*game.board(), game.status(), game.current_turn());
        let played = game.total_moves();
        for index in (0..played).rev() {
            assert!(game.undo());
            assert_eq!(game.current_history_index(), index);
        }
        for _ in 0..played {
            assert!(game.redo());
        }
        assert_eq!((*game.board(), game.status(), game.current_turn()), end);
    }
}
