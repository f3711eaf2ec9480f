use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    board::Board,
    color::Color,
    fen::{ParseFenError, STARTING_FEN},
    movement::Move,
    piece::{PieceKind, PieceRecord},
    position::{Position, PositionRecord},
    special::{self, PromotionError},
    validator::MoveValidator,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Active,
    Checkmate,
    Stalemate,
    /// Never produced by the current rule set.
    Draw,
}
impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::Active
    }
}
impl Display for GameStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Active => write!(f, "active")?,
            GameStatus::Checkmate => write!(f, "checkmate")?,
            GameStatus::Stalemate => write!(f, "stalemate")?,
            GameStatus::Draw => write!(f, "draw")?,
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameOptions {
    /// Piece placement the game starts from and resets to.
    pub fen: String,
    /// Side to move at history index 0.
    pub starting_player: Color,
    /// Accept moves only while the cursor is at the end of history.
    pub view_only: bool,
}
impl Default for GameOptions {
    fn default() -> Self {
        GameOptions {
            fen: STARTING_FEN.to_string(),
            starting_player: Color::White,
            view_only: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveError {
    ViewOnly,
    NoPiece(Position),
    WrongColor { position: Position, turn: Color },
    IllegalDestination { from: Position, to: Position },
    InvalidPromotion(PromotionError),
}
impl From<PromotionError> for MoveError {
    fn from(value: PromotionError) -> Self {
        MoveError::InvalidPromotion(value)
    }
}
impl Display for MoveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::ViewOnly => write!(f, "moves can only be made at the latest position")?,
            MoveError::NoPiece(position) => write!(f, "no piece on {position}")?,
            MoveError::WrongColor { position, turn } => {
                write!(f, "piece on {position} does not belong to {turn}")?;
            }
            MoveError::IllegalDestination { from, to } => {
                write!(f, "moving from {from} to {to} is illegal")?;
            }
            MoveError::InvalidPromotion(err) => write!(f, "{err}")?,
        }
        Ok(())
    }
}
impl Error for MoveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MoveError::InvalidPromotion(err) => Some(err),
            _ => None,
        }
    }
}

/// Board and status as they stood at one point of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HistoryEntry {
    pub status: GameStatus,
    pub board: Board,
}
impl HistoryEntry {
    pub fn record(&self) -> HistoryRecord {
        HistoryRecord {
            status: self.status,
            board: self.board.records(),
        }
    }
}
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRecord {
    pub status: GameStatus,
    pub board: [[Option<PieceRecord>; 8]; 8],
}

/// Everything a presentation layer needs to draw the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub board: [[Option<PieceRecord>; 8]; 8],
    pub current_turn: Color,
    pub status: GameStatus,
    pub moves: Vec<String>,
    pub current_move_index: usize,
    pub total_moves: usize,
    pub initial_fen: String,
    pub in_check: bool,
}

/// A game of chess with a navigable history.
///
/// `history` always holds one entry more than `moves`: entry `i` is the
/// position after the first `i` moves. The cursor may point anywhere in
/// `history`; playing a move away from the end discards everything after
/// the cursor.
#[derive(Debug, Clone)]
pub struct Game {
    initial_fen: String,
    initial_board: Board,
    starting_player: Color,
    view_only: bool,
    board: Board,
    current_turn: Color,
    status: GameStatus,
    moves: Vec<Move>,
    history: Vec<HistoryEntry>,
    current_history_index: usize,
}
impl Game {
    pub fn new() -> Self {
        Game::from_board(Board::starting_position(), GameOptions::default())
    }
    pub fn from_fen(fen: &str) -> Result<Self, ParseFenError> {
        Game::with_options(GameOptions {
            fen: fen.to_string(),
            ..GameOptions::default()
        })
    }
    pub fn with_options(options: GameOptions) -> Result<Self, ParseFenError> {
        let board = Board::from_fen(&options.fen)?;
        Ok(Game::from_board(board, options))
    }
    fn from_board(board: Board, options: GameOptions) -> Self {
        let mut game = Game {
            initial_fen: options.fen,
            initial_board: board,
            starting_player: options.starting_player,
            view_only: options.view_only,
            board,
            current_turn: options.starting_player,
            status: GameStatus::Active,
            moves: Vec::new(),
            history: Vec::new(),
            current_history_index: 0,
        };
        game.status = game.compute_status(None);
        game.history.push(HistoryEntry {
            status: game.status,
            board,
        });
        game
    }
    pub fn board(&self) -> &Board {
        &self.board
    }
    pub fn current_turn(&self) -> Color {
        self.current_turn
    }
    pub fn status(&self) -> GameStatus {
        self.status
    }
    /// Every move of the current line, including ones after the cursor.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }
    pub fn initial_fen(&self) -> &str {
        &self.initial_fen
    }
    pub fn current_history_index(&self) -> usize {
        self.current_history_index
    }
    /// Number of moves played to reach the cursor.
    pub fn current_move_number(&self) -> usize {
        self.current_history_index
    }
    pub fn total_moves(&self) -> usize {
        self.history.len() - 1
    }
    /// The move that led to the cursor position.
    pub fn last_move(&self) -> Option<&Move> {
        self.current_history_index
            .checked_sub(1)
            .and_then(|index| self.moves.get(index))
    }
    pub fn move_list(&self) -> Vec<String> {
        self.moves.iter().map(Move::to_san).collect()
    }
    pub fn is_at_current_position(&self) -> bool {
        self.current_history_index == self.history.len() - 1
    }
    pub fn can_undo(&self) -> bool {
        self.current_history_index > 0
    }
    pub fn can_redo(&self) -> bool {
        !self.is_at_current_position()
    }
    pub fn can_make_move(&self) -> bool {
        !self.view_only || self.is_at_current_position()
    }
    pub fn is_check(&self) -> bool {
        self.board.is_in_check(self.current_turn)
    }
    pub fn is_checkmate(&self) -> bool {
        self.status == GameStatus::Checkmate
    }
    pub fn is_stalemate(&self) -> bool {
        self.status == GameStatus::Stalemate
    }
    fn validator(&self) -> MoveValidator<'_> {
        MoveValidator::new(&self.board, self.current_turn, self.last_move())
    }
    fn turn_at(&self, index: usize) -> Color {
        if index % 2 == 0 {
            self.starting_player
        } else {
            !self.starting_player
        }
    }
    /// Legal destinations of the piece on `position`; empty when moves are
    /// not currently allowed.
    pub fn legal_moves(&self, position: Position) -> Vec<Position> {
        if !self.can_make_move() {
            return Vec::new();
        }
        self.validator().legal_moves(position)
    }
    pub fn legal_move_records(&self, position: Position) -> Vec<PositionRecord> {
        self.legal_moves(position)
            .into_iter()
            .map(PositionRecord::from)
            .collect()
    }
    /// Boolean form of [`Game::play`].
    pub fn make_move(&mut self, from: Position, to: Position, promotion: Option<PieceKind>) -> bool {
        self.play(from, to, promotion).is_ok()
    }
    /// Plays a move and returns it fully annotated. On error nothing
    /// changes.
    pub fn play(
        &mut self,
        from: Position,
        to: Position,
        promotion: Option<PieceKind>,
    ) -> Result<Move, MoveError> {
        let mut movement = self.check_move(from, to, promotion).inspect_err(|err| {
            debug!(%from, %to, %err, "move rejected");
        })?;
        self.truncate_history();

        let execution = special::execute(&mut self.board, from, to);
        movement.captured = execution.captured;
        movement.is_castling = execution.is_castling;
        movement.is_en_passant = execution.is_en_passant;
        if special::promote_if_needed(&mut self.board, to, promotion)? {
            movement.promotion = Some(promotion.unwrap_or(PieceKind::Queen));
        }

        self.current_turn = !self.current_turn;
        self.status = self.compute_status(Some(&movement));
        movement.is_check = self.is_check();
        movement.is_checkmate = self.is_checkmate();
        self.moves.push(movement);
        self.history.push(HistoryEntry {
            status: self.status,
            board: self.board,
        });
        self.current_history_index = self.moves.len();

        debug!(
            san = %movement,
            %from,
            %to,
            status = %self.status,
            "move played"
        );
        if self.status.is_over() {
            info!(status = %self.status, winner = ?self.winner(), "game over");
        }
        Ok(movement)
    }
    /// Validates the move and builds its record from the position before
    /// it is played.
    fn check_move(
        &self,
        from: Position,
        to: Position,
        promotion: Option<PieceKind>,
    ) -> Result<Move, MoveError> {
        if !self.can_make_move() {
            return Err(MoveError::ViewOnly);
        }
        let piece = self.board.get_piece(from).ok_or(MoveError::NoPiece(from))?;
        if piece.color != self.current_turn {
            return Err(MoveError::WrongColor {
                position: from,
                turn: self.current_turn,
            });
        }
        let validator = self.validator();
        if !validator.is_legal(from, to) {
            return Err(MoveError::IllegalDestination { from, to });
        }
        let mut movement = Move::new(from, to, piece);
        if movement.is_promotion()
            && let Some(kind) = promotion
            && !kind.can_promote_to()
        {
            return Err(PromotionError::InvalidKind(kind).into());
        }
        movement.disambiguation = validator.disambiguation(from, to);
        Ok(movement)
    }
    fn truncate_history(&mut self) {
        if self.is_at_current_position() {
            return;
        }
        let discarded = self.moves.len() - self.current_history_index;
        self.moves.truncate(self.current_history_index);
        self.history.truncate(self.current_history_index + 1);
        debug!(discarded, "discarded moves after the cursor");
    }
    /// Status of the side to move, given the move that led here.
    fn compute_status(&self, last_move: Option<&Move>) -> GameStatus {
        let validator = MoveValidator::new(&self.board, self.current_turn, last_move);
        if validator.has_legal_move() {
            GameStatus::Active
        } else if self.board.is_in_check(self.current_turn) {
            GameStatus::Checkmate
        } else {
            GameStatus::Stalemate
        }
    }
    /// Side that delivered checkmate, if any.
    pub fn winner(&self) -> Option<Color> {
        (self.status == GameStatus::Checkmate).then(|| !self.current_turn)
    }
    /// Moves the cursor to history entry `index`. Returns `false` and leaves
    /// the game untouched when `index` is out of range.
    pub fn jump_to_move(&mut self, index: usize) -> bool {
        let Some(entry) = self.history.get(index) else {
            debug!(index, len = self.history.len(), "history index out of range");
            return false;
        };
        self.board = entry.board;
        self.status = entry.status;
        self.current_turn = self.turn_at(index);
        self.current_history_index = index;
        debug!(index, "moved through history");
        true
    }
    pub fn undo(&mut self) -> bool {
        self.can_undo() && self.jump_to_move(self.current_history_index - 1)
    }
    pub fn redo(&mut self) -> bool {
        self.can_redo() && self.jump_to_move(self.current_history_index + 1)
    }
    /// Back to the initial placement with an empty history.
    pub fn reset_game(&mut self) {
        self.board = self.initial_board;
        self.current_turn = self.starting_player;
        self.moves.clear();
        self.current_history_index = 0;
        self.status = self.compute_status(None);
        self.history.clear();
        self.history.push(HistoryEntry {
            status: self.status,
            board: self.board,
        });
        debug!("game reset");
    }
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.records(),
            current_turn: self.current_turn,
            status: self.status,
            moves: self.move_list(),
            current_move_index: self.current_history_index,
            total_moves: self.total_moves(),
            initial_fen: self.initial_fen.clone(),
            in_check: self.is_check(),
        }
    }
    pub fn history_records(&self) -> Vec<HistoryRecord> {
        self.history.iter().map(HistoryEntry::record).collect()
    }
}
impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}
impl Display for Game {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.board)?;
        writeln!(f, "Current turn: {}", self.current_turn)?;
        write!(f, "Status: {}", self.status)?;
        Ok(())
    }
}
