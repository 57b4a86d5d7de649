//! Main API to represent and interact with a chess position.
//!
//! This includes making, unmaking and generating moves, defining positions from
//! FEN strings, etc.

use thiserror::Error;

use super::{
    action::{Action, ActionList, MoveOutcome, SquareActions},
    board::Board,
    castling_rights::{CastlingRights, CastlingSide},
    colour::{Colour, NUM_COLOURS},
    fen::Fen,
    history::HistoryEntry,
    movegen::{self, en_passant_victim},
    piece::{Piece, PieceKind, PromotionTarget},
    square::Square,
};

/// Errors returned when trying to play a move.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Error)]
pub enum MoveError {
    #[error("({row}, {col}) is not a square of the board")]
    OutOfBounds { row: i8, col: i8 },
    #[error("{origin}{target} is not a legal move")]
    IllegalMove { origin: Square, target: Square },
    #[error("The pawn on {0} must be promoted first")]
    PromotionPending(Square),
}

/// Errors returned when trying to promote a pawn.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Error)]
pub enum PromotionError {
    #[error("({row}, {col}) is not a square of the board")]
    OutOfBounds { row: i8, col: i8 },
    #[error("There is no pawn on {0}")]
    NoPawn(Square),
    #[error("The pawn on {0} is not waiting for a promotion")]
    NotPending(Square),
    #[error("Pawns cannot promote to {0:?}")]
    InvalidTarget(PieceKind),
}

/// State of the game from the point of view of the side to move.
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
pub enum GameStatus {
    #[default]
    Playing,
    /// The side to move is in check but can escape it.
    Check,
    /// The side to move is in check and has no legal moves.
    Checkmate,
    /// The side to move has no legal moves but is not in check.
    Stalemate,
}
impl GameStatus {
    /// Checks if the game cannot continue.
    pub fn is_over(self) -> bool {
        matches!(self, Self::Checkmate | Self::Stalemate)
    }
}
impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Playing => "playing",
                Self::Check => "check",
                Self::Checkmate => "checkmate",
                Self::Stalemate => "stalemate",
            }
        )
    }
}

/// Represents a chess game in progress and defines an API to interact with it
/// (making, unmaking, generating moves, etc).
///
/// Only moves returned by [`Position::actions_from`] can be played, so the
/// position always stays legal.
/// ```
/// # use gambit::game::position::*;
/// # use gambit::game::action::MoveOutcome;
/// let mut position = Position::initial();
/// let e2 = "e2".parse().unwrap();
/// let e4 = "e4".parse().unwrap();
/// assert_eq!(position.make(e2, e4), Ok(MoveOutcome::Applied));
/// assert_eq!(position.en_passant_target(), Some("e3".parse().unwrap()));
/// assert!(position.unmake().is_some());
/// assert_eq!(position, Position::initial());
/// ```
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Position {
    board: Board,

    // Metadata
    side_to_move: Colour,
    castling_rights: CastlingRights,
    en_passant_target: Option<Square>,
    reversible_moves: u16,
    // Plies played before this position was set up.
    initial_ply: u32,
    pending_promotion: Option<Square>,
    status: GameStatus,

    history: Vec<HistoryEntry>,
    // Kinds of the pieces taken by each colour.
    captured: [Vec<PieceKind>; NUM_COLOURS],
}
impl Default for Position {
    /// The initial position of Chess.
    fn default() -> Self {
        Self::initial()
    }
}
impl Position {
    /// The initial position of Chess.
    pub fn initial() -> Self {
        Self {
            board: Board::initial(),

            side_to_move: Colour::White,
            castling_rights: CastlingRights::full(),
            en_passant_target: None,
            reversible_moves: 0,
            initial_ply: 0,
            pending_promotion: None,
            status: GameStatus::Playing,

            history: Vec::new(),
            captured: [Vec::new(), Vec::new()],
        }
    }

    /// Creates a position from a parsed FEN string.
    pub fn from_fen(fen: &Fen) -> Self {
        let mut pos = Self {
            board: fen.board,

            side_to_move: fen.side_to_move,
            castling_rights: fen.castling_rights,
            en_passant_target: fen.en_passant,
            reversible_moves: fen.halfmove_clock,
            initial_ply: fen.fullmove_counter.saturating_sub(1) as u32 * 2
                + fen.side_to_move.is_black() as u32,
            pending_promotion: None,
            status: GameStatus::Playing,

            history: Vec::new(),
            captured: [Vec::new(), Vec::new()],
        };
        pos.status = pos.compute_status();

        pos
    }

    /// Returns a FEN string describing the position.
    pub fn fen(&self) -> Fen {
        Fen {
            board: self.board,
            side_to_move: self.side_to_move,
            castling_rights: self.castling_rights,
            en_passant: self.en_passant_target,
            halfmove_clock: self.reversible_moves,
            fullmove_counter: self.fullmove_number(),
        }
    }

    /// Puts the game back to the initial position, forgetting all history.
    pub fn reset(&mut self) {
        *self = Self::initial();
        log::debug!("Position reset");
    }

    /// Returns the piece placement.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the piece kind and color present on a given square if any.
    pub fn piece_on(&self, square: Square) -> Option<Piece> {
        self.board.piece_on(square)
    }

    /// Returns the piece at the given coordinates. Off-board coordinates hold
    /// nothing.
    pub fn piece_at(&self, row: i8, col: i8) -> Option<Piece> {
        Square::new(row, col).and_then(|sq| self.piece_on(sq))
    }

    /// Returns the current side to move.
    pub fn side_to_move(&self) -> Colour {
        self.side_to_move
    }

    /// Returns the state of the game for the side to move.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Moves played so far, oldest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Kinds of the pieces captured by `colour`, in capture order.
    pub fn captured(&self, colour: Colour) -> &[PieceKind] {
        &self.captured[colour as usize]
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    /// Square skipped by a pawn double push on the previous move, if any.
    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    /// Square of a pawn that reached its last rank and waits for
    /// [`Position::promote`].
    pub fn pending_promotion(&self) -> Option<Square> {
        self.pending_promotion
    }

    /// Number of plies since the last capture or pawn move.
    pub fn halfmove_clock(&self) -> u16 {
        self.reversible_moves
    }

    /// Number of the current full move, starting at 1 and incremented after each
    /// black move. Saturates at `u16::MAX`.
    pub fn fullmove_number(&self) -> u16 {
        let fullmove = (self.initial_ply as usize + self.history.len()) / 2 + 1;
        u16::try_from(fullmove).unwrap_or(u16::MAX)
    }

    /// Checks if a piece of the opponent of `defender` attacks `square`.
    pub fn is_square_attacked(&self, square: Square, defender: Colour) -> bool {
        movegen::is_square_attacked(&self.board, square, defender)
    }

    /// Checks if the king of `colour` is attacked.
    pub fn is_in_check(&self, colour: Colour) -> bool {
        movegen::is_in_check(&self.board, colour)
    }

    /// Returns all legal moves of the piece on `origin`.
    ///
    /// The list is empty if the square is empty, holds a piece of the side not to
    /// move, or if a promotion is pending.
    pub fn actions_from(&self, origin: Square) -> SquareActions {
        let Some(piece) = self.board.piece_on(origin) else {
            return SquareActions::new();
        };
        if piece.colour != self.side_to_move || self.pending_promotion.is_some() {
            return SquareActions::new();
        }

        let mut actions =
            movegen::pseudo_legal_actions(&self.board, origin, piece, self.en_passant_target);
        if piece.kind == PieceKind::King {
            self.generate_castles(origin, piece.colour, &mut actions);
        }

        let mut scratch = self.board;
        actions.retain(|&action| Self::keeps_king_safe(&mut scratch, action, piece.colour));
        actions
    }

    /// Returns all legal moves of the piece at the given coordinates. Off-board
    /// coordinates have no moves.
    pub fn actions_at(&self, row: i8, col: i8) -> SquareActions {
        Square::new(row, col)
            .map(|sq| self.actions_from(sq))
            .unwrap_or_default()
    }

    /// Returns all legal moves of the side to move.
    pub fn actions(&self) -> ActionList {
        let mut actions = ActionList::new();
        for (square, _) in self.board.pieces_of(self.side_to_move) {
            actions.extend(self.actions_from(square));
        }
        actions
    }

    /// Checks if the side to move has at least one legal move.
    pub fn has_legal_actions(&self) -> bool {
        self.board
            .pieces_of(self.side_to_move)
            .any(|(square, _)| !self.actions_from(square).is_empty())
    }

    /// Plays `action` on `board`, checks whether the mover's king is attacked, and
    /// restores the board.
    fn keeps_king_safe(board: &mut Board, action: Action, mover: Colour) -> bool {
        let captured = if action.is_en_passant() {
            en_passant_victim(action.target(), mover)
        } else {
            None
        };
        let simulated = board.simulate(action.origin(), action.target(), captured);
        !movegen::is_in_check(&simulated, mover)
    }

    /// Adds the castling moves available to the king of `colour` on `king`.
    ///
    /// Only pseudo-legal king moves are needed to test attacks, so this is never
    /// reached from attack detection.
    fn generate_castles(&self, king: Square, colour: Colour, actions: &mut SquareActions) {
        if king.row() != colour.home_row() || king.col() != 4 || self.is_in_check(colour) {
            return;
        }

        for side in [CastlingSide::KingSide, CastlingSide::QueenSide] {
            if !self.castling_rights.allowed(colour, side) {
                continue;
            }
            let (rook_origin, _) = side.rook_move(king);
            if self.board.piece_on(rook_origin) != Some(Piece::new(PieceKind::Rook, colour)) {
                continue;
            }
            if side
                .between_cols()
                .iter()
                .any(|&col| !self.board.is_empty(king.with_col(col)))
            {
                continue;
            }
            if side
                .king_path_cols()
                .iter()
                .any(|&col| self.is_square_attacked(king.with_col(col), colour))
            {
                continue;
            }
            // SAFETY: a king has at most 8 regular moves.
            unsafe { actions.push_unchecked(Action::new_castle(king, side)) }
        }
    }

    /// Plays the move `origin -> target`.
    ///
    /// # Errors
    /// This function returns an error if the move is illegal or a pawn is waiting
    /// for a promotion. The position is left untouched in that case.
    pub fn make(&mut self, origin: Square, target: Square) -> Result<MoveOutcome, MoveError> {
        if let Some(pending) = self.pending_promotion {
            return Err(MoveError::PromotionPending(pending));
        }
        let illegal = MoveError::IllegalMove { origin, target };
        let moved = self.board.piece_on(origin).ok_or(illegal)?;
        let Some(action) = self
            .actions_from(origin)
            .iter()
            .find(|a| a.target() == target)
            .copied()
        else {
            log::trace!("Rejected illegal move {origin}{target}");
            return Err(illegal);
        };

        let mover = moved.colour;
        let castling_rights = self.castling_rights;
        let en_passant_target = self.en_passant_target;
        let reversible_moves = self.reversible_moves;

        if let Some(side) = action.castling_side() {
            let (rook_origin, rook_target) = side.rook_move(origin);
            self.board.relocate(origin, target);
            self.board.relocate(rook_origin, rook_target);
            self.castling_rights.disallow(mover);
            self.en_passant_target = None;
            self.reversible_moves = self.reversible_moves.saturating_add(1);
            self.history.push(HistoryEntry {
                origin,
                target,
                moved,
                captured: None,
                en_passant_capture: None,
                castled: Some(side),
                promoted_to: None,
                notation: side.notation().to_string(),
                castling_rights,
                en_passant_target,
                reversible_moves,
            });
            log::debug!("{mover} castled {}", side.notation());
            self.end_turn();
            return Ok(MoveOutcome::Castled);
        }

        let en_passant_capture = if action.is_en_passant() {
            en_passant_victim(target, mover)
        } else {
            None
        };
        let captured = match en_passant_capture {
            Some(square) => self.board.take(square),
            None => self.board.piece_on(target),
        };
        if let Some(piece) = captured {
            self.captured[mover as usize].push(piece.kind);
        }

        let notation = Self::notation(moved.kind, captured.is_some(), target);
        log::debug!("{mover} played {notation} ({origin}{target})");
        self.history.push(HistoryEntry {
            origin,
            target,
            moved,
            captured,
            en_passant_capture,
            castled: None,
            promoted_to: None,
            notation,
            castling_rights,
            en_passant_target,
            reversible_moves,
        });

        self.en_passant_target =
            if moved.kind == PieceKind::Pawn && origin.row().abs_diff(target.row()) == 2 {
                Square::new(
                    ((origin.row() + target.row()) / 2) as i8,
                    origin.col() as i8,
                )
            } else {
                None
            };

        match moved.kind {
            PieceKind::King => self.castling_rights.disallow(mover),
            PieceKind::Rook => self.revoke_rook_right(origin, mover),
            _ => (),
        }
        if let Some(Piece {
            kind: PieceKind::Rook,
            colour,
        }) = captured
        {
            self.revoke_rook_right(target, colour)
        }

        self.reversible_moves = if moved.kind == PieceKind::Pawn || captured.is_some() {
            0
        } else {
            self.reversible_moves.saturating_add(1)
        };

        self.board.relocate(origin, target);

        if moved.kind == PieceKind::Pawn && target.row() == mover.promotion_row() {
            self.pending_promotion = Some(target);
            return Ok(MoveOutcome::AwaitingPromotion);
        }

        self.end_turn();
        Ok(MoveOutcome::Applied)
    }

    /// Plays the move between the given coordinates.
    ///
    /// # Errors
    /// Off-board coordinates are rejected before anything else, then this behaves
    /// like [`Position::make`].
    pub fn make_at(
        &mut self,
        origin_row: i8,
        origin_col: i8,
        target_row: i8,
        target_col: i8,
    ) -> Result<MoveOutcome, MoveError> {
        let origin = Square::new(origin_row, origin_col).ok_or(MoveError::OutOfBounds {
            row: origin_row,
            col: origin_col,
        })?;
        let target = Square::new(target_row, target_col).ok_or(MoveError::OutOfBounds {
            row: target_row,
            col: target_col,
        })?;
        self.make(origin, target)
    }

    /// Replaces the pawn waiting on `square` with a piece of kind `kind`, then
    /// passes the turn.
    ///
    /// # Errors
    /// Fails if `square` holds no pawn, if that pawn is not waiting for a
    /// promotion, or if `kind` is a pawn or a king.
    pub fn promote(&mut self, square: Square, kind: PieceKind) -> Result<(), PromotionError> {
        let pawn = self
            .board
            .piece_on(square)
            .filter(|p| p.kind == PieceKind::Pawn)
            .ok_or(PromotionError::NoPawn(square))?;
        let target =
            PromotionTarget::from_piece_kind(kind).ok_or(PromotionError::InvalidTarget(kind))?;
        if self.pending_promotion != Some(square) {
            return Err(PromotionError::NotPending(square));
        }

        let promoted = target.to_piece_kind();
        self.board.set(square, Some(Piece::new(promoted, pawn.colour)));
        if let Some(entry) = self.history.last_mut() {
            entry.promoted_to = Some(promoted);
            entry.notation.push('=');
            entry.notation.extend(promoted.notation_letter());
        }
        log::debug!("{} promoted on {square} to {promoted:?}", pawn.colour);

        self.pending_promotion = None;
        self.end_turn();
        Ok(())
    }

    /// Promotes the pawn at the given coordinates.
    ///
    /// # Errors
    /// Off-board coordinates are rejected, then this behaves like
    /// [`Position::promote`].
    pub fn promote_at(&mut self, row: i8, col: i8, kind: PieceKind) -> Result<(), PromotionError> {
        let square = Square::new(row, col).ok_or(PromotionError::OutOfBounds { row, col })?;
        self.promote(square, kind)
    }

    /// Undoes the last move played, restoring the position as it was prior to the
    /// move, and returns its record.
    ///
    /// Returns `None` if no moves were played.
    pub fn unmake(&mut self) -> Option<HistoryEntry> {
        let entry = self.history.pop()?;
        let mover = entry.moved.colour;

        self.board.set(entry.origin, Some(entry.moved));
        if let Some(side) = entry.castled {
            let (rook_origin, rook_target) = side.rook_move(entry.origin);
            self.board.relocate(rook_target, rook_origin);
            self.board.take(entry.target);
        } else {
            match entry.en_passant_capture {
                Some(square) => {
                    self.board.take(entry.target);
                    self.board.set(square, entry.captured);
                }
                None => {
                    self.board.set(entry.target, entry.captured);
                }
            }
            if entry.captured.is_some() {
                self.captured[mover as usize].pop();
            }
        }

        self.castling_rights = entry.castling_rights;
        self.en_passant_target = entry.en_passant_target;
        self.reversible_moves = entry.reversible_moves;
        self.side_to_move = mover;
        self.pending_promotion = None;
        self.status = self.compute_status();
        log::debug!("Undid {} by {mover}", entry.notation);

        Some(entry)
    }

    /// Passes the turn and recomputes the status for the new side to move.
    fn end_turn(&mut self) {
        self.side_to_move.invert();
        self.status = self.compute_status();
        log::trace!("{} to move, {}", self.side_to_move, self.status);
    }

    fn compute_status(&self) -> GameStatus {
        match (
            self.is_in_check(self.side_to_move),
            self.has_legal_actions(),
        ) {
            (true, false) => GameStatus::Checkmate,
            (false, false) => GameStatus::Stalemate,
            (true, true) => GameStatus::Check,
            (false, true) => GameStatus::Playing,
        }
    }

    /// Removes the castling right tied to a rook of `colour` standing on `square`
    /// if it is one of its starting corners.
    fn revoke_rook_right(&mut self, square: Square, colour: Colour) {
        if square.row() != colour.home_row() {
            return;
        }
        for side in [CastlingSide::KingSide, CastlingSide::QueenSide] {
            if square.col() == side.rook_origin_col() {
                self.castling_rights.disallow_side(colour, side)
            }
        }
    }

    fn notation(kind: PieceKind, capture: bool, target: Square) -> String {
        let mut notation = String::with_capacity(4);
        notation.extend(kind.notation_letter());
        if capture {
            notation.push('x');
        }
        notation.push_str(&target.to_string());
        notation
    }
}
impl From<Fen> for Position {
    fn from(value: Fen) -> Self {
        Self::from_fen(&value)
    }
}
impl From<&Fen> for Position {
    fn from(value: &Fen) -> Self {
        Self::from_fen(value)
    }
}
impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (row, line) in self.board.to_string().lines().enumerate() {
            write!(f, "{line}")?;
            match row {
                3 => writeln!(f, "   side to move: {}", self.side_to_move),
                4 => writeln!(f, "   status: {}", self.status),
                5 => writeln!(f, "   castling rights: {}", self.castling_rights),
                6 => writeln!(
                    f,
                    "   en passant: {}",
                    match self.en_passant_target {
                        Some(sq) => sq.to_string(),
                        None => "-".to_string(),
                    }
                ),
                _ => writeln!(f),
            }?
        }
        write!(f, "\nfen: {}", self.fen())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn make_unmake_restores_position() {
        let mut pos = Position::initial();
        let original = pos.clone();
        pos.make(sq("g1"), sq("f3")).unwrap();
        assert_eq!(pos.side_to_move(), Colour::Black);
        assert_eq!(pos.halfmove_clock(), 1);
        pos.unmake();
        assert_eq!(pos, original);
    }

    #[test]
    fn rejected_moves_change_nothing() {
        let mut pos = Position::initial();
        let original = pos.clone();
        assert_eq!(
            pos.make(sq("e2"), sq("e5")),
            Err(MoveError::IllegalMove {
                origin: sq("e2"),
                target: sq("e5")
            })
        );
        assert_eq!(
            pos.make(sq("e7"), sq("e5")),
            Err(MoveError::IllegalMove {
                origin: sq("e7"),
                target: sq("e5")
            })
        );
        assert!(pos.make(sq("e4"), sq("e5")).is_err());
        assert_eq!(
            pos.make_at(6, 4, 8, 4),
            Err(MoveError::OutOfBounds { row: 8, col: 4 })
        );
        assert_eq!(
            pos.make_at(-1, 4, 4, 4),
            Err(MoveError::OutOfBounds { row: -1, col: 4 })
        );
        assert_eq!(pos, original);
    }

    #[test]
    fn coordinate_accessors() {
        let pos = Position::initial();
        assert_eq!(
            pos.piece_at(7, 4),
            Some(Piece::new(PieceKind::King, Colour::White))
        );
        assert_eq!(pos.piece_at(4, 4), None);
        assert_eq!(pos.piece_at(-3, 12), None);
        assert_eq!(pos.actions_at(6, 4).len(), 2);
        assert!(pos.actions_at(1, 4).is_empty());
        assert!(pos.actions_at(9, 9).is_empty());
    }

    #[test]
    fn fullmove_number_follows_history() {
        let mut pos = Position::initial();
        assert_eq!(pos.fullmove_number(), 1);
        pos.make(sq("e2"), sq("e4")).unwrap();
        assert_eq!(pos.fullmove_number(), 1);
        pos.make(sq("e7"), sq("e5")).unwrap();
        assert_eq!(pos.fullmove_number(), 2);

        let from_black = Position::from_fen(
            &"4k3/8/8/8/8/8/8/4K3 b - - 7 30".parse().unwrap(),
        );
        assert_eq!(from_black.fullmove_number(), 30);
        assert_eq!(from_black.halfmove_clock(), 7);
    }

    #[test]
    fn status_display() {
        assert_eq!(GameStatus::Checkmate.to_string(), "checkmate");
        assert!(GameStatus::Stalemate.is_over());
        assert!(!GameStatus::Check.is_over());
    }
}
