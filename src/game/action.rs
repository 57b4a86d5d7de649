//! # Actions (or moves)
//! Moves as produced by the generator: an origin, a target and a flag for the two
//! special moves whose side effects are not implied by origin and target alone.

use super::{castling_rights::CastlingSide, square::Square};

/// Legal moves of a single piece. A queen reaches at most 27 squares.
pub type SquareActions = heapless::Vec<Action, 32>;

/// Legal moves of a whole side.
pub type ActionList = heapless::Vec<Action, 256>;

/// Special behaviour attached to an [`Action`].
#[derive(Clone, Copy, Hash, Eq, PartialEq, Debug)]
pub enum ActionKind {
    /// Quiet moves, captures, pushes and promotions.
    Normal,
    /// A pawn capturing a pawn that just double pushed. The captured pawn does not
    /// sit on the target square.
    EnPassant,
    /// A king move that also relocates a rook.
    Castle(CastlingSide),
}

/// Describes a move using a from-to approach, with the flags needed to play it.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Debug)]
pub struct Action {
    origin: Square,
    target: Square,
    kind: ActionKind,
}
impl Action {
    /// Creates a new move without special behaviour.
    #[inline(always)]
    pub const fn new(origin: Square, target: Square) -> Self {
        Self {
            origin,
            target,
            kind: ActionKind::Normal,
        }
    }

    /// Creates an en passant capture.
    #[inline(always)]
    pub const fn new_en_passant(origin: Square, target: Square) -> Self {
        Self {
            origin,
            target,
            kind: ActionKind::EnPassant,
        }
    }

    /// Creates a castling move for a king on `origin`.
    #[inline(always)]
    pub const fn new_castle(origin: Square, side: CastlingSide) -> Self {
        Self {
            origin,
            target: origin.with_col(side.king_target_col()),
            kind: ActionKind::Castle(side),
        }
    }

    /// Returns the square the move originates from.
    #[inline(always)]
    pub const fn origin(self) -> Square {
        self.origin
    }

    /// Returns the square the move targets.
    #[inline(always)]
    pub const fn target(self) -> Square {
        self.target
    }

    #[inline(always)]
    pub const fn kind(self) -> ActionKind {
        self.kind
    }

    /// Checks if this move is an en passant capture.
    #[inline(always)]
    pub const fn is_en_passant(self) -> bool {
        matches!(self.kind, ActionKind::EnPassant)
    }

    /// Returns the castling side if this move is a castle.
    #[inline(always)]
    pub const fn castling_side(self) -> Option<CastlingSide> {
        match self.kind {
            ActionKind::Castle(side) => Some(side),
            _ => None,
        }
    }
}
impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.origin, self.target)
    }
}

/// Successful outcomes of [`Position::make`](super::position::Position::make).
#[derive(Clone, Copy, Hash, Eq, PartialEq, Debug)]
pub enum MoveOutcome {
    /// The move was played and the turn passed to the opponent.
    Applied,
    /// A pawn reached its last rank. The turn only passes once
    /// [`Position::promote`](super::position::Position::promote) is called.
    AwaitingPromotion,
    /// King and rook were castled and the turn passed to the opponent.
    Castled,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn castle_targets() {
        let e1: Square = "e1".parse().unwrap();
        let short = Action::new_castle(e1, CastlingSide::KingSide);
        let long = Action::new_castle(e1, CastlingSide::QueenSide);
        assert_eq!(short.to_string(), "e1g1");
        assert_eq!(long.to_string(), "e1c1");
        assert_eq!(short.castling_side(), Some(CastlingSide::KingSide));
        assert!(!short.is_en_passant());
    }
}
