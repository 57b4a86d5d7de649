//! The 8x8 grid of pieces, and the guard used to try moves on it.

use std::ops::{Deref, Index};

use super::{
    colour::Colour,
    piece::{Piece, PieceKind},
    square::Square,
};

const BACK_ROW: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Piece placement, indexed by [`Square`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Board([[Option<Piece>; 8]; 8]);
impl Board {
    /// A board with no pieces.
    pub const fn empty() -> Self {
        Self([[None; 8]; 8])
    }

    /// The standard starting placement.
    pub fn initial() -> Self {
        let mut board = Self::empty();
        for colour in Colour::COLOURS {
            let home = colour.home_row() as usize;
            let pawns = colour.pawn_row() as usize;
            for (col, kind) in BACK_ROW.into_iter().enumerate() {
                board.0[home][col] = Some(Piece::new(kind, colour));
                board.0[pawns][col] = Some(Piece::new(PieceKind::Pawn, colour));
            }
        }
        board
    }

    /// Returns the piece sitting on `square`, if any.
    #[inline(always)]
    pub fn piece_on(&self, square: Square) -> Option<Piece> {
        self.0[square.row() as usize][square.col() as usize]
    }

    #[inline(always)]
    pub fn is_empty(&self, square: Square) -> bool {
        self.piece_on(square).is_none()
    }

    /// Replaces the content of `square`, returning what was there.
    #[inline(always)]
    pub(crate) fn set(&mut self, square: Square, piece: Option<Piece>) -> Option<Piece> {
        std::mem::replace(
            &mut self.0[square.row() as usize][square.col() as usize],
            piece,
        )
    }

    /// Empties `square`, returning what was there.
    #[inline(always)]
    pub(crate) fn take(&mut self, square: Square) -> Option<Piece> {
        self.set(square, None)
    }

    /// Moves whatever sits on `origin` to `target`, returning what `target` held.
    #[inline(always)]
    pub(crate) fn relocate(&mut self, origin: Square, target: Square) -> Option<Piece> {
        let moving = self.take(origin);
        self.set(target, moving)
    }

    /// Iterator over all pieces and the square they sit on.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::squares_iter().filter_map(move |sq| self.piece_on(sq).map(|p| (sq, p)))
    }

    /// Iterator over the pieces of a single colour.
    pub fn pieces_of(&self, colour: Colour) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.colour == colour)
    }

    /// Returns the square of the king of the given colour, if there is one.
    pub fn king_square(&self, colour: Colour) -> Option<Square> {
        self.pieces_of(colour)
            .find(|(_, p)| p.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }

    /// Plays `origin -> target` on the board until the returned guard is dropped.
    ///
    /// `captured` is the square of a piece removed by the move when it is not the
    /// target (en passant). The guard puts every touched square back as it was
    /// when dropped, whichever way the caller leaves the scope.
    pub(crate) fn simulate(
        &mut self,
        origin: Square,
        target: Square,
        captured: Option<Square>,
    ) -> Simulation<'_> {
        let origin_content = self.piece_on(origin);
        let captured = captured.map(|sq| (sq, self.take(sq)));
        let target_content = self.relocate(origin, target);
        Simulation {
            board: self,
            origin: (origin, origin_content),
            target: (target, target_content),
            captured,
        }
    }
}
impl Index<Square> for Board {
    type Output = Option<Piece>;

    fn index(&self, square: Square) -> &Self::Output {
        &self.0[square.row() as usize][square.col() as usize]
    }
}
impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (row, pieces) in self.0.iter().enumerate() {
            write!(f, "{} ", 8 - row)?;
            for piece in pieces {
                match piece {
                    Some(p) => write!(f, "{p} ")?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?
        }
        write!(f, "  a b c d e f g h")
    }
}

/// A move provisionally played on a [`Board`].
///
/// Only read access is given while the simulation lives. Dropping it restores the
/// board exactly.
pub(crate) struct Simulation<'a> {
    board: &'a mut Board,
    origin: (Square, Option<Piece>),
    target: (Square, Option<Piece>),
    captured: Option<(Square, Option<Piece>)>,
}
impl Deref for Simulation<'_> {
    type Target = Board;

    fn deref(&self) -> &Self::Target {
        self.board
    }
}
impl Drop for Simulation<'_> {
    fn drop(&mut self) {
        let (target, target_content) = self.target;
        self.board.set(target, target_content);
        let (origin, origin_content) = self.origin;
        self.board.set(origin, origin_content);
        if let Some((square, content)) = self.captured {
            self.board.set(square, content);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn initial_placement() {
        let board = Board::initial();
        assert_eq!(board.pieces().count(), 32);
        assert_eq!(
            board.piece_on(sq("e1")),
            Some(Piece::new(PieceKind::King, Colour::White))
        );
        assert_eq!(
            board.piece_on(sq("d8")),
            Some(Piece::new(PieceKind::Queen, Colour::Black))
        );
        assert_eq!(
            board[sq("a7")],
            Some(Piece::new(PieceKind::Pawn, Colour::Black))
        );
        assert!(board.is_empty(sq("e4")));
        assert_eq!(board.king_square(Colour::Black), Some(sq("e8")));
    }

    #[test]
    fn simulation_restores_capture() {
        let mut board = Board::initial();
        board.relocate(sq("d8"), sq("d2"));
        let before = board;
        {
            let simulated = board.simulate(sq("e1"), sq("d2"), None);
            assert_eq!(
                simulated.piece_on(sq("d2")),
                Some(Piece::new(PieceKind::King, Colour::White))
            );
            assert!(simulated.is_empty(sq("e1")));
        }
        assert_eq!(board, before);
    }

    #[test]
    fn simulation_restores_en_passant_victim() {
        let mut board = Board::empty();
        board.set(sq("e5"), Some(Piece::new(PieceKind::Pawn, Colour::White)));
        board.set(sq("d5"), Some(Piece::new(PieceKind::Pawn, Colour::Black)));
        let before = board;
        {
            let simulated = board.simulate(sq("e5"), sq("d6"), Some(sq("d5")));
            assert!(simulated.is_empty(sq("d5")));
            assert!(simulated.is_empty(sq("e5")));
            assert!(!simulated.is_empty(sq("d6")));
        }
        assert_eq!(board, before);
    }

    #[test]
    fn display() {
        let rendered = Board::initial().to_string();
        let first = rendered.lines().next().unwrap();
        assert_eq!(first, "8 r n b q k b n r ");
        assert_eq!(rendered.lines().count(), 9);
    }
}
