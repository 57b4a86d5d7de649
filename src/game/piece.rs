//! Piece types encoding.

use std::str::FromStr;

use thiserror::Error;

use crate::parsing::PartialFromStr;

use super::colour::Colour;

/// Total number of different piece kinds (6).
pub const NUM_PIECES: usize = 6;

const PIECE_SYMBOLS: [char; 12] = ['P', 'N', 'B', 'R', 'Q', 'K', 'p', 'n', 'b', 'r', 'q', 'k'];
const PIECE_SYMBOLS_UNICODE: [char; 12] =
    ['♙', '♘', '♗', '♖', '♕', '♔', '♟', '♞', '♝', '♜', '♛', '♚'];

/// Complete set of information for identifying a piece (colour and kind).
///
/// Pieces are plain values: a promotion replaces the pawn with a new piece rather
/// than modifying it.
///
/// # Parsing
/// Pieces can be parsed from their symbol ('p', 'n', 'b', 'r', 'q', 'k' for black,
/// uppercase for white) or unicode symbols using Rust's [`FromStr`] trait.
/// ```
/// # use gambit::game::piece::*;
/// # use gambit::game::colour::*;
/// assert_eq!("p".parse(), Ok(Piece::new(PieceKind::Pawn, Colour::Black)));
/// assert_eq!("♕".parse(), Ok(Piece::new(PieceKind::Queen, Colour::White)));
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Piece {
    pub kind: PieceKind,
    pub colour: Colour,
}
impl Piece {
    /// Creates a new `kind` piece of the given `colour`.
    pub const fn new(kind: PieceKind, colour: Colour) -> Self {
        Self { kind, colour }
    }

    /// Returns the piece's symbol.
    /// # Example
    /// ```
    /// # use gambit::game::piece::*;
    /// # use gambit::game::colour::*;
    /// assert_eq!(Piece::new(PieceKind::Pawn, Colour::Black).symbol(), 'p');
    /// ```
    pub fn symbol(&self) -> char {
        PIECE_SYMBOLS[self.colour as usize * 6 + self.kind as usize]
    }

    /// Returns the piece's Unicode symbol.
    pub fn unicode_symbol(&self) -> char {
        PIECE_SYMBOLS_UNICODE[self.colour as usize * 6 + self.kind as usize]
    }
}
impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Error)]
pub enum PieceParseError {
    #[error("{0} is not a valid piece symbol")]
    InvalidPieceSymbol(char),
    #[error("Empty input")]
    EmptyInput,
    #[error("A piece can only be one character long")]
    InputTooLong,
}

impl PartialFromStr for Piece {
    type Err = PieceParseError;

    fn partial_from_str(s: &str) -> Result<(Self, &str), Self::Err> {
        let symbol = s.chars().next().ok_or(PieceParseError::EmptyInput)?;
        let piece = match symbol {
            'p' | '♟' => Self::new(PieceKind::Pawn, Colour::Black),
            'n' | '♞' => Self::new(PieceKind::Knight, Colour::Black),
            'b' | '♝' => Self::new(PieceKind::Bishop, Colour::Black),
            'r' | '♜' => Self::new(PieceKind::Rook, Colour::Black),
            'q' | '♛' => Self::new(PieceKind::Queen, Colour::Black),
            'k' | '♚' => Self::new(PieceKind::King, Colour::Black),
            'P' | '♙' => Self::new(PieceKind::Pawn, Colour::White),
            'N' | '♘' => Self::new(PieceKind::Knight, Colour::White),
            'B' | '♗' => Self::new(PieceKind::Bishop, Colour::White),
            'R' | '♖' => Self::new(PieceKind::Rook, Colour::White),
            'Q' | '♕' => Self::new(PieceKind::Queen, Colour::White),
            'K' | '♔' => Self::new(PieceKind::King, Colour::White),
            _ => Err(PieceParseError::InvalidPieceSymbol(symbol))?,
        };

        Ok((piece, &s[symbol.len_utf8()..]))
    }
}
impl FromStr for Piece {
    type Err = PieceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::partial_from_str(s).and_then(|(result, rest)| {
            if rest.is_empty() {
                Ok(result)
            } else {
                Err(PieceParseError::InputTooLong)
            }
        })
    }
}

/// The kind of a piece, one of Pawn, Knight, Bishop, Rook, Queen or King.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}
impl PieceKind {
    /// All piece kinds.
    pub const PIECE_KINDS: [Self; NUM_PIECES] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Iterator over all piece kinds.
    pub fn iter() -> impl Iterator<Item = Self> {
        Self::PIECE_KINDS.into_iter()
    }

    /// Letter prefixed to moves of this piece in notation, `None` for pawns.
    pub fn notation_letter(self) -> Option<char> {
        match self {
            PieceKind::Pawn => None,
            kind => Some(PIECE_SYMBOLS[kind as usize]),
        }
    }

    /// Checks if this piece kind can be promoted to.
    ///
    /// Returns true for all pieces but pawns and kings.
    pub fn is_valid_promotion_target(&self) -> bool {
        !matches!(self, PieceKind::Pawn | PieceKind::King)
    }
}
impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", PIECE_SYMBOLS[*self as usize + 6])
    }
}
impl PartialFromStr for PieceKind {
    type Err = PieceParseError;

    fn partial_from_str(s: &str) -> Result<(Self, &str), Self::Err> {
        Piece::partial_from_str(s).map(|(piece, rest)| (piece.kind, rest))
    }
}
impl FromStr for PieceKind {
    type Err = PieceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Piece::from_str(s).map(|piece| piece.kind)
    }
}

/// Special type that only contains valid promotion targets
/// (knight, bishop, rook and queen).
///
/// Methods and trait implementation are made for an easy conversion to the standard
/// [`PieceKind`] type.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum PromotionTarget {
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
}
impl PromotionTarget {
    /// Pieces that a pawn can promote to.
    pub const ALL: [Self; 4] = [
        PromotionTarget::Knight,
        PromotionTarget::Bishop,
        PromotionTarget::Rook,
        PromotionTarget::Queen,
    ];

    /// Converts a piece kind into a promotion target if such a transformation is valid.
    /// ```
    /// # use gambit::game::piece::*;
    /// assert_eq!(PromotionTarget::from_piece_kind(PieceKind::Rook), Some(PromotionTarget::Rook));
    /// assert_eq!(PromotionTarget::from_piece_kind(PieceKind::King), None);
    /// ```
    pub fn from_piece_kind(p: PieceKind) -> Option<Self> {
        match p {
            PieceKind::Knight => Some(Self::Knight),
            PieceKind::Bishop => Some(Self::Bishop),
            PieceKind::Rook => Some(Self::Rook),
            PieceKind::Queen => Some(Self::Queen),
            PieceKind::Pawn | PieceKind::King => None,
        }
    }

    /// Converts this promotion target to the corresponding piece kind.
    pub fn to_piece_kind(self) -> PieceKind {
        match self {
            Self::Knight => PieceKind::Knight,
            Self::Bishop => PieceKind::Bishop,
            Self::Rook => PieceKind::Rook,
            Self::Queen => PieceKind::Queen,
        }
    }
}
impl From<PromotionTarget> for PieceKind {
    fn from(value: PromotionTarget) -> Self {
        value.to_piece_kind()
    }
}
impl std::fmt::Display for PromotionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_piece_kind())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn symbols_round_trip() {
        for colour in Colour::COLOURS {
            for kind in PieceKind::iter() {
                let piece = Piece::new(kind, colour);
                assert_eq!(piece.symbol().to_string().parse(), Ok(piece));
                assert_eq!(piece.unicode_symbol().to_string().parse(), Ok(piece));
            }
        }
    }

    #[test]
    fn notation_letters() {
        assert_eq!(PieceKind::Pawn.notation_letter(), None);
        assert_eq!(PieceKind::Knight.notation_letter(), Some('N'));
        assert_eq!(PieceKind::King.notation_letter(), Some('K'));
    }

    #[test]
    fn promotion_targets_exclude_pawn_and_king() {
        let valid: Vec<_> = PieceKind::iter()
            .filter(PieceKind::is_valid_promotion_target)
            .collect();
        assert_eq!(
            valid,
            PromotionTarget::ALL
                .iter()
                .map(|t| t.to_piece_kind())
                .collect::<Vec<_>>()
        );
        assert_eq!("q".parse::<PieceKind>(), Ok(PieceKind::Queen));
        assert_eq!(
            "x".parse::<PieceKind>(),
            Err(PieceParseError::InvalidPieceSymbol('x'))
        );
    }
}
