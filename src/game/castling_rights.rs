//! # Representation of castling rights

use std::str::FromStr;

use thiserror::Error;

use crate::parsing::PartialFromStr;

use super::{colour::Colour, square::Square};

/// The two sides a king can castle towards.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum CastlingSide {
    KingSide,
    QueenSide,
}
impl CastlingSide {
    /// Column the castling rook starts from.
    #[inline]
    pub const fn rook_origin_col(self) -> u8 {
        match self {
            Self::KingSide => 7,
            Self::QueenSide => 0,
        }
    }

    /// Column the castling rook lands on.
    #[inline]
    pub const fn rook_target_col(self) -> u8 {
        match self {
            Self::KingSide => 5,
            Self::QueenSide => 3,
        }
    }

    /// Column the king lands on.
    #[inline]
    pub const fn king_target_col(self) -> u8 {
        match self {
            Self::KingSide => 6,
            Self::QueenSide => 2,
        }
    }

    /// Columns strictly between king and rook, which must all be empty.
    pub(crate) const fn between_cols(self) -> &'static [u8] {
        match self {
            Self::KingSide => &[5, 6],
            Self::QueenSide => &[1, 2, 3],
        }
    }

    /// Columns the king crosses or lands on, which must not be attacked.
    pub(crate) const fn king_path_cols(self) -> &'static [u8] {
        match self {
            Self::KingSide => &[5, 6],
            Self::QueenSide => &[3, 2],
        }
    }

    /// Origin and target squares of the rook for a king on `king_origin`.
    #[inline]
    pub(crate) const fn rook_move(self, king_origin: Square) -> (Square, Square) {
        (
            king_origin.with_col(self.rook_origin_col()),
            king_origin.with_col(self.rook_target_col()),
        )
    }

    /// Notation of the castling move.
    pub const fn notation(self) -> &'static str {
        match self {
            Self::KingSide => "O-O",
            Self::QueenSide => "O-O-O",
        }
    }
}

/// Efficient representation of castling rights.
///
/// Rights are only ever removed while playing. Undoing a move restores the copy
/// saved before it was played.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct CastlingRights(u8);
impl CastlingRights {
    const KINGSIDE_BLACK: u8 = 0b0001;
    const QUEENSIDE_BLACK: u8 = 0b0010;
    const KINGSIDE_WHITE: u8 = 0b0100;
    const QUEENSIDE_WHITE: u8 = 0b1000;
    const FULL: u8 =
        Self::KINGSIDE_BLACK | Self::KINGSIDE_WHITE | Self::QUEENSIDE_BLACK | Self::QUEENSIDE_WHITE;
    const EMPTY: u8 = 0;

    /// Full castling rights for both sides.
    pub const fn full() -> Self {
        Self(Self::FULL)
    }

    /// No castling rights for any sides.
    pub const fn none() -> Self {
        Self(Self::EMPTY)
    }

    /// Returns `true` if none of the sides can castle.
    pub const fn is_none(self) -> bool {
        self.0 == Self::EMPTY
    }

    #[inline(always)]
    const fn mask(colour: Colour, side: CastlingSide) -> u8 {
        match (colour, side) {
            (Colour::White, CastlingSide::KingSide) => Self::KINGSIDE_WHITE,
            (Colour::White, CastlingSide::QueenSide) => Self::QUEENSIDE_WHITE,
            (Colour::Black, CastlingSide::KingSide) => Self::KINGSIDE_BLACK,
            (Colour::Black, CastlingSide::QueenSide) => Self::QUEENSIDE_BLACK,
        }
    }

    /// Checks if castling towards `side` is still allowed for `colour`.
    /// ```
    /// # use gambit::game::castling_rights::*;
    /// # use gambit::game::colour::Colour;
    /// let mut rights = CastlingRights::full();
    /// rights.disallow_side(Colour::White, CastlingSide::KingSide);
    /// assert!(!rights.allowed(Colour::White, CastlingSide::KingSide));
    /// assert!(rights.allowed(Colour::White, CastlingSide::QueenSide));
    /// ```
    #[inline(always)]
    pub const fn allowed(self, colour: Colour, side: CastlingSide) -> bool {
        self.0 & Self::mask(colour, side) != 0
    }

    /// Checks if kingside castling is allowed for a certain colour.
    #[inline(always)]
    pub const fn kingside_castle_allowed(self, colour: Colour) -> bool {
        self.allowed(colour, CastlingSide::KingSide)
    }

    /// Checks if queenside castling is allowed for a certain colour.
    #[inline(always)]
    pub const fn queenside_castle_allowed(self, colour: Colour) -> bool {
        self.allowed(colour, CastlingSide::QueenSide)
    }

    /// Disallows castling towards `side` for a given colour.
    #[inline(always)]
    pub fn disallow_side(&mut self, colour: Colour, side: CastlingSide) {
        self.0 &= !Self::mask(colour, side)
    }

    /// Disallows both castling moves for a given side.
    pub fn disallow(&mut self, colour: Colour) {
        self.disallow_side(colour, CastlingSide::KingSide);
        self.disallow_side(colour, CastlingSide::QueenSide);
    }
}
impl Default for CastlingRights {
    fn default() -> Self {
        Self::full()
    }
}

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Error)]
pub enum CastlingParseError {
    #[error("Unexpected castling symbol {0}")]
    InvalidSymbol(char),
    #[error("Castling right {0} was given twice")]
    Duplicate(char),
    #[error("Empty input")]
    EmptyInput,
    #[error("Some input was left after the castling rights")]
    InputTooLong,
}

impl PartialFromStr for CastlingRights {
    type Err = CastlingParseError;

    fn partial_from_str(mut s: &str) -> Result<(Self, &str), Self::Err> {
        if let Some(rest) = s.strip_prefix('-') {
            return Ok((Self::none(), rest));
        }

        let mut rights = Self::EMPTY;
        while let Some(c) = s.chars().next() {
            let flag = match c {
                'K' => Self::KINGSIDE_WHITE,
                'Q' => Self::QUEENSIDE_WHITE,
                'k' => Self::KINGSIDE_BLACK,
                'q' => Self::QUEENSIDE_BLACK,
                _ if rights == Self::EMPTY => return Err(CastlingParseError::InvalidSymbol(c)),
                _ => break,
            };
            if rights & flag != 0 {
                return Err(CastlingParseError::Duplicate(c));
            }
            rights |= flag;
            s = &s[1..]
        }

        if rights == Self::EMPTY {
            Err(CastlingParseError::EmptyInput)
        } else {
            Ok((Self(rights), s))
        }
    }
}
impl FromStr for CastlingRights {
    type Err = CastlingParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::partial_from_str(s).and_then(|(r, s)| {
            if s.is_empty() {
                Ok(r)
            } else {
                Err(CastlingParseError::InputTooLong)
            }
        })
    }
}
impl std::fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            return write!(f, "-");
        }

        if self.kingside_castle_allowed(Colour::White) {
            write!(f, "K")?
        }
        if self.queenside_castle_allowed(Colour::White) {
            write!(f, "Q")?
        }
        if self.kingside_castle_allowed(Colour::Black) {
            write!(f, "k")?
        }
        if self.queenside_castle_allowed(Colour::Black) {
            write!(f, "q")?
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_uses_standard_order() {
        assert_eq!(CastlingRights::full().to_string(), "KQkq");
        assert_eq!(CastlingRights::none().to_string(), "-");

        let mut rights = CastlingRights::full();
        rights.disallow(Colour::White);
        rights.disallow_side(Colour::Black, CastlingSide::KingSide);
        assert_eq!(rights.to_string(), "q");
    }

    #[test]
    fn parse() {
        assert_eq!("KQkq".parse(), Ok(CastlingRights::full()));
        assert_eq!("-".parse(), Ok(CastlingRights::none()));
        let rights: CastlingRights = "Kq".parse().unwrap();
        assert!(rights.kingside_castle_allowed(Colour::White));
        assert!(!rights.queenside_castle_allowed(Colour::White));
        assert!(!rights.kingside_castle_allowed(Colour::Black));
        assert!(rights.queenside_castle_allowed(Colour::Black));

        assert_eq!(
            "KK".parse::<CastlingRights>(),
            Err(CastlingParseError::Duplicate('K'))
        );
        assert_eq!(
            "x".parse::<CastlingRights>(),
            Err(CastlingParseError::InvalidSymbol('x'))
        );
        assert_eq!(
            CastlingRights::partial_from_str("Qk -"),
            Ok(("Qk".parse().unwrap(), " -"))
        );
    }

    #[test]
    fn disallowing_is_per_colour() {
        let mut rights = CastlingRights::full();
        rights.disallow(Colour::Black);
        assert!(rights.kingside_castle_allowed(Colour::White));
        assert!(rights.queenside_castle_allowed(Colour::White));
        assert!(!rights.kingside_castle_allowed(Colour::Black));
        assert!(!rights.queenside_castle_allowed(Colour::Black));
    }
}
