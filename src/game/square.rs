//! Squares of the board, addressed by row and column.
//!
//! Row 0 is the 8th rank (black's home side), row 7 the 1st rank. Column 0 is the
//! `a` file.

use std::str::FromStr;

use thiserror::Error;

use crate::parsing::PartialFromStr;

const FILES: [char; 8] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];

/// A square on the board.
///
/// Off-board coordinates cannot be stored in a [`Square`]: constructors and
/// [`Square::translate`] return `None` for them instead.
/// ```
/// # use gambit::game::square::Square;
/// let e4: Square = "e4".parse().unwrap();
/// assert_eq!((e4.row(), e4.col()), (4, 4));
/// assert_eq!(Square::new(8, 0), None);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Square {
    row: u8,
    col: u8,
}
impl Square {
    /// Creates a square from signed coordinates, returning `None` if they fall
    /// outside of the board.
    #[inline]
    pub const fn new(row: i8, col: i8) -> Option<Self> {
        if row >= 0 && row < 8 && col >= 0 && col < 8 {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    #[inline]
    pub const fn row(self) -> u8 {
        self.row
    }

    #[inline]
    pub const fn col(self) -> u8 {
        self.col
    }

    /// Rank number as written in notation (1 to 8).
    #[inline]
    pub const fn rank(self) -> u8 {
        8 - self.row
    }

    /// File letter as written in notation ('a' to 'h').
    #[inline]
    pub const fn file(self) -> char {
        FILES[self.col as usize]
    }

    /// Returns the square `delta` away from this one, if it is on the board.
    #[inline]
    pub const fn translate(self, delta: Delta) -> Option<Self> {
        Self::new(
            self.row as i8 + delta.rows,
            self.col as i8 + delta.cols,
        )
    }

    /// Returns the square on the same row at column `col`.
    #[inline]
    pub(crate) const fn with_col(self, col: u8) -> Self {
        Self { row: self.row, col }
    }

    /// Iterator over all squares, row by row starting from row 0.
    pub fn squares_iter() -> impl Iterator<Item = Self> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |col| Self { row, col }))
    }
}
impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// Displacement between two squares, in rows and columns.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Delta {
    pub rows: i8,
    pub cols: i8,
}
impl Delta {
    pub const fn new(rows: i8, cols: i8) -> Self {
        Self { rows, cols }
    }
}

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Error)]
pub enum SquareParseError {
    #[error("{0} is not a valid file")]
    InvalidFile(char),
    #[error("{0} is not a valid rank")]
    InvalidRank(char),
    #[error("Empty input")]
    EmptyInput,
    #[error("A square is only two characters long")]
    InputTooLong,
}

impl PartialFromStr for Square {
    type Err = SquareParseError;

    fn partial_from_str(s: &str) -> Result<(Self, &str), Self::Err> {
        let mut chars = s.chars();
        let file = chars.next().ok_or(SquareParseError::EmptyInput)?;
        let col = FILES
            .iter()
            .position(|&f| f == file)
            .ok_or(SquareParseError::InvalidFile(file))?;
        let rank = chars.next().ok_or(SquareParseError::EmptyInput)?;
        let row = match rank.to_digit(10) {
            Some(r @ 1..=8) => 8 - r,
            _ => return Err(SquareParseError::InvalidRank(rank)),
        };

        Ok((
            Self {
                row: row as u8,
                col: col as u8,
            },
            &s[file.len_utf8() + rank.len_utf8()..],
        ))
    }
}
impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::partial_from_str(s).and_then(|(square, rest)| {
            if rest.is_empty() {
                Ok(square)
            } else {
                Err(SquareParseError::InputTooLong)
            }
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn coordinates_match_notation() {
        let a8 = Square::new(0, 0).unwrap();
        let h1 = Square::new(7, 7).unwrap();
        assert_eq!(a8.to_string(), "a8");
        assert_eq!(h1.to_string(), "h1");
        assert_eq!("a8".parse(), Ok(a8));
        assert_eq!("h1".parse(), Ok(h1));
    }

    #[test]
    fn off_board_is_rejected() {
        assert_eq!(Square::new(-1, 3), None);
        assert_eq!(Square::new(3, 8), None);
        let h8 = Square::new(0, 7).unwrap();
        assert_eq!(h8.translate(Delta::new(-1, 0)), None);
        assert_eq!(h8.translate(Delta::new(0, 1)), None);
        assert_eq!(h8.translate(Delta::new(1, -1)), Square::new(1, 6));
    }

    #[test]
    fn parse_errors() {
        assert_eq!("".parse::<Square>(), Err(SquareParseError::EmptyInput));
        assert_eq!("i4".parse::<Square>(), Err(SquareParseError::InvalidFile('i')));
        assert_eq!("a9".parse::<Square>(), Err(SquareParseError::InvalidRank('9')));
        assert_eq!("a0".parse::<Square>(), Err(SquareParseError::InvalidRank('0')));
        assert_eq!("a1b".parse::<Square>(), Err(SquareParseError::InputTooLong));
        assert_eq!(
            Square::partial_from_str("e2e4"),
            Ok(("e2".parse().unwrap(), "e4"))
        );
    }

    #[test]
    fn squares_iter_covers_board() {
        assert_eq!(Square::squares_iter().count(), 64);
        assert_eq!(Square::squares_iter().next(), Square::new(0, 0));
        assert_eq!(Square::squares_iter().last(), Square::new(7, 7));
    }
}
