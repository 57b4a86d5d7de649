//! # Forsyth-Edwards Notation (FEN) utilities.
//!
//! Allows parsing, formatting and provides a clean API over position strings of the
//! form `<placement> <side> <castling|-> <en passant|-> <halfmove> <fullmove>`.

use thiserror::Error;

use crate::parsing::{parse_char, parse_u16, PartialFromStr};

use super::{
    board::Board,
    castling_rights::{CastlingParseError, CastlingRights},
    colour::Colour,
    piece::{Piece, PieceParseError},
    square::{Square, SquareParseError},
};

/// Position string of the standard starting position.
pub const INITIAL_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// FEN string representation.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Fen {
    pub(crate) board: Board,
    pub side_to_move: Colour,
    pub castling_rights: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u16,
    pub fullmove_counter: u16,
}
impl Fen {
    /// Parses a FEN string.
    /// # Example
    /// ```
    /// # use gambit::game::fen::*;
    /// # use gambit::game::castling_rights::*;
    /// # use gambit::game::colour::*;
    /// let parsed_values = Fen::parse(INITIAL_FEN).unwrap();
    /// assert_eq!(parsed_values.side_to_move, Colour::White);
    /// assert_eq!(parsed_values.castling_rights, CastlingRights::full());
    /// assert_eq!(parsed_values.to_string(), INITIAL_FEN);
    /// ```
    pub fn parse(fen: &str) -> Result<Self, FenParseError> {
        fen.parse()
    }

    /// Returns the piece on a given square if any.
    pub fn piece_on(&self, square: Square) -> Option<Piece> {
        self.board.piece_on(square)
    }
}

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Error)]
/// FEN parsing errors.
pub enum FenParseError {
    /// A separator between two sections is missing.
    #[error("Missing section separator")]
    MissingSeparator,
    /// A piece placement rank was left incomplete.
    #[error("Rank {rank} of the piece section is missing {undefined} squares")]
    IncompleteRank { rank: u8, undefined: u8 },
    /// A piece placement rank describes more than 8 squares.
    #[error("Rank {rank} of the piece section defines more than 8 squares")]
    TooManySquares { rank: u8 },
    /// Too many ranks were defined in the FEN string.
    #[error("The piece section defines at least one non-existing rank")]
    TooManyRanks,
    /// Failed to parse a piece symbol.
    #[error("Failed to parse a piece symbol: {0}")]
    InvalidPiece(PieceParseError),
    /// Failed to parse the side to move.
    #[error("Failed to parse the side to move")]
    InvalidSideToMove,
    /// Castling rights could not be parsed correctly.
    #[error("Castling rights could not be parsed: {0}")]
    InvalidCastlingRights(CastlingParseError),
    /// The en passant square was not parsed correctly.
    #[error("En passant square could not be parsed: {0}")]
    InvalidEnPassantSquare(SquareParseError),
    /// The en passant rank was not correct (either 3 for black or 6 for white)
    #[error("Incompatible en passant rank: expected {expected}, got {got}")]
    InvalidEnPassantRank { expected: u8, got: u8 },
    /// Some input was left after parsing.
    #[error("Some part of the input was left after parsing the FEN string")]
    InputTooLong,
}

fn parse_placement(mut s: &str) -> Result<(Board, &str), FenParseError> {
    let mut board = Board::empty();
    let mut row = 0u8;
    let mut col = 0u8;
    while let Some(c) = s.chars().next() {
        match c {
            ' ' => break,
            '/' => {
                if col < 8 {
                    return Err(FenParseError::IncompleteRank {
                        rank: 8 - row,
                        undefined: 8 - col,
                    });
                }
                row += 1;
                col = 0;
                if row == 8 {
                    return Err(FenParseError::TooManyRanks);
                }
                s = &s[1..];
            }
            '1'..='8' => {
                col += c as u8 - b'0';
                if col > 8 {
                    return Err(FenParseError::TooManySquares { rank: 8 - row });
                }
                s = &s[1..];
            }
            _ => {
                let (piece, rest) =
                    Piece::partial_from_str(s).map_err(FenParseError::InvalidPiece)?;
                let square = Square::new(row as i8, col as i8)
                    .ok_or(FenParseError::TooManySquares { rank: 8 - row })?;
                board.set(square, Some(piece));
                col += 1;
                s = rest;
            }
        }
    }

    if col < 8 {
        Err(FenParseError::IncompleteRank {
            rank: 8 - row,
            undefined: 8 - col,
        })
    } else if row < 7 {
        Err(FenParseError::IncompleteRank {
            rank: 7 - row,
            undefined: 8,
        })
    } else {
        Ok((board, s))
    }
}

impl PartialFromStr for Fen {
    type Err = FenParseError;

    fn partial_from_str(s: &str) -> Result<(Self, &str), Self::Err> {
        let (board, s) = parse_placement(s)?;

        let s = parse_char(s, ' ').map_err(|_| FenParseError::MissingSeparator)?;
        let side_to_move = match s.chars().next() {
            Some('w') => Colour::White,
            Some('b') => Colour::Black,
            _ => Err(FenParseError::InvalidSideToMove)?,
        };
        let s = &s[1..];

        let s = parse_char(s, ' ').map_err(|_| FenParseError::MissingSeparator)?;
        let (castling_rights, s) =
            CastlingRights::partial_from_str(s).map_err(FenParseError::InvalidCastlingRights)?;

        let s = parse_char(s, ' ').map_err(|_| FenParseError::MissingSeparator)?;
        let (en_passant, s) = match s.strip_prefix('-') {
            Some(rest) => (None, rest),
            None => {
                let (sq, s) =
                    Square::partial_from_str(s).map_err(FenParseError::InvalidEnPassantSquare)?;
                let expected = if side_to_move.is_black() { 3 } else { 6 };
                if sq.rank() != expected {
                    return Err(FenParseError::InvalidEnPassantRank {
                        expected,
                        got: sq.rank(),
                    });
                }
                (Some(sq), s)
            }
        };

        let s = parse_char(s, ' ').unwrap_or(s);
        let (halfmove_clock, s) = parse_u16(s).unwrap_or((0, s));
        let s = parse_char(s, ' ').unwrap_or(s);
        let (fullmove_counter, s) = parse_u16(s).unwrap_or((1, s));

        Ok((
            Self {
                board,
                side_to_move,
                castling_rights,
                en_passant,
                halfmove_clock,
                fullmove_counter,
            },
            s,
        ))
    }
}
impl std::str::FromStr for Fen {
    type Err = FenParseError;

    fn from_str(fen_str: &str) -> Result<Self, Self::Err> {
        Self::partial_from_str(fen_str.trim()).and_then(|(fen, s)| {
            if s.is_empty() {
                Ok(fen)
            } else {
                Err(FenParseError::InputTooLong)
            }
        })
    }
}
impl std::fmt::Display for Fen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}
impl std::fmt::Debug for Fen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Pieces
        let mut skip = 0;
        for sq in Square::squares_iter() {
            if let Some(p) = self.piece_on(sq) {
                if skip != 0 {
                    write!(f, "{skip}")?;
                    skip = 0
                }
                write!(f, "{p}")?;
            } else {
                skip += 1
            }

            if sq.col() == 7 {
                if skip != 0 {
                    write!(f, "{skip}")?;
                    skip = 0;
                }
                if sq.row() != 7 {
                    write!(f, "/")?
                }
            }
        }

        write!(
            f,
            " {} {} {} {} {}",
            self.side_to_move.symbol(),
            self.castling_rights,
            match self.en_passant {
                Some(square) => square.to_string(),
                None => String::from("-"),
            },
            self.halfmove_clock,
            self.fullmove_counter
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::game::piece::PieceKind;

    #[test]
    fn formatting_round_trips() {
        for fen in [
            INITIAL_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 b - - 12 40",
        ] {
            assert_eq!(Fen::parse(fen).unwrap().to_string(), fen);
        }
    }

    #[test]
    fn clocks_are_optional() {
        let fen = Fen::parse("4k3/8/8/8/8/8/8/4K3 w - -").unwrap();
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_counter, 1);
        assert_eq!(fen.to_string(), "4k3/8/8/8/8/8/8/4K3 w - - 0 1");
    }

    #[test]
    fn piece_lookup() {
        let fen = Fen::parse(INITIAL_FEN).unwrap();
        assert_eq!(
            fen.piece_on("e2".parse().unwrap()),
            Some(Piece::new(PieceKind::Pawn, Colour::White))
        );
        assert_eq!(fen.piece_on("e4".parse().unwrap()), None);
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            Fen::parse("rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenParseError::IncompleteRank {
                rank: 7,
                undefined: 1
            })
        );
        assert_eq!(
            Fen::parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1"),
            Err(FenParseError::IncompleteRank {
                rank: 1,
                undefined: 8
            })
        );
        assert_eq!(
            Fen::parse("rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Err(FenParseError::InvalidPiece(
                PieceParseError::InvalidPieceSymbol('9')
            ))
        );
        assert_eq!(
            Fen::parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1"),
            Err(FenParseError::InvalidSideToMove)
        );
        assert_eq!(
            Fen::parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e3 0 1"),
            Err(FenParseError::InvalidEnPassantRank {
                expected: 6,
                got: 3
            })
        );
        assert_eq!(
            Fen::parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 extra"),
            Err(FenParseError::InputTooLong)
        );
        assert_eq!(
            Fen::parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR/8 w KQkq - 0 1"),
            Err(FenParseError::TooManyRanks)
        );
    }
}
