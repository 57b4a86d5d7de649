//! Protocols are used to communicate with the chess engine from other programs or
//! from a terminal.
//!
//! Gambit implements a single line-based protocol using coordinate notation, see
//! [`coordinate`].

pub mod coordinate;
