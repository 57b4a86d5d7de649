//! # Chess API
//! This module contains everything Chess related, like the board state, actions,
//! move generation, etc.

pub mod action;
pub mod board;
pub mod castling_rights;
pub mod colour;
pub mod fen;
pub mod history;
pub mod movegen;
#[cfg(feature = "perft")]
pub mod perft;
pub mod piece;
pub mod playout;
pub mod position;
pub mod square;
