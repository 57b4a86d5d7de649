//! # Gambit
//! A chess rules engine: legal move generation, move application with full undo,
//! check, checkmate and stalemate detection, castling, en passant and promotions.
//!
//! It is usable as both a library to embed into your own projects and a standalone
//! binary to play through a terminal or run perft.

pub mod game;
pub mod parsing;
pub mod protocols;
