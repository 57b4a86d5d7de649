use super::{
    castling_rights::{CastlingRights, CastlingSide},
    piece::{Piece, PieceKind},
    square::Square,
};

/// Records everything that is lost when making a move, so that it can be undone
/// exactly.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct HistoryEntry {
    pub origin: Square,
    pub target: Square,
    /// The piece that moved, as it was before moving (a pawn for promotions).
    pub moved: Piece,
    pub captured: Option<Piece>,
    /// Square the captured pawn stood on for en passant captures.
    pub en_passant_capture: Option<Square>,
    pub castled: Option<CastlingSide>,
    pub promoted_to: Option<PieceKind>,
    pub notation: String,
    pub castling_rights: CastlingRights,
    pub en_passant_target: Option<Square>,
    pub reversible_moves: u16,
}
impl std::fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.notation)
    }
}
