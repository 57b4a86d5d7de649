//! Pseudo-legal move generation and attack detection on a [`Board`].
//!
//! Nothing here knows about castling or checks: these functions only look at the
//! placement of pieces, which is what attack detection needs. Legality is built on
//! top of them in [`Position`](super::position::Position).
//!
//! GENERAL SAFETY: calls to `push_unchecked` are ok, a single piece never has more
//! than 27 destinations.

use super::{
    action::{Action, SquareActions},
    board::Board,
    colour::Colour,
    piece::{Piece, PieceKind},
    square::{Delta, Square},
};

const KNIGHT_OFFSETS: [Delta; 8] = [
    Delta::new(-2, -1),
    Delta::new(-2, 1),
    Delta::new(-1, -2),
    Delta::new(-1, 2),
    Delta::new(1, -2),
    Delta::new(1, 2),
    Delta::new(2, -1),
    Delta::new(2, 1),
];

const KING_OFFSETS: [Delta; 8] = [
    Delta::new(-1, -1),
    Delta::new(-1, 0),
    Delta::new(-1, 1),
    Delta::new(0, -1),
    Delta::new(0, 1),
    Delta::new(1, -1),
    Delta::new(1, 0),
    Delta::new(1, 1),
];

const ORTHOGONALS: [Delta; 4] = [
    Delta::new(-1, 0),
    Delta::new(1, 0),
    Delta::new(0, -1),
    Delta::new(0, 1),
];

const DIAGONALS: [Delta; 4] = [
    Delta::new(-1, -1),
    Delta::new(-1, 1),
    Delta::new(1, -1),
    Delta::new(1, 1),
];

/// Generates every move of `piece` standing on `origin`, ignoring whether its own
/// king is left in check. Castling is never generated here.
///
/// En passant captures are only generated when `en_passant` is given.
pub(crate) fn pseudo_legal_actions(
    board: &Board,
    origin: Square,
    piece: Piece,
    en_passant: Option<Square>,
) -> SquareActions {
    let mut actions = SquareActions::new();
    let colour = piece.colour;
    match piece.kind {
        PieceKind::Pawn => pawn_actions(board, origin, colour, en_passant, &mut actions),
        PieceKind::Knight => leaper_actions(board, origin, colour, &KNIGHT_OFFSETS, &mut actions),
        PieceKind::Bishop => slider_actions(board, origin, colour, &DIAGONALS, &mut actions),
        PieceKind::Rook => slider_actions(board, origin, colour, &ORTHOGONALS, &mut actions),
        PieceKind::Queen => {
            slider_actions(board, origin, colour, &ORTHOGONALS, &mut actions);
            slider_actions(board, origin, colour, &DIAGONALS, &mut actions)
        }
        PieceKind::King => leaper_actions(board, origin, colour, &KING_OFFSETS, &mut actions),
    }
    actions
}

/// Returns the square of the pawn removed by an en passant capture landing on
/// `target`, made by a pawn of colour `capturer`.
#[inline]
pub(crate) fn en_passant_victim(target: Square, capturer: Colour) -> Option<Square> {
    target.translate(Delta::new(-capturer.pawn_direction(), 0))
}

fn pawn_actions(
    board: &Board,
    origin: Square,
    colour: Colour,
    en_passant: Option<Square>,
    actions: &mut SquareActions,
) {
    let direction = colour.pawn_direction();

    if let Some(single) = origin.translate(Delta::new(direction, 0)) {
        if board.is_empty(single) {
            unsafe { actions.push_unchecked(Action::new(origin, single)) }

            if origin.row() == colour.pawn_row() {
                if let Some(double) = single.translate(Delta::new(direction, 0)) {
                    if board.is_empty(double) {
                        unsafe { actions.push_unchecked(Action::new(origin, double)) }
                    }
                }
            }
        }
    }

    let en_passant = en_passant.filter(|&target| has_en_passant_victim(board, target, colour));
    for target in pawn_attacks(origin, colour) {
        match board.piece_on(target) {
            Some(p) if p.colour != colour => unsafe {
                actions.push_unchecked(Action::new(origin, target))
            },
            None if en_passant == Some(target) => unsafe {
                actions.push_unchecked(Action::new_en_passant(origin, target))
            },
            _ => (),
        }
    }
}

/// Checks that the square passed over by a double push still holds the enemy
/// pawn that made it. Position strings can name an en passant square with nothing
/// behind it.
fn has_en_passant_victim(board: &Board, target: Square, capturer: Colour) -> bool {
    en_passant_victim(target, capturer).and_then(|square| board.piece_on(square))
        == Some(Piece::new(PieceKind::Pawn, capturer.inverse()))
}

/// Squares a pawn of `colour` on `origin` attacks, whatever they hold.
#[inline]
fn pawn_attacks(origin: Square, colour: Colour) -> impl Iterator<Item = Square> {
    let direction = colour.pawn_direction();
    [-1, 1]
        .into_iter()
        .filter_map(move |side| origin.translate(Delta::new(direction, side)))
}

fn leaper_actions(
    board: &Board,
    origin: Square,
    colour: Colour,
    offsets: &[Delta],
    actions: &mut SquareActions,
) {
    for &offset in offsets {
        let Some(target) = origin.translate(offset) else {
            continue;
        };
        match board.piece_on(target) {
            Some(p) if p.colour == colour => (),
            _ => unsafe { actions.push_unchecked(Action::new(origin, target)) },
        }
    }
}

fn slider_actions(
    board: &Board,
    origin: Square,
    colour: Colour,
    directions: &[Delta],
    actions: &mut SquareActions,
) {
    for &direction in directions {
        let mut ray = origin.translate(direction);
        while let Some(target) = ray {
            match board.piece_on(target) {
                None => unsafe { actions.push_unchecked(Action::new(origin, target)) },
                Some(p) => {
                    if p.colour != colour {
                        unsafe { actions.push_unchecked(Action::new(origin, target)) }
                    }
                    break;
                }
            }
            ray = target.translate(direction);
        }
    }
}

/// Checks if any piece of the opponent of `defender` attacks `square`.
///
/// This only relies on raw piece movement: castling and en passant never attack
/// anything, and pawns attack their forward diagonals but not the squares they
/// push to.
pub fn is_square_attacked(board: &Board, square: Square, defender: Colour) -> bool {
    board
        .pieces_of(defender.inverse())
        .any(|(origin, piece)| attacks(board, origin, piece, square))
}

/// Checks if `piece` on `origin` attacks `square`.
fn attacks(board: &Board, origin: Square, piece: Piece, square: Square) -> bool {
    match piece.kind {
        PieceKind::Pawn => pawn_attacks(origin, piece.colour).any(|sq| sq == square),
        _ => pseudo_legal_actions(board, origin, piece, None)
            .iter()
            .any(|a| a.target() == square),
    }
}

/// Checks if the king of the given colour is attacked. A side without a king is
/// never in check.
pub fn is_in_check(board: &Board, colour: Colour) -> bool {
    board
        .king_square(colour)
        .is_some_and(|king| is_square_attacked(board, king, colour))
}

#[cfg(test)]
mod test {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn targets(board: &Board, origin: &str, en_passant: Option<Square>) -> Vec<String> {
        let origin = sq(origin);
        let piece = board.piece_on(origin).unwrap();
        let mut targets: Vec<_> = pseudo_legal_actions(board, origin, piece, en_passant)
            .iter()
            .map(|a| a.target().to_string())
            .collect();
        targets.sort();
        targets
    }

    fn place(board: &mut Board, square: &str, piece: char) {
        board.set(sq(square), Some(piece.to_string().parse().unwrap()));
    }

    #[test]
    fn pawns_from_start() {
        let board = Board::initial();
        assert_eq!(targets(&board, "e2", None), ["e3", "e4"]);
        assert_eq!(targets(&board, "d7", None), ["d5", "d6"]);
    }

    #[test]
    fn blocked_pawns() {
        let mut board = Board::initial();
        place(&mut board, "e3", 'n');
        assert!(targets(&board, "e2", None).is_empty());
        assert_eq!(targets(&board, "f2", None), ["e3", "f3", "f4"]);

        board.take(sq("e3"));
        place(&mut board, "e4", 'n');
        assert_eq!(targets(&board, "e2", None), ["e3"]);
    }

    #[test]
    fn pawn_captures_and_en_passant() {
        let mut board = Board::empty();
        place(&mut board, "e5", 'P');
        place(&mut board, "d5", 'p');
        place(&mut board, "f6", 'r');
        assert_eq!(targets(&board, "e5", None), ["e6", "f6"]);
        let with_ep = pseudo_legal_actions(
            &board,
            sq("e5"),
            board.piece_on(sq("e5")).unwrap(),
            Some(sq("d6")),
        );
        assert!(with_ep
            .iter()
            .any(|a| a.target() == sq("d6") && a.is_en_passant()));
        assert_eq!(en_passant_victim(sq("d6"), Colour::White), Some(sq("d5")));
        assert_eq!(en_passant_victim(sq("e3"), Colour::Black), Some(sq("e4")));
    }

    #[test]
    fn en_passant_needs_a_pawn_to_take() {
        let mut board = Board::empty();
        place(&mut board, "e5", 'P');
        place(&mut board, "d5", 'n');
        assert_eq!(targets(&board, "e5", Some(sq("d6"))), ["e6"]);

        board.take(sq("d5"));
        assert_eq!(targets(&board, "e5", Some(sq("d6"))), ["e6"]);

        place(&mut board, "d5", 'P');
        assert_eq!(targets(&board, "e5", Some(sq("d6"))), ["e6"]);
    }

    #[test]
    fn sliders_stop_at_first_piece() {
        let mut board = Board::empty();
        place(&mut board, "a1", 'R');
        place(&mut board, "a4", 'p');
        place(&mut board, "c1", 'N');
        assert_eq!(targets(&board, "a1", None), ["a2", "a3", "a4", "b1"]);

        place(&mut board, "d4", 'Q');
        assert_eq!(targets(&board, "d4", None).len(), 26);
    }

    #[test]
    fn knights_and_kings_stay_on_board() {
        let mut board = Board::empty();
        place(&mut board, "a1", 'N');
        place(&mut board, "h8", 'k');
        assert_eq!(targets(&board, "a1", None), ["b3", "c2"]);
        assert_eq!(targets(&board, "h8", None), ["g7", "g8", "h7"]);
    }

    #[test]
    fn pawn_attacks_ignore_pushes() {
        let mut board = Board::empty();
        place(&mut board, "e2", 'p');
        assert!(is_square_attacked(&board, sq("d1"), Colour::White));
        assert!(is_square_attacked(&board, sq("f1"), Colour::White));
        assert!(!is_square_attacked(&board, sq("e1"), Colour::White));
        assert!(!is_square_attacked(&board, sq("d1"), Colour::Black));
    }

    #[test]
    fn check_detection() {
        let mut board = Board::empty();
        place(&mut board, "e1", 'K');
        place(&mut board, "e8", 'r');
        assert!(is_in_check(&board, Colour::White));
        place(&mut board, "e4", 'P');
        assert!(!is_in_check(&board, Colour::White));
        assert!(!is_in_check(&board, Colour::Black));
    }
}
