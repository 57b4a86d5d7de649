//! # Perft testing/benchmarking

use std::time::Instant;

use super::{
    action::{Action, MoveOutcome},
    piece::{PieceKind, PromotionTarget},
    position::Position,
};

/// Builder pattern to configure a Perft test.
#[derive(Clone, Copy, Debug, Default)]
pub struct PerftConfig {
    pub depth: u8,
    pub iterative: bool,
    pub bulk_counting: bool,
    pub divide: bool,

    pub bench: bool,

    pub show_board: bool,
}
impl PerftConfig {
    /// Whether to show the board at the start of the run.
    ///
    /// Should be disabled when trying to parse the output.
    pub fn show_board(mut self, value: bool) -> Self {
        self.show_board = value;
        self
    }

    /// Sets the maximum depth of the perft run.
    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }

    /// If set to true, the run will start from all depth between 1 and the maximum.
    pub fn iterative_deepening(mut self, value: bool) -> Self {
        self.iterative = value;
        self
    }

    /// If set to true, counts legal moves at horizon nodes instead of playing them.
    pub fn bulk_counting(mut self, value: bool) -> Self {
        self.bulk_counting = value;
        self
    }

    /// Shows perft results per legal move at the starting position.
    pub fn divide_moves(mut self, value: bool) -> Self {
        self.divide = value;
        self
    }

    /// Measures the time it takes to complete one depth.
    pub fn benchmark(mut self, value: bool) -> Self {
        self.bench = value;
        self
    }

    /// Runs a Perft test on the given position, printing the results.
    ///
    /// The position is left as it was given.
    pub fn go(&self, position: &mut Position) {
        if self.show_board {
            println!("{position}\n");
        }

        if self.iterative && self.divide {
            println!("====== DEPTH 1 ======")
        }

        let first = if self.iterative { 1 } else { self.depth.max(1) };
        for depth in first..=self.depth.max(1) {
            let start = Instant::now();
            let mut nodes = 0;
            for action in position.actions() {
                for promotion in promotions(position, action) {
                    let mv_nodes = play(position, action, promotion, |position| {
                        perft_rec(position, depth - 1, self.bulk_counting)
                    });
                    if self.divide {
                        match promotion {
                            Some(kind) => println!("{action}{kind}: {mv_nodes} nodes"),
                            None => println!("{action}: {mv_nodes} nodes"),
                        }
                    }
                    nodes += mv_nodes;
                }
            }
            let elapsed = start.elapsed().as_secs_f64();
            println!("depth {depth}: {nodes} nodes");
            if self.bench {
                println!(
                    "\ttook {} ({})",
                    human_readable_time(elapsed),
                    human_readable_nps(nodes as f64 / elapsed)
                );
            }

            if self.iterative && self.divide && depth != self.depth {
                println!("\n====== DEPTH {} ======", depth + 1)
            }
        }
    }
}

/// Counts the leaf nodes reachable from `position` in exactly `depth` plies.
///
/// Each promotion counts once per piece the pawn can become.
/// ```
/// # use gambit::game::{perft::perft, position::Position};
/// assert_eq!(perft(&mut Position::initial(), 2), 400);
/// ```
pub fn perft(position: &mut Position, depth: u8) -> u64 {
    perft_rec(position, depth, true)
}

/// Traverses all nodes accessible from a given position, returning the number of
/// leaf nodes reached.
fn perft_rec(position: &mut Position, depth_left: u8, bulk_counting: bool) -> u64 {
    if depth_left == 0 {
        return 1;
    }

    let actions = position.actions();
    if depth_left == 1 && bulk_counting {
        return actions
            .iter()
            .map(|&action| promotions(position, action).len() as u64)
            .sum();
    }

    let mut nodes = 0;
    for action in actions {
        for promotion in promotions(position, action) {
            nodes += play(position, action, promotion, |position| {
                perft_rec(position, depth_left - 1, bulk_counting)
            });
        }
    }
    nodes
}

/// Lists the ways `action` can end: once for most moves, once per promotion
/// target for a pawn reaching its last rank.
fn promotions(position: &Position, action: Action) -> Vec<Option<PieceKind>> {
    let reaches_last_rank = position.piece_on(action.origin()).is_some_and(|piece| {
        piece.kind == PieceKind::Pawn && action.target().row() == piece.colour.promotion_row()
    });
    if reaches_last_rank {
        PromotionTarget::ALL
            .iter()
            .map(|&target| Some(target.to_piece_kind()))
            .collect()
    } else {
        vec![None]
    }
}

/// Plays `action` (completing the promotion if needed), runs `then` on the
/// resulting position and takes the move back.
fn play(
    position: &mut Position,
    action: Action,
    promotion: Option<PieceKind>,
    then: impl FnOnce(&mut Position) -> u64,
) -> u64 {
    let nodes = match position.make(action.origin(), action.target()) {
        Ok(MoveOutcome::AwaitingPromotion) => match promotion {
            Some(kind) if position.promote(action.target(), kind).is_ok() => then(position),
            _ => 0,
        },
        Ok(_) => then(position),
        Err(e) => {
            log::error!("Generated move {action} could not be played: {e}");
            return 0;
        }
    };
    position.unmake();
    nodes
}

fn human_readable_time(secs: f64) -> String {
    if secs < 0.000_001 {
        format!("{:.3}ns", secs * 1_000_000_000.)
    } else if secs < 0.001 {
        format!("{:.3}μs", secs * 1_000_000.)
    } else if secs < 1. {
        format!("{:.3}ms", secs * 1_000.)
    } else {
        format!("{secs:.3}s")
    }
}

fn human_readable_nps(nps: f64) -> String {
    if nps > 1_000_000_000. {
        format!("{:.3}Gnps", nps / 1_000_000_000.)
    } else if nps > 1_000_000. {
        format!("{:.3}Mnps", nps / 1_000_000.)
    } else if nps > 1_000. {
        format!("{:.3}Knps", nps / 1_000.)
    } else {
        format!("{nps:.3}nps")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn check_matching(fen: &str, expected: &[u64]) {
        let mut position = Position::from_fen(&fen.parse().unwrap());
        let before = position.clone();
        for (depth, expected) in expected.iter().enumerate() {
            let actual = perft_rec(&mut position, depth as u8 + 1, true);
            assert_eq!(
                actual,
                *expected,
                "Expected {expected} at depth {} for {fen}, but got {actual}",
                depth + 1,
            );
        }
        assert_eq!(position, before);
    }

    #[test]
    fn builder_drives_go() {
        let config = PerftConfig::default()
            .with_depth(2)
            .divide_moves(true)
            .iterative_deepening(true)
            .benchmark(false)
            .bulk_counting(true)
            .show_board(false);
        assert_eq!(config.depth, 2);
        assert!(config.divide && config.iterative && config.bulk_counting);
        assert!(!config.bench && !config.show_board);

        let mut position = Position::initial();
        config.go(&mut position);
        assert_eq!(position, Position::initial());
    }

    #[test]
    fn initial_position_perft() {
        check_matching(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            &[20, 400, 8902],
        )
    }

    #[test]
    fn kiwipete_perft() {
        check_matching(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - ",
            &[48, 2039],
        )
    }

    #[test]
    fn endgame_perft() {
        check_matching("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - ", &[14, 191, 2812])
    }

    #[test]
    fn mirrored_perft() {
        let expected = [6, 264, 9467];
        check_matching(
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            &expected,
        );
        check_matching(
            "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
            &expected,
        )
    }

    #[test]
    fn buggy_perft() {
        check_matching(
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
            &[44, 1486],
        )
    }

    #[test]
    fn bulk_counting_agrees() {
        let mut position = Position::initial();
        assert_eq!(
            perft_rec(&mut position, 3, false),
            perft_rec(&mut position, 3, true)
        );
    }

    #[test]
    #[ignore]
    fn deep_perft() {
        check_matching(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            &[20, 400, 8902, 197281],
        );
        check_matching(
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - ",
            &[14, 191, 2812, 43238, 674624],
        );
    }
}
