//! # Random playouts
//! Plays uniformly random legal moves, mostly to exercise move generation and the
//! make/unmake round trip on positions nobody would write by hand.

use rand::{seq::SliceRandom, Rng};

use super::{
    action::MoveOutcome,
    piece::PromotionTarget,
    position::{GameStatus, Position},
};

/// Plays random legal moves from `position` until the game is over or `max_plies`
/// moves were played. Promotions pick a random piece.
///
/// The position is left where the playout stopped.
/// ```
/// # use gambit::game::{playout::random_game, position::Position};
/// # use rand::{rngs::SmallRng, SeedableRng};
/// let mut position = Position::initial();
/// random_game(&mut position, &mut SmallRng::seed_from_u64(7), 40);
/// assert!(position.history().len() <= 40);
/// ```
pub fn random_game<R: Rng + ?Sized>(
    position: &mut Position,
    rng: &mut R,
    max_plies: usize,
) -> GameStatus {
    for _ in 0..max_plies {
        let actions = position.actions();
        let Some(&action) = actions.choose(rng) else {
            break;
        };

        match position.make(action.origin(), action.target()) {
            Ok(MoveOutcome::AwaitingPromotion) => {
                let piece = PromotionTarget::ALL
                    .choose(rng)
                    .copied()
                    .unwrap_or(PromotionTarget::Queen);
                if let Err(e) = position.promote(action.target(), piece.into()) {
                    log::error!("Could not promote after {action}: {e}");
                    break;
                }
            }
            Ok(_) => (),
            Err(e) => {
                log::error!("Generated move {action} was rejected: {e}");
                break;
            }
        }
    }

    position.status()
}

/// Takes back every move of the game, returning how many were undone.
pub fn unwind(position: &mut Position) -> usize {
    let mut undone = 0;
    while position.unmake().is_some() {
        undone += 1;
    }
    undone
}
