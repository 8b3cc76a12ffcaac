//! Goal bookkeeping and the win condition.

use crate::types::*;

impl Score {
    /// Credit one point to `scorer`
    pub fn award(&mut self, scorer: Side) {
        match scorer {
            Side::Player => self.player += 1,
            Side::Computer => self.computer += 1,
        }
    }
}

/// Winner once either side has exactly `winning_score` points.
///
/// The player's count is checked first.
pub fn check_game_over(score: &Score, winning_score: u8) -> Option<Side> {
    if score.player == winning_score {
        Some(Side::Player)
    } else if score.computer == winning_score {
        Some(Side::Computer)
    } else {
        None
    }
}
