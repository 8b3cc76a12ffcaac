//! Tracking policy for the computer paddle.

use crate::types::*;

/// Scripted opponent
pub struct Opponent;

impl Opponent {
    /// Step the paddle a full `speed` toward the ball.
    ///
    /// Stays put until the player has moved. There is no slowdown near the
    /// target, so the paddle jitters around the ball by up to one step. The
    /// paddle is not clamped to the field.
    pub fn track(paddle: &mut Paddle, ball: &Ball, rally: &RallyContext, speed: f32) {
        if !rally.player_moved {
            return;
        }

        if paddle.center() < ball.x {
            paddle.x += speed;
        } else {
            paddle.x -= speed;
        }
    }
}
