//! Mutable state for one game session.

use crate::types::*;

/// Everything the simulation reads and writes during a game.
///
/// Owned by [`crate::Game`]; `start_game` replaces it wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub ball: Ball,
    /// Bottom paddle, driven by the pointer
    pub player: Paddle,
    /// Top paddle, driven by the opponent policy
    pub computer: Paddle,
    pub rally: RallyContext,
    pub score: Score,
    /// Current opponent step; may escalate mid-session
    pub computer_speed: f32,
}

impl Session {
    /// Fresh session with the ball resting at the centre
    pub fn new(config: &Config) -> Self {
        Session {
            ball: Ball::centered(config.speed_x, config.speed_y),
            player: Paddle::default(),
            computer: Paddle::default(),
            rally: RallyContext::default(),
            score: Score::default(),
            computer_speed: config.computer_speed,
        }
    }

    /// Put the ball back in the centre after a goal.
    ///
    /// Leaves `player_moved` and the horizontal speed alone.
    pub fn ball_reset(&mut self) {
        self.ball.x = FIELD_WIDTH / 2.0;
        self.ball.y = FIELD_HEIGHT / 2.0;
        self.ball.speed_y = RESET_SPEED_Y;
        self.rally.paddle_contact = false;
    }

    /// Place the player paddle and mark that the human has taken control
    pub fn move_player(&mut self, paddle_x: f32) {
        self.rally.player_moved = true;
        self.player.x = paddle_x.clamp(0.0, Paddle::max_x());
    }
}

/// Paddle left edge that centres the paddle under a playfield-relative pointer
pub fn pointer_to_paddle_x(pointer_x: f32) -> f32 {
    (pointer_x - PADDLE_DIFF).clamp(0.0, Paddle::max_x())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let session = Session::new(&Config::default());

        assert_eq!(session.ball.x, 250.0);
        assert_eq!(session.ball.y, 350.0);
        assert_eq!(session.player.x, PADDLE_START_X);
        assert_eq!(session.computer.x, PADDLE_START_X);
        assert_eq!(session.score, Score::default());
        assert_eq!(session.computer_speed, 3.0);
        assert!(!session.rally.player_moved);
        assert!(!session.rally.paddle_contact);
    }

    #[test]
    fn test_ball_reset() {
        let mut session = Session::new(&Config::default());
        session.ball = Ball::new(12.0, -4.0, 6.5, 5.0);
        session.rally = RallyContext {
            player_moved: true,
            paddle_contact: true,
        };

        session.ball_reset();

        assert_eq!(session.ball.x, FIELD_WIDTH / 2.0);
        assert_eq!(session.ball.y, FIELD_HEIGHT / 2.0);
        assert_eq!(session.ball.speed_y, RESET_SPEED_Y);
        assert!(!session.rally.paddle_contact);

        // Untouched by a reset
        assert_eq!(session.ball.speed_x, 6.5);
        assert!(session.rally.player_moved);
    }

    #[test]
    fn test_ball_reset_is_idempotent() {
        let mut session = Session::new(&Config::compact());
        session.ball = Ball::new(480.0, 690.0, -2.0, 4.0);
        session.rally.paddle_contact = true;

        session.ball_reset();
        let first = session.clone();
        session.ball_reset();

        assert_eq!(session, first);
    }

    #[test]
    fn test_move_player_clamps() {
        let mut session = Session::new(&Config::default());

        session.move_player(-40.0);
        assert_eq!(session.player.x, 0.0);
        assert!(session.rally.player_moved);

        session.move_player(480.0);
        assert_eq!(session.player.x, FIELD_WIDTH - PADDLE_WIDTH);

        session.move_player(120.0);
        assert_eq!(session.player.x, 120.0);
    }

    #[test]
    fn test_pointer_centres_paddle() {
        assert_eq!(pointer_to_paddle_x(250.0), 225.0);
        assert_eq!(pointer_to_paddle_x(10.0), 0.0);
        assert_eq!(pointer_to_paddle_x(499.0), FIELD_WIDTH - PADDLE_WIDTH);
    }
}
