//! Ball kinematics and boundary resolution.

use crate::session::Session;
use crate::types::*;

/// Outcome of boundary resolution for one frame
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Contact {
    /// A paddle returned the ball. `escalated` is set on the frame the
    /// opponent gets its permanent speed boost.
    Paddle { side: Side, escalated: bool },
    /// The ball got past a paddle and was reset
    Goal { scorer: Side },
}

/// Physics calculations for game simulation
pub struct Physics;

impl Physics {
    /// Move the ball by one frame of velocity.
    ///
    /// Vertical motion always applies. Horizontal motion waits until the
    /// player has moved and struck the ball.
    pub fn advance(ball: &mut Ball, rally: &RallyContext) {
        ball.y += -ball.speed_y;

        if rally.allows_drift() {
            ball.x += ball.speed_x;
        }
    }

    /// Reflect off the side walls. Position is not corrected.
    pub fn bounce_walls(ball: &mut Ball) {
        if ball.x < 0.0 && ball.is_moving_left() {
            ball.speed_x = -ball.speed_x;
        }
        if ball.x > FIELD_WIDTH && ball.is_moving_right() {
            ball.speed_x = -ball.speed_x;
        }
    }

    /// Resolve walls, paddles and goals after `advance`
    pub fn resolve_boundaries(session: &mut Session) -> Option<Contact> {
        Self::bounce_walls(&mut session.ball);

        let mut contact = None;

        if session.ball.y > FIELD_HEIGHT - PADDLE_DIFF {
            if session.player.spans(session.ball.x) {
                let escalated = Self::return_from_player(session);
                contact = Some(Contact::Paddle {
                    side: Side::Player,
                    escalated,
                });
            } else if session.ball.y > FIELD_HEIGHT {
                session.ball_reset();
                session.score.award(Side::Computer);
                contact = Some(Contact::Goal {
                    scorer: Side::Computer,
                });
            }
        }

        if session.ball.y < PADDLE_DIFF {
            if session.computer.spans(session.ball.x) {
                Self::return_from_computer(session);
                contact = Some(Contact::Paddle {
                    side: Side::Computer,
                    escalated: false,
                });
            } else if session.ball.y < 0.0 {
                session.ball_reset();
                session.score.award(Side::Player);
                contact = Some(Contact::Goal {
                    scorer: Side::Player,
                });
            }
        }

        contact
    }

    /// Player paddle hit: speed up, reflect, and steer by contact offset.
    /// Returns true when this hit escalated the opponent.
    fn return_from_player(session: &mut Session) -> bool {
        let ball = &mut session.ball;
        let mut escalated = false;

        session.rally.paddle_contact = true;

        if session.rally.player_moved {
            ball.speed_y -= 1.0;
            if ball.speed_y < -MAX_SPEED_Y {
                ball.speed_y = -MAX_SPEED_Y;
                escalated = session.computer_speed != ESCALATED_COMPUTER_SPEED;
                session.computer_speed = ESCALATED_COMPUTER_SPEED;
            }
        }

        ball.speed_y = -ball.speed_y;
        ball.speed_x = Self::deflection(ball.x, &session.player);

        escalated
    }

    /// Computer paddle hit: speed up and reflect, horizontal speed kept
    fn return_from_computer(session: &mut Session) {
        let ball = &mut session.ball;

        if session.rally.player_moved {
            ball.speed_y = (ball.speed_y + 1.0).min(MAX_SPEED_Y);
        }

        ball.speed_y = -ball.speed_y;
    }

    /// Horizontal speed after a player hit, proportional to the distance
    /// from the paddle centre
    pub fn deflection(ball_x: f32, paddle: &Paddle) -> f32 {
        (ball_x - paddle.center()) * DEFLECTION_FACTOR
    }
}
