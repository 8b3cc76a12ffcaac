//! Scripted pointer for headless matches.

use rally_core::{Config, Game, Score, Side, Step, FIELD_WIDTH};

/// Pointer that chases a spot `offset` units right of the ball, moving at
/// most `reach` playfield units per frame
#[derive(Debug, Clone, Copy)]
pub struct Autopilot {
    pointer: f32,
    reach: f32,
    offset: f32,
}

impl Autopilot {
    pub fn new(reach: f32, offset: f32) -> Self {
        Self {
            pointer: FIELD_WIDTH / 2.0,
            reach,
            offset,
        }
    }

    /// Feed one pointer-move event into the game
    pub fn drive(&mut self, game: &mut Game) {
        let target = game.session.ball.x + self.offset;
        self.pointer += (target - self.pointer).clamp(-self.reach, self.reach);
        game.pointer_moved(self.pointer);
    }
}

/// How a headless match ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchReport {
    pub winner: Option<Side>,
    pub score: Score,
    pub frames: u32,
    pub computer_speed: f32,
}

/// Play one match to completion or until `max_frames` have run
pub fn run_match(config: Config, mut pilot: Autopilot, max_frames: u32) -> MatchReport {
    let mut game = Game::new(config);
    game.start_game();

    for _ in 0..max_frames {
        pilot.drive(&mut game);
        if let Step::Finished(_) = game.step(&mut ()) {
            break;
        }
    }

    if game.winner().is_none() {
        tracing::warn!(max_frames, "match hit the frame limit without a winner");
    }

    MatchReport {
        winner: game.winner(),
        score: game.session.score,
        frames: game.frame,
        computer_speed: game.session.computer_speed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_off_centre_pilot_wins() {
        let report = run_match(Config::default(), Autopilot::new(4.0, 20.0), 10_000);

        assert_eq!(report.winner, Some(Side::Player));
        assert_eq!(report.score.player, 5);
        assert!(report.frames > 0 && report.frames <= 10_000);
    }

    #[test]
    fn test_frame_limit_without_winner() {
        // Dead-centre returns never leave the middle column: endless rally
        let report = run_match(Config::default(), Autopilot::new(1000.0, 0.0), 500);

        assert_eq!(report.winner, None);
        assert_eq!(report.frames, 500);
    }

    #[test]
    fn test_pilot_moves_at_most_reach() {
        let mut game = Game::new(Config::default());
        game.start_game();
        game.session.ball.x = 400.0;
        let mut pilot = Autopilot::new(4.0, 0.0);

        pilot.drive(&mut game);

        assert!(game.session.rally.player_moved);
        assert_eq!(game.session.player.x, 254.0 - 25.0);
    }
}
