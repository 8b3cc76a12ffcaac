//! Frame driver: per-frame ordering and the run/stop lifecycle.

use crate::opponent::Opponent;
use crate::physics::{Contact, Physics};
use crate::render::Presenter;
use crate::scoring::check_game_over;
use crate::session::{pointer_to_paddle_x, Session};
use crate::types::*;

/// Result of one call to [`Game::step`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    /// Keep calling `step` next frame
    Continue,
    /// This frame ended the game; stop scheduling frames
    Finished(Side),
    /// No game is running; nothing was simulated
    Idle,
}

impl Step {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Step::Continue)
    }
}

/// Main game state and logic
pub struct Game {
    pub config: Config,
    pub frame: Frame,
    pub lifecycle: Lifecycle,
    pub session: Session,
}

impl Game {
    /// Create a game that has not been started yet
    pub fn new(config: Config) -> Self {
        Game {
            config,
            frame: 0,
            lifecycle: Lifecycle::NotStarted,
            session: Session::new(&config),
        }
    }

    /// Start (or restart) a session: zero scores, serve from the centre
    pub fn start_game(&mut self) {
        self.session = Session::new(&self.config);
        self.session.ball_reset();
        self.frame = 0;
        self.lifecycle = Lifecycle::Running;

        tracing::info!(
            computer_speed = self.session.computer_speed,
            "game started"
        );
    }

    /// Apply a pointer position, in playfield units, to the player paddle
    pub fn pointer_moved(&mut self, pointer_x: f32) {
        self.session.move_player(pointer_to_paddle_x(pointer_x));
    }

    /// Run one frame: render, advance, resolve, track, check for the end
    pub fn step<P: Presenter + ?Sized>(&mut self, presenter: &mut P) -> Step {
        if self.lifecycle != Lifecycle::Running {
            return Step::Idle;
        }

        presenter.render(&self.view());

        Physics::advance(&mut self.session.ball, &self.session.rally);

        if let Some(contact) = Physics::resolve_boundaries(&mut self.session) {
            self.report_contact(contact, presenter);
        }

        Opponent::track(
            &mut self.session.computer,
            &self.session.ball,
            &self.session.rally,
            self.session.computer_speed,
        );

        self.frame += 1;

        match check_game_over(&self.session.score, WINNING_SCORE) {
            Some(winner) => {
                self.lifecycle = Lifecycle::GameOver(winner);

                tracing::info!(
                    winner = winner.label(),
                    player = self.session.score.player,
                    computer = self.session.score.computer,
                    frames = self.frame,
                    "game over"
                );

                presenter.event(&Event::GameOver { winner });
                presenter.game_over(winner);
                Step::Finished(winner)
            }
            None => Step::Continue,
        }
    }

    fn report_contact<P: Presenter + ?Sized>(&self, contact: Contact, presenter: &mut P) {
        match contact {
            Contact::Paddle { side, escalated } => {
                tracing::debug!(
                    side = side.label(),
                    speed_x = self.session.ball.speed_x,
                    speed_y = self.session.ball.speed_y,
                    "paddle hit"
                );
                presenter.event(&Event::PaddleHit { side });

                if escalated {
                    tracing::info!(
                        speed = self.session.computer_speed,
                        "opponent escalated"
                    );
                    presenter.event(&Event::OpponentEscalated {
                        speed: self.session.computer_speed,
                    });
                }
            }
            Contact::Goal { scorer } => {
                tracing::debug!(
                    scorer = scorer.label(),
                    player = self.session.score.player,
                    computer = self.session.score.computer,
                    "goal"
                );
                presenter.event(&Event::Scored {
                    scorer,
                    score: self.session.score,
                });
            }
        }
    }

    /// Generate a view of the current game state for rendering
    pub fn view(&self) -> View {
        View {
            frame: self.frame,
            lifecycle: self.lifecycle,
            is_new_game: self.is_new_game(),
            ball_x: self.session.ball.x,
            ball_y: self.session.ball.y,
            player_x: self.session.player.x,
            computer_x: self.session.computer.x,
            score: self.session.score,
        }
    }

    /// Get the winner (if the game is over)
    pub fn winner(&self) -> Option<Side> {
        match self.lifecycle {
            Lifecycle::GameOver(winner) => Some(winner),
            _ => None,
        }
    }

    /// Check if frames are being simulated
    pub fn is_running(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Running)
    }

    /// True until the first `start_game`
    pub fn is_new_game(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::NotStarted)
    }

    /// Get a human-readable status string
    pub fn status_string(&self) -> &'static str {
        match self.lifecycle {
            Lifecycle::NotStarted => "Press start",
            Lifecycle::Running if !self.session.rally.player_moved => {
                "Move the mouse to take control"
            }
            Lifecycle::Running => "Playing",
            Lifecycle::GameOver(_) => "Game over",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Presenter that keeps everything it is told
    #[derive(Default)]
    struct Log {
        views: Vec<View>,
        events: Vec<Event>,
        winners: Vec<Side>,
    }

    impl Presenter for Log {
        fn render(&mut self, view: &View) {
            self.views.push(*view);
        }
        fn game_over(&mut self, winner: Side) {
            self.winners.push(winner);
        }
        fn event(&mut self, event: &Event) {
            self.events.push(*event);
        }
    }

    fn running_game() -> Game {
        let mut game = Game::new(Config::default());
        game.start_game();
        game
    }

    #[test]
    fn test_game_creation() {
        let game = Game::new(Config::default());

        assert_eq!(game.frame, 0);
        assert_eq!(game.lifecycle, Lifecycle::NotStarted);
        assert!(game.is_new_game());
        assert!(!game.is_running());
        assert_eq!(game.session.score, Score::default());
    }

    #[test]
    fn test_step_before_start_is_idle() {
        let mut game = Game::new(Config::default());
        let mut log = Log::default();

        assert_eq!(game.step(&mut log), Step::Idle);
        assert!(log.views.is_empty());
        assert_eq!(game.session.ball.y, 350.0);
    }

    #[test]
    fn test_start_game_serves_toward_player() {
        let game = running_game();

        assert!(game.is_running());
        assert!(!game.is_new_game());
        assert_eq!(game.session.ball.speed_y, RESET_SPEED_Y);
        assert_eq!(game.session.ball.x, FIELD_WIDTH / 2.0);
        assert_eq!(game.session.ball.y, FIELD_HEIGHT / 2.0);
    }

    #[test]
    fn test_render_happens_before_simulation() {
        let mut game = running_game();
        let mut log = Log::default();

        game.step(&mut log);
        game.step(&mut log);

        assert_eq!(log.views.len(), 2);
        assert_eq!(log.views[0].ball_y, 350.0);
        assert_eq!(log.views[0].frame, 0);
        assert_eq!(log.views[1].ball_y, 353.0);
        assert_eq!(log.views[1].frame, 1);
        assert_eq!(game.session.ball.y, 356.0);
    }

    #[test]
    fn test_pointer_moves_player_paddle() {
        let mut game = running_game();

        game.pointer_moved(100.0);

        assert!(game.session.rally.player_moved);
        assert_eq!(game.session.player.x, 75.0);
        assert_eq!(game.status_string(), "Playing");
    }

    #[test]
    fn test_no_input_yet_gates_motion() {
        let mut game = running_game();
        let ball_x = game.session.ball.x;
        let computer_x = game.session.computer.x;

        for _ in 0..10 {
            assert_eq!(game.step(&mut ()), Step::Continue);
        }

        assert_eq!(game.session.ball.x, ball_x);
        assert_eq!(game.session.computer.x, computer_x);
        assert_eq!(game.session.ball.y, 380.0);
    }

    #[test]
    fn test_opponent_follows_after_input() {
        let mut game = running_game();
        game.pointer_moved(300.0);

        game.step(&mut ());

        // Ball sits on the paddle centre, so the opponent steps left
        assert_eq!(game.session.computer.x, PADDLE_START_X - 3.0);
    }

    #[test]
    fn test_goal_raises_event() {
        let mut game = running_game();
        let mut log = Log::default();
        game.session.ball = Ball::new(100.0, 2.0, 0.0, 3.0);

        assert_eq!(game.step(&mut log), Step::Continue);

        assert_eq!(game.session.score, Score::new(1, 0));
        assert_eq!(
            log.events,
            vec![Event::Scored {
                scorer: Side::Player,
                score: Score::new(1, 0)
            }]
        );
    }

    #[test]
    fn test_escalation_raises_event() {
        let mut game = running_game();
        let mut log = Log::default();
        game.pointer_moved(250.0);
        game.session.ball = Ball::new(250.0, 672.0, 0.0, -5.0);

        game.step(&mut log);

        assert_eq!(game.session.computer_speed, ESCALATED_COMPUTER_SPEED);
        assert_eq!(
            log.events,
            vec![
                Event::PaddleHit { side: Side::Player },
                Event::OpponentEscalated {
                    speed: ESCALATED_COMPUTER_SPEED
                },
            ]
        );
    }

    #[test]
    fn test_win_by_player() {
        let mut game = running_game();
        let mut log = Log::default();
        game.session.score = Score::new(4, 3);
        game.session.ball = Ball::new(100.0, 2.0, 0.0, 3.0);

        let step = game.step(&mut log);

        assert_eq!(step, Step::Finished(Side::Player));
        assert!(step.is_terminal());
        assert_eq!(game.lifecycle, Lifecycle::GameOver(Side::Player));
        assert_eq!(game.winner(), Some(Side::Player));
        assert_eq!(log.winners, vec![Side::Player]);
        assert_eq!(
            log.events.last(),
            Some(&Event::GameOver {
                winner: Side::Player
            })
        );
    }

    #[test]
    fn test_win_by_computer() {
        let mut game = running_game();
        game.session.score = Score::new(2, 4);
        game.session.ball = Ball::new(20.0, 698.0, 0.0, -3.0);

        assert_eq!(game.step(&mut ()), Step::Finished(Side::Computer));
        assert_eq!(game.winner(), Some(Side::Computer));
        assert_eq!(game.status_string(), "Game over");
    }

    #[test]
    fn test_no_changes_after_game_over() {
        let mut game = running_game();
        game.session.score = Score::new(4, 0);
        game.session.ball = Ball::new(100.0, 2.0, 0.0, 3.0);
        game.step(&mut ());

        let frozen = game.session.clone();
        for _ in 0..100 {
            assert_eq!(game.step(&mut ()), Step::Idle);
        }

        assert_eq!(game.session, frozen);
        assert_eq!(game.session.score, Score::new(5, 0));
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut game = running_game();
        game.pointer_moved(10.0);
        game.session.computer_speed = ESCALATED_COMPUTER_SPEED;
        game.session.score = Score::new(4, 1);
        game.session.ball = Ball::new(100.0, 2.0, 0.0, 3.0);
        game.step(&mut ());
        assert!(game.winner().is_some());

        game.start_game();

        assert!(game.is_running());
        assert!(!game.is_new_game());
        assert_eq!(game.frame, 0);
        assert_eq!(game.session.score, Score::default());
        assert_eq!(game.session.computer_speed, 3.0);
        assert!(!game.session.rally.player_moved);
        assert_eq!(game.session.ball.speed_y, RESET_SPEED_Y);
    }

    #[test]
    fn test_compact_config_speeds_up_opponent() {
        let mut game = Game::new(Config::compact());
        game.start_game();
        game.pointer_moved(250.0);

        game.step(&mut ());

        assert_eq!(game.session.computer.x, PADDLE_START_X - 4.0);
    }

    #[test]
    fn test_status_string() {
        let mut game = Game::new(Config::default());
        assert_eq!(game.status_string(), "Press start");

        game.start_game();
        assert_eq!(game.status_string(), "Move the mouse to take control");
    }
}
