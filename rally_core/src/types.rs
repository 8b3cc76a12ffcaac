//! Core types and constants for the paddle rally engine.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Playfield width in logical units
pub const FIELD_WIDTH: f32 = 500.0;
/// Playfield height in logical units
pub const FIELD_HEIGHT: f32 = 700.0;

pub const PADDLE_WIDTH: f32 = 50.0;
pub const PADDLE_HEIGHT: f32 = 10.0;
/// Half a paddle width. Also the depth of the two goal regions.
pub const PADDLE_DIFF: f32 = 25.0;
/// Vertical draw position of the computer paddle
pub const TOP_PADDLE_Y: f32 = 10.0;
/// Vertical draw position of the player paddle
pub const BOTTOM_PADDLE_Y: f32 = FIELD_HEIGHT - 20.0;
/// Both paddles start here
pub const PADDLE_START_X: f32 = 225.0;

pub const BALL_RADIUS: f32 = 5.0;

/// Vertical speed after every reset (served toward the player)
pub const RESET_SPEED_Y: f32 = -3.0;
/// Cap on vertical speed magnitude
pub const MAX_SPEED_Y: f32 = 5.0;
/// Opponent speed once the player drives the ball past the cap
pub const ESCALATED_COMPUTER_SPEED: f32 = 6.0;
/// Horizontal speed per unit of off-centre contact on the player paddle
pub const DEFLECTION_FACTOR: f32 = 0.3;

/// First side to reach this wins
pub const WINNING_SCORE: u8 = 5;

/// Viewports at or below this width (in CSS pixels) get compact tuning
pub const COMPACT_VIEWPORT_WIDTH: u32 = 600;

/// Frame counter type
pub type Frame = u32;

/// Which paddle
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    /// Human, bottom of the field
    Player,
    /// Scripted opponent, top of the field
    Computer,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(self) -> Side {
        match self {
            Side::Player => Side::Computer,
            Side::Computer => Side::Player,
        }
    }

    /// Label shown on the end screen
    pub fn label(self) -> &'static str {
        match self {
            Side::Player => "Player",
            Side::Computer => "Computer",
        }
    }
}

/// Session lifecycle
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Lifecycle {
    /// No game has been played yet
    NotStarted,
    /// Frames are being simulated
    Running,
    /// Someone reached the winning score (winner)
    GameOver(Side),
}

/// Startup tuning
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Vertical speed before the first reset
    pub speed_y: f32,
    /// Horizontal speed before the first paddle contact
    pub speed_x: f32,
    /// Opponent step per frame
    pub computer_speed: f32,
    /// Frame rate hosts should call `step()` at
    pub tick_hz: u16,
}

impl Config {
    /// Tuning for wide viewports
    pub fn desktop() -> Self {
        Config {
            speed_y: -1.0,
            speed_x: -1.0,
            computer_speed: 3.0,
            tick_hz: 60,
        }
    }

    /// Tuning for narrow viewports: faster serve and a quicker opponent
    pub fn compact() -> Self {
        Config {
            speed_y: -2.0,
            speed_x: -2.0,
            computer_speed: 4.0,
            tick_hz: 60,
        }
    }

    pub fn for_viewport(compact: bool) -> Self {
        if compact {
            Config::compact()
        } else {
            Config::desktop()
        }
    }

    /// Pick tuning from a viewport width in CSS pixels
    pub fn for_viewport_width(width_px: u32) -> Self {
        Config::for_viewport(width_px <= COMPACT_VIEWPORT_WIDTH)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::desktop()
    }
}

/// Ball state.
///
/// `speed_y` is applied as `y -= speed_y`: positive values move the ball
/// toward the computer (top), negative values toward the player (bottom).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ball {
    pub x: f32,
    pub y: f32,
    pub speed_x: f32,
    pub speed_y: f32,
}

impl Ball {
    pub fn new(x: f32, y: f32, speed_x: f32, speed_y: f32) -> Self {
        Ball {
            x,
            y,
            speed_x,
            speed_y,
        }
    }

    /// Ball at the centre of the field
    pub fn centered(speed_x: f32, speed_y: f32) -> Self {
        Ball::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0, speed_x, speed_y)
    }

    pub fn is_moving_left(&self) -> bool {
        self.speed_x < 0.0
    }

    pub fn is_moving_right(&self) -> bool {
        self.speed_x > 0.0
    }
}

/// Paddle state. Only the horizontal position changes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
}

impl Paddle {
    pub fn new(x: f32) -> Self {
        Paddle { x }
    }

    /// Horizontal centre
    pub fn center(&self) -> f32 {
        self.x + PADDLE_DIFF
    }

    /// Whether `x` falls on the paddle, edges included
    pub fn spans(&self, x: f32) -> bool {
        x >= self.x && x <= self.x + PADDLE_WIDTH
    }

    /// Largest left edge that keeps the paddle on the field
    pub fn max_x() -> f32 {
        FIELD_WIDTH - PADDLE_WIDTH
    }
}

impl Default for Paddle {
    fn default() -> Self {
        Paddle::new(PADDLE_START_X)
    }
}

/// Flags gating horizontal motion and the opponent for a rally
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct RallyContext {
    /// The human has moved the pointer at least once
    pub player_moved: bool,
    /// The player paddle has struck the ball since the last reset
    pub paddle_contact: bool,
}

impl RallyContext {
    /// Horizontal ball motion is only applied once both flags are set
    pub fn allows_drift(&self) -> bool {
        self.player_moved && self.paddle_contact
    }
}

/// Score counters
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Score {
    pub player: u8,
    pub computer: u8,
}

impl Score {
    pub fn new(player: u8, computer: u8) -> Self {
        Score { player, computer }
    }

    pub fn get(&self, side: Side) -> u8 {
        match side {
            Side::Player => self.player,
            Side::Computer => self.computer,
        }
    }
}

/// Data needed to draw one frame
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct View {
    pub frame: Frame,
    pub lifecycle: Lifecycle,
    pub is_new_game: bool,
    pub ball_x: f32,
    pub ball_y: f32,
    /// Left edge of the player (bottom) paddle
    pub player_x: f32,
    /// Left edge of the computer (top) paddle
    pub computer_x: f32,
    pub score: Score,
}

/// Things that happened during a frame
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Event {
    /// A paddle returned the ball
    PaddleHit { side: Side },
    /// The opponent was sped up for the rest of the session
    OpponentEscalated { speed: f32 },
    /// The ball got past a paddle
    Scored { scorer: Side, score: Score },
    /// Someone reached the winning score
    GameOver { winner: Side },
}
