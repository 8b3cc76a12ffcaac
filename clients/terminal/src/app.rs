use crate::event::{AppEvent, Event, EventHandler};
use color_eyre::eyre::WrapErr;
use rally_core::{Config, Event as GameEvent, Game, Presenter, Side, Step, View, FIELD_WIDTH};
use ratatui::{
    crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind},
    layout::Rect,
    DefaultTerminal,
};
use std::cell::Cell;

/// Application screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Start,
    Game,
    GameOver,
}

/// Menu states for navigation
#[derive(Debug, Default)]
pub struct MenuState {
    pub start_selected: usize,
    pub game_over_selected: usize,
}

/// Terminal size limits
pub const MIN_GAME_WIDTH: u16 = 40;
pub const MIN_GAME_HEIGHT: u16 = 25;
/// Narrower terminals get the compact tuning
pub const COMPACT_COLUMNS: u16 = 100;

const START_MENU: [&str; 2] = ["Play", "Quit"];
const GAME_OVER_MENU: [&str; 2] = ["Play again", "Menu"];

/// Receives frames from the engine; keeps what the panels show
#[derive(Debug, Default)]
pub struct FramePresenter {
    pub winner: Option<Side>,
    pub last_event: Option<GameEvent>,
    pub frames: u32,
}

impl Presenter for FramePresenter {
    fn render(&mut self, _view: &View) {
        self.frames += 1;
    }

    fn game_over(&mut self, winner: Side) {
        self.winner = Some(winner);
    }

    fn event(&mut self, event: &GameEvent) {
        self.last_event = Some(*event);
    }
}

impl FramePresenter {
    /// One-line description of the latest event for the status panel
    pub fn message(&self) -> String {
        match self.last_event {
            None => String::new(),
            Some(GameEvent::PaddleHit { side }) => format!("{} returns", side.label()),
            Some(GameEvent::OpponentEscalated { .. }) => "Computer speeds up!".to_string(),
            Some(GameEvent::Scored { scorer, .. }) => format!("Point to {}", scorer.label()),
            Some(GameEvent::GameOver { winner }) => format!("{} wins!", winner.label()),
        }
    }
}

/// Main application
pub struct App {
    /// Is the application running?
    pub running: bool,
    /// Current screen
    pub screen: AppScreen,
    /// Menu states
    pub menu_state: MenuState,
    /// Game instance
    pub game: Game,
    /// Engine output for the panels
    pub presenter: FramePresenter,
    /// Event handler
    pub events: EventHandler,
    /// Current terminal size
    pub terminal_size: (u16, u16),
    /// Whether UI is paused due to small terminal
    pub ui_paused: bool,
    /// Inner area of the field widget from the last draw, for mouse mapping
    pub field_area: Cell<Option<Rect>>,
}

impl App {
    /// Constructs a new instance of App
    pub fn new() -> color_eyre::Result<Self> {
        let events = EventHandler::new()?;
        let (width, height) =
            ratatui::crossterm::terminal::size().wrap_err("failed to read terminal size")?;

        let config = Config::for_viewport(width < COMPACT_COLUMNS);
        tracing::info!(width, height, ?config, "terminal client started");

        Ok(Self {
            running: true,
            screen: AppScreen::Start,
            menu_state: MenuState::default(),
            game: Game::new(config),
            presenter: FramePresenter::default(),
            events,
            terminal_size: (width, height),
            ui_paused: is_too_small(width, height),
            field_area: Cell::new(None),
        })
    }

    /// Run the application's main loop
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        while self.running {
            terminal.draw(|frame| frame.render_widget(&self, frame.area()))?;
            self.handle_events()?;
        }
        Ok(())
    }

    pub fn handle_events(&mut self) -> color_eyre::Result<()> {
        match self.events.next()? {
            Event::Tick => self.tick(),
            Event::Crossterm(event) => match event {
                ratatui::crossterm::event::Event::Key(key_event) => {
                    self.handle_key_event(key_event)
                }
                ratatui::crossterm::event::Event::Mouse(mouse_event) => {
                    self.handle_mouse_event(mouse_event)
                }
                _ => {}
            },
            Event::App(app_event) => self.handle_app_event(app_event),
        }
        Ok(())
    }

    /// Handle key events and convert to app events
    pub fn handle_key_event(&mut self, key_event: KeyEvent) {
        if key_event.kind != KeyEventKind::Press {
            return;
        }

        // Global quit keys
        match key_event.code {
            KeyCode::Char('q') => {
                self.events.send(AppEvent::Quit);
                return;
            }
            KeyCode::Char('c') | KeyCode::Char('C')
                if key_event.modifiers == KeyModifiers::CONTROL =>
            {
                self.events.send(AppEvent::Quit);
                return;
            }
            _ => {}
        }

        // Screen-specific key handling
        match self.screen {
            AppScreen::Start | AppScreen::GameOver => match key_event.code {
                KeyCode::Up => self.events.send(AppEvent::MenuUp),
                KeyCode::Down => self.events.send(AppEvent::MenuDown),
                KeyCode::Enter => self.events.send(AppEvent::MenuSelect),
                KeyCode::Esc if self.screen == AppScreen::Start => {
                    self.events.send(AppEvent::Quit)
                }
                KeyCode::Esc => self.events.send(AppEvent::NavigateToStart),
                _ => {}
            },
            AppScreen::Game => {
                if key_event.code == KeyCode::Esc {
                    self.events.send(AppEvent::NavigateToStart);
                }
            }
        }
    }

    /// Pointer movement drives the player paddle while a match runs
    fn handle_mouse_event(&mut self, mouse_event: MouseEvent) {
        if self.screen != AppScreen::Game {
            return;
        }
        if !matches!(
            mouse_event.kind,
            MouseEventKind::Moved | MouseEventKind::Drag(_)
        ) {
            return;
        }

        if let Some(field) = self.field_area.get() {
            self.game
                .pointer_moved(field_x_for_column(mouse_event.column, field));
        }
    }

    /// Handle application events
    fn handle_app_event(&mut self, app_event: AppEvent) {
        match app_event {
            AppEvent::Quit => self.quit(),
            AppEvent::NavigateToStart => self.navigate_to_start(),
            AppEvent::StartMatch => self.start_match(),
            AppEvent::MenuUp => self.move_selection(-1),
            AppEvent::MenuDown => self.move_selection(1),
            AppEvent::MenuSelect => self.menu_select(),
            AppEvent::TerminalResize(width, height) => self.handle_resize(width, height),
        }
    }

    /// Advance the match by one frame per tick
    fn tick(&mut self) {
        if self.screen != AppScreen::Game || self.ui_paused {
            return;
        }

        if let Step::Finished(winner) = self.game.step(&mut self.presenter) {
            tracing::info!(
                winner = winner.label(),
                frames = self.presenter.frames,
                "match finished"
            );
            self.screen = AppScreen::GameOver;
            self.menu_state.game_over_selected = 0;
        }
    }

    // Navigation methods
    fn quit(&mut self) {
        self.running = false;
    }

    fn navigate_to_start(&mut self) {
        self.screen = AppScreen::Start;
        self.field_area.set(None);
    }

    fn start_match(&mut self) {
        self.game.start_game();
        self.presenter = FramePresenter::default();
        self.screen = AppScreen::Game;
    }

    fn move_selection(&mut self, delta: isize) {
        match self.screen {
            AppScreen::Start => {
                self.menu_state.start_selected =
                    cycle(self.menu_state.start_selected, START_MENU.len(), delta);
            }
            AppScreen::GameOver => {
                self.menu_state.game_over_selected =
                    cycle(self.menu_state.game_over_selected, GAME_OVER_MENU.len(), delta);
            }
            AppScreen::Game => {}
        }
    }

    fn menu_select(&mut self) {
        match self.screen {
            AppScreen::Start => match self.menu_state.start_selected {
                0 => self.events.send(AppEvent::StartMatch), // Play
                1 => self.events.send(AppEvent::Quit),       // Quit
                _ => {}
            },
            AppScreen::GameOver => match self.menu_state.game_over_selected {
                0 => self.events.send(AppEvent::StartMatch), // Play again
                1 => self.events.send(AppEvent::NavigateToStart), // Menu
                _ => {}
            },
            AppScreen::Game => {}
        }
    }

    // Terminal size management
    fn handle_resize(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);
        self.ui_paused = is_too_small(width, height);
        if self.ui_paused {
            self.field_area.set(None);
        }
    }

    // Helper methods for UI
    pub fn get_start_menu_items(&self) -> &'static [&'static str] {
        &START_MENU
    }

    pub fn get_game_over_menu_items(&self) -> &'static [&'static str] {
        &GAME_OVER_MENU
    }
}

fn is_too_small(width: u16, height: u16) -> bool {
    width < MIN_GAME_WIDTH || height < MIN_GAME_HEIGHT
}

/// Step a menu index, wrapping at both ends
fn cycle(index: usize, len: usize, delta: isize) -> usize {
    (index as isize + delta).rem_euclid(len as isize) as usize
}

/// Largest grid with the playfield's proportions that fits in `width` x `height`
/// cells; terminal cells are about twice as tall as they are wide
pub fn field_size(width: u16, height: u16) -> (u16, u16) {
    let (width, height) = (u32::from(width), u32::from(height));
    let rows = height.min(width * 7 / 10);
    let columns = (rows * 10 / 7).min(width);
    (columns as u16, rows as u16)
}

/// Playfield x under a terminal column. Columns outside the field give
/// values outside 0..500, which the engine clamps.
pub fn field_x_for_column(column: u16, field: Rect) -> f32 {
    let width = field.width.max(1) as f32;
    (column as f32 - field.x as f32 + 0.5) * FIELD_WIDTH / width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(cycle(0, 2, -1), 1);
        assert_eq!(cycle(1, 2, 1), 0);
        assert_eq!(cycle(0, 2, 1), 1);
    }

    #[test]
    fn test_field_size_keeps_proportions() {
        assert_eq!(field_size(50, 35), (50, 35));
        assert_eq!(field_size(200, 35), (50, 35));
        assert_eq!(field_size(30, 100), (30, 21));
    }

    #[test]
    fn test_field_x_for_column() {
        let field = Rect::new(10, 5, 50, 35);

        assert_eq!(field_x_for_column(10, field), 5.0);
        assert_eq!(field_x_for_column(59, field), 495.0);
        assert!(field_x_for_column(2, field) < 0.0);
    }

    #[test]
    fn test_pointer_over_field_moves_paddle() {
        let field = Rect::new(0, 0, 50, 35);
        let mut game = Game::new(Config::default());
        game.start_game();

        game.pointer_moved(field_x_for_column(45, field));

        assert!(game.session.rally.player_moved);
        assert_eq!(game.session.player.x, 430.0);
    }

    #[test]
    fn test_presenter_tracks_winner_and_events() {
        let mut game = Game::new(Config::default());
        game.start_game();
        game.pointer_moved(0.0);
        let mut presenter = FramePresenter::default();

        let mut step = Step::Continue;
        while !step.is_terminal() {
            step = game.step(&mut presenter);
        }

        assert_eq!(step, Step::Finished(Side::Computer));
        assert_eq!(presenter.winner, Some(Side::Computer));
        assert_eq!(presenter.message(), "Computer wins!");
        assert!(presenter.frames > 0);
    }

    #[test]
    fn test_presenter_message() {
        let mut presenter = FramePresenter::default();
        assert_eq!(presenter.message(), "");

        presenter.event(&GameEvent::PaddleHit { side: Side::Player });
        assert_eq!(presenter.message(), "Player returns");
    }
}
