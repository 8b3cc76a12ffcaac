//! CLI harness for testing rally_core: mouse play in the terminal, or headless autoplay.

mod autopilot;

use autopilot::{run_match, Autopilot};
use clap::Parser;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{
        poll, read, DisableMouseCapture, EnableMouseCapture, Event as TermEvent, KeyCode,
        KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use rally_core::{
    draw_frame, Config, Event, Game, GridSurface, Lifecycle, Presenter, Side, Step, Tone, View,
};
use std::io::{stdout, Result, Write};
use std::time::{Duration, Instant};

/// Playfield size in terminal cells
const FIELD_COLUMNS: usize = 50;
const FIELD_ROWS: usize = 35;
/// Rows used by the header above the field
const HEADER_ROWS: u16 = 3;

#[derive(Parser, Debug)]
#[command(name = "cli_harness", about = "Terminal harness for the rally engine")]
struct Args {
    /// Use narrow-viewport tuning (faster opponent)
    #[arg(long)]
    compact: bool,

    /// Run headless matches with a scripted pointer instead of the terminal UI
    #[arg(long)]
    autoplay: bool,

    /// Number of headless matches
    #[arg(long, default_value_t = 1)]
    matches: u32,

    /// Frame limit per headless match
    #[arg(long, default_value_t = 100_000)]
    max_frames: u32,

    /// Max pointer travel per frame for the scripted player
    #[arg(long, default_value_t = 4.0)]
    reach: f32,

    /// How far right of the ball the scripted player aims
    #[arg(long, default_value_t = 20.0)]
    offset: f32,
}

/// Presenter that rasterises into the harness grid and keeps the last event
struct HarnessPresenter {
    grid: GridSurface,
    last_event: Option<Event>,
}

impl Presenter for HarnessPresenter {
    fn render(&mut self, view: &View) {
        draw_frame(view, &mut self.grid);
    }

    fn game_over(&mut self, _winner: Side) {}

    fn event(&mut self, event: &Event) {
        self.last_event = Some(*event);
    }
}

/// CLI application state
struct CliApp {
    game: Game,
    presenter: HarnessPresenter,
    running: bool,
    last_tick: Instant,
    show_help: bool,
}

impl CliApp {
    fn new(config: Config) -> Self {
        let mut game = Game::new(config);
        game.start_game();

        let mut presenter = HarnessPresenter {
            grid: GridSurface::new(FIELD_COLUMNS, FIELD_ROWS),
            last_event: None,
        };
        draw_frame(&game.view(), &mut presenter.grid);

        Self {
            game,
            presenter,
            running: true,
            last_tick: Instant::now(),
            show_help: true,
        }
    }

    fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;

        let mut stdout = stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            Hide,
            Clear(ClearType::All)
        )?;

        while self.running {
            self.handle_input()?;
            self.update();
            self.render()?;

            let frame_time = Duration::from_millis(1000 / self.game.config.tick_hz as u64);
            std::thread::sleep(frame_time.saturating_sub(self.last_tick.elapsed()));
        }

        execute!(stdout, DisableMouseCapture, LeaveAlternateScreen, Show)?;
        disable_raw_mode()?;
        Ok(())
    }

    fn handle_input(&mut self) -> Result<()> {
        // Drain everything queued since the last frame
        while poll(Duration::from_millis(0))? {
            match read()? {
                TermEvent::Key(event) if event.kind == KeyEventKind::Press => match event.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') => self.running = false,
                    KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.running = false
                    }
                    KeyCode::Char('h') | KeyCode::Char('H') => self.show_help = !self.show_help,
                    KeyCode::Char('r') | KeyCode::Char('R') => self.restart(),
                    KeyCode::Enter if !self.game.is_running() => self.restart(),
                    _ => {}
                },
                TermEvent::Mouse(mouse) => self.handle_mouse(mouse),
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
            return;
        }

        // Column 0 is the left border
        let column = (mouse.column as usize)
            .saturating_sub(1)
            .min(FIELD_COLUMNS - 1);
        let field_x = self.presenter.grid.field_x_of_column(column);
        self.game.pointer_moved(field_x);
    }

    fn restart(&mut self) {
        self.game.start_game();
        self.presenter.last_event = None;
        self.last_tick = Instant::now();
    }

    fn update(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_tick);

        if dt >= Duration::from_millis(1000 / self.game.config.tick_hz as u64) {
            if let Step::Finished(winner) = self.game.step(&mut self.presenter) {
                // Show the final position rather than the one before the goal
                draw_frame(&self.game.view(), &mut self.presenter.grid);
                tracing::info!(winner = winner.label(), "match finished");
            }
            self.last_tick = now;
        }
    }

    fn render(&mut self) -> Result<()> {
        let view = self.game.view();
        let mut out = stdout();
        let mut row = 0;

        queue!(out, Clear(ClearType::All))?;

        // Header
        queue!(
            out,
            MoveTo(0, row),
            SetForegroundColor(Color::Cyan),
            Print("RALLY CLI HARNESS"),
            ResetColor
        )?;
        row += 1;

        queue!(
            out,
            MoveTo(0, row),
            Print(format!("Status: {}", self.game.status_string()))
        )?;
        row += 1;

        queue!(
            out,
            MoveTo(0, row),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "Player {} - {} Computer",
                view.score.player, view.score.computer
            )),
            ResetColor
        )?;
        row += 1;
        debug_assert_eq!(row, HEADER_ROWS);

        row = self.render_field(row)?;

        if let Lifecycle::GameOver(winner) = view.lifecycle {
            row += 1;
            queue!(
                out,
                MoveTo(0, row),
                SetForegroundColor(Color::Green),
                Print(format!(
                    "{} wins! Press ENTER to play again.",
                    winner.label()
                )),
                ResetColor
            )?;
            row += 1;
        }

        if self.show_help {
            self.render_help(row)?;
        }

        out.flush()?;
        Ok(())
    }

    fn render_field(&self, mut row: u16) -> Result<u16> {
        let mut out = stdout();
        let grid = &self.presenter.grid;

        queue!(
            out,
            MoveTo(0, row),
            Print(format!("┌{}┐", "─".repeat(grid.columns())))
        )?;
        row += 1;

        for y in 0..grid.rows() {
            queue!(out, MoveTo(0, row), Print("│"))?;

            for cell in grid.row(y) {
                let color = match cell.tone {
                    Tone::Background => Color::Black,
                    Tone::Foreground => Color::White,
                    Tone::Muted => Color::DarkGrey,
                };
                queue!(out, SetForegroundColor(color), Print(cell.glyph))?;
            }

            queue!(out, ResetColor, Print("│"))?;
            row += 1;
        }

        queue!(
            out,
            MoveTo(0, row),
            Print(format!("└{}┘", "─".repeat(grid.columns())))
        )?;
        row += 1;

        Ok(row)
    }

    fn render_help(&self, mut row: u16) -> Result<()> {
        let mut out = stdout();
        let session = &self.game.session;

        let lines = [
            "--- CONTROLS ---".to_string(),
            "Mouse: move paddle  |  R: Restart  |  H: Toggle help  |  Q: Quit".to_string(),
            format!(
                "Frame: {} | Ball: ({:.1}, {:.1}) vel ({:.1}, {:.1})",
                self.game.frame,
                session.ball.x,
                session.ball.y,
                session.ball.speed_x,
                session.ball.speed_y
            ),
            format!(
                "Paddles: player={:.1} computer={:.1} | Opponent speed: {:.0}",
                session.player.x, session.computer.x, session.computer_speed
            ),
            format!(
                "Rally: moved={} contact={} | Last event: {:?}",
                session.rally.player_moved,
                session.rally.paddle_contact,
                self.presenter.last_event
            ),
        ];

        row += 1;
        for line in lines {
            queue!(
                out,
                MoveTo(0, row),
                SetForegroundColor(Color::DarkGrey),
                Print(line),
                ResetColor
            )?;
            row += 1;
        }

        Ok(())
    }
}

fn autoplay(args: &Args, config: Config) {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut player_wins = 0;
    for index in 0..args.matches {
        let report = run_match(
            config,
            Autopilot::new(args.reach, args.offset),
            args.max_frames,
        );

        if report.winner == Some(Side::Player) {
            player_wins += 1;
        }

        println!(
            "match {}: winner={} score={}-{} frames={} opponent_speed={}",
            index + 1,
            report.winner.map(Side::label).unwrap_or("none"),
            report.score.player,
            report.score.computer,
            report.frames,
            report.computer_speed
        );
    }

    println!("player won {} of {} matches", player_wins, args.matches);
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::for_viewport(args.compact);

    if args.autoplay {
        autoplay(&args, config);
        return Ok(());
    }

    let mut app = CliApp::new(config);

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, Show);
        std::process::exit(0);
    })
    .expect("Error setting Ctrl-C handler");

    app.run()
}
