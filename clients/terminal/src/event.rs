use color_eyre::eyre::WrapErr;
use ratatui::crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent},
    execute,
};
use std::{
    io::stdout,
    sync::mpsc,
    thread,
    time::{Duration, Instant},
};

/// The frequency at which tick events are emitted (60 FPS for game updates)
const TICK_FPS: f64 = 60.0;

/// Representation of all possible events.
#[derive(Clone, Debug)]
pub enum Event {
    /// An event that is emitted on a regular schedule.
    /// Used for game updates at 60 FPS
    Tick,
    /// Crossterm events (keyboard, mouse, etc.)
    Crossterm(CrosstermEvent),
    /// Application events
    App(AppEvent),
}

/// Application events for game control
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppEvent {
    /// Quit the application
    Quit,
    /// Navigate to a screen
    NavigateToStart,
    StartMatch,
    /// Menu navigation
    MenuUp,
    MenuDown,
    MenuSelect,
    /// Terminal resize event
    TerminalResize(u16, u16), // width, height
}

/// Terminal event handler; owns mouse capture for its lifetime
pub struct EventHandler {
    /// Event sender channel
    sender: mpsc::Sender<Event>,
    /// Event receiver channel
    receiver: mpsc::Receiver<Event>,
}

impl EventHandler {
    /// Constructs a new instance and starts the input thread
    pub fn new() -> color_eyre::Result<Self> {
        let (sender, receiver) = mpsc::channel();

        execute!(stdout(), EnableMouseCapture).wrap_err("failed to enable mouse capture")?;

        let actor = EventThread::new(sender.clone());
        thread::spawn(move || {
            if let Err(e) = actor.run() {
                tracing::error!("event thread stopped: {e}");
            }
        });

        Ok(Self { sender, receiver })
    }

    /// Receives an event from the sender (blocking)
    pub fn next(&self) -> color_eyre::Result<Event> {
        Ok(self.receiver.recv()?)
    }

    /// Queue an app event
    pub fn send(&mut self, app_event: AppEvent) {
        let _ = self.sender.send(Event::App(app_event));
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture);
    }
}

/// A thread that handles reading crossterm events and emitting tick events
struct EventThread {
    sender: mpsc::Sender<Event>,
}

impl EventThread {
    fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    fn run(self) -> color_eyre::Result<()> {
        let tick_interval = Duration::from_secs_f64(1.0 / TICK_FPS);
        let mut last_tick = Instant::now();

        loop {
            // Emit tick events at 60 FPS
            let timeout = tick_interval.saturating_sub(last_tick.elapsed());
            if timeout == Duration::ZERO {
                last_tick = Instant::now();
                if !self.send(Event::Tick) {
                    return Ok(());
                }
            }

            // Poll for crossterm events
            if event::poll(timeout).wrap_err("failed to poll for crossterm events")? {
                let event = event::read().wrap_err("failed to read crossterm event")?;

                let event = match event {
                    CrosstermEvent::Resize(width, height) => {
                        Event::App(AppEvent::TerminalResize(width, height))
                    }
                    _ => Event::Crossterm(event),
                };
                if !self.send(event) {
                    return Ok(());
                }
            }
        }
    }

    /// False once the app has dropped its receiver
    fn send(&self, event: Event) -> bool {
        self.sender.send(event).is_ok()
    }
}
