//! WASM bridge module for JavaScript interop

use crate::render::{Presenter, Surface, SurfacePresenter};
use crate::{Config, Game, Side, View, FIELD_WIDTH};
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

macro_rules! console_log {
    ($($t:tt)*) => {
        web_sys::console::log_1(&JsValue::from_str(&format!($($t)*)))
    };
}

/// Presenter used when the host draws from `view_json` itself
#[derive(Default)]
struct Headless {
    winner: Option<Side>,
}

impl Presenter for Headless {
    fn render(&mut self, _view: &View) {}

    fn game_over(&mut self, winner: Side) {
        self.winner = Some(winner);
    }
}

/// Canvas 2D context as a drawing surface
pub struct CanvasSurface<'a> {
    ctx: &'a CanvasRenderingContext2d,
}

impl<'a> CanvasSurface<'a> {
    pub fn new(ctx: &'a CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl Surface for CanvasSurface<'_> {
    fn fill_background(&mut self) {
        self.ctx.set_fill_style_str("black");
        self.ctx
            .fill_rect(0.0, 0.0, FIELD_WIDTH as f64, crate::FIELD_HEIGHT as f64);
        self.ctx.set_fill_style_str("white");
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ctx.set_fill_style_str("white");
        self.ctx
            .fill_rect(x as f64, y as f64, width as f64, height as f64);
    }

    fn dashed_line(&mut self, y: f32) {
        self.ctx.begin_path();
        let dash = js_sys::Array::of1(&JsValue::from_f64(4.0));
        if let Err(e) = self.ctx.set_line_dash(&dash) {
            console_log!("set_line_dash failed: {:?}", e);
        }
        self.ctx.move_to(0.0, y as f64);
        self.ctx.line_to(FIELD_WIDTH as f64, y as f64);
        self.ctx.set_stroke_style_str("grey");
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32) {
        self.ctx.begin_path();
        if let Err(e) =
            self.ctx
                .arc(x as f64, y as f64, radius as f64, 0.0, 2.0 * std::f64::consts::PI)
        {
            console_log!("arc failed: {:?}", e);
        }
        self.ctx.set_fill_style_str("white");
        self.ctx.fill();
    }

    fn text(&mut self, value: &str, x: f32, y: f32) {
        self.ctx.set_font("32px Courier New");
        if let Err(e) = self.ctx.fill_text(value, x as f64, y as f64) {
            console_log!("fill_text failed: {:?}", e);
        }
    }
}

/// WASM-compatible wrapper around the core Game engine
#[wasm_bindgen]
pub struct WasmGame {
    inner: Game,
    winner: Option<Side>,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a new game instance from JSON configuration
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: String) -> Result<WasmGame, JsValue> {
        let config = if config_json.trim().is_empty() {
            Config::default()
        } else {
            // Try to deserialize from JSON, fall back to default on error
            match serde_json::from_str(&config_json) {
                Ok(config) => config,
                Err(e) => {
                    console_log!("Failed to parse config JSON, using defaults: {}", e);
                    Config::default()
                }
            }
        };

        Ok(WasmGame {
            inner: Game::new(config),
            winner: None,
        })
    }

    /// Create a game tuned for the given viewport width in CSS pixels
    pub fn for_viewport_width(width_px: u32) -> WasmGame {
        WasmGame {
            inner: Game::new(Config::for_viewport_width(width_px)),
            winner: None,
        }
    }

    /// Start or restart a session
    pub fn start_game(&mut self) {
        self.winner = None;
        self.inner.start_game();
    }

    /// Pointer moved; `client_x` minus the canvas left offset gives the
    /// playfield coordinate
    pub fn pointer_move(&mut self, client_x: f64, canvas_left: f64) {
        self.inner.pointer_moved((client_x - canvas_left) as f32);
    }

    /// Simulate one frame without drawing.
    /// Returns false once the host should stop requesting frames.
    pub fn tick(&mut self) -> bool {
        let mut presenter = Headless::default();
        let step = self.inner.step(&mut presenter);
        if presenter.winner.is_some() {
            self.winner = presenter.winner;
        }
        !step.is_terminal()
    }

    /// Draw the current state onto a canvas, then simulate one frame.
    /// Returns false once the host should stop requesting frames.
    pub fn tick_canvas(&mut self, ctx: &CanvasRenderingContext2d) -> bool {
        let mut presenter = SurfacePresenter::new(CanvasSurface::new(ctx));
        let step = self.inner.step(&mut presenter);
        if let Some(winner) = presenter.winner {
            console_log!("{} wins", winner.label());
            self.winner = Some(winner);
        }
        !step.is_terminal()
    }

    /// Get the current game view as JSON string
    pub fn view_json(&self) -> String {
        let view = self.inner.view();
        match serde_json::to_string(&view) {
            Ok(json) => json,
            Err(e) => {
                console_log!("Failed to serialize view: {}", e);
                "{}".to_string()
            }
        }
    }

    /// Winner label once the game is over
    pub fn winner(&self) -> Option<String> {
        self.winner.map(|side| side.label().to_string())
    }

    /// True until the first `start_game`
    pub fn is_new_game(&self) -> bool {
        self.inner.is_new_game()
    }

    pub fn is_running(&self) -> bool {
        self.inner.is_running()
    }

    /// Get a human-readable status string
    pub fn status_string(&self) -> String {
        self.inner.status_string().to_string()
    }
}

/// Create a default config as JSON string (utility for JavaScript)
#[wasm_bindgen]
pub fn default_config_json() -> String {
    let config = Config::default();
    match serde_json::to_string_pretty(&config) {
        Ok(json) => json,
        Err(_) => "{}".to_string(),
    }
}

/// Initialize WASM module (called automatically)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wasm_game_creation() {
        let game = WasmGame::new(String::new()).unwrap();
        assert!(game.is_new_game());
        assert!(!game.is_running());
    }

    #[test]
    fn test_wasm_game_tick() {
        let mut game = WasmGame::new(String::new()).unwrap();
        assert!(!game.tick()); // not started yet

        game.start_game();
        assert!(game.tick());
        assert!(game.is_running());
        assert_eq!(game.winner(), None);
    }

    #[test]
    fn test_view_json_serialization() {
        let mut game = WasmGame::new(String::new()).unwrap();
        game.start_game();
        let json = game.view_json();

        let view: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(view.get("ball_x").is_some());
        assert!(view.get("score").is_some());
    }

    #[test]
    fn test_default_config_json() {
        let json = default_config_json();
        let config: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, Config::default());
    }
}
