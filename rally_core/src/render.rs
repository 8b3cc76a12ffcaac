//! Presentation port: drawing contract, frame composition and a character-grid surface.

use crate::types::*;

/// Drawing target with the 500x700 playfield as its logical coordinate space
pub trait Surface {
    /// Clear the whole field to the background colour
    fn fill_background(&mut self);

    /// Solid rectangle, top-left corner at `(x, y)`
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Dashed horizontal line across the full field width
    fn dashed_line(&mut self, y: f32);

    /// Solid circle
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32);

    /// Text with its baseline starting at `(x, y)`
    fn text(&mut self, value: &str, x: f32, y: f32);
}

/// Receives frames and the end-of-game notification from the frame driver
pub trait Presenter {
    /// Called once per step, before the frame is simulated
    fn render(&mut self, view: &View);

    /// Called once, on the step that ends the game
    fn game_over(&mut self, winner: Side);

    /// Called for every event raised during a step
    fn event(&mut self, _event: &Event) {}
}

/// No-op presenter for headless stepping
impl Presenter for () {
    fn render(&mut self, _view: &View) {}
    fn game_over(&mut self, _winner: Side) {}
}

/// Vertical position of the dashed centre line
pub const CENTER_LINE_Y: f32 = FIELD_HEIGHT / 2.0;
/// Baseline of the player score label
pub const PLAYER_SCORE_POS: (f32, f32) = (20.0, FIELD_HEIGHT / 2.0 + 50.0);
/// Baseline of the computer score label
pub const COMPUTER_SCORE_POS: (f32, f32) = (20.0, FIELD_HEIGHT / 2.0 - 30.0);

/// Issue the draw calls for one frame
pub fn draw_frame<S: Surface + ?Sized>(view: &View, surface: &mut S) {
    surface.fill_background();

    surface.fill_rect(view.player_x, BOTTOM_PADDLE_Y, PADDLE_WIDTH, PADDLE_HEIGHT);
    surface.fill_rect(view.computer_x, TOP_PADDLE_Y, PADDLE_WIDTH, PADDLE_HEIGHT);

    surface.dashed_line(CENTER_LINE_Y);

    surface.fill_circle(view.ball_x, view.ball_y, BALL_RADIUS);

    let (px, py) = PLAYER_SCORE_POS;
    surface.text(&view.score.player.to_string(), px, py);
    let (cx, cy) = COMPUTER_SCORE_POS;
    surface.text(&view.score.computer.to_string(), cx, cy);
}

/// Presenter that draws every frame onto a surface and remembers the winner
pub struct SurfacePresenter<S: Surface> {
    pub surface: S,
    pub winner: Option<Side>,
    pub frames_drawn: u32,
}

impl<S: Surface> SurfacePresenter<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            winner: None,
            frames_drawn: 0,
        }
    }
}

impl<S: Surface> Presenter for SurfacePresenter<S> {
    fn render(&mut self, view: &View) {
        draw_frame(view, &mut self.surface);
        self.frames_drawn += 1;
    }

    fn game_over(&mut self, winner: Side) {
        self.winner = Some(winner);
    }
}

/// Colour class of a grid cell; front-ends map these to real colours
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Tone {
    Background,
    Foreground,
    Muted,
}

/// One character cell
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub tone: Tone,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        glyph: ' ',
        tone: Tone::Background,
    };
}

pub const PADDLE_GLYPH: char = '█';
pub const BALL_GLYPH: char = '●';
pub const DASH_GLYPH: char = '╌';

/// Rectangle in grid cells (inclusive bounds)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CellRect {
    pub left: usize,
    pub right: usize,
    pub top: usize,
    pub bottom: usize,
}

/// Surface that rasterises the playfield into a character grid.
///
/// Rectangles keep the same cell footprint wherever they are placed, so a
/// paddle never changes size as it slides.
#[derive(Debug, Clone)]
pub struct GridSurface {
    columns: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl GridSurface {
    pub fn new(columns: usize, rows: usize) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        Self {
            columns,
            rows,
            cells: vec![Cell::EMPTY; columns * rows],
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell(&self, column: usize, row: usize) -> Cell {
        self.cells[row * self.columns + column]
    }

    /// Cells of one row, left to right
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.columns;
        &self.cells[start..start + self.columns]
    }

    /// Row as plain text
    pub fn row_text(&self, row: usize) -> String {
        self.row(row).iter().map(|cell| cell.glyph).collect()
    }

    fn scale_x(&self) -> f32 {
        self.columns as f32 / FIELD_WIDTH
    }

    fn scale_y(&self) -> f32 {
        self.rows as f32 / FIELD_HEIGHT
    }

    fn column_of(&self, x: f32) -> usize {
        ((x * self.scale_x()).floor().max(0.0) as usize).min(self.columns - 1)
    }

    fn row_of(&self, y: f32) -> usize {
        ((y * self.scale_y()).floor().max(0.0) as usize).min(self.rows - 1)
    }

    /// Cell footprint of a field rectangle; width and height in cells
    /// depend only on the rectangle's size
    pub fn rect_cells(&self, x: f32, y: f32, width: f32, height: f32) -> CellRect {
        let span_x = ((width * self.scale_x()).round() as usize).max(1);
        let span_y = ((height * self.scale_y()).round() as usize).max(1);

        let max_left = self.columns - span_x.min(self.columns);
        let max_top = self.rows - span_y.min(self.rows);
        let left = ((x * self.scale_x()).round().max(0.0) as usize).min(max_left);
        let top = ((y * self.scale_y()).round().max(0.0) as usize).min(max_top);

        CellRect {
            left,
            right: (left + span_x - 1).min(self.columns - 1),
            top,
            bottom: (top + span_y - 1).min(self.rows - 1),
        }
    }

    /// Playfield x under the middle of a grid column
    pub fn field_x_of_column(&self, column: usize) -> f32 {
        (column as f32 + 0.5) / self.scale_x()
    }

    fn put(&mut self, column: usize, row: usize, cell: Cell) {
        let index = row * self.columns + column;
        self.cells[index] = cell;
    }
}

impl Surface for GridSurface {
    fn fill_background(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let rect = self.rect_cells(x, y, width, height);
        let cell = Cell {
            glyph: PADDLE_GLYPH,
            tone: Tone::Foreground,
        };
        for row in rect.top..=rect.bottom {
            for column in rect.left..=rect.right {
                self.put(column, row, cell);
            }
        }
    }

    fn dashed_line(&mut self, y: f32) {
        let row = self.row_of(y);
        let cell = Cell {
            glyph: DASH_GLYPH,
            tone: Tone::Muted,
        };
        for column in (0..self.columns).step_by(2) {
            self.put(column, row, cell);
        }
    }

    fn fill_circle(&mut self, x: f32, y: f32, _radius: f32) {
        // Off-field balls are not drawn
        if !(0.0..=FIELD_WIDTH).contains(&x) || !(0.0..=FIELD_HEIGHT).contains(&y) {
            return;
        }
        let (column, row) = (self.column_of(x), self.row_of(y));
        self.put(
            column,
            row,
            Cell {
                glyph: BALL_GLYPH,
                tone: Tone::Foreground,
            },
        );
    }

    fn text(&mut self, value: &str, x: f32, y: f32) {
        // Baseline sits on the row above the coordinate
        let row = self.row_of(y).saturating_sub(1);
        let start = self.column_of(x);
        for (offset, glyph) in value.chars().enumerate() {
            let column = start + offset;
            if column >= self.columns {
                break;
            }
            self.put(
                column,
                row,
                Cell {
                    glyph,
                    tone: Tone::Foreground,
                },
            );
        }
    }
}
