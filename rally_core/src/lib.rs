//! Rally core engine - single-player paddle game against a scripted opponent

pub mod game;
pub mod opponent;
pub mod physics;
pub mod render;
pub mod scoring;
pub mod session;
pub mod types;

// WASM bridge module - only compiled when wasm feature is enabled
#[cfg(feature = "wasm")]
pub mod wasm;

pub use game::{Game, Step};
pub use render::{draw_frame, Cell, GridSurface, Presenter, Surface, SurfacePresenter, Tone};
pub use session::{pointer_to_paddle_x, Session};
pub use types::*;

#[cfg(test)]
mod grid_rendering_tests {
    use super::*;

    #[test]
    fn test_paddle_width_consistent_while_sliding() {
        let mut game = Game::new(Config::default());
        game.start_game();

        let mut widths = Vec::new();

        for pointer in [0.0, 60.0, 130.0, 250.0, 370.0, 455.0, 500.0] {
            game.pointer_moved(pointer);

            let mut grid = GridSurface::new(50, 35);
            draw_frame(&game.view(), &mut grid);

            let bottom = grid.rows() - 1;
            let width = grid
                .row(bottom)
                .iter()
                .filter(|cell| cell.glyph == render::PADDLE_GLYPH)
                .count();
            widths.push(width);

            println!("Pointer {:.0} -> paddle width: {} cells", pointer, width);
        }

        let first = widths[0];
        for (i, &width) in widths.iter().enumerate() {
            assert_eq!(width, first, "Paddle width inconsistency at sample {}", i);
        }
    }

    #[test]
    fn test_rendered_frames_follow_the_ball() {
        let mut game = Game::new(Config::default());
        game.start_game();
        let mut presenter = SurfacePresenter::new(GridSurface::new(50, 35));

        for _ in 0..40 {
            game.step(&mut presenter);
        }

        // 39 frames simulated before the last draw: y = 350 + 39 * 3 = 467
        let row = (467.0_f32 * 35.0 / 700.0).floor() as usize;
        assert!(presenter.surface.row_text(row).contains(render::BALL_GLYPH));
        assert_eq!(presenter.frames_drawn, 40);
        assert_eq!(presenter.winner, None);
    }
}
