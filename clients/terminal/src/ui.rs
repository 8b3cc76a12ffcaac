use crate::app::{field_size, App, AppScreen, MIN_GAME_HEIGHT, MIN_GAME_WIDTH};
use rally_core::{draw_frame, Cell, GridSurface, Lifecycle, Tone};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, List, ListItem, Paragraph, Widget},
};

/// Rows taken by the score panel and the controls/menu panel
const SCORE_PANEL_ROWS: u16 = 3;
const BOTTOM_PANEL_ROWS: u16 = 4;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Create layout with title and content
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(5)])
            .split(area);

        // Render title
        let title = Paragraph::new("Rally: first to 5 wins")
            .style(Style::default().fg(Color::Cyan))
            .alignment(Alignment::Center)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Rally")
                    .title_alignment(Alignment::Center),
            );
        title.render(chunks[0], buf);

        // Render screen-specific content
        match self.screen {
            AppScreen::Start => self.render_start_screen(chunks[1], buf),
            AppScreen::Game | AppScreen::GameOver => self.render_match_screen(chunks[1], buf),
        }
    }
}

/// Menu list with the selected entry highlighted
fn menu_list<'a>(items: &[&'a str], selected: usize, title: String) -> List<'a> {
    let items: Vec<ListItem> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if i == selected {
                Style::default().fg(Color::Yellow).bg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(*item).style(style)
        })
        .collect();

    List::new(items)
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .title(title)
                .title_alignment(Alignment::Center),
        )
        .highlight_symbol("► ")
}

fn tone_style(tone: Tone) -> Style {
    match tone {
        Tone::Background => Style::default().fg(Color::Black),
        Tone::Foreground => Style::default().fg(Color::White),
        Tone::Muted => Style::default().fg(Color::DarkGray),
    }
}

/// One grid row as a styled line, merging runs of equal tone
fn grid_line(cells: &[Cell]) -> Line<'static> {
    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_tone = None;

    for cell in cells {
        if run_tone != Some(cell.tone) {
            if let Some(tone) = run_tone {
                spans.push(Span::styled(std::mem::take(&mut run), tone_style(tone)));
            }
            run_tone = Some(cell.tone);
        }
        run.push(cell.glyph);
    }
    if let Some(tone) = run_tone {
        spans.push(Span::styled(run, tone_style(tone)));
    }

    Line::from(spans)
}

impl App {
    fn render_start_screen(&self, area: Rect, buf: &mut Buffer) {
        let list = menu_list(
            self.get_start_menu_items(),
            self.menu_state.start_selected,
            "Main Menu".to_string(),
        );
        list.render(area, buf);
    }

    fn render_match_screen(&self, area: Rect, buf: &mut Buffer) {
        // Check if terminal is too small
        if self.ui_paused {
            let message = format!(
                "Terminal too small!\n\nMinimum required: {}×{}\nCurrent size: {}×{}\n\nPlease resize your terminal to continue playing.",
                MIN_GAME_WIDTH,
                MIN_GAME_HEIGHT,
                self.terminal_size.0,
                self.terminal_size.1
            );

            let resize_widget = Paragraph::new(message)
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center)
                .block(
                    Block::bordered()
                        .border_type(BorderType::Rounded)
                        .title("⚠ Resize Required ⚠")
                        .title_alignment(Alignment::Center),
                );
            resize_widget.render(area, buf);
            return;
        }

        let view = self.game.view();

        // Field grid sized to what is left after the panels and borders
        let (columns, rows) = field_size(
            area.width.saturating_sub(2),
            area.height
                .saturating_sub(SCORE_PANEL_ROWS + BOTTOM_PANEL_ROWS + 2),
        );
        if columns == 0 || rows == 0 {
            self.field_area.set(None);
            return;
        }

        let panel_width = (columns + 2).max(MIN_GAME_WIDTH).min(area.width);
        let column_area = Rect {
            x: area.x + area.width.saturating_sub(panel_width) / 2,
            y: area.y,
            width: panel_width,
            height: area.height,
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(SCORE_PANEL_ROWS),  // Score
                Constraint::Length(rows + 2),          // Field
                Constraint::Length(BOTTOM_PANEL_ROWS), // Controls or menu
            ])
            .split(column_area);

        // Render score and status
        let message = self.presenter.message();
        let score_content = format!(
            "You {} - {} Computer    {}    {}",
            view.score.player,
            view.score.computer,
            self.game.status_string(),
            message
        );

        let score_widget = Paragraph::new(score_content)
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title("Game Info")
                    .title_alignment(Alignment::Center),
            );
        score_widget.render(chunks[0], buf);

        // Field, centred in its row
        let field_rect = Rect {
            x: chunks[1].x + chunks[1].width.saturating_sub(columns + 2) / 2,
            y: chunks[1].y,
            width: columns + 2,
            height: rows + 2,
        };
        let mut grid = GridSurface::new(columns as usize, rows as usize);
        draw_frame(&view, &mut grid);

        let field_lines: Vec<Line> = (0..grid.rows()).map(|y| grid_line(grid.row(y))).collect();
        let field_block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title("Field")
            .title_alignment(Alignment::Center);
        self.field_area.set(Some(field_block.inner(field_rect)));
        Paragraph::new(field_lines)
            .block(field_block)
            .render(field_rect, buf);

        match view.lifecycle {
            Lifecycle::GameOver(winner) => {
                let menu = menu_list(
                    self.get_game_over_menu_items(),
                    self.menu_state.game_over_selected,
                    format!("{} wins!", winner.label()),
                );
                menu.render(chunks[2], buf);
            }
            _ => {
                let controls_widget =
                    Paragraph::new("Mouse: move paddle  ESC: Menu  Q: Quit")
                        .style(Style::default().fg(Color::DarkGray))
                        .alignment(Alignment::Center)
                        .block(
                            Block::bordered()
                                .border_type(BorderType::Rounded)
                                .title("Controls")
                                .title_alignment(Alignment::Center),
                        );
                controls_widget.render(chunks[2], buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_line_merges_runs() {
        let mut grid = GridSurface::new(10, 4);
        rally_core::Surface::fill_rect(&mut grid, 100.0, 0.0, 200.0, 175.0);

        let line = grid_line(grid.row(0));

        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[1].content, "████");
    }
}
