use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{GameView, TileView};
use crate::metrics::GameMetrics;

use super::animation::Animations;

/// Character footprint of one cell on screen.
const CELL_WIDTH: u16 = 9;
const CELL_HEIGHT: u16 = 3;
/// Gap between neighboring cells inside the board frame.
const CELL_GAP: u16 = 1;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        view: &GameView,
        metrics: &GameMetrics,
        animations: &Animations,
        defeated: bool,
        now: Instant,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        // Render header with basic stats
        let stats = self.render_stats(view, metrics);
        frame.render_widget(stats, chunks[0]);

        // Render the board, tiles floating over the empty slots
        self.render_board(frame, chunks[1], view, animations, now);

        // Render footer with controls
        let controls = self.render_controls();
        frame.render_widget(controls, chunks[2]);

        if defeated {
            self.render_defeat(frame, chunks[1], view);
        }
    }

    fn render_board(
        &self,
        frame: &mut Frame,
        area: Rect,
        view: &GameView,
        animations: &Animations,
        now: Instant,
    ) {
        if view.size == 0 {
            return;
        }
        let size = view.size as u16;
        let board_width = size * (CELL_WIDTH + CELL_GAP) + CELL_GAP + 2;
        let board_height = size * (CELL_HEIGHT + CELL_GAP) + CELL_GAP + 2;
        if area.width < board_width || area.height < board_height {
            let notice = Paragraph::new(Line::from(Span::styled(
                "Terminal too small",
                Style::default().fg(Color::Red),
            )))
            .alignment(Alignment::Center);
            frame.render_widget(notice, area);
            return;
        }
        let board = centered(area, board_width, board_height);

        frame.render_widget(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" 2048 "),
            board,
        );

        let origin_x = board.x + 1 + CELL_GAP;
        let origin_y = board.y + 1 + CELL_GAP;
        let cell_rect = |row: f32, col: f32| -> Rect {
            let x = origin_x as f32 + col * (CELL_WIDTH + CELL_GAP) as f32;
            let y = origin_y as f32 + row * (CELL_HEIGHT + CELL_GAP) as f32;
            Rect::new(x.round() as u16, y.round() as u16, CELL_WIDTH, CELL_HEIGHT)
        };

        // Empty slots first, tiles on top
        for row in 0..view.size {
            for col in 0..view.size {
                let slot = Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray));
                frame.render_widget(slot, cell_rect(row as f32, col as f32));
            }
        }

        for tile in &view.tiles {
            let (row, col) = match animations.slide(tile.id, now) {
                Some((from, to, t)) => (
                    lerp(from.row as f32, to.row as f32, t),
                    lerp(from.col as f32, to.col as f32, t),
                ),
                None => (tile.at.row as f32, tile.at.col as f32),
            };
            let rect = cell_rect(row, col);
            frame.render_widget(Clear, rect);
            frame.render_widget(self.render_tile(tile, animations, now), rect);
        }
    }

    fn render_tile(&self, tile: &TileView, animations: &Animations, now: Instant) -> Paragraph<'_> {
        let (fg, bg) = tile_colors(tile.value);
        let mut style = Style::default().fg(fg).bg(bg).add_modifier(Modifier::BOLD);
        if let Some(t) = animations.spawning(tile.id, now) {
            if t < 0.5 {
                style = style.add_modifier(Modifier::DIM);
            }
        }
        if let Some(t) = animations.merging(tile.id, now) {
            if t < 0.6 {
                style = style.add_modifier(Modifier::REVERSED);
            }
        }

        Paragraph::new(Line::from(tile.value.to_string()))
            .alignment(Alignment::Center)
            .style(style)
            .block(Block::default().borders(Borders::ALL))
    }

    fn render_stats(&self, view: &GameView, metrics: &GameMetrics) -> Paragraph<'_> {
        let best = metrics.best_tile.max(view.highest_tile());
        let text = vec![Line::from(vec![
            Span::styled("Moves: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                view.moves.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Best: ", Style::default().fg(Color::Yellow)),
            Span::styled(best.to_string(), Style::default().fg(Color::White)),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_defeat(&self, frame: &mut Frame, area: Rect, view: &GameView) {
        let panel = centered(area, 38, 7);
        frame.render_widget(Clear, panel);

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "NO MOVES LEFT",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(vec![
                Span::styled("Highest tile: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    view.highest_tile().to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        let panel_widget = Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
        frame.render_widget(panel_widget, panel);
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// The classic tile palette, darkening as values climb.
fn tile_colors(value: u32) -> (Color, Color) {
    match value {
        2 => (Color::Black, Color::Rgb(238, 228, 218)),
        4 => (Color::Black, Color::Rgb(237, 224, 200)),
        8 => (Color::White, Color::Rgb(242, 177, 121)),
        16 => (Color::White, Color::Rgb(245, 149, 99)),
        32 => (Color::White, Color::Rgb(246, 124, 95)),
        64 => (Color::White, Color::Rgb(246, 94, 59)),
        128 => (Color::White, Color::Rgb(237, 207, 114)),
        256 => (Color::White, Color::Rgb(237, 204, 97)),
        512 => (Color::White, Color::Rgb(237, 200, 80)),
        1024 => (Color::White, Color::Rgb(237, 197, 63)),
        2048 => (Color::White, Color::Rgb(237, 194, 46)),
        _ => (Color::White, Color::Rgb(60, 58, 50)),
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
