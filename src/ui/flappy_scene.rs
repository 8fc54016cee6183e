//! Game screen: scaled play field, status bar, info panel and the overlay
//! for whichever menu screen is up.

use crate::core::game_loop::FrameView;
use crate::core::game_state::{GameSession, GameState};
use crate::ui::game_common::{
    create_game_layout, render_info_panel_frame, render_modal, render_status_bar, Controls, Modal,
    StatusLine,
};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Rotation (degrees) past which the bird is drawn climbing or diving.
const CLIMB_GLYPH_DEG: f64 = -10.0;
const DIVE_GLYPH_DEG: f64 = 20.0;

/// What occupies one terminal cell of the play field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCell {
    Sky,
    Pipe,
    /// First and last row of a gap.
    GapEdge,
    /// Marks a pipe that is still worth a point.
    PointMarker,
    Ground,
    Bird(char),
}

/// Bird glyph for a tilt in degrees.
pub fn bird_glyph(rotation: f64) -> char {
    if rotation < CLIMB_GLYPH_DEG {
        '▲' // Flapping up
    } else if rotation > DIVE_GLYPH_DEG {
        '▼' // Falling fast
    } else {
        '►'
    }
}

/// Rasterize the session's field into `width` x `height` cells.
///
/// The logical field is stretched to fill the area, so a row covers
/// `viewport.height / height` units.
pub fn paint_field(session: &GameSession, width: u16, height: u16) -> Vec<Vec<FieldCell>> {
    let (width, height) = (width as usize, height as usize);
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let viewport = session.viewport();
    let to_col = |x: f64| x * width as f64 / viewport.width;
    let to_row = |y: f64| y * height as f64 / viewport.height;
    let clamp_row = |row: f64| (row.max(0.0) as usize).min(height);
    let clamp_col = |col: f64| (col.max(0.0) as usize).min(width);

    let ground_row = clamp_row(to_row(viewport.ground_y()).floor());
    let mut grid: Vec<Vec<FieldCell>> = (0..height)
        .map(|row| {
            let cell = if row >= ground_row {
                FieldCell::Ground
            } else {
                FieldCell::Sky
            };
            vec![cell; width]
        })
        .collect();

    for pipe in session.obstacles() {
        let first_col = clamp_col(to_col(pipe.x).floor());
        let end_col = clamp_col(to_col(pipe.right()).ceil());
        if first_col >= end_col {
            continue;
        }

        let top_end = clamp_row(to_row(pipe.top_height).ceil()).min(ground_row);
        let bottom_start = clamp_row(to_row(pipe.bottom_y).floor()).min(ground_row);

        for (row, cells) in grid.iter_mut().enumerate().take(ground_row) {
            let cell = if row < top_end || row >= bottom_start {
                FieldCell::Pipe
            } else if row == top_end || row + 1 == bottom_start {
                FieldCell::GapEdge
            } else {
                continue;
            };
            cells[first_col..end_col].fill(cell);
        }

        if !pipe.scored {
            let row = clamp_row(to_row(pipe.gap_center()).floor());
            let col = (first_col + end_col) / 2;
            if row < ground_row && col < width && grid[row][col] != FieldCell::Pipe {
                grid[row][col] = FieldCell::PointMarker;
            }
        }
    }

    let bird = &session.bird;
    let bird_row = to_row(bird.y + bird.height / 2.0).floor();
    let bird_col = to_col(bird.x + bird.width / 2.0).floor();
    if bird_row >= 0.0 && bird_col >= 0.0 {
        let (row, col) = (bird_row as usize, bird_col as usize);
        if row < height && col < width {
            grid[row][col] = FieldCell::Bird(bird_glyph(bird.rotation));
        }
    }

    grid
}

/// Render the whole game screen.
pub fn render_flappy(frame: &mut Frame, area: Rect, view: &FrameView<'_>) {
    let layout = create_game_layout(frame, area, " Flappy Bird ", Color::Cyan);

    render_play_area(frame, layout.content, view);
    render_status_bar(frame, layout.status_bar, &status_line(view.session));
    render_info_panel(frame, layout.info_panel, view);
    render_overlay(frame, area, view.session);
}

fn cell_span(cell: FieldCell, flash: bool) -> Span<'static> {
    let sky = if flash {
        Style::default().bg(Color::Red)
    } else {
        Style::default()
    };
    match cell {
        FieldCell::Sky => Span::styled(" ", sky),
        FieldCell::Pipe => Span::styled("█", Style::default().fg(Color::Green)),
        FieldCell::GapEdge => Span::styled("░", sky.fg(Color::DarkGray)),
        FieldCell::PointMarker => Span::styled("1", sky.fg(Color::Yellow)),
        FieldCell::Ground => Span::styled("▓", Style::default().fg(Color::Rgb(210, 185, 110))),
        FieldCell::Bird(glyph) => Span::styled(
            glyph.to_string(),
            sky.fg(if flash { Color::White } else { Color::Yellow })
                .add_modifier(Modifier::BOLD),
        ),
    }
}

/// Render the play field row by row.
fn render_play_area(frame: &mut Frame, area: Rect, view: &FrameView<'_>) {
    let lines: Vec<Line> = paint_field(view.session, area.width, area.height)
        .into_iter()
        .map(|row| {
            Line::from(
                row.into_iter()
                    .map(|cell| cell_span(cell, view.flash))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

const PLAY_CONTROLS: Controls = &[
    ("[Space/Click]", "Flap"),
    ("[P]", "Pause"),
    ("[M]", "Audio"),
    ("[Q]", "Quit"),
];

/// Status bar message and key hints for the session's screen.
pub fn status_line(session: &GameSession) -> StatusLine {
    let (message, color, controls): (String, Color, Controls) = match session.state() {
        GameState::Start => (
            format!("Pass {} pipes to win", session.max_score()),
            Color::Cyan,
            &[("[Enter]", "Start"), ("[M]", "Audio"), ("[Q]", "Quit")],
        ),
        GameState::Playing if !session.game_started() => {
            ("Press Space to flap!".into(), Color::Yellow, PLAY_CONTROLS)
        }
        GameState::Playing => (
            format!("Score: {} / {}", session.score(), session.max_score()),
            Color::Green,
            PLAY_CONTROLS,
        ),
        GameState::Paused => (
            "Paused".into(),
            Color::Yellow,
            &[("[Enter/P]", "Resume"), ("[Q]", "Quit")],
        ),
        GameState::GameOver => (
            "Out of lives".into(),
            Color::Red,
            &[("[Enter]", "Restart"), ("[Q]", "Quit")],
        ),
        GameState::Win => (
            "Every pipe cleared!".into(),
            Color::Green,
            &[("[Enter]", "Play Again"), ("[Q]", "Quit")],
        ),
    };
    StatusLine {
        message,
        color,
        controls,
    }
}

/// Filled and empty hearts for the remaining lives.
pub fn hearts(lives: u32, starting_lives: u32) -> String {
    let lost = starting_lives.saturating_sub(lives) as usize;
    format!("{}{}", "♥".repeat(lives as usize), "♡".repeat(lost))
}

/// Render the info panel on the right.
fn render_info_panel(frame: &mut Frame, area: Rect, view: &FrameView<'_>) {
    let border = if view.flash { Color::Red } else { Color::DarkGray };
    let inner = render_info_panel_frame(frame, area, " Flight ", border);

    if inner.height < 2 || inner.width < 4 {
        return;
    }

    let session = view.session;
    let score_style = if view.pulse {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(" Score: ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("{}", session.score()), score_style),
        ]),
        Line::from(vec![
            Span::styled(" Target: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", session.max_score()),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        Line::from(vec![
            Span::styled(" Lives: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                hearts(session.lives(), session.starting_lives()),
                Style::default().fg(Color::Red),
            ),
        ]),
        Line::from(vec![
            Span::styled(" Best: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{}", session.high_score()),
                Style::default().fg(Color::Cyan),
            ),
        ]),
        Line::from(vec![
            Span::styled(" Audio: ", Style::default().fg(Color::DarkGray)),
            if view.audio_enabled {
                Span::styled("♪ On", Style::default().fg(Color::Green))
            } else {
                Span::styled("✕ Off", Style::default().fg(Color::DarkGray))
            },
        ]),
        Line::from(""),
    ];

    // Progress bar
    let progress = (session.score() as f64 / session.max_score().max(1) as f64).min(1.0);
    let bar_width = (inner.width as usize).saturating_sub(2);
    let filled = (progress * bar_width as f64) as usize;
    let empty = bar_width.saturating_sub(filled);

    lines.push(Line::from(Span::styled(
        " Progress:",
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(vec![
        Span::raw(" "),
        Span::styled("█".repeat(filled), Style::default().fg(Color::Green)),
        Span::styled("░".repeat(empty), Style::default().fg(Color::DarkGray)),
    ]));

    frame.render_widget(Paragraph::new(lines), inner);
}

fn new_best_line() -> Line<'static> {
    Line::from(Span::styled("New best!", Style::default().fg(Color::Yellow)))
}

fn body_line(text: String) -> Line<'static> {
    Line::from(Span::styled(text, Style::default().fg(Color::White)))
}

/// Menu overlay for the start, pause and end screens.
fn render_overlay(frame: &mut Frame, area: Rect, session: &GameSession) {
    let modal = match session.state() {
        GameState::Playing => return,
        GameState::Start => Modal {
            title: "FLAPPY BIRD",
            color: Color::Cyan,
            body: vec![
                body_line("Fly through the gaps between pipes.".to_string()),
                body_line(format!("Pass {} pipes to win.", session.max_score())),
                body_line(format!("You have {} lives.", session.starting_lives())),
                body_line(format!("Best: {}", session.high_score())),
            ],
            button: "[ Start ]",
        },
        GameState::Paused => Modal {
            title: "PAUSED",
            color: Color::Yellow,
            body: vec![body_line(format!(
                "Score: {} / {}",
                session.score(),
                session.max_score()
            ))],
            button: "[ Resume ]",
        },
        GameState::GameOver => {
            let mut body = vec![
                body_line(format!("You passed {} pipes.", session.score())),
                body_line(format!("Best: {}", session.high_score())),
            ];
            if session.is_new_high_score() {
                body.push(new_best_line());
            }
            Modal {
                title: "GAME OVER",
                color: Color::Red,
                body,
                button: "[ Restart ]",
            }
        }
        GameState::Win => {
            let mut body = vec![
                body_line(format!("You passed all {} pipes!", session.max_score())),
                body_line(format!("Best: {}", session.high_score())),
            ];
            if session.is_new_high_score() {
                body.push(new_best_line());
            }
            Modal {
                title: "YOU WIN!",
                color: Color::Green,
                body,
                button: "[ Play Again ]",
            }
        }
    };

    render_modal(frame, area, modal);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::core::obstacles::Obstacle;
    use crate::core::game_state::StartTrigger;
    use crate::utils::persistence::Records;

    fn session() -> GameSession {
        GameSession::new(GameConfig::default(), Records::in_memory()).unwrap()
    }

    #[test]
    fn test_bird_glyph_follows_tilt() {
        assert_eq!(bird_glyph(-25.0), '▲');
        assert_eq!(bird_glyph(0.0), '►');
        assert_eq!(bird_glyph(32.0), '▼');
    }

    #[test]
    fn test_hearts() {
        assert_eq!(hearts(3, 3), "♥♥♥");
        assert_eq!(hearts(1, 3), "♥♡♡");
        assert_eq!(hearts(0, 3), "♡♡♡");
    }

    #[test]
    fn test_field_has_ground_and_bird() {
        let session = session();
        // 1280x800 field on 64x40 cells: 20 units per cell
        let grid = paint_field(&session, 64, 40);
        assert_eq!(grid.len(), 40);
        // Ground starts at y=700 -> row 35
        assert_eq!(grid[34][0], FieldCell::Sky);
        assert_eq!(grid[35][0], FieldCell::Ground);
        // Bird centre (167.5, 417.5) -> col 8, row 20
        assert_eq!(grid[20][8], FieldCell::Bird('►'));
    }

    #[test]
    fn test_field_draws_pipe_segments_and_marker() {
        let mut session = session();
        session.start(StartTrigger::Start);
        session
            .obstacles
            .obstacles
            .push(Obstacle::new(600.0, 70.0, 200.0, 180.0, 700.0));
        let grid = paint_field(&session, 64, 40);

        // Columns 30..34, top segment rows 0..10, bottom from row 19
        assert_eq!(grid[0][30], FieldCell::Pipe);
        assert_eq!(grid[9][33], FieldCell::Pipe);
        assert_eq!(grid[10][31], FieldCell::GapEdge);
        assert_eq!(grid[14][30], FieldCell::Sky);
        assert_eq!(grid[14][32], FieldCell::PointMarker);
        assert_eq!(grid[19][30], FieldCell::Pipe);
        assert_eq!(grid[35][30], FieldCell::Ground);
        assert_eq!(grid[14][34], FieldCell::Sky);
    }

    #[test]
    fn test_scored_pipe_has_no_marker() {
        let mut session = session();
        let mut pipe = Obstacle::new(600.0, 70.0, 200.0, 180.0, 700.0);
        pipe.scored = true;
        session.obstacles.obstacles.push(pipe);
        let grid = paint_field(&session, 64, 40);
        assert!(grid
            .iter()
            .all(|row| !row.contains(&FieldCell::PointMarker)));
    }

    #[test]
    fn test_offscreen_pipe_is_clipped() {
        let mut session = session();
        session
            .obstacles
            .obstacles
            .push(Obstacle::new(1270.0, 70.0, 200.0, 180.0, 700.0));
        let grid = paint_field(&session, 64, 40);
        assert_eq!(grid[0][63], FieldCell::Pipe);
        assert_eq!(grid[0].len(), 64);
    }

    #[test]
    fn test_status_line_per_screen() {
        let mut session = session();
        let status = status_line(&session);
        assert_eq!(status.message, "Pass 10 pipes to win");
        assert_eq!(status.controls[0], ("[Enter]", "Start"));

        session.start(StartTrigger::Start);
        assert_eq!(status_line(&session).message, "Press Space to flap!");
        session.activate();
        session.on_score();
        let status = status_line(&session);
        assert_eq!(status.message, "Score: 1 / 10");
        assert_eq!(status.color, Color::Green);

        session.pause();
        assert_eq!(status_line(&session).controls[0], ("[Enter/P]", "Resume"));
    }

    #[test]
    fn test_empty_area_paints_nothing() {
        assert!(paint_field(&session(), 0, 10).is_empty());
    }
}
