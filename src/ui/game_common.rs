//! Shared layout and widgets for the game screen.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Width of the info panel on the right.
pub const INFO_PANEL_WIDTH: u16 = 22;

/// Layout areas returned by `game_layout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameLayout {
    /// Play field - top left, inside outer border
    pub content: Rect,
    /// Status bar area (2 lines) - bottom left, inside outer border
    pub status_bar: Rect,
    /// Info panel area - right side, with its own border
    pub info_panel: Rect,
}

fn outer_block(title: &str, border_color: Color) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
}

/// Split an area into play field, status bar and info panel.
///
/// ```text
/// ┌─ Title ─────────────────────────┬─ Info ──────┐
/// │                                 │             │
/// │   [content area]                │  [info]     │
/// │                                 │             │
/// │ [status bar - 2 lines]          │             │
/// └─────────────────────────────────┴─────────────┘
/// ```
///
/// Pure: the same area always yields the same rectangles, so input handling
/// can size the logical field without drawing.
pub fn game_layout(area: Rect) -> GameLayout {
    let inner = outer_block("", Color::Reset).inner(area);

    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(INFO_PANEL_WIDTH)])
        .split(inner);

    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(2)])
        .split(h_chunks[0]);

    GameLayout {
        content: v_chunks[0],
        status_bar: v_chunks[1],
        info_panel: h_chunks[1],
    }
}

/// Clear the area, draw the outer border and return the layout inside it.
pub fn create_game_layout(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    border_color: Color,
) -> GameLayout {
    frame.render_widget(Clear, area);
    frame.render_widget(outer_block(title, border_color), area);
    game_layout(area)
}

/// Key hints as (key, action) pairs, e.g. `("[P]", "Pause")`.
pub type Controls = &'static [(&'static str, &'static str)];

/// What the status bar says for the current screen.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusLine {
    pub message: String,
    pub color: Color,
    pub controls: Controls,
}

/// Message on the first row, key hints on the second if there is room.
pub fn render_status_bar(frame: &mut Frame, area: Rect, status: &StatusLine) {
    if area.height == 0 {
        return;
    }

    let mut lines = vec![Line::from(Span::styled(
        status.message.as_str(),
        Style::default().fg(status.color),
    ))];
    if area.height >= 2 {
        let hints: Vec<Span> = status
            .controls
            .iter()
            .enumerate()
            .flat_map(|(i, (key, action))| {
                [
                    Span::raw(if i == 0 { "" } else { "  " }),
                    Span::styled(*key, Style::default().fg(Color::White)),
                    Span::styled(format!(" {}", action), Style::default().fg(Color::DarkGray)),
                ]
            })
            .collect();
        lines.push(Line::from(hints));
    }

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

/// Bordered side panel. Returns the area inside the border.
pub fn render_info_panel_frame(frame: &mut Frame, area: Rect, title: &str, border: Color) -> Rect {
    let block = outer_block(title, border);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// Content of a centered modal: a bold title, body lines and a button hint.
pub struct Modal<'a> {
    pub title: &'a str,
    pub color: Color,
    pub body: Vec<Line<'a>>,
    pub button: &'a str,
}

/// Render a centered modal box over the area, leaving the rest of the
/// screen visible behind it.
pub fn render_modal(frame: &mut Frame, area: Rect, modal: Modal<'_>) {
    let content_height = modal.body.len() as u16 + 4;
    let modal_height = (content_height + 2).min(area.height);
    let modal_width = 40u16.min(area.width);
    let x = area.x + (area.width.saturating_sub(modal_width)) / 2;
    let y = area.y + (area.height.saturating_sub(modal_height)) / 2;
    let modal_area = Rect::new(x, y, modal_width, modal_height);

    frame.render_widget(Clear, modal_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(modal.color));
    let inner = block.inner(modal_area);
    frame.render_widget(block, modal_area);

    let mut lines = vec![
        Line::from(Span::styled(
            modal.title,
            Style::default()
                .fg(modal.color)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(modal.body);
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        modal.button,
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::REVERSED),
    )));

    let text = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(text, inner);
}
