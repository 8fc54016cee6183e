//! Terminal input translated into game commands.
//!
//! Space, Up, Enter and a left click are all the same "activate" input: a
//! jump while playing, otherwise the button on the current screen.

use crate::config::GameConfig;
use crate::core::game_loop::Command;
use crate::core::viewport::Viewport;
use crate::ui::play_area;
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

/// Map a key press to a command. Releases and repeats are ignored so a held
/// key does not jump every frame.
pub fn map_key(key: KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => Some(Command::Activate),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Command::TogglePause),
        KeyCode::Char('m') | KeyCode::Char('M') => Some(Command::ToggleAudio),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

fn map_mouse(mouse: MouseEvent) -> Option<Command> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Command::Activate),
        _ => None,
    }
}

/// Logical viewport for a terminal of `cols` x `rows` cells.
pub fn viewport_for_terminal(cols: u16, rows: u16, config: &GameConfig) -> Viewport {
    let field = play_area(Rect::new(0, 0, cols, rows));
    Viewport::for_terminal(
        field.width,
        field.height,
        config.field_height,
        config.ground_height,
    )
}

/// Map any terminal event to a command.
pub fn map_event(event: Event, config: &GameConfig) -> Option<Command> {
    match event {
        Event::Key(key) => map_key(key),
        Event::Mouse(mouse) => map_mouse(mouse),
        Event::FocusLost => Some(Command::FocusLost),
        Event::FocusGained => Some(Command::FocusGained),
        Event::Resize(cols, rows) => {
            Some(Command::Resize(viewport_for_terminal(cols, rows, config)))
        }
        _ => None,
    }
}
