use crossterm::event::KeyCode;

use crate::app::App;
use crate::models::Tab;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    SelectTab(Tab),
    NextTab,
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Retry,
    None,
}

pub fn map_key(key: KeyCode) -> KeyAction {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('1') => KeyAction::SelectTab(Tab::Followers),
        KeyCode::Char('2') => KeyAction::SelectTab(Tab::Following),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => KeyAction::NextTab,
        KeyCode::Up | KeyCode::Char('k') => KeyAction::Up,
        KeyCode::Down | KeyCode::Char('j') => KeyAction::Down,
        KeyCode::PageUp => KeyAction::PageUp,
        KeyCode::PageDown | KeyCode::Char(' ') => KeyAction::PageDown,
        KeyCode::Home | KeyCode::Char('g') => KeyAction::Home,
        KeyCode::End | KeyCode::Char('G') => KeyAction::End,
        KeyCode::Char('r') => KeyAction::Retry,
        _ => KeyAction::None,
    }
}

/// Applies a key press to the app. Returns false when the app should exit.
pub fn handle_key(app: &mut App, key: KeyCode) -> bool {
    match map_key(key) {
        KeyAction::Quit => return false,
        KeyAction::SelectTab(tab) => app.select_tab(tab),
        KeyAction::NextTab => {
            let next = app.panel().snapshot().tab.other();
            app.select_tab(next);
        }
        KeyAction::Up => app.move_selection(-1),
        KeyAction::Down => app.move_selection(1),
        KeyAction::PageUp => app.move_selection(-(app.viewport_height() as isize)),
        KeyAction::PageDown => app.move_selection(app.viewport_height() as isize),
        KeyAction::Home => app.select_first(),
        KeyAction::End => app.select_last(),
        KeyAction::Retry => app.retry(),
        KeyAction::None => {}
    }
    true
}
