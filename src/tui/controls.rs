//! Keyboard input handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::runtime::App;

/// Maps a key event to an application action.
///
/// Guards on [`KeyEventKind::Press`] to avoid double-fire on some terminals.
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit = true,
        KeyCode::Char(' ') => app.toggle_pause(),
        KeyCode::Char('+' | '=') | KeyCode::Right => app.speed_up(),
        KeyCode::Char('-') | KeyCode::Left => app.speed_down(),
        KeyCode::Char('r') => app.restart(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScenarioConfig;

    #[test]
    fn keys_drive_the_app() {
        let mut app = App::new(ScenarioConfig::apogaea().to_simulation_config());
        handle_key(&mut app, KeyEvent::from(KeyCode::Char(' ')));
        assert!(app.paused);
        let speed = app.speed_idx;
        handle_key(&mut app, KeyEvent::from(KeyCode::Right));
        assert_eq!(app.speed_idx, speed + 1);
        handle_key(&mut app, KeyEvent::from(KeyCode::Char('q')));
        assert!(app.quit);
    }
}
