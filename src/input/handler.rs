use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Direction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Turn(Direction),
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Turn(Direction::Up),
            KeyCode::Down => KeyAction::Turn(Direction::Down),
            KeyCode::Left => KeyAction::Turn(Direction::Left),
            KeyCode::Right => KeyAction::Turn(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Turn(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Turn(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Turn(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Turn(Direction::Right),

            // Controls
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_movement_keys() {
        let handler = InputHandler::new();
        let bindings = [
            (KeyCode::Up, Direction::Up),
            (KeyCode::Down, Direction::Down),
            (KeyCode::Left, Direction::Left),
            (KeyCode::Right, Direction::Right),
            (KeyCode::Char('w'), Direction::Up),
            (KeyCode::Char('s'), Direction::Down),
            (KeyCode::Char('a'), Direction::Left),
            (KeyCode::Char('d'), Direction::Right),
        ];

        for (code, direction) in bindings {
            assert_eq!(
                handler.handle_key_event(press(code)),
                KeyAction::Turn(direction),
                "{code:?}"
            );
        }
    }

    #[test]
    fn test_wasd_uppercase() {
        let handler = InputHandler::new();

        let w_upper = KeyEvent::new(KeyCode::Char('W'), KeyModifiers::SHIFT);
        assert_eq!(
            handler.handle_key_event(w_upper),
            KeyAction::Turn(Direction::Up)
        );
    }

    #[test]
    fn test_quit_keys() {
        let handler = InputHandler::new();

        assert_eq!(handler.handle_key_event(press(KeyCode::Char('q'))), KeyAction::Quit);
        assert_eq!(handler.handle_key_event(press(KeyCode::Esc)), KeyAction::Quit);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_key_event(ctrl_c), KeyAction::Quit);
    }

    #[test]
    fn test_unbound_keys() {
        let handler = InputHandler::new();

        assert_eq!(handler.handle_key_event(press(KeyCode::Char('x'))), KeyAction::None);
        assert_eq!(handler.handle_key_event(press(KeyCode::Char('r'))), KeyAction::None);
        assert_eq!(handler.handle_key_event(press(KeyCode::Enter)), KeyAction::None);
    }
}
