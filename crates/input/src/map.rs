//! Key mapping from terminal events to bindings.

use crate::types::RepeatKey;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a physical key is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Held keys: immediate action, then delay and repeat
    Repeat(RepeatKey),
    /// Once per key-down
    Rotate,
    /// Once per key-down
    Pause,
    /// Start or restart the game
    Start,
}

impl Binding {
    /// Bindings honoured while the session is not running
    pub fn allowed_when_idle(&self) -> bool {
        matches!(self, Binding::Pause | Binding::Start)
    }
}

/// Map a key code to its binding.
pub fn binding_for(code: KeyCode) -> Option<Binding> {
    match code {
        // Movement
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(Binding::Repeat(RepeatKey::Left))
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(Binding::Repeat(RepeatKey::Right))
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(Binding::Repeat(RepeatKey::SoftDrop))
        }

        // Rotation
        KeyCode::Up
        | KeyCode::Char(' ')
        | KeyCode::Char('k')
        | KeyCode::Char('K')
        | KeyCode::Char('w')
        | KeyCode::Char('W') => Some(Binding::Rotate),

        // Lifecycle
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Binding::Pause),
        KeyCode::Enter => Some(Binding::Start),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_keys() {
        assert_eq!(binding_for(KeyCode::Left), Some(Binding::Repeat(RepeatKey::Left)));
        assert_eq!(binding_for(KeyCode::Right), Some(Binding::Repeat(RepeatKey::Right)));
        assert_eq!(binding_for(KeyCode::Down), Some(Binding::Repeat(RepeatKey::SoftDrop)));

        assert_eq!(binding_for(KeyCode::Char('H')), Some(Binding::Repeat(RepeatKey::Left)));
        assert_eq!(binding_for(KeyCode::Char('L')), Some(Binding::Repeat(RepeatKey::Right)));
        assert_eq!(binding_for(KeyCode::Char('J')), Some(Binding::Repeat(RepeatKey::SoftDrop)));
    }

    #[test]
    fn test_rotation_keys() {
        assert_eq!(binding_for(KeyCode::Up), Some(Binding::Rotate));
        assert_eq!(binding_for(KeyCode::Char(' ')), Some(Binding::Rotate));
        assert_eq!(binding_for(KeyCode::Char('W')), Some(Binding::Rotate));
    }

    #[test]
    fn test_lifecycle_keys() {
        assert_eq!(binding_for(KeyCode::Char('p')), Some(Binding::Pause));
        assert_eq!(binding_for(KeyCode::Char('P')), Some(Binding::Pause));
        assert_eq!(binding_for(KeyCode::Enter), Some(Binding::Start));
        assert!(Binding::Pause.allowed_when_idle());
        assert!(Binding::Start.allowed_when_idle());
        assert!(!Binding::Rotate.allowed_when_idle());
        assert!(!Binding::Repeat(RepeatKey::Left).allowed_when_idle());
    }

    #[test]
    fn test_unmapped_keys() {
        assert_eq!(binding_for(KeyCode::Char('x')), None);
        assert_eq!(binding_for(KeyCode::Tab), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::from(KeyCode::Esc)));
        assert!(should_quit(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('c'))));
    }
}
