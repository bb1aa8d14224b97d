//! Keyboard mapping
//!
//! Keys are matched on their physical code (`KeyboardEvent.code`), so WASD
//! stays in place on AZERTY and other layouts.

use crate::sim::tick::MoveIntent;

/// Movement direction bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// What a key does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Move(Direction),
    Pause,
}

/// Map a physical key code to its action
pub fn action_for_code(code: &str) -> Option<KeyAction> {
    let action = match code {
        "KeyW" | "ArrowUp" => KeyAction::Move(Direction::Up),
        "KeyS" | "ArrowDown" => KeyAction::Move(Direction::Down),
        "KeyA" | "ArrowLeft" => KeyAction::Move(Direction::Left),
        "KeyD" | "ArrowRight" => KeyAction::Move(Direction::Right),
        "Escape" | "KeyP" => KeyAction::Pause,
        _ => return None,
    };
    Some(action)
}

impl MoveIntent {
    /// Press or release one direction
    pub fn set(&mut self, direction: Direction, held: bool) {
        match direction {
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_wasd_and_arrows() {
        assert_eq!(action_for_code("KeyW"), Some(KeyAction::Move(Direction::Up)));
        assert_eq!(action_for_code("ArrowUp"), Some(KeyAction::Move(Direction::Up)));
        assert_eq!(action_for_code("KeyA"), Some(KeyAction::Move(Direction::Left)));
        assert_eq!(action_for_code("ArrowRight"), Some(KeyAction::Move(Direction::Right)));
        assert_eq!(action_for_code("KeyS"), Some(KeyAction::Move(Direction::Down)));
    }

    #[test]
    fn test_pause_keys() {
        assert_eq!(action_for_code("Escape"), Some(KeyAction::Pause));
        assert_eq!(action_for_code("KeyP"), Some(KeyAction::Pause));
    }

    #[test]
    fn test_characters_are_not_codes() {
        // `key` values must not be accepted in place of `code`
        assert_eq!(action_for_code("w"), None);
        assert_eq!(action_for_code("Space"), None);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut intent = MoveIntent::default();
        intent.set(Direction::Left, true);
        intent.set(Direction::Right, true);
        intent.set(Direction::Up, true);
        assert_eq!(intent.vector(), Vec2::new(0.0, -1.0));
        intent.set(Direction::Up, false);
        assert!(intent.is_idle());
    }
}
