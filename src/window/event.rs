//! Keyboard input
//!
//! Maps winit logical keys to the named controls the renderer reads.

use crate::renderer::input::{Control, InputState};

/// Keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    // Letters
    A,
    D,
    E,
    Q,
    S,
    W,

    // Special keys
    Escape,

    // Arrow keys
    Left,
    Right,
    Up,
    Down,
}

impl Key {
    /// Convert from winit key.
    pub fn from_winit(key: &winit::keyboard::Key) -> Option<Self> {
        use winit::keyboard::{Key as WKey, NamedKey};

        match key {
            WKey::Character(c) => {
                let c = c.chars().next()?;
                match c.to_ascii_lowercase() {
                    'a' => Some(Key::A),
                    'd' => Some(Key::D),
                    'e' => Some(Key::E),
                    'q' => Some(Key::Q),
                    's' => Some(Key::S),
                    'w' => Some(Key::W),
                    _ => None,
                }
            }
            WKey::Named(named) => match named {
                NamedKey::Escape => Some(Key::Escape),
                NamedKey::ArrowLeft => Some(Key::Left),
                NamedKey::ArrowRight => Some(Key::Right),
                NamedKey::ArrowUp => Some(Key::Up),
                NamedKey::ArrowDown => Some(Key::Down),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Which key drives which control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    bindings: Vec<(Key, Control)>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            bindings: vec![
                (Key::A, Control::MoveLeft),
                (Key::D, Control::MoveRight),
                (Key::W, Control::MoveForward),
                (Key::S, Control::MoveBack),
                (Key::Up, Control::RotateXNegative),
                (Key::Down, Control::RotateXPositive),
                (Key::Left, Control::RotateYNegative),
                (Key::Right, Control::RotateYPositive),
                (Key::Q, Control::RotateZNegative),
                (Key::E, Control::RotateZPositive),
            ],
        }
    }
}

impl KeyBindings {
    /// Bindings with no keys assigned.
    pub fn empty() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// Bind `key` to `control`, replacing any previous binding of `key`.
    pub fn bind(mut self, key: Key, control: Control) -> Self {
        self.bindings.retain(|(bound, _)| *bound != key);
        self.bindings.push((key, control));
        self
    }

    /// The control `key` drives, if any.
    pub fn control_for(&self, key: Key) -> Option<Control> {
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == key)
            .map(|(_, control)| *control)
    }
}

/// Live control state, fed by key events between frames.
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    bindings: KeyBindings,
    state: InputState,
}

impl InputTracker {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            state: InputState::new(),
        }
    }

    /// Record a press or release. Returns the control it changed.
    pub fn key(&mut self, key: Key, pressed: bool) -> Option<Control> {
        let control = self.bindings.control_for(key)?;
        self.state.set(control, pressed);
        Some(control)
    }

    /// Release everything, e.g. when the window loses focus and releases
    /// would otherwise be missed.
    pub fn release_all(&mut self) {
        self.state.clear();
    }

    /// Snapshot for the next frame.
    pub fn snapshot(&self) -> InputState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::{Key as WKey, NamedKey};

    #[test]
    fn test_from_winit() {
        assert_eq!(Key::from_winit(&WKey::Character("w".into())), Some(Key::W));
        assert_eq!(Key::from_winit(&WKey::Character("Q".into())), Some(Key::Q));
        assert_eq!(Key::from_winit(&WKey::Named(NamedKey::ArrowUp)), Some(Key::Up));
        assert_eq!(Key::from_winit(&WKey::Character("z".into())), None);
        assert_eq!(Key::from_winit(&WKey::Named(NamedKey::Tab)), None);
    }

    #[test]
    fn test_default_bindings_cover_every_control() {
        let bindings = KeyBindings::default();
        let keys = [
            Key::A,
            Key::D,
            Key::W,
            Key::S,
            Key::Up,
            Key::Down,
            Key::Left,
            Key::Right,
            Key::Q,
            Key::E,
        ];
        let controls: Vec<_> = keys.iter().filter_map(|&k| bindings.control_for(k)).collect();
        assert_eq!(controls, Control::ALL.to_vec());
        assert_eq!(bindings.control_for(Key::Escape), None);
    }

    #[test]
    fn test_rebind_replaces() {
        let bindings = KeyBindings::default().bind(Key::A, Control::MoveRight);
        assert_eq!(bindings.control_for(Key::A), Some(Control::MoveRight));
        assert_eq!(bindings.control_for(Key::D), Some(Control::MoveRight));
    }

    #[test]
    fn test_tracker_snapshot_and_focus_loss() {
        let mut tracker = InputTracker::new(KeyBindings::default());
        assert_eq!(tracker.key(Key::W, true), Some(Control::MoveForward));
        assert_eq!(tracker.key(Key::Right, true), Some(Control::RotateYPositive));
        assert_eq!(tracker.key(Key::Escape, true), None);

        let snapshot = tracker.snapshot();
        tracker.key(Key::W, false);
        assert!(snapshot.is_active(Control::MoveForward));
        assert!(!tracker.snapshot().is_active(Control::MoveForward));

        tracker.release_all();
        assert!(tracker.snapshot().is_idle());
    }
}
