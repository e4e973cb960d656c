//! Per-frame input snapshot
//!
//! The renderer never sees key codes, only which named controls are held.

/// A named boolean control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    MoveLeft,
    MoveRight,
    MoveForward,
    MoveBack,
    RotateXNegative,
    RotateXPositive,
    RotateYNegative,
    RotateYPositive,
    RotateZNegative,
    RotateZPositive,
}

impl Control {
    /// Every control, in declaration order.
    pub const ALL: [Control; 10] = [
        Control::MoveLeft,
        Control::MoveRight,
        Control::MoveForward,
        Control::MoveBack,
        Control::RotateXNegative,
        Control::RotateXPositive,
        Control::RotateYNegative,
        Control::RotateYPositive,
        Control::RotateZNegative,
        Control::RotateZPositive,
    ];

    fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// Two opposed controls driving one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlPair {
    /// Checked first; wins when both are held.
    pub negative: Control,
    pub positive: Control,
}

impl ControlPair {
    /// Lateral movement along x.
    pub const LATERAL: Self = Self::new(Control::MoveLeft, Control::MoveRight);
    /// Depth movement along z. Forward is into the screen (-z).
    pub const DEPTH: Self = Self::new(Control::MoveForward, Control::MoveBack);
    pub const ROTATE_X: Self = Self::new(Control::RotateXNegative, Control::RotateXPositive);
    pub const ROTATE_Y: Self = Self::new(Control::RotateYNegative, Control::RotateYPositive);
    pub const ROTATE_Z: Self = Self::new(Control::RotateZNegative, Control::RotateZPositive);

    pub const fn new(negative: Control, positive: Control) -> Self {
        Self { negative, positive }
    }
}

/// Immutable snapshot of every control, taken once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    active: u16,
}

impl InputState {
    /// A snapshot with nothing held.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot with the given controls held.
    pub fn from_controls(controls: &[Control]) -> Self {
        controls
            .iter()
            .fold(Self::default(), |state, &control| state.with(control))
    }

    /// Copy of this snapshot with `control` held.
    #[must_use]
    pub fn with(mut self, control: Control) -> Self {
        self.set(control, true);
        self
    }

    /// Update one control.
    pub fn set(&mut self, control: Control, active: bool) {
        if active {
            self.active |= control.bit();
        } else {
            self.active &= !control.bit();
        }
    }

    /// Release every control.
    pub fn clear(&mut self) {
        self.active = 0;
    }

    /// Whether `control` is held.
    pub fn is_active(&self, control: Control) -> bool {
        self.active & control.bit() != 0
    }

    /// Whether nothing is held.
    pub fn is_idle(&self) -> bool {
        self.active == 0
    }

    /// Direction of `pair`: -1, 0 or 1. The negative control is checked first.
    pub fn axis(&self, pair: ControlPair) -> f32 {
        if self.is_active(pair.negative) {
            -1.0
        } else if self.is_active(pair.positive) {
            1.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controls_are_independent() {
        for control in Control::ALL {
            let state = InputState::new().with(control);
            for other in Control::ALL {
                assert_eq!(state.is_active(other), other == control);
            }
        }
    }

    #[test]
    fn test_set_and_release() {
        let mut state = InputState::from_controls(&[Control::MoveLeft, Control::RotateZPositive]);
        assert!(state.is_active(Control::MoveLeft));
        state.set(Control::MoveLeft, false);
        assert!(!state.is_active(Control::MoveLeft));
        assert!(state.is_active(Control::RotateZPositive));
        state.clear();
        assert!(state.is_idle());
    }

    #[test]
    fn test_axis_negative_wins_tie() {
        let pairs = [
            ControlPair::LATERAL,
            ControlPair::DEPTH,
            ControlPair::ROTATE_X,
            ControlPair::ROTATE_Y,
            ControlPair::ROTATE_Z,
        ];
        for pair in pairs {
            let both = InputState::from_controls(&[pair.positive, pair.negative]);
            assert_eq!(both.axis(pair), -1.0);
            assert_eq!(InputState::new().with(pair.positive).axis(pair), 1.0);
            assert_eq!(InputState::new().axis(pair), 0.0);
        }
    }
}
