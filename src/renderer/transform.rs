//! Cube position and orientation
//!
//! Position integrates discrete per-frame steps; orientation is a rotation
//! matrix that every frame's axis rotations are multiplied onto.

use super::input::{ControlPair, InputState};
use glam::{Mat4, Vec3};

/// Mutable model state, updated once per frame from an [`InputState`].
#[derive(Debug, Clone, PartialEq)]
pub struct TransformState {
    position: Vec3,
    rotation: Mat4,
}

impl TransformState {
    /// Start at `position` with no rotation.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Mat4::IDENTITY,
        }
    }

    /// Step the position by `speed` along x (left/right) and z (forward/back).
    pub fn apply_movement(&mut self, input: &InputState, speed: f32) {
        self.position.x += input.axis(ControlPair::LATERAL) * speed;
        self.position.z += input.axis(ControlPair::DEPTH) * speed;
    }

    /// Compose a `speed` radian rotation per held axis onto the current
    /// rotation, x then y then z.
    pub fn apply_rotation(&mut self, input: &InputState, speed: f32) {
        let steps: [(ControlPair, fn(f32) -> Mat4); 3] = [
            (ControlPair::ROTATE_X, Mat4::from_rotation_x),
            (ControlPair::ROTATE_Y, Mat4::from_rotation_y),
            (ControlPair::ROTATE_Z, Mat4::from_rotation_z),
        ];

        for (pair, rotation) in steps {
            let direction = input.axis(pair);
            if direction != 0.0 {
                self.rotation *= rotation(direction * speed);
            }
        }
    }

    /// Movement then rotation, as one frame's update.
    pub fn update(&mut self, input: &InputState, move_speed: f32, rotate_speed: f32) {
        self.apply_movement(input, move_speed);
        self.apply_rotation(input, rotate_speed);
    }

    /// `translate(identity, position) * rotation`, rebuilt from scratch.
    pub fn model_view_matrix(&self) -> Mat4 {
        let mut model_view = Mat4::IDENTITY;
        model_view *= Mat4::from_translation(self.position);
        model_view *= self.rotation;
        model_view
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Mat4 {
        self.rotation
    }
}

impl Default for TransformState {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, -5.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::input::Control;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_movement_directions() {
        let mut state = TransformState::new(Vec3::ZERO);
        state.apply_movement(&InputState::new().with(Control::MoveRight), 0.5);
        state.apply_movement(&InputState::new().with(Control::MoveForward), 0.25);
        assert_eq!(state.position(), Vec3::new(0.5, 0.0, -0.25));

        state.apply_movement(&InputState::new().with(Control::MoveLeft), 0.5);
        state.apply_movement(&InputState::new().with(Control::MoveBack), 0.25);
        assert_eq!(state.position(), Vec3::ZERO);
    }

    #[test]
    fn test_movement_tie_break_is_negative_control() {
        let start = Vec3::new(1.0, 2.0, 3.0);
        let pairs = [
            (Control::MoveLeft, Control::MoveRight),
            (Control::MoveForward, Control::MoveBack),
        ];

        for (negative, positive) in pairs {
            let mut both = TransformState::new(start);
            both.apply_movement(&InputState::from_controls(&[positive, negative]), 0.1);

            let mut only_negative = TransformState::new(start);
            only_negative.apply_movement(&InputState::new().with(negative), 0.1);

            assert_eq!(both.position(), only_negative.position());
            assert_ne!(both.position(), start);
        }
    }

    #[test]
    fn test_movement_is_unbounded() {
        let mut state = TransformState::new(Vec3::ZERO);
        let input = InputState::new().with(Control::MoveForward);
        for _ in 0..10_000 {
            state.apply_movement(&input, 1.0);
        }
        assert!((state.position().z + 10_000.0).abs() < 0.001);
    }

    #[test]
    fn test_rotation_tie_break_is_negative_control() {
        let pairs = [
            (Control::RotateXNegative, Control::RotateXPositive),
            (Control::RotateYNegative, Control::RotateYPositive),
            (Control::RotateZNegative, Control::RotateZPositive),
        ];

        for (negative, positive) in pairs {
            let mut both = TransformState::default();
            both.apply_rotation(&InputState::from_controls(&[negative, positive]), 0.3);

            let mut only_negative = TransformState::default();
            only_negative.apply_rotation(&InputState::new().with(negative), 0.3);

            assert_eq!(both.rotation(), only_negative.rotation());
            assert_ne!(both.rotation(), Mat4::IDENTITY);
        }
    }

    #[test]
    fn test_held_rotation_accumulates_then_freezes() {
        let mut state = TransformState::default();
        let held = InputState::new().with(Control::RotateXPositive);

        let mut expected = Mat4::IDENTITY;
        for _ in 0..10 {
            state.apply_rotation(&held, 0.1);
            expected *= Mat4::from_rotation_x(0.1);
        }
        assert!(state.rotation().abs_diff_eq(expected, 1e-5));
        assert!(state.rotation().abs_diff_eq(Mat4::from_rotation_x(1.0), 1e-5));

        let frozen = state.rotation();
        for _ in 0..5 {
            state.update(&InputState::new(), 0.1, 0.1);
        }
        assert_eq!(state.rotation(), frozen);
    }

    #[test]
    fn test_rotation_axis_order_within_frame() {
        let mut state = TransformState::default();
        let input = InputState::from_controls(&[
            Control::RotateZPositive,
            Control::RotateXPositive,
            Control::RotateYNegative,
        ]);
        state.apply_rotation(&input, 0.2);

        let expected =
            Mat4::from_rotation_x(0.2) * Mat4::from_rotation_y(-0.2) * Mat4::from_rotation_z(0.2);
        assert!(state.rotation().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn test_model_view_translates_then_rotates() {
        let mut state = TransformState::new(Vec3::new(1.0, 2.0, -5.0));
        state.apply_rotation(&InputState::new().with(Control::RotateYPositive), FRAC_PI_2);

        let model_view = state.model_view_matrix();
        let corner = model_view.transform_point3(Vec3::ONE);

        // R_y(90°) takes (1, 1, 1) to (1, 1, -1), then the translation applies.
        assert!(corner.abs_diff_eq(Vec3::new(2.0, 3.0, -6.0), 1e-5));

        let expected = Mat4::from_translation(state.position()) * state.rotation();
        assert_eq!(model_view, expected);

        // Rotating after translating would swing the cube around the origin.
        let reversed = (state.rotation() * Mat4::from_translation(state.position()))
            .transform_point3(Vec3::ONE);
        assert!(!reversed.abs_diff_eq(corner, 0.1));
    }

    #[test]
    fn test_single_frame_y_rotation_end_to_end() {
        let mut state = TransformState::new(Vec3::new(0.0, 0.0, -5.0));
        state.update(
            &InputState::new().with(Control::RotateYPositive),
            0.05,
            0.01,
        );

        let rotated = state.rotation().transform_point3(Vec3::X);
        let expected = Mat4::from_rotation_y(0.01).transform_point3(Vec3::X);
        assert!(rotated.abs_diff_eq(expected, 1e-6));
        assert_eq!(state.position(), Vec3::new(0.0, 0.0, -5.0));
    }
}
