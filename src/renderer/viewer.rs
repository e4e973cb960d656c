//! Viewport and projection

use crate::error::SetupError;
use glam::Mat4;

/// Viewport information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// A viewport covering a `width` x `height` surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// Get the aspect ratio.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
}

impl Projection {
    /// Checked perspective projection.
    pub fn perspective(
        fov_degrees: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Result<Self, SetupError> {
        let valid = fov_degrees > 0.0
            && fov_degrees < 180.0
            && aspect.is_finite()
            && aspect > 0.0
            && near > 0.0
            && far.is_finite()
            && far > near;

        if !valid {
            return Err(SetupError::InvalidProjection {
                fov_degrees,
                aspect,
                near,
                far,
            });
        }

        Ok(Self {
            fov_degrees,
            aspect,
            near,
            far,
        })
    }

    /// Get the projection matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_viewport_aspect() {
        assert!((Viewport::new(1280, 720).aspect() - 16.0 / 9.0).abs() < 0.0001);
    }

    #[test]
    fn test_rejects_invalid_planes() {
        assert!(Projection::perspective(45.0, 1.5, 0.0, 100.0).is_err());
        assert!(Projection::perspective(45.0, 1.5, 10.0, 10.0).is_err());
        assert!(Projection::perspective(45.0, 1.5, 10.0, 1.0).is_err());
        assert!(Projection::perspective(0.0, 1.5, 1.0, 100.0).is_err());
        assert!(Projection::perspective(45.0, Viewport::new(640, 0).aspect(), 1.0, 100.0).is_err());
        assert!(Projection::perspective(45.0, 1.5, 1.0, 1000.0).is_ok());
    }

    #[test]
    fn test_cube_in_front_of_camera_is_visible() {
        let projection = Projection::perspective(45.0, 1.0, 1.0, 1000.0).unwrap();
        let clip = projection.matrix() * Vec3::new(0.0, 0.0, -5.0).extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
