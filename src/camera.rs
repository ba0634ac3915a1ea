use crate::config::CameraConfig;
use glam::{Mat4, Vec3};

/// Perspective camera described by a position and yaw/pitch angles.
///
/// Yaw 0 looks down -Z; positive yaw turns left (counter-clockwise seen from
/// above). The aspect ratio follows the window and is updated on resize.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub yaw_degrees: f32,
    pub pitch_degrees: f32,
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    aspect_ratio: f32,
}

impl Camera {
    pub fn new(config: &CameraConfig, aspect_ratio: f32) -> Self {
        let mut camera = Camera {
            position: config.position,
            yaw_degrees: 0.0,
            pitch_degrees: 0.0,
            fov_y_degrees: config.fov_y_degrees,
            near: config.near,
            far: config.far,
            aspect_ratio: 1.0,
        };
        camera.set_aspect_ratio(aspect_ratio);
        camera
    }

    /// Ignores non-finite or non-positive ratios (a minimised window reports
    /// a zero height).
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
            self.aspect_ratio = aspect_ratio;
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    /// Unit vector the camera looks along.
    pub fn forward(&self) -> Vec3 {
        let yaw = self.yaw_degrees.to_radians();
        let pitch = self.pitch_degrees.to_radians();
        Vec3::new(-yaw.sin() * pitch.cos(), pitch.sin(), -yaw.cos() * pitch.cos())
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.fov_y_degrees.to_radians(),
            self.aspect_ratio,
            self.near,
            self.far,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_forward_is_negative_z() {
        let camera = Camera::new(&CameraConfig::default(), 16.0 / 9.0);
        assert!(camera.forward().abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }

    #[test]
    fn test_yaw_turns_left() {
        let mut camera = Camera::new(&CameraConfig::default(), 1.0);
        camera.yaw_degrees = 90.0;
        assert!(camera.forward().abs_diff_eq(Vec3::NEG_X, 1e-6));
    }

    #[test]
    fn test_invalid_aspect_ignored() {
        let mut camera = Camera::new(&CameraConfig::default(), 2.0);
        camera.set_aspect_ratio(0.0);
        camera.set_aspect_ratio(f32::NAN);
        assert_eq!(camera.aspect_ratio(), 2.0);
    }

    #[test]
    fn test_point_ahead_projects_inside_clip_volume() {
        let camera = Camera::new(&CameraConfig::default(), 1.0);
        let ahead = camera.position + camera.forward() * 5.0;
        let clip = camera.projection_matrix() * camera.view_matrix() * ahead.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(clip.w > 0.0);
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
    }
}
