#![warn(missing_docs)]
//! View pose and projection for gaze raycasting.

mod frustum;

use glam::{EulerRot, Mat4, Quat, Vec3};

pub use frustum::Frustum;

/// Pitch is kept just short of straight up/down so yaw stays defined.
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// A ray in world space with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing `direction`.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at parameter `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// True when origin and direction are finite and the direction is unit length.
    pub fn is_valid(&self) -> bool {
        self.origin.is_finite() && self.direction.is_finite() && self.direction.is_normalized()
    }
}

/// Head (or viewer) camera: position, orientation and perspective projection.
///
/// Forward is local -Z, matching WebXR/OpenXR view space.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Orientation in world space.
    pub orientation: Quat,

    /// Vertical field of view in radians.
    pub fov: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
    /// Near clipping plane distance.
    pub near: f32,
    /// Far clipping plane distance.
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            fov: std::f32::consts::FRAC_PI_2, // 90 degrees
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 11.0,
        }
    }
}

impl Camera {
    /// Create a camera at `position` looking down -Z.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Builder: set the projection parameters.
    pub fn with_projection(mut self, fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        self.fov = fov;
        self.aspect = aspect;
        self.near = near;
        self.far = far;
        self
    }

    /// Builder: set orientation from yaw (around +Y) and pitch (around local +X), radians.
    pub fn with_yaw_pitch(mut self, yaw: f32, pitch: f32) -> Self {
        self.set_yaw_pitch(yaw, pitch);
        self
    }

    /// Replace the orientation with the given yaw and pitch (radians).
    ///
    /// Yaw 0 / pitch 0 looks down -Z; positive yaw turns left, positive pitch looks up.
    pub fn set_yaw_pitch(&mut self, yaw: f32, pitch: f32) {
        let pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.orientation = Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0);
    }

    /// Forward direction (where the camera is looking).
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    /// Compute the view matrix (world space -> camera space).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position).inverse()
    }

    /// Compute the projection matrix (camera space -> clip space).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// Compute the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// View frustum for visibility tests.
    pub fn frustum(&self) -> Frustum {
        Frustum::from_view_projection(&self.view_projection_matrix())
    }

    /// Ray through the center of the screen.
    ///
    /// Uses the forward axis when the orientation is well formed, otherwise
    /// unprojects the screen-center point and aims from the camera position.
    /// Returns `None` if neither construction yields a finite unit ray.
    pub fn center_ray(&self) -> Option<Ray> {
        let direct = Ray {
            origin: self.position,
            direction: self.forward(),
        };
        if direct.is_valid() {
            return Some(direct);
        }

        tracing::warn!(
            orientation = ?self.orientation,
            "degenerate camera orientation, unprojecting screen center"
        );
        let fallback = self.unprojected_center_ray();
        fallback.is_valid().then_some(fallback)
    }

    fn unprojected_center_ray(&self) -> Ray {
        let inv_view_proj = self.view_projection_matrix().inverse();
        let point = inv_view_proj.project_point3(Vec3::new(0.0, 0.0, 0.5));
        Ray::new(self.position, point - self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_default_initialization() {
        let camera = Camera::default();
        assert_eq!(camera.position, Vec3::ZERO);
        assert_eq!(camera.orientation, Quat::IDENTITY);
    }

    #[test]
    fn camera_forward_direction() {
        let camera = Camera::default();
        let forward = camera.forward();
        assert!(forward.x.abs() < 0.01);
        assert!(forward.y.abs() < 0.01);
        assert!((forward.z + 1.0).abs() < 0.01);
    }

    #[test]
    fn yaw_turns_left() {
        let camera = Camera::default().with_yaw_pitch(std::f32::consts::FRAC_PI_2, 0.0);
        let forward = camera.forward();
        assert!((forward.x + 1.0).abs() < 1e-4, "forward = {forward:?}");
    }

    #[test]
    fn pitch_is_clamped_short_of_vertical() {
        let camera = Camera::default().with_yaw_pitch(0.0, 10.0);
        let forward = camera.forward();
        assert!(forward.y < 1.0);
        assert!(forward.y > 0.99);
        assert!(forward.is_finite());
    }

    #[test]
    fn camera_matrices_are_valid() {
        let camera = Camera::default();

        let view = camera.view_matrix();
        let proj = camera.projection_matrix();
        let view_proj = camera.view_projection_matrix();

        assert!(view.to_cols_array().iter().all(|x| x.is_finite()));
        assert!(proj.to_cols_array().iter().all(|x| x.is_finite()));
        assert!(view_proj.to_cols_array().iter().all(|x| x.is_finite()));
    }

    #[test]
    fn center_ray_follows_forward() {
        let camera = Camera::new(Vec3::new(0.0, 1.0, 0.0));
        let ray = camera.center_ray().expect("ray");
        assert_eq!(ray.origin, Vec3::new(0.0, 1.0, 0.0));
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn center_ray_falls_back_on_unnormalized_orientation() {
        let mut camera = Camera::default();
        camera.orientation = Quat::from_xyzw(0.0, 0.0, 0.0, 2.0);
        let ray = camera.center_ray().expect("fallback ray");
        assert!(ray.is_valid());
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-3);
    }

    #[test]
    fn center_ray_none_when_fully_degenerate() {
        let mut camera = Camera::default();
        camera.position = Vec3::splat(f32::NAN);
        assert!(camera.center_ray().is_none());
    }
}
