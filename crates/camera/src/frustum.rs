//! View frustum built from a view-projection matrix.

use glam::{Mat4, Vec3, Vec4};

/// View frustum for visibility culling.
///
/// Planes are stored as `(normal, d)` with normals pointing inward, so a point
/// `p` is inside a plane when `normal.dot(p) + d >= 0`.
#[derive(Debug, Clone, Copy)]
pub struct Frustum {
    planes: [Vec4; 6],
}

impl Frustum {
    /// Extract the six planes from a right-handed, `[0, 1]` depth view-projection matrix.
    pub fn from_view_projection(view_projection: &Mat4) -> Self {
        let r0 = view_projection.row(0);
        let r1 = view_projection.row(1);
        let r2 = view_projection.row(2);
        let r3 = view_projection.row(3);

        let planes = [
            r3 + r0, // left
            r3 - r0, // right
            r3 + r1, // bottom
            r3 - r1, // top
            r2,      // near (depth 0)
            r3 - r2, // far
        ]
        .map(normalize_plane);

        Self { planes }
    }

    /// Test if a point lies inside (or on) the frustum.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes.iter().all(|p| signed_distance(*p, point) >= 0.0)
    }

    /// Test if a sphere touches the frustum.
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.planes
            .iter()
            .all(|p| signed_distance(*p, center) >= -radius)
    }

    /// Test if an AABB touches the frustum (positive-vertex test).
    pub fn contains_aabb(&self, min: Vec3, max: Vec3) -> bool {
        self.planes.iter().all(|p| {
            let positive = Vec3::new(
                if p.x >= 0.0 { max.x } else { min.x },
                if p.y >= 0.0 { max.y } else { min.y },
                if p.z >= 0.0 { max.z } else { min.z },
            );
            signed_distance(*p, positive) >= 0.0
        })
    }
}

fn normalize_plane(plane: Vec4) -> Vec4 {
    let len = plane.truncate().length();
    if len > f32::EPSILON {
        plane / len
    } else {
        plane
    }
}

fn signed_distance(plane: Vec4, point: Vec3) -> f32 {
    plane.truncate().dot(point) + plane.w
}

#[cfg(test)]
mod tests {
    use crate::Camera;
    use glam::Vec3;

    #[test]
    fn point_in_front_is_inside() {
        let frustum = Camera::default().frustum();
        assert!(frustum.contains_point(Vec3::new(0.0, 0.0, -5.0)));
    }

    #[test]
    fn point_behind_is_outside() {
        let frustum = Camera::default().frustum();
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, 5.0)));
    }

    #[test]
    fn point_beyond_far_plane_is_outside() {
        let camera = Camera::default();
        let frustum = camera.frustum();
        assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, -(camera.far + 1.0))));
    }

    #[test]
    fn sphere_straddling_side_plane_intersects() {
        // 90 degree vertical fov: at z=-5 the half-height is 5.
        let frustum = Camera::default().frustum();
        assert!(frustum.intersects_sphere(Vec3::new(0.0, 5.5, -5.0), 1.0));
        assert!(!frustum.intersects_sphere(Vec3::new(0.0, 9.0, -5.0), 1.0));
    }

    #[test]
    fn aabb_tests() {
        let frustum = Camera::default().frustum();
        assert!(frustum.contains_aabb(Vec3::new(-1.0, -1.0, -6.0), Vec3::new(1.0, 1.0, -4.0)));
        assert!(!frustum.contains_aabb(Vec3::new(-1.0, -1.0, 4.0), Vec3::new(1.0, 1.0, 6.0)));
    }
}
