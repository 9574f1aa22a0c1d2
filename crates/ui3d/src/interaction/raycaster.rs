//! Gaze raycasting against target bounds.

use glam::{Vec2, Vec3};
use reticulum_camera::{Frustum, Ray};
use reticulum_core::TargetId;

/// Result of a successful ray test against one target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Target that was hit.
    pub target: TargetId,
    /// Distance from ray origin to the hit point.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
}

/// Axis-aligned bounding box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the box
    pub min: Vec3,
    /// Maximum corner of the box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB from center position and size
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half_size = size * 0.5;
        Self {
            min: center - half_size,
            max: center + half_size,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Test if a ray intersects this AABB.
    /// Returns distance to the intersection point if hit; from inside the box
    /// that is the exit point.
    pub fn ray_intersection(&self, ray_origin: Vec3, ray_dir: Vec3) -> Option<f32> {
        let inv_dir = ray_dir.recip();

        let t1 = (self.min - ray_origin) * inv_dir;
        let t2 = (self.max - ray_origin) * inv_dir;

        let tmin = t1.min(t2).max_element();
        let tmax = t1.max(t2).min_element();

        // Entire box is behind the origin
        if tmax < 0.0 || tmin > tmax {
            return None;
        }

        Some(if tmin < 0.0 { tmax } else { tmin })
    }
}

/// Ray/sphere test. From inside the sphere the far side is reported.
pub fn ray_sphere(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - center;
    let b = oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let root = disc.sqrt();
    let near = -b - root;
    if near >= 0.0 {
        return Some(near);
    }
    let far = -b + root;
    (far >= 0.0).then_some(far)
}

/// Raycast against a camera-facing quad. Returns the hit distance.
pub fn raycast_billboard_quad(
    ray_origin: Vec3,
    ray_dir: Vec3,
    quad_center: Vec3,
    quad_size: Vec2,
    camera_pos: Vec3,
) -> Option<f32> {
    let to_camera = (camera_pos - quad_center).normalize_or_zero();
    let right = Vec3::Y.cross(to_camera).normalize_or_zero();
    if to_camera == Vec3::ZERO || right == Vec3::ZERO {
        // Camera sits on the quad or straight above/below it
        return None;
    }
    let up = to_camera.cross(right);

    let denom = ray_dir.dot(to_camera);
    if denom.abs() < 0.0001 {
        return None;
    }

    let t = (quad_center - ray_origin).dot(to_camera) / denom;
    if t < 0.0 {
        return None;
    }

    let to_hit = ray_origin + ray_dir * t - quad_center;
    let half = quad_size * 0.5;
    (to_hit.dot(right).abs() <= half.x && to_hit.dot(up).abs() <= half.y).then_some(t)
}

/// Hit volume of a gaze target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bounds {
    /// Sphere around a center.
    Sphere { center: Vec3, radius: f32 },
    /// Axis-aligned box.
    Box(Aabb),
    /// Flat quad that always faces the viewer.
    Billboard { center: Vec3, size: Vec2 },
}

impl Bounds {
    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Self::Sphere { center, radius }
    }

    pub fn cube(center: Vec3, size: f32) -> Self {
        Self::Box(Aabb::from_center_size(center, Vec3::splat(size)))
    }

    pub fn billboard(center: Vec3, width: f32, height: f32) -> Self {
        Self::Billboard {
            center,
            size: Vec2::new(width, height),
        }
    }

    /// Geometric center.
    pub fn center(&self) -> Vec3 {
        match self {
            Self::Sphere { center, .. } | Self::Billboard { center, .. } => *center,
            Self::Box(aabb) => aabb.center(),
        }
    }

    /// Radius of the smallest sphere around [`Self::center`] enclosing the volume.
    pub fn bounding_radius(&self) -> f32 {
        match self {
            Self::Sphere { radius, .. } => *radius,
            Self::Box(aabb) => (aabb.max - aabb.min).length() * 0.5,
            Self::Billboard { size, .. } => size.length() * 0.5,
        }
    }

    /// Same bounds moved so its center lands on `center`.
    pub fn recentered(&self, center: Vec3) -> Self {
        match *self {
            Self::Sphere { radius, .. } => Self::Sphere { center, radius },
            Self::Box(aabb) => Self::Box(Aabb::from_center_size(center, aabb.max - aabb.min)),
            Self::Billboard { size, .. } => Self::Billboard { center, size },
        }
    }

    /// Distance along `ray` to the first hit, if any.
    pub fn intersect(&self, ray: &Ray, camera_pos: Vec3) -> Option<f32> {
        match self {
            Self::Sphere { center, radius } => {
                ray_sphere(ray.origin, ray.direction, *center, *radius)
            }
            Self::Box(aabb) => aabb.ray_intersection(ray.origin, ray.direction),
            Self::Billboard { center, size } => {
                raycast_billboard_quad(ray.origin, ray.direction, *center, *size, camera_pos)
            }
        }
    }

    /// Whether any part of the volume lies within the view frustum.
    pub fn in_frustum(&self, frustum: &Frustum) -> bool {
        match self {
            Self::Box(aabb) => frustum.contains_aabb(aabb.min, aabb.max),
            _ => frustum.intersects_sphere(self.center(), self.bounding_radius()),
        }
    }
}

/// Ray caster with optional distance limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Raycaster {
    pub near: f32,
    pub far: f32,
}

impl Default for Raycaster {
    fn default() -> Self {
        Self {
            near: 0.0,
            far: f32::INFINITY,
        }
    }
}

impl Raycaster {
    /// Limits below zero (or unset) keep the defaults.
    pub fn with_limits(near: Option<f32>, far: Option<f32>) -> Self {
        let defaults = Self::default();
        Self {
            near: near.filter(|n| *n >= 0.0).unwrap_or(defaults.near),
            far: far.filter(|f| *f >= 0.0).unwrap_or(defaults.far),
        }
    }

    /// Every target hit within `[near, far]`, nearest first.
    pub fn intersect<I>(&self, ray: &Ray, camera_pos: Vec3, targets: I) -> Vec<Intersection>
    where
        I: IntoIterator<Item = (TargetId, Bounds)>,
    {
        let mut hits: Vec<Intersection> = targets
            .into_iter()
            .filter_map(|(target, bounds)| {
                let distance = bounds.intersect(ray, camera_pos)?;
                (distance >= self.near && distance <= self.far).then(|| Intersection {
                    target,
                    distance,
                    point: ray.at(distance),
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}
