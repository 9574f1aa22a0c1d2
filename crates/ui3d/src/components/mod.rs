//! Visual components the engine drives: the reticle and the fuse.
//!
//! Both live in the viewer's local space (parented to the camera) and expose
//! their transform, color and ring geometry so any renderer can draw them.

pub mod fuse;
pub mod reticle;
pub mod ring;

pub use fuse::Fuse;
pub use reticle::Reticle;
pub use ring::RingGeometry;

use glam::{Quat, Vec3};
use reticulum_core::Color;

/// Common read-out for camera-attached indicators
pub trait Indicator {
    /// Local transform relative to the camera
    fn transform(&self) -> &Transform3D;

    /// Check if this indicator should be drawn
    fn is_visible(&self) -> bool;

    /// Set visibility
    fn set_visible(&mut self, visible: bool);

    /// Current material color
    fn color(&self) -> Color;
}

/// Transform in 3D space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3D {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform3D {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }
}
